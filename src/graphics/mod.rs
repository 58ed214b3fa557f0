//! A simple set of wrappers around the OpenGL API.
//!
//! Drawing a gasket needs one shader program, one vertex buffer, and one vertex array, so this is
//! raw OpenGL calls behind a thin safe interface rather than a whole graphics library. Every
//! handle deletes itself when dropped.
//!
//! Obviously, a knowledge of OpenGL is *necessary* to understand any of this. [Learn OpenGL] is a
//! classic set of tutorials on it, and [Rust and OpenGL from scratch] covers writing a safe
//! interface like this one over the unsafe calls.
//!
//! [Learn OpenGL]: https://learnopengl.com/
//! [Rust and OpenGL from scratch]: http://nercury.github.io/rust/opengl/tutorial/2018/02/09/opengl-in-rust-from-scratch-02-opengl-context.html

pub mod opengl;
pub mod utils;

use gasket_core::GasketError;
use thiserror::Error;

pub static VERTEX_SHADER: &str = include_str!("shaders/gasket.vert");
pub static FRAGMENT_SHADER: &str = include_str!("shaders/gasket.frag");

#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error("Shader compile error: {0}")]
    ShaderCompile(String),

    #[error("Program link error: {0}")]
    ProgramLink(String),

    /// The window or its OpenGL context couldn't be created or made current.
    #[error("Context error: {0}")]
    Context(String),

    #[error(transparent)]
    Geometry(#[from] GasketError),
}
