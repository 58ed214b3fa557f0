use std::ffi::{CString, c_void};
use std::mem::size_of;
use std::ptr::null_mut;

use super::utils::*;
use super::GraphicsError;

pub enum GlShaderType {
    Vertex = gl::VERTEX_SHADER as isize,
    Fragment = gl::FRAGMENT_SHADER as isize
}

pub struct GlShader {
    id: u32
}

impl GlShader {
    pub fn id(&self) -> u32 { self.id }

    pub fn from_source(src: &str, kind: GlShaderType) -> Result<Self, GraphicsError> {
        let source = CString::new(src)
            .map_err(|e| GraphicsError::ShaderCompile(format!("shader source has a nul byte: {}", e)))?;

        let id = shader_from_source(&source, kind as u32)?;

        Ok(Self { id })
    }

    pub fn from_vert_source(src: &str) -> Result<Self, GraphicsError> {
        Self::from_source(src, GlShaderType::Vertex)
    }

    pub fn from_frag_source(src: &str) -> Result<Self, GraphicsError> {
        Self::from_source(src, GlShaderType::Fragment)
    }
}

impl Drop for GlShader {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteShader(self.id);
        }
    }
}

pub struct GlProgram {
    id: u32
}

impl GlProgram {
    pub fn from_shaders(shaders: &[GlShader]) -> Result<Self, GraphicsError> {
        let id = unsafe { gl::CreateProgram() };

        unsafe {
            for shader in shaders {
                gl::AttachShader(id, shader.id());
            }

            gl::LinkProgram(id);
        }

        let mut success = 1;
        unsafe {
            gl::GetProgramiv(id, gl::LINK_STATUS, &mut success);
        }

        if success == 0 {
            let mut len = 0;
            unsafe {
                gl::GetProgramiv(id, gl::INFO_LOG_LENGTH, &mut len);
            }

            let error = create_ws_cstring_with_len(len as usize);
            unsafe {
                gl::GetProgramInfoLog(id, len, null_mut(), error.as_ptr() as *mut gl::types::GLchar);
                gl::DeleteProgram(id);
            }

            return Err(GraphicsError::ProgramLink(error.to_string_lossy().into_owned()));
        }

        unsafe {
            for shader in shaders {
                gl::DetachShader(id, shader.id());
            }
        }

        Ok(Self { id })
    }

    pub fn set_used(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }
}

impl Drop for GlProgram {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.id);
        }
    }
}

/// How often the contents of a buffer are expected to change. OpenGL only uses this as a hint for
/// where to put the data.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferUsage {
    /// Uploaded once, drawn many times
    Static = gl::STATIC_DRAW as isize,
    /// Replaced often
    Dynamic = gl::DYNAMIC_DRAW as isize
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Primitive {
    Triangles = gl::TRIANGLES as isize,
    Points = gl::POINTS as isize
}

pub struct GlVertexBuffer {
    id: u32
}

impl GlVertexBuffer {
    pub fn init(data: &[f32], usage: BufferUsage) -> Self {
        let vbo = Self::generate();
        vbo.upload(data, usage);
        vbo
    }

    pub fn generate() -> Self {
        let mut vbo = 0u32;
        unsafe { gl::GenBuffers(1, &mut vbo) };
        Self {
            id: vbo
        }
    }

    pub fn bind(&self) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, self.id); }
    }

    /// Replaces the whole contents of the buffer with `data`.
    pub fn upload(&self, data: &[f32], usage: BufferUsage) {
        self.bind();
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (data.len() * size_of::<f32>()) as isize,
                data.as_ptr() as *const c_void,
                usage as u32
            );
        }
        unbind_array_buffer();
    }
}

impl Drop for GlVertexBuffer {
    fn drop(&mut self) {
        unsafe { gl::DeleteBuffers(1, &self.id); }
    }
}

/// Remembers which buffer feeds which vertex attribute, so drawing only needs to bind this.
pub struct GlVertexArray {
    id: u32
}

impl GlVertexArray {
    /// Sets up attribute `index` to read `size` floats per vertex, tightly packed, from `vbo`.
    pub fn with_buffer(vbo: &GlVertexBuffer, index: u32, size: i32) -> Self {
        let mut vao = 0u32;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::BindVertexArray(vao);
        }

        vbo.bind();
        set_vertex_attrib(index, 0, size, size as usize);
        unsafe { gl::BindVertexArray(0); }
        unbind_array_buffer();

        Self { id: vao }
    }

    pub fn bind(&self) {
        unsafe { gl::BindVertexArray(self.id); }
    }
}

impl Drop for GlVertexArray {
    fn drop(&mut self) {
        unsafe { gl::DeleteVertexArrays(1, &self.id); }
    }
}

pub fn unbind_array_buffer() {
    unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, 0); }
}

pub fn set_vertex_attrib(index: u32, offset: usize, size: i32, stride: usize) {
    unsafe {
        gl::EnableVertexAttribArray(index);
        gl::VertexAttribPointer(
            index,
            size,
            gl::FLOAT,
            gl::FALSE,
            (stride * size_of::<f32>()) as i32,
            (offset * size_of::<f32>()) as *const c_void
        );
    }
}

pub fn draw_arrays(primitive: Primitive, vertex_count: usize) {
    unsafe { gl::DrawArrays(primitive as u32, 0, vertex_count as i32); }
}

pub fn clear(r: f32, g: f32, b: f32) {
    unsafe {
        gl::ClearColor(r, g, b, 1.0);
        gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
    }
}
