use std::ffi::{CStr, CString};
use std::ptr::{null, null_mut};

use super::GraphicsError;

pub fn shader_from_source(source: &CStr, kind: u32) -> Result<u32, GraphicsError> {
    let id: u32 = unsafe { gl::CreateShader(kind) };
    unsafe {
        gl::ShaderSource(id, 1, &source.as_ptr(), null());
        gl::CompileShader(id);
    }

    let mut success = 1;
    unsafe {
        gl::GetShaderiv(id, gl::COMPILE_STATUS, &mut success);
    }

    if success == 0 {
        let mut len = 0;
        unsafe {
            gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut len);
        }

        let error = create_ws_cstring_with_len(len as usize);
        unsafe {
            gl::GetShaderInfoLog(id, len, null_mut(), error.as_ptr() as *mut gl::types::GLchar);
            gl::DeleteShader(id);
        }

        return Err(GraphicsError::ShaderCompile(
            error // CString
                .to_string_lossy() // &str or String
                .into_owned() // String
        ));
    }

    Ok(id)
}

pub fn create_ws_cstring_with_len(len: usize) -> CString {
    let mut buf: Vec<u8> = Vec::with_capacity(len + 1);
    buf.extend([b' '].iter().cycle().take(len)); // Adds a bunch of spaces to the buffer
    unsafe { CString::from_vec_unchecked(buf) }
}

/// Empties OpenGL's error queue, logging everything in it. Returns how many errors there were.
pub fn drain_gl_errors(context: &str) -> usize {
    let mut count = 0;
    loop {
        let code = unsafe { gl::GetError() };
        if code == gl::NO_ERROR {
            return count;
        }

        warn!("OpenGL error 0x{:04X} ({})", code, context);
        count += 1;
    }
}

/// Reads one of the `glGetString` strings, such as `gl::VERSION`.
pub fn gl_string(name: gl::types::GLenum) -> String {
    unsafe {
        let ptr = gl::GetString(name);
        if ptr.is_null() {
            return String::from("unknown");
        }

        CStr::from_ptr(ptr as *const _).to_string_lossy().into_owned()
    }
}
