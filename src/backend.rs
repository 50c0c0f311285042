//! GPU Backend Capability
//!
//! [`ShaderBackend`] is the narrow slice of a graphics API the cache needs:
//! shader and program object creation, compilation, linking, status and info
//! log queries, and deletion. It maps one-to-one onto the OpenGL calls of the
//! same names (`glCreateShader`, `glShaderSource`, `glCompileShader`, ...),
//! so an implementation over any GL binding is a thin forwarding layer.
//!
//! All calls are made from the thread that owns the graphics context.

use std::num::NonZeroU32;

use crate::shader::ShaderStage;

/// A shader object name. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderObject(pub NonZeroU32);

impl ShaderObject {
    /// Wraps a raw object name; `None` for `0`.
    #[inline]
    #[must_use]
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    #[inline]
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0.get()
    }
}

/// A program object name. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramObject(pub NonZeroU32);

impl ProgramObject {
    /// Wraps a raw object name; `None` for `0`.
    #[inline]
    #[must_use]
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    #[inline]
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0.get()
    }
}

/// Shader / program operations consumed by [`ShaderSet`](crate::ShaderSet).
pub trait ShaderBackend {
    fn create_shader(&mut self, stage: ShaderStage) -> ShaderObject;

    /// Replaces the shader's source with the concatenation of `segments`.
    fn shader_source(&mut self, shader: ShaderObject, segments: &[&str]);

    fn compile_shader(&mut self, shader: ShaderObject);

    /// Status of the most recent compilation; `false` if never compiled.
    fn compile_status(&self, shader: ShaderObject) -> bool;

    fn shader_info_log(&self, shader: ShaderObject) -> String;

    fn create_program(&mut self) -> ProgramObject;

    fn attach_shader(&mut self, program: ProgramObject, shader: ShaderObject);

    fn link_program(&mut self, program: ProgramObject);

    /// Status of the most recent link; `false` if never linked.
    fn link_status(&self, program: ProgramObject) -> bool;

    fn program_info_log(&self, program: ProgramObject) -> String;

    fn delete_shader(&mut self, shader: ShaderObject);

    fn delete_program(&mut self, program: ProgramObject);
}
