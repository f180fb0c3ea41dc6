//! OpenGL shader programs
//!
//! This module implements [`ShaderBackend`] over a `glow` context and defines
//! the [`ShaderProgram`] struct wrapping a linked GLSL program. It also
//! provides the [`Uniform`] trait for setting uniform variables.

use std::path::Path;
use std::sync::Arc;

use glam::{Mat4, Vec3};
use glow::HasContext;
use glsamples_core::shader::{
    BuildError, BuiltProgram, ProgramError, ShaderBackend, StageKind, StageRetention, build_program,
};
use glsamples_core::source::{ShaderPair, StageFiles};

/// Drives the program builder through a live context.
pub struct GlBackend<'a> {
    gl: &'a glow::Context,
}

impl<'a> GlBackend<'a> {
    pub fn new(gl: &'a glow::Context) -> Self {
        Self { gl }
    }
}

impl ShaderBackend for GlBackend<'_> {
    type Stage = glow::Shader;
    type Program = glow::Program;

    fn create_stage(&self, kind: StageKind) -> Result<glow::Shader, String> {
        let shader_type = match kind {
            StageKind::Vertex => glow::VERTEX_SHADER,
            StageKind::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { self.gl.create_shader(shader_type) }
    }

    fn compile_stage(&self, stage: glow::Shader, source: &str) -> bool {
        unsafe {
            self.gl.shader_source(stage, source);
            self.gl.compile_shader(stage);
            self.gl.get_shader_compile_status(stage)
        }
    }

    fn stage_log(&self, stage: glow::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(stage) }
    }

    fn create_program(&self) -> Result<glow::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach(&self, program: glow::Program, stage: glow::Shader) {
        unsafe { self.gl.attach_shader(program, stage) }
    }

    fn detach(&self, program: glow::Program, stage: glow::Shader) {
        unsafe { self.gl.detach_shader(program, stage) }
    }

    fn link(&self, program: glow::Program) -> bool {
        unsafe {
            self.gl.link_program(program);
            self.gl.get_program_link_status(program)
        }
    }

    fn program_log(&self, program: glow::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn delete_stage(&self, stage: glow::Shader) {
        unsafe { self.gl.delete_shader(stage) }
    }

    fn delete_program(&self, program: glow::Program) {
        unsafe { self.gl.delete_program(program) }
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Sets the value of the uniform variable in the given shader program.
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str);
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            if let Some(loc) = gl.get_uniform_location(program, name) {
                gl.uniform_1_i32(Some(&loc), *self);
            }
        }
    }
}

impl Uniform for Vec3 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            if let Some(loc) = gl.get_uniform_location(program, name) {
                gl.uniform_3_f32(Some(&loc), self.x, self.y, self.z);
            }
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            if let Some(loc) = gl.get_uniform_location(program, name) {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, self.as_ref());
            }
        }
    }
}

/// A linked GLSL program. The program (and any stages it retained) is
/// deleted when this is dropped.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    built: BuiltProgram<glow::Shader, glow::Program>,
}

impl ShaderProgram {
    /// Compiles and links a program from vertex and fragment source text.
    ///
    /// Objects created before a failing step are deleted before returning.
    pub fn new(
        gl: &Arc<glow::Context>,
        vertex: &str,
        fragment: &str,
        retention: StageRetention,
    ) -> Result<Self, BuildError> {
        let backend = GlBackend::new(gl);
        let built = build_program(&backend, vertex, fragment, retention)
            .map_err(|failure| failure.release(&backend))?;

        Ok(Self {
            gl: Arc::clone(gl),
            built,
        })
    }

    /// Reads a vertex/fragment pair from `dir` and builds it.
    pub fn load(
        gl: &Arc<glow::Context>,
        dir: &Path,
        files: StageFiles,
        retention: StageRetention,
    ) -> Result<Self, ProgramError> {
        let pair = ShaderPair::load(dir, files)?;
        let program = Self::new(gl, pair.vertex.text(), pair.fragment.text(), retention)?;
        log::info!(
            "built program from {} and {}",
            pair.vertex.path().display(),
            pair.fragment.path().display()
        );
        Ok(program)
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        if let Some(id) = self.built.handle() {
            unsafe {
                self.gl.use_program(Some(id));
            }
        }
    }

    /// Sets a uniform variable in the shader program.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        if let Some(id) = self.built.handle() {
            value.set_uniform(&self.gl, id, name);
        }
    }

    /// Unbinds whatever program is current.
    pub fn unbind(gl: &glow::Context) {
        unsafe {
            gl.use_program(None);
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.built.delete(&GlBackend::new(&self.gl));
    }
}
