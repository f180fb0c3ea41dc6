//! ARB assembly vertex and fragment programs.
//!
//! `glow` does not expose the `GL_ARB_vertex_program` entry points, so they are
//! looked up by name through the context's loader and called directly.

use std::ffi::{CStr, c_char, c_void};
use std::sync::Arc;

use glam::Vec4;
use glow::HasContext;
use glsamples_core::assembly::{AssemblyBackend, assemble_pair};
use glsamples_core::extensions::{ExtensionError, resolve_entry_points};
use glsamples_core::shader::{BuildError, StageKind};

pub const VERTEX_PROGRAM_ARB: u32 = 0x8620;
pub const FRAGMENT_PROGRAM_ARB: u32 = 0x8804;
pub const PROGRAM_FORMAT_ASCII_ARB: u32 = 0x8875;
pub const PROGRAM_ERROR_POSITION_ARB: u32 = 0x864B;
pub const PROGRAM_ERROR_STRING_ARB: u32 = 0x8874;

type GenProgramsFn = unsafe extern "system" fn(n: i32, programs: *mut u32);
type DeleteProgramsFn = unsafe extern "system" fn(n: i32, programs: *const u32);
type BindProgramFn = unsafe extern "system" fn(target: u32, program: u32);
type ProgramStringFn =
    unsafe extern "system" fn(target: u32, format: u32, len: i32, string: *const c_void);
type ProgramEnvParameter4fFn =
    unsafe extern "system" fn(target: u32, index: u32, x: f32, y: f32, z: f32, w: f32);
type GetStringFn = unsafe extern "system" fn(name: u32) -> *const u8;

const ENTRY_POINTS: [&str; 6] = [
    "glGenProgramsARB",
    "glDeleteProgramsARB",
    "glBindProgramARB",
    "glProgramStringARB",
    "glProgramEnvParameter4fARB",
    "glGetString",
];

/// The resolved program entry points.
pub struct ArbProgramApi {
    gen_programs: GenProgramsFn,
    delete_programs: DeleteProgramsFn,
    bind_program: BindProgramFn,
    program_string: ProgramStringFn,
    program_env_parameter_4f: ProgramEnvParameter4fFn,
    get_string: GetStringFn,
}

impl ArbProgramApi {
    /// Resolves every entry point, failing with the names of those the driver
    /// does not provide.
    pub fn load<F>(loader: F) -> Result<Self, ExtensionError>
    where
        F: FnMut(&str) -> *const c_void,
    {
        let pointers = resolve_entry_points(&ENTRY_POINTS, loader)?;
        // SAFETY: every pointer is non-null and was returned by the GL loader for
        // the entry point whose signature it is cast to.
        unsafe {
            Ok(Self {
                gen_programs: std::mem::transmute::<*const c_void, GenProgramsFn>(pointers[0]),
                delete_programs: std::mem::transmute::<*const c_void, DeleteProgramsFn>(
                    pointers[1],
                ),
                bind_program: std::mem::transmute::<*const c_void, BindProgramFn>(pointers[2]),
                program_string: std::mem::transmute::<*const c_void, ProgramStringFn>(pointers[3]),
                program_env_parameter_4f: std::mem::transmute::<
                    *const c_void,
                    ProgramEnvParameter4fFn,
                >(pointers[4]),
                get_string: std::mem::transmute::<*const c_void, GetStringFn>(pointers[5]),
            })
        }
    }

    fn error_string(&self) -> String {
        let raw = unsafe { (self.get_string)(PROGRAM_ERROR_STRING_ARB) };
        if raw.is_null() {
            return String::new();
        }
        unsafe { CStr::from_ptr(raw as *const c_char) }
            .to_string_lossy()
            .into_owned()
    }
}

/// Drives the core assembler over the resolved entry points.
pub struct ArbBackend<'a> {
    api: &'a ArbProgramApi,
    gl: &'a glow::Context,
}

impl<'a> ArbBackend<'a> {
    pub fn new(api: &'a ArbProgramApi, gl: &'a glow::Context) -> Self {
        Self { api, gl }
    }
}

fn target_of(kind: StageKind) -> u32 {
    match kind {
        StageKind::Vertex => VERTEX_PROGRAM_ARB,
        StageKind::Fragment => FRAGMENT_PROGRAM_ARB,
    }
}

impl AssemblyBackend for ArbBackend<'_> {
    type Program = u32;

    fn gen_program(&self) -> u32 {
        let mut id: u32 = 0;
        unsafe { (self.api.gen_programs)(1, &mut id) };
        id
    }

    fn load_source(&self, kind: StageKind, program: u32, source: &str) {
        let target = target_of(kind);
        unsafe {
            (self.api.bind_program)(target, program);
            (self.api.program_string)(
                target,
                PROGRAM_FORMAT_ASCII_ARB,
                source.len() as i32,
                source.as_ptr() as *const c_void,
            );
        }
    }

    fn take_error(&self) -> bool {
        unsafe { self.gl.get_error() != glow::NO_ERROR }
    }

    fn error_position(&self) -> i32 {
        unsafe { self.gl.get_parameter_i32(PROGRAM_ERROR_POSITION_ARB) }
    }

    fn error_string(&self) -> String {
        self.api.error_string()
    }

    fn delete_program(&self, program: u32) {
        unsafe { (self.api.delete_programs)(1, &program) }
    }
}

/// A single assembled program for one target.
pub struct ArbProgram {
    api: Arc<ArbProgramApi>,
    target: u32,
    id: u32,
}

impl ArbProgram {
    pub fn bind(&self) {
        unsafe { (self.api.bind_program)(self.target, self.id) }
    }

    /// Sets `program.env[index]`.
    pub fn set_env(&self, index: u32, value: Vec4) {
        unsafe {
            (self.api.program_env_parameter_4f)(
                self.target,
                index,
                value.x,
                value.y,
                value.z,
                value.w,
            )
        }
    }
}

impl Drop for ArbProgram {
    fn drop(&mut self) {
        unsafe { (self.api.delete_programs)(1, &self.id) }
    }
}

/// A vertex program and a fragment program used together.
pub struct ArbProgramPair {
    gl: Arc<glow::Context>,
    pub vertex: ArbProgram,
    pub fragment: ArbProgram,
}

impl ArbProgramPair {
    /// Assembles the vertex program, then the fragment program. A vertex
    /// failure is reported without attempting the fragment program.
    pub fn build(
        api: &Arc<ArbProgramApi>,
        gl: &Arc<glow::Context>,
        vertex: &str,
        fragment: &str,
    ) -> Result<Self, BuildError> {
        let pair = assemble_pair(&ArbBackend::new(api, gl), vertex, fragment)?;
        let wrap = |kind, id| ArbProgram {
            api: Arc::clone(api),
            target: target_of(kind),
            id,
        };

        Ok(Self {
            gl: Arc::clone(gl),
            vertex: wrap(StageKind::Vertex, pair.vertex),
            fragment: wrap(StageKind::Fragment, pair.fragment),
        })
    }

    /// Enables both program targets and binds the pair.
    pub fn enable(&self) {
        unsafe {
            self.gl.enable(VERTEX_PROGRAM_ARB);
            self.gl.enable(FRAGMENT_PROGRAM_ARB);
        }
        self.vertex.bind();
        self.fragment.bind();
    }

    pub fn disable(&self) {
        unsafe {
            self.gl.disable(VERTEX_PROGRAM_ARB);
            self.gl.disable(FRAGMENT_PROGRAM_ARB);
        }
    }
}
