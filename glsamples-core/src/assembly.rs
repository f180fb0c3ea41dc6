//! Assembly program loading for `GL_ARB_vertex_program` and
//! `GL_ARB_fragment_program`.
//!
//! Unlike GLSL there is no compile status or info log. The driver flags a bad
//! program through the GL error state and an error position, which is `-1`
//! when the text was accepted.

use std::fmt::Debug;

use crate::shader::{BuildError, StageKind, bounded_log};

/// Upper bound on stale errors cleared before a program is loaded.
pub const MAX_DRAINED_ERRORS: usize = 32;

/// The driver operations needed to assemble a program.
pub trait AssemblyBackend {
    type Program: Copy + PartialEq + Debug;

    fn gen_program(&self) -> Self::Program;
    /// Binds `program` to the target for `kind` and hands it the source text.
    fn load_source(&self, kind: StageKind, program: Self::Program, source: &str);
    /// Pops one pending error. Returns `false` once the error state is clear.
    fn take_error(&self) -> bool;
    fn error_position(&self) -> i32;
    fn error_string(&self) -> String;
    fn delete_program(&self, program: Self::Program);
}

/// A vertex program and a fragment program assembled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembledPair<P> {
    pub vertex: P,
    pub fragment: P,
}

/// Assembles a single program.
///
/// Errors left over from earlier calls are cleared first so they are not
/// blamed on this program. On failure the program object is deleted.
pub fn assemble<B: AssemblyBackend>(
    backend: &B,
    kind: StageKind,
    source: &str,
) -> Result<B::Program, BuildError> {
    let mut drained = 0;
    while drained < MAX_DRAINED_ERRORS && backend.take_error() {
        drained += 1;
    }
    if drained > 0 {
        log::debug!("cleared {drained} pending GL errors before assembling");
    }

    let program = backend.gen_program();
    backend.load_source(kind, program, source);

    let raised = backend.take_error();
    let position = backend.error_position();
    if raised || position != -1 {
        let message = backend.error_string();
        backend.delete_program(program);
        let origin = format!("the {} program assembler", kind.label());
        let log = bounded_log(format!("error at position {position}: {message}"), &origin);
        return Err(BuildError::compile_failed(kind, log));
    }

    log::debug!("assembled {} program {program:?}", kind.label());
    Ok(program)
}

/// Assembles the vertex program, then the fragment program.
///
/// A vertex failure is returned without loading the fragment source. A
/// fragment failure deletes the vertex program that was already assembled.
pub fn assemble_pair<B: AssemblyBackend>(
    backend: &B,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<AssembledPair<B::Program>, BuildError> {
    let vertex = assemble(backend, StageKind::Vertex, vertex_source)?;
    match assemble(backend, StageKind::Fragment, fragment_source) {
        Ok(fragment) => Ok(AssembledPair { vertex, fragment }),
        Err(e) => {
            backend.delete_program(vertex);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Gen(u32),
        Load(StageKind, u32),
        Delete(u32),
    }

    /// Accepts a program whose text starts with the header for its target and
    /// ends with `END`. Anything else raises an error at the first offending
    /// byte.
    #[derive(Default)]
    struct FakeAssembler {
        next_id: Cell<u32>,
        pending_errors: Cell<usize>,
        position: Cell<i32>,
        message: RefCell<String>,
        calls: RefCell<Vec<Call>>,
    }

    impl FakeAssembler {
        fn with_stale_errors(count: usize) -> Self {
            let fake = Self::default();
            fake.pending_errors.set(count);
            fake
        }

        fn loads(&self) -> Vec<StageKind> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|c| match c {
                    Call::Load(kind, _) => Some(*kind),
                    _ => None,
                })
                .collect()
        }

        fn deleted(&self) -> Vec<u32> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|c| match c {
                    Call::Delete(id) => Some(*id),
                    _ => None,
                })
                .collect()
        }
    }

    impl AssemblyBackend for FakeAssembler {
        type Program = u32;

        fn gen_program(&self) -> u32 {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            self.calls.borrow_mut().push(Call::Gen(id));
            id
        }

        fn load_source(&self, kind: StageKind, program: u32, source: &str) {
            self.calls.borrow_mut().push(Call::Load(kind, program));
            let header = match kind {
                StageKind::Vertex => "!!ARBvp1.0",
                StageKind::Fragment => "!!ARBfp1.0",
            };
            let body = source.trim_end();
            let position = if !body.starts_with(header) {
                Some(0)
            } else if !body.ends_with("END") {
                Some(body.len())
            } else {
                None
            };
            match position {
                Some(at) => {
                    self.position.set(at as i32);
                    *self.message.borrow_mut() = format!("line 1, column {at}: syntax error");
                    self.pending_errors.set(self.pending_errors.get() + 1);
                }
                None => {
                    self.position.set(-1);
                    self.message.borrow_mut().clear();
                }
            }
        }

        fn take_error(&self) -> bool {
            let pending = self.pending_errors.get();
            if pending == 0 {
                return false;
            }
            self.pending_errors.set(pending - 1);
            true
        }

        fn error_position(&self) -> i32 {
            self.position.get()
        }

        fn error_string(&self) -> String {
            self.message.borrow().clone()
        }

        fn delete_program(&self, program: u32) {
            self.calls.borrow_mut().push(Call::Delete(program));
        }
    }

    const VERTEX: &str = "!!ARBvp1.0\nMOV result.position, vertex.attrib[0];\nEND\n";
    const FRAGMENT: &str = "!!ARBfp1.0\nMOV result.color, fragment.color;\nEND\n";

    #[test]
    fn assembles_a_valid_pair() {
        let fake = FakeAssembler::default();
        let pair = assemble_pair(&fake, VERTEX, FRAGMENT).unwrap();
        assert_eq!(pair, AssembledPair { vertex: 1, fragment: 2 });
        assert_eq!(fake.loads(), vec![StageKind::Vertex, StageKind::Fragment]);
        assert!(fake.deleted().is_empty());
    }

    #[test]
    fn vertex_failure_never_loads_the_fragment_program() {
        let fake = FakeAssembler::default();
        let error = assemble_pair(&fake, "MOV result.position;\nEND", FRAGMENT).unwrap_err();
        assert!(matches!(error, BuildError::VertexCompileFailed(_)));
        assert_eq!(error.title(), "Vertex Shader Compile Error");
        assert_eq!(fake.loads(), vec![StageKind::Vertex]);
        assert_eq!(fake.deleted(), vec![1]);
    }

    #[test]
    fn fragment_failure_deletes_the_vertex_program() {
        let fake = FakeAssembler::default();
        let error = assemble_pair(&fake, VERTEX, "!!ARBfp1.0\nMOV result.color").unwrap_err();
        assert!(matches!(error, BuildError::FragmentCompileFailed(_)));
        let mut deleted = fake.deleted();
        deleted.sort_unstable();
        assert_eq!(deleted, vec![1, 2]);
    }

    #[test]
    fn error_carries_the_position_and_driver_message() {
        let fake = FakeAssembler::default();
        let source = "!!ARBvp1.0\nMOV result.position";
        let error = assemble(&fake, StageKind::Vertex, source).unwrap_err();
        let expected = format!("error at position {}: ", source.len());
        assert!(error.log().starts_with(&expected), "{}", error.log());
        assert!(error.log().contains("syntax error"));
    }

    #[test]
    fn stale_errors_are_not_blamed_on_a_valid_program() {
        let fake = FakeAssembler::with_stale_errors(3);
        let program = assemble(&fake, StageKind::Fragment, FRAGMENT).unwrap();
        assert_eq!(program, 1);
        assert_eq!(fake.pending_errors.get(), 0);
    }

    #[test]
    fn draining_gives_up_after_the_limit() {
        let fake = FakeAssembler::with_stale_errors(MAX_DRAINED_ERRORS + 1);
        let error = assemble(&fake, StageKind::Vertex, VERTEX).unwrap_err();
        assert!(matches!(error, BuildError::VertexCompileFailed(_)));
        assert_eq!(fake.deleted(), vec![1]);
    }
}
