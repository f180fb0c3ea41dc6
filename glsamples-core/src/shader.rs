//! Shader program building.
//!
//! [`build_program`] drives a [`ShaderBackend`] through the create, compile,
//! attach and link sequence for a vertex/fragment pair. On success it returns a
//! [`BuiltProgram`]; on failure a [`BuildFailure`] carrying the diagnostic and
//! every object created before the failing step, so the caller can release them.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::source::SourceError;

/// Upper bound, in bytes, of a diagnostic log kept from the driver.
pub const INFO_LOG_LIMIT: usize = 4096;

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub fn label(self) -> &'static str {
        match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
        }
    }
}

/// What happens to the stage objects once the program has linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageRetention {
    /// Detach and delete the stages right after a successful link.
    #[default]
    DeleteAfterLink,
    /// Keep the stages alive until the program itself is deleted.
    RetainUntilDelete,
}

/// Why a program could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("vertex shader failed to compile:\n{0}")]
    VertexCompileFailed(String),
    #[error("fragment shader failed to compile:\n{0}")]
    FragmentCompileFailed(String),
    #[error("program failed to link:\n{0}")]
    LinkFailed(String),
    #[error("could not create {0}")]
    ObjectCreation(String),
}

impl BuildError {
    /// Title used when the error is shown to the user in a dialog.
    pub fn title(&self) -> &'static str {
        match self {
            BuildError::VertexCompileFailed(_) => "Vertex Shader Compile Error",
            BuildError::FragmentCompileFailed(_) => "Fragment Shader Compile Error",
            BuildError::LinkFailed(_) => "Linking Error",
            BuildError::ObjectCreation(_) => "ERROR",
        }
    }

    /// The diagnostic text reported by the driver.
    pub fn log(&self) -> &str {
        match self {
            BuildError::VertexCompileFailed(log)
            | BuildError::FragmentCompileFailed(log)
            | BuildError::LinkFailed(log)
            | BuildError::ObjectCreation(log) => log,
        }
    }

    pub(crate) fn compile_failed(kind: StageKind, log: String) -> Self {
        match kind {
            StageKind::Vertex => BuildError::VertexCompileFailed(log),
            StageKind::Fragment => BuildError::FragmentCompileFailed(log),
        }
    }
}

/// Either half of loading a program from disk: reading the files or building them.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl ProgramError {
    pub fn title(&self) -> &'static str {
        match self {
            ProgramError::Source(_) => "ERROR",
            ProgramError::Build(e) => e.title(),
        }
    }
}

/// The driver operations needed to build a program.
///
/// Implemented over a live GL context by the client and by an in-memory
/// compiler in the tests.
pub trait ShaderBackend {
    type Stage: Copy + PartialEq + Debug;
    type Program: Copy + PartialEq + Debug;

    fn create_stage(&self, kind: StageKind) -> Result<Self::Stage, String>;
    /// Supplies the source and compiles. Returns the compile status.
    fn compile_stage(&self, stage: Self::Stage, source: &str) -> bool;
    fn stage_log(&self, stage: Self::Stage) -> String;
    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach(&self, program: Self::Program, stage: Self::Stage);
    fn detach(&self, program: Self::Program, stage: Self::Stage);
    /// Links the program. Returns the link status.
    fn link(&self, program: Self::Program) -> bool;
    fn program_log(&self, program: Self::Program) -> String;
    fn delete_stage(&self, stage: Self::Stage);
    fn delete_program(&self, program: Self::Program);
}

/// Objects that were created before a build step failed.
#[derive(Debug)]
pub struct Leftovers<S, P> {
    pub stages: Vec<S>,
    pub program: Option<P>,
}

impl<S, P> Default for Leftovers<S, P> {
    fn default() -> Self {
        Self {
            stages: Vec::new(),
            program: None,
        }
    }
}

/// A failed build: the error plus the objects the caller now owns.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct BuildFailure<S: Debug, P: Debug> {
    pub error: BuildError,
    pub leftovers: Leftovers<S, P>,
}

impl<S: Copy + Debug, P: Copy + Debug> BuildFailure<S, P> {
    /// Deletes the leftover objects and returns the error.
    pub fn release<B>(self, backend: &B) -> BuildError
    where
        B: ShaderBackend<Stage = S, Program = P>,
    {
        if let Some(program) = self.leftovers.program {
            backend.delete_program(program);
        }
        for stage in self.leftovers.stages {
            backend.delete_stage(stage);
        }
        self.error
    }
}

/// A linked program and, depending on the [`StageRetention`], its stages.
#[derive(Debug)]
pub struct BuiltProgram<S, P> {
    program: Option<P>,
    stages: Vec<S>,
}

impl<S: Copy, P: Copy> BuiltProgram<S, P> {
    /// The program handle, or `None` once the program has been deleted.
    pub fn handle(&self) -> Option<P> {
        self.program
    }

    /// Stages still owned by the program.
    pub fn retained_stages(&self) -> &[S] {
        &self.stages
    }

    /// Deletes the program and any retained stages.
    ///
    /// Deleting an already deleted program does nothing.
    pub fn delete<B>(&mut self, backend: &B)
    where
        B: ShaderBackend<Stage = S, Program = P>,
    {
        if let Some(program) = self.program.take() {
            backend.delete_program(program);
        }
        for stage in self.stages.drain(..) {
            backend.delete_stage(stage);
        }
    }
}

/// Builds a program out of a vertex and a fragment source.
///
/// The vertex stage is compiled first; if it fails the fragment stage is never
/// created and nothing is linked.
pub fn build_program<B: ShaderBackend>(
    backend: &B,
    vertex_source: &str,
    fragment_source: &str,
    retention: StageRetention,
) -> Result<BuiltProgram<B::Stage, B::Program>, BuildFailure<B::Stage, B::Program>> {
    let mut leftovers = Leftovers::default();

    let vertex = compile(backend, StageKind::Vertex, vertex_source, &mut leftovers)?;
    let fragment = compile(backend, StageKind::Fragment, fragment_source, &mut leftovers)?;

    let program = match backend.create_program() {
        Ok(program) => program,
        Err(e) => {
            return Err(BuildFailure {
                error: BuildError::ObjectCreation(format!("program object: {e}")),
                leftovers,
            });
        }
    };
    leftovers.program = Some(program);

    backend.attach(program, vertex);
    backend.attach(program, fragment);

    if !backend.link(program) {
        let log = bounded_log(backend.program_log(program), "linker");
        log::debug!("link failed for program {program:?}");
        return Err(BuildFailure {
            error: BuildError::LinkFailed(log),
            leftovers,
        });
    }

    let stages = match retention {
        StageRetention::DeleteAfterLink => {
            for stage in [vertex, fragment] {
                backend.detach(program, stage);
                backend.delete_stage(stage);
            }
            Vec::new()
        }
        StageRetention::RetainUntilDelete => vec![vertex, fragment],
    };

    log::debug!("linked program {program:?} ({retention:?})");
    Ok(BuiltProgram {
        program: Some(program),
        stages,
    })
}

fn compile<B: ShaderBackend>(
    backend: &B,
    kind: StageKind,
    source: &str,
    leftovers: &mut Leftovers<B::Stage, B::Program>,
) -> Result<B::Stage, BuildFailure<B::Stage, B::Program>> {
    let stage = match backend.create_stage(kind) {
        Ok(stage) => stage,
        Err(e) => {
            return Err(BuildFailure {
                error: BuildError::ObjectCreation(format!("{} stage: {e}", kind.label())),
                leftovers: std::mem::take(leftovers),
            });
        }
    };
    leftovers.stages.push(stage);

    if !backend.compile_stage(stage, source) {
        let log = bounded_log(backend.stage_log(stage), kind.label());
        return Err(BuildFailure {
            error: BuildError::compile_failed(kind, log),
            leftovers: std::mem::take(leftovers),
        });
    }

    Ok(stage)
}

/// Trims a driver log and caps it at [`INFO_LOG_LIMIT`] bytes.
///
/// An empty log is replaced so a failure always carries some text.
pub fn bounded_log(log: String, origin: &str) -> String {
    let mut log = log.trim_end_matches(['\0', '\n', '\r', ' ']).to_string();
    if log.len() > INFO_LOG_LIMIT {
        let mut end = INFO_LOG_LIMIT;
        while !log.is_char_boundary(end) {
            end -= 1;
        }
        log.truncate(end);
    }
    if log.is_empty() {
        log = format!("{origin} reported an error without a diagnostic");
    }
    log
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        CreateStage(StageKind),
        Compile(u32),
        CreateProgram,
        Link(u32),
        DeleteStage(u32),
        DeleteProgram(u32),
    }

    /// A tiny stand-in for a GLSL compiler: a stage compiles when it has a
    /// `main` function with balanced braces, and linking fails when the
    /// fragment stage reads a varying the vertex stage never declares.
    #[derive(Default)]
    struct FakeCompiler {
        next_id: Cell<u32>,
        sources: RefCell<Vec<(u32, StageKind, String)>>,
        attached: RefCell<Vec<(u32, u32)>>,
        calls: RefCell<Vec<Call>>,
        deleted: RefCell<Vec<u32>>,
        fail_program_creation: bool,
    }

    impl FakeCompiler {
        fn id(&self) -> u32 {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            id
        }

        fn source_of(&self, stage: u32) -> Option<(StageKind, String)> {
            self.sources
                .borrow()
                .iter()
                .find(|(id, _, _)| *id == stage)
                .map(|(_, kind, src)| (*kind, src.clone()))
        }

        fn varyings(source: &str) -> Vec<String> {
            source
                .split(';')
                .filter_map(|decl| {
                    let mut words = decl.split_whitespace();
                    match words.next() {
                        Some("varying") => words.nth(1).map(str::to_string),
                        _ => None,
                    }
                })
                .collect()
        }

        fn links(&self) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|c| matches!(c, Call::Link(_)))
                .count()
        }

        fn delete_count(&self, id: u32) -> usize {
            self.deleted.borrow().iter().filter(|d| **d == id).count()
        }
    }

    impl ShaderBackend for FakeCompiler {
        type Stage = u32;
        type Program = u32;

        fn create_stage(&self, kind: StageKind) -> Result<u32, String> {
            self.calls.borrow_mut().push(Call::CreateStage(kind));
            let id = self.id();
            self.sources.borrow_mut().push((id, kind, String::new()));
            Ok(id)
        }

        fn compile_stage(&self, stage: u32, source: &str) -> bool {
            self.calls.borrow_mut().push(Call::Compile(stage));
            if let Some(entry) = self.sources.borrow_mut().iter_mut().find(|e| e.0 == stage) {
                entry.2 = source.to_string();
            }
            let opens = source.matches('{').count();
            source.contains("void main()") && opens > 0 && opens == source.matches('}').count()
        }

        fn stage_log(&self, stage: u32) -> String {
            match self.source_of(stage) {
                Some((_, src)) if src.contains("void main()") => String::new(),
                _ => "0:1(1): error: syntax error, unexpected IDENTIFIER\n".to_string(),
            }
        }

        fn create_program(&self) -> Result<u32, String> {
            self.calls.borrow_mut().push(Call::CreateProgram);
            if self.fail_program_creation {
                return Err("out of memory".to_string());
            }
            Ok(self.id())
        }

        fn attach(&self, program: u32, stage: u32) {
            self.attached.borrow_mut().push((program, stage));
        }

        fn detach(&self, program: u32, stage: u32) {
            self.attached.borrow_mut().retain(|a| *a != (program, stage));
        }

        fn link(&self, program: u32) -> bool {
            self.calls.borrow_mut().push(Call::Link(program));
            let stages: Vec<(StageKind, String)> = self
                .attached
                .borrow()
                .iter()
                .filter(|(p, _)| *p == program)
                .filter_map(|(_, s)| self.source_of(*s))
                .collect();
            let declared: Vec<String> = stages
                .iter()
                .filter(|(kind, _)| *kind == StageKind::Vertex)
                .flat_map(|(_, src)| Self::varyings(src))
                .collect();
            stages
                .iter()
                .filter(|(kind, _)| *kind == StageKind::Fragment)
                .flat_map(|(_, src)| Self::varyings(src))
                .all(|name| declared.contains(&name))
        }

        fn program_log(&self, _program: u32) -> String {
            "error: fragment shader input `vUv` has no matching vertex output".to_string()
        }

        fn delete_stage(&self, stage: u32) {
            self.calls.borrow_mut().push(Call::DeleteStage(stage));
            self.deleted.borrow_mut().push(stage);
        }

        fn delete_program(&self, program: u32) {
            self.calls.borrow_mut().push(Call::DeleteProgram(program));
            self.deleted.borrow_mut().push(program);
        }
    }

    const VERTEX: &str = "void main(){gl_Position=vec4(0,0,0,1);}";
    const FRAGMENT: &str = "void main(){gl_FragColor=vec4(1,0,0,1);}";

    #[test]
    fn valid_pair_builds_a_program() {
        let backend = FakeCompiler::default();
        let built = build_program(&backend, VERTEX, FRAGMENT, StageRetention::DeleteAfterLink)
            .expect("valid sources should link");
        assert!(built.handle().is_some());
        assert!(built.retained_stages().is_empty());
        assert_eq!(backend.links(), 1);
    }

    #[test]
    fn delete_after_link_releases_stages_immediately() {
        let backend = FakeCompiler::default();
        let built =
            build_program(&backend, VERTEX, FRAGMENT, StageRetention::DeleteAfterLink).unwrap();
        let program = built.handle().unwrap();
        assert_eq!(backend.deleted.borrow().len(), 2);
        assert!(!backend.deleted.borrow().contains(&program));
        assert!(backend.attached.borrow().is_empty());
    }

    #[test]
    fn retained_stages_are_deleted_with_the_program() {
        let backend = FakeCompiler::default();
        let mut built =
            build_program(&backend, VERTEX, FRAGMENT, StageRetention::RetainUntilDelete).unwrap();
        let stages = built.retained_stages().to_vec();
        assert_eq!(stages.len(), 2);
        assert!(backend.deleted.borrow().is_empty());

        built.delete(&backend);
        for stage in stages {
            assert_eq!(backend.delete_count(stage), 1);
        }
    }

    #[test]
    fn broken_vertex_source_never_links() {
        let backend = FakeCompiler::default();
        let failure = build_program(
            &backend,
            "this is not shader code",
            FRAGMENT,
            StageRetention::DeleteAfterLink,
        )
        .unwrap_err();

        match &failure.error {
            BuildError::VertexCompileFailed(log) => assert!(!log.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(backend.links(), 0);
        assert!(
            !backend
                .calls
                .borrow()
                .contains(&Call::CreateStage(StageKind::Fragment))
        );
        assert_eq!(failure.leftovers.stages.len(), 1);
        assert!(failure.leftovers.program.is_none());
    }

    #[test]
    fn broken_fragment_source_reports_fragment_failure() {
        let backend = FakeCompiler::default();
        let failure = build_program(
            &backend,
            VERTEX,
            "void main(){ gl_FragColor = ",
            StageRetention::DeleteAfterLink,
        )
        .unwrap_err();

        assert!(matches!(failure.error, BuildError::FragmentCompileFailed(_)));
        assert_eq!(failure.error.title(), "Fragment Shader Compile Error");
        assert_eq!(backend.links(), 0);
        assert_eq!(failure.leftovers.stages.len(), 2);
    }

    #[test]
    fn mismatched_varyings_fail_at_link_time() {
        let backend = FakeCompiler::default();
        let vertex = "varying vec2 vTexCoord; void main(){ vTexCoord = vec2(0.0); }";
        let fragment = "varying vec2 vUv; void main(){ gl_FragColor = vec4(vUv, 0.0, 1.0); }";

        let failure =
            build_program(&backend, vertex, fragment, StageRetention::DeleteAfterLink).unwrap_err();

        assert!(matches!(failure.error, BuildError::LinkFailed(_)));
        let compiles = backend
            .calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Compile(_)))
            .count();
        assert_eq!(compiles, 2);
        assert!(failure.leftovers.program.is_some());
    }

    #[test]
    fn releasing_a_failure_deletes_everything_it_holds() {
        let backend = FakeCompiler::default();
        let vertex = "varying vec3 a; void main(){}";
        let fragment = "varying vec3 b; void main(){}";
        let failure =
            build_program(&backend, vertex, fragment, StageRetention::DeleteAfterLink).unwrap_err();
        let program = failure.leftovers.program.unwrap();

        let error = failure.release(&backend);
        assert!(matches!(error, BuildError::LinkFailed(_)));
        assert_eq!(backend.delete_count(program), 1);
        assert_eq!(backend.deleted.borrow().len(), 3);
    }

    #[test]
    fn program_creation_failure_keeps_compiled_stages() {
        let backend = FakeCompiler {
            fail_program_creation: true,
            ..Default::default()
        };
        let failure =
            build_program(&backend, VERTEX, FRAGMENT, StageRetention::DeleteAfterLink).unwrap_err();
        assert!(matches!(failure.error, BuildError::ObjectCreation(_)));
        assert_eq!(failure.leftovers.stages.len(), 2);
    }

    #[test]
    fn deleting_twice_is_harmless() {
        let backend = FakeCompiler::default();
        let mut built =
            build_program(&backend, VERTEX, FRAGMENT, StageRetention::RetainUntilDelete).unwrap();
        let program = built.handle().unwrap();

        built.delete(&backend);
        built.delete(&backend);

        assert_eq!(backend.delete_count(program), 1);
        assert!(built.handle().is_none());

        let next =
            build_program(&backend, VERTEX, FRAGMENT, StageRetention::DeleteAfterLink).unwrap();
        assert_ne!(next.handle(), Some(program));
    }

    #[test]
    fn long_logs_are_truncated_on_a_char_boundary() {
        let log = "é".repeat(INFO_LOG_LIMIT);
        let bounded = bounded_log(log, "vertex");
        assert!(bounded.len() <= INFO_LOG_LIMIT);
        assert!(bounded.chars().all(|c| c == 'é'));
    }

    #[test]
    fn empty_logs_are_replaced() {
        let bounded = bounded_log("\0\n".to_string(), "linker");
        assert_eq!(bounded, "linker reported an error without a diagnostic");
    }
}
