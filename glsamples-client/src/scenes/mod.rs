//! Module providing the [`Sample`] trait and the three sample implementations.

use std::path::PathBuf;

use glow::HasContext;
use glsamples_core::config::SampleConfig;
use glsamples_core::sample::SampleKind;
use glsamples_core::shader::{ProgramError, StageRetention};
use glsamples_core::source::StageFiles;
use glsamples_core::state::AppState;

use crate::abs::{App, ShaderProgram};
use crate::other::Reporter;

mod bump_mapping;
mod shadow_mapping;
mod simple_vs2ps;

/// The common interface of every sample.
pub trait Sample {
    /// Draws one frame into the window's back buffer.
    fn render(&mut self, gl: &glow::Context, state: &AppState);
}

/// Sets up the chosen sample.
///
/// Recoverable failures are shown through `reporter` and leave the sample
/// running without the affected resource. An error is returned only when the
/// sample cannot run at all.
pub fn create(
    kind: SampleKind,
    app: &App,
    config: &SampleConfig,
    reporter: &Reporter,
) -> Result<Box<dyn Sample>, String> {
    let setup = SampleSetup {
        app,
        dir: config.sample_dir(kind),
        retention: config.retention_for(kind),
        reporter,
    };
    log::info!("starting {kind} from {}", setup.dir.display());

    let sample: Box<dyn Sample> = match kind {
        SampleKind::SimpleVs2ps => Box::new(simple_vs2ps::SimpleVs2ps::new(&setup)?),
        SampleKind::BumpMapping => Box::new(bump_mapping::BumpMapping::new(&setup)?),
        SampleKind::ShadowMapping => Box::new(shadow_mapping::ShadowMapping::new(&setup)?),
    };
    Ok(sample)
}

/// Everything a sample needs while creating its resources.
struct SampleSetup<'a> {
    app: &'a App,
    dir: PathBuf,
    retention: StageRetention,
    reporter: &'a Reporter<'a>,
}

impl SampleSetup<'_> {
    /// Checks the sample's required extensions, reporting what is missing.
    fn check_extensions(&self, kind: SampleKind) -> Result<(), String> {
        self.app
            .extensions()
            .check(kind.requirements(), self.app.gl_version())
            .map_err(|e| e.to_string())
    }

    /// Loads and builds a program, reporting any failure.
    fn program(&self, files: StageFiles) -> Option<ShaderProgram> {
        match ShaderProgram::load(&self.app.gl, &self.dir, files, self.retention) {
            Ok(program) => Some(program),
            Err(e) => {
                self.report_program_error(&e);
                None
            }
        }
    }

    fn report_program_error(&self, error: &ProgramError) {
        match error {
            ProgramError::Build(e) => self.reporter.error(e.title(), e.log()),
            ProgramError::Source(e) => self.reporter.error(error.title(), &e.to_string()),
        }
    }

    fn asset(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

/// Restores the window viewport and clears it.
fn begin_window_frame(gl: &glow::Context, state: &AppState, clear: [f32; 4]) {
    unsafe {
        gl.viewport(
            0,
            0,
            state.viewport.width as i32,
            state.viewport.height as i32,
        );
        gl.clear_color(clear[0], clear[1], clear[2], clear[3]);
        gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
    }
}
