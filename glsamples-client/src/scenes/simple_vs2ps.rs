//! A vertex-coloured, textured quad drawn through ARB assembly programs.

use std::sync::Arc;

use glow::HasContext;
use glsamples_core::camera;
use glsamples_core::geometry::{QUAD_VERTICES, quad_indices};
use glsamples_core::sample::{SampleKind, files};
use glsamples_core::source::ShaderPair;
use glsamples_core::state::AppState;

use super::{Sample, SampleSetup, begin_window_frame};
use crate::abs::{ArbProgramApi, ArbProgramPair, Mesh, Placeholder, Texture};

pub struct SimpleVs2ps {
    programs: Option<ArbProgramPair>,
    texture: Texture,
    quad: Mesh,
}

impl SimpleVs2ps {
    pub(super) fn new(setup: &SampleSetup) -> Result<Self, String> {
        let gl = &setup.app.gl;
        let texture = Texture::load_or(gl, &setup.asset(files::ARB_TEXTURE), Placeholder::Checker)?;
        let quad = Mesh::new(gl, &QUAD_VERTICES, &quad_indices(1))?;
        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            programs: Self::programs(setup),
            texture,
            quad,
        })
    }

    fn programs(setup: &SampleSetup) -> Option<ArbProgramPair> {
        if let Err(e) = setup.check_extensions(SampleKind::SimpleVs2ps) {
            setup.reporter.error("ERROR", &e);
            return None;
        }
        let api = match ArbProgramApi::load(|name| setup.app.proc_address(name)) {
            Ok(api) => Arc::new(api),
            Err(e) => {
                setup.reporter.error("ERROR", &e.to_string());
                return None;
            }
        };

        let pair = match ShaderPair::load(&setup.dir, files::ARB_PROGRAMS) {
            Ok(pair) => pair,
            Err(e) => {
                setup.report_program_error(&e.into());
                return None;
            }
        };

        match ArbProgramPair::build(&api, &setup.app.gl, pair.vertex.text(), pair.fragment.text()) {
            Ok(pair) => {
                log::info!("assembled vertex and fragment programs");
                Some(pair)
            }
            Err(e) => {
                setup.reporter.error(e.title(), e.log());
                None
            }
        }
    }
}

impl Sample for SimpleVs2ps {
    fn render(&mut self, gl: &glow::Context, state: &AppState) {
        begin_window_frame(gl, state, [0.0, 0.0, 0.0, 1.0]);

        let Some(programs) = &self.programs else {
            return;
        };
        let mvp = camera::projection(state.viewport) * camera::spin_model_view(state.spin_left);

        programs.enable();
        for row in 0..4 {
            programs.vertex.set_env(row, mvp.row(row as usize));
        }
        self.texture.bind(0);
        self.quad.draw();
        programs.disable();
    }
}
