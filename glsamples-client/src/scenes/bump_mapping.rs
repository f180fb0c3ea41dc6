//! A stone wall quad lit per pixel through a normal map, with a small sphere
//! marking the light.

use glam::Mat4;
use glow::HasContext;
use glsamples_core::camera;
use glsamples_core::geometry::{QUAD_VERTICES, quad_indices, sphere};
use glsamples_core::sample::{SampleKind, files};
use glsamples_core::state::AppState;

use super::{Sample, SampleSetup, begin_window_frame};
use crate::abs::{Mesh, Placeholder, ShaderProgram, Texture};

const MARKER_RADIUS: f32 = 0.05;
const MARKER_SEGMENTS: u32 = 16;

const COLOR_UNIT: u32 = 0;
const NORMAL_UNIT: u32 = 1;

pub struct BumpMapping {
    bump: Option<ShaderProgram>,
    plain: Option<ShaderProgram>,
    marker: Option<ShaderProgram>,
    color_map: Texture,
    normal_map: Texture,
    quad: Mesh,
    marker_mesh: Mesh,
}

impl BumpMapping {
    pub(super) fn new(setup: &SampleSetup) -> Result<Self, String> {
        let gl = &setup.app.gl;
        let color_map =
            Texture::load_or(gl, &setup.asset(files::STONE_WALL), Placeholder::Checker)?;
        let normal_map = Texture::load_or(
            gl,
            &setup.asset(files::STONE_WALL_NORMALS),
            Placeholder::FlatNormal,
        )?;
        let quad = Mesh::new(gl, &QUAD_VERTICES, &quad_indices(1))?;
        let (vertices, indices) = sphere(MARKER_RADIUS, MARKER_SEGMENTS, MARKER_SEGMENTS);
        let marker_mesh = Mesh::new(gl, &vertices, &indices)?;
        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        let bump = match setup.check_extensions(SampleKind::BumpMapping) {
            Ok(()) => setup.program(files::BUMP_PROGRAM),
            Err(e) => {
                setup.reporter.error("ERROR", &e);
                None
            }
        };
        let plain = setup.program(files::PLAIN_PROGRAM);
        let marker = setup.program(files::MARKER_PROGRAM);
        if let Some(bump) = &bump {
            bump.use_program();
            bump.set_uniform("ColorMap", COLOR_UNIT as i32);
            bump.set_uniform("NormalMap", NORMAL_UNIT as i32);
        }
        if let Some(plain) = &plain {
            plain.use_program();
            plain.set_uniform("ColorMap", COLOR_UNIT as i32);
        }
        ShaderProgram::unbind(gl);

        Ok(Self {
            bump,
            plain,
            marker,
            color_map,
            normal_map,
            quad,
            marker_mesh,
        })
    }

    fn draw_marker(&self, gl: &glow::Context, state: &AppState, projection: Mat4) {
        let Some(marker) = &self.marker else {
            return;
        };
        marker.use_program();
        marker.set_uniform("uProjection", projection);
        marker.set_uniform("uModelView", Mat4::from_translation(state.light_position));
        self.marker_mesh.draw();
        ShaderProgram::unbind(gl);
    }
}

impl Sample for BumpMapping {
    fn render(&mut self, gl: &glow::Context, state: &AppState) {
        begin_window_frame(gl, state, [0.0, 0.0, 0.0, 1.0]);

        let projection = camera::projection(state.viewport);
        self.draw_marker(gl, state, projection);

        let program = if state.use_shaders {
            &self.bump
        } else {
            &self.plain
        };
        let Some(program) = program else {
            return;
        };
        program.use_program();
        program.set_uniform("uProjection", projection);
        program.set_uniform("uModelView", camera::spin_model_view(state.spin_left));
        // The light position is already in eye space.
        program.set_uniform("uLightPosition", state.light_position);

        self.normal_map.bind(NORMAL_UNIT);
        self.color_map.bind(COLOR_UNIT);
        self.quad.draw();
        ShaderProgram::unbind(gl);
    }
}
