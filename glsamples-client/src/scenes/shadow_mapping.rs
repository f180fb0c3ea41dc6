//! A cube on a floor, shadowed by a map rendered from the light into a
//! framebuffer object each frame.

use glow::HasContext;
use glsamples_core::camera;
use glsamples_core::geometry::{CUBE_SCENE_VERTICES, quad_indices};
use glsamples_core::sample::{SampleKind, files};
use glsamples_core::state::AppState;

use super::{Sample, SampleSetup, begin_window_frame};
use crate::abs::{Framebuffer, Mesh, ShaderProgram};

/// Size of the shadow map render target.
const SHADOW_MAP_SIZE: u32 = 512;
const SHADOW_UNIT: u32 = 0;

pub struct ShadowMapping {
    shadow: Option<ShaderProgram>,
    lighting: Option<ShaderProgram>,
    framebuffer: Framebuffer,
    scene: Mesh,
}

impl ShadowMapping {
    pub(super) fn new(setup: &SampleSetup) -> Result<Self, String> {
        setup.check_extensions(SampleKind::ShadowMapping)?;

        let gl = &setup.app.gl;
        let framebuffer = Framebuffer::new(gl, SHADOW_MAP_SIZE, SHADOW_MAP_SIZE)?;
        let indices = quad_indices(CUBE_SCENE_VERTICES.len() / 4);
        let scene = Mesh::new(gl, &CUBE_SCENE_VERTICES, &indices)?;
        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        let shadow = setup.program(files::SHADOW_PROGRAM);
        let lighting = setup.program(files::LIGHTING_PROGRAM);
        if let Some(lighting) = &lighting {
            lighting.use_program();
            lighting.set_uniform("ShadowMap", SHADOW_UNIT as i32);
            ShaderProgram::unbind(gl);
        }

        Ok(Self {
            shadow,
            lighting,
            framebuffer,
            scene,
        })
    }
}

impl Sample for ShadowMapping {
    fn render(&mut self, gl: &glow::Context, state: &AppState) {
        let projection = camera::projection(state.viewport);
        let light = camera::orbit_light(state.spin_right);
        let light_view = camera::look_at_origin(light);

        self.framebuffer.bind();
        unsafe {
            gl.clear_color(1.0, 1.0, 1.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
        if let Some(shadow) = &self.shadow {
            shadow.use_program();
            shadow.set_uniform("uModelViewProjection", projection * light_view);
            self.scene.draw();
            ShaderProgram::unbind(gl);
        }
        self.framebuffer.unbind();

        begin_window_frame(gl, state, [0.0, 0.0, 1.0, 1.0]);
        let Some(lighting) = &self.lighting else {
            return;
        };
        let view = camera::look_at_origin(camera::orbit_eye(state.spin_left));
        lighting.use_program();
        lighting.set_uniform("uModelViewProjection", projection * view);
        lighting.set_uniform(
            "uShadowMatrix",
            camera::shadow_texture_matrix(light_view, state.viewport),
        );
        lighting.set_uniform("uLightPosition", light);
        self.framebuffer.texture().bind(SHADOW_UNIT);
        self.scene.draw();
        ShaderProgram::unbind(gl);
    }
}
