//! Module to work with OpenGL framebuffers.
//!
//! Provides an off-screen target with an RGB colour texture and a depth
//! renderbuffer, used to render the shadow map.

use std::sync::Arc;

use glow::HasContext;

use crate::abs::Texture;

/// Represents an OpenGL framebuffer.
pub struct Framebuffer {
    gl: Arc<glow::Context>,
    fbo: glow::Framebuffer,
    depth: glow::Renderbuffer,
    color: Texture,
}

impl Framebuffer {
    /// Creates a complete framebuffer of the given size, or reports why the
    /// driver rejected it.
    pub fn new(gl: &Arc<glow::Context>, width: u32, height: u32) -> Result<Self, String> {
        let color = Texture::empty_rgb(gl, width, height)?;
        unsafe {
            let fbo = gl.create_framebuffer()?;
            let depth = match gl.create_renderbuffer() {
                Ok(depth) => depth,
                Err(e) => {
                    gl.delete_framebuffer(fbo);
                    return Err(e);
                }
            };

            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(depth));
            gl.renderbuffer_storage(
                glow::RENDERBUFFER,
                glow::DEPTH_COMPONENT24,
                width as i32,
                height as i32,
            );
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(depth),
            );
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(color.id()),
                0,
            );

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);

            if status != glow::FRAMEBUFFER_COMPLETE {
                gl.delete_renderbuffer(depth);
                gl.delete_framebuffer(fbo);
                return Err(match status {
                    glow::FRAMEBUFFER_UNSUPPORTED => {
                        "GL_FRAMEBUFFER_UNSUPPORTED: the chosen formats are not supported"
                            .to_string()
                    }
                    other => format!("framebuffer incomplete (status 0x{other:04X})"),
                });
            }

            Ok(Self {
                gl: Arc::clone(gl),
                fbo,
                depth,
                color,
            })
        }
    }

    /// Redirects rendering into the framebuffer and sets the viewport to cover it.
    pub fn bind(&self) {
        let (width, height) = self.color.size();
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
    }

    /// Returns to the default framebuffer.
    pub fn unbind(&self) {
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
    }

    pub fn texture(&self) -> &Texture {
        &self.color
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_renderbuffer(self.depth);
            self.gl.delete_framebuffer(self.fbo);
        }
    }
}
