//! This module contains the thin wrappers over the OpenGL context used by the
//! samples: application setup, shader programs (GLSL and ARB assembly),
//! meshes, textures and framebuffers.

pub mod app;
pub mod arb;
pub mod framebuffer;
pub mod mesh;
pub mod shader;
pub mod texture;

pub use app::*;
pub use arb::*;
pub use framebuffer::*;
pub use mesh::*;
pub use shader::*;
pub use texture::*;
