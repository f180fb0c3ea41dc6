//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which owns a 2D texture on the
//! GPU, loaded from an image file or filled from raw RGB data.

use std::path::Path;
use std::sync::Arc;

use glow::HasContext;
use image::{DynamicImage, RgbImage};

/// Side length of the generated placeholder textures.
const PLACEHOLDER_SIZE: u32 = 64;
/// Side length of one checker square.
const CHECKER_CELL: u32 = 8;

/// Substitute image used when a texture file cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Grey and white checkerboard.
    Checker,
    /// Every normal pointing straight out of the surface.
    FlatNormal,
}

impl Placeholder {
    /// RGB pixels of a square placeholder with `size` pixels per side.
    pub fn pixels(self, size: u32) -> Vec<u8> {
        let mut data = Vec::with_capacity((size * size * 3) as usize);
        for y in 0..size {
            for x in 0..size {
                let texel = match self {
                    Placeholder::Checker if (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 0 => {
                        [255, 255, 255]
                    }
                    Placeholder::Checker => [128, 128, 128],
                    Placeholder::FlatNormal => [128, 128, 255],
                };
                data.extend_from_slice(&texel);
            }
        }
        data
    }
}

/// Converts a decoded image to RGB rows in GL order, bottom row first.
fn upload_rows(image: DynamicImage) -> RgbImage {
    image.flipv().to_rgb8()
}

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
    width: u32,
    height: u32,
}

impl Texture {
    /// Loads an image file as an RGB texture with linear filtering and mipmaps.
    pub fn from_file(gl: &Arc<glow::Context>, path: &Path) -> Result<Self, String> {
        let image = image::open(path)
            .map(upload_rows)
            .map_err(|e| format!("cannot load texture {}: {e}", path.display()))?;
        let (width, height) = image.dimensions();
        Self::from_rgb(gl, width, height, image.as_raw())
    }

    /// Loads `path`, substituting `placeholder` when it cannot be read.
    pub fn load_or(
        gl: &Arc<glow::Context>,
        path: &Path,
        placeholder: Placeholder,
    ) -> Result<Self, String> {
        match Self::from_file(gl, path) {
            Ok(texture) => Ok(texture),
            Err(e) => {
                log::warn!("{e}; using a {placeholder:?} placeholder");
                let data = placeholder.pixels(PLACEHOLDER_SIZE);
                Self::from_rgb(gl, PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, &data)
            }
        }
    }

    /// Uploads tightly packed RGB data.
    pub fn from_rgb(
        gl: &Arc<glow::Context>,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> Result<Self, String> {
        let expected = width as usize * height as usize * 3;
        if data.len() < expected {
            return Err(format!(
                "{width}x{height} texture needs {expected} bytes, got {}",
                data.len()
            ));
        }
        unsafe {
            let texture = gl.create_texture()?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGB as i32,
                width as i32,
                height as i32,
                0,
                glow::RGB,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(data)),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
                width,
                height,
            })
        }
    }

    /// An uninitialised RGB render target with nearest filtering.
    pub fn empty_rgb(gl: &Arc<glow::Context>, width: u32, height: u32) -> Result<Self, String> {
        unsafe {
            let texture = gl.create_texture()?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGB as i32,
                width as i32,
                height as i32,
                0,
                glow::RGB,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(None),
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
            for wrap in [glow::TEXTURE_WRAP_S, glow::TEXTURE_WRAP_T] {
                gl.tex_parameter_i32(glow::TEXTURE_2D, wrap, glow::CLAMP_TO_EDGE as i32);
            }
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
                width,
                height,
            })
        }
    }

    pub fn id(&self) -> glow::Texture {
        self.id
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}
