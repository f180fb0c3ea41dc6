//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct for managing mesh data on the GPU side.
//! Vertices should implement the [`Vertex`] trait.

use std::mem::{offset_of, size_of};
use std::sync::Arc;

use glow::HasContext;
use glsamples_core::geometry::{ColoredVertex, SolidVertex, TexturedVertex};

/// Attribute location of the vertex position.
pub const POSITION_LOCATION: u32 = 0;
/// Attribute location of the colour or the normal.
pub const COLOR_LOCATION: u32 = 1;
pub const NORMAL_LOCATION: u32 = 1;
/// Attribute location of the texture coordinates.
pub const UV_LOCATION: u32 = 2;

/// Trait that defines the necessary methods for a vertex.
pub trait Vertex: Copy {
    /// Sets up the vertex attribute pointers for the vertex.
    fn vertex_attribs(gl: &glow::Context);
}

fn float_attrib<V>(gl: &glow::Context, location: u32, components: i32, offset: usize) {
    unsafe {
        gl.enable_vertex_attrib_array(location);
        gl.vertex_attrib_pointer_f32(
            location,
            components,
            glow::FLOAT,
            false,
            size_of::<V>() as i32,
            offset as i32,
        );
    }
}

impl Vertex for ColoredVertex {
    fn vertex_attribs(gl: &glow::Context) {
        float_attrib::<Self>(gl, POSITION_LOCATION, 3, offset_of!(ColoredVertex, position));
        float_attrib::<Self>(gl, COLOR_LOCATION, 3, offset_of!(ColoredVertex, color));
        float_attrib::<Self>(gl, UV_LOCATION, 2, offset_of!(ColoredVertex, uv));
    }
}

impl Vertex for TexturedVertex {
    fn vertex_attribs(gl: &glow::Context) {
        float_attrib::<Self>(gl, POSITION_LOCATION, 3, offset_of!(TexturedVertex, position));
        float_attrib::<Self>(gl, UV_LOCATION, 2, offset_of!(TexturedVertex, uv));
    }
}

impl Vertex for SolidVertex {
    fn vertex_attribs(gl: &glow::Context) {
        float_attrib::<Self>(gl, POSITION_LOCATION, 3, offset_of!(SolidVertex, position));
        float_attrib::<Self>(gl, NORMAL_LOCATION, 3, offset_of!(SolidVertex, normal));
    }
}

/// Pairs an already created object with the result of the next creation step,
/// releasing the object when that step failed.
fn keep_or_release<T, U>(
    made: T,
    next: Result<U, String>,
    release: impl FnOnce(T),
) -> Result<(T, U), String> {
    match next {
        Ok(next) => Ok((made, next)),
        Err(e) => {
            release(made);
            Err(e)
        }
    }
}

/// Represents a mesh stored on the GPU side, drawn as indexed triangles.
pub struct Mesh {
    gl: Arc<glow::Context>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
    index_count: usize,
}

impl Mesh {
    /// Creates a new mesh from the given vertex and index data.
    pub fn new<V: Vertex>(
        gl: &Arc<glow::Context>,
        vertices: &[V],
        indices: &[u32],
    ) -> Result<Self, String> {
        unsafe {
            let vao = gl.create_vertex_array()?;
            let (vao, vbo) =
                keep_or_release(vao, gl.create_buffer(), |vao| gl.delete_vertex_array(vao))?;
            let ((vao, vbo), ebo) =
                keep_or_release((vao, vbo), gl.create_buffer(), |(vao, vbo)| {
                    gl.delete_buffer(vbo);
                    gl.delete_vertex_array(vao);
                })?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                std::slice::from_raw_parts(vertices.as_ptr() as *const u8, size_of_val(vertices)),
                glow::STATIC_DRAW,
            );

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                std::slice::from_raw_parts(indices.as_ptr() as *const u8, size_of_val(indices)),
                glow::STATIC_DRAW,
            );

            V::vertex_attribs(gl);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                vao,
                vbo,
                ebo,
                index_count: indices.len(),
            })
        }
    }

    /// Draws the mesh.
    pub fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl
                .draw_elements(glow::TRIANGLES, self.index_count as i32, glow::UNSIGNED_INT, 0);
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_buffer(self.ebo);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
