//! The hardcoded geometry drawn by the samples.
//!
//! Shapes are stored as quads, four vertices each, and turned into triangle
//! indices with [`quad_indices`].

/// A vertex with texture coordinates, a colour and a position.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredVertex {
    pub uv: [f32; 2],
    pub color: [f32; 3],
    pub position: [f32; 3],
}

/// A vertex with texture coordinates and a position.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedVertex {
    pub uv: [f32; 2],
    pub position: [f32; 3],
}

/// A position and normal, used for the light marker.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

const fn cv(uv: [f32; 2], color: [f32; 3], position: [f32; 3]) -> ColoredVertex {
    ColoredVertex { uv, color, position }
}

const fn tv(u: f32, v: f32, x: f32, y: f32, z: f32) -> TexturedVertex {
    TexturedVertex {
        uv: [u, v],
        position: [x, y, z],
    }
}

/// A 2x2 quad facing +Z with a different colour in each corner.
pub const QUAD_VERTICES: [ColoredVertex; 4] = [
    cv([0.0, 0.0], [1.0, 1.0, 0.0], [-1.0, -1.0, 0.0]),
    cv([1.0, 0.0], [1.0, 0.0, 0.0], [1.0, -1.0, 0.0]),
    cv([1.0, 1.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]),
    cv([0.0, 1.0], [0.0, 0.0, 1.0], [-1.0, 1.0, 0.0]),
];

/// A 2x2x2 cube resting on a 6x6 floor at y = -1.
pub const CUBE_SCENE_VERTICES: [TexturedVertex; 28] = [
    // front
    tv(0.0, 0.0, -1.0, -1.0, 1.0),
    tv(1.0, 0.0, 1.0, -1.0, 1.0),
    tv(1.0, 1.0, 1.0, 1.0, 1.0),
    tv(0.0, 1.0, -1.0, 1.0, 1.0),
    // back
    tv(1.0, 0.0, -1.0, -1.0, -1.0),
    tv(1.0, 1.0, -1.0, 1.0, -1.0),
    tv(0.0, 1.0, 1.0, 1.0, -1.0),
    tv(0.0, 0.0, 1.0, -1.0, -1.0),
    // top
    tv(0.0, 1.0, -1.0, 1.0, -1.0),
    tv(0.0, 0.0, -1.0, 1.0, 1.0),
    tv(1.0, 0.0, 1.0, 1.0, 1.0),
    tv(1.0, 1.0, 1.0, 1.0, -1.0),
    // bottom
    tv(1.0, 1.0, -1.0, -1.0, -1.0),
    tv(0.0, 1.0, 1.0, -1.0, -1.0),
    tv(0.0, 0.0, 1.0, -1.0, 1.0),
    tv(1.0, 0.0, -1.0, -1.0, 1.0),
    // right
    tv(1.0, 0.0, 1.0, -1.0, -1.0),
    tv(1.0, 1.0, 1.0, 1.0, -1.0),
    tv(0.0, 1.0, 1.0, 1.0, 1.0),
    tv(0.0, 0.0, 1.0, -1.0, 1.0),
    // left
    tv(0.0, 0.0, -1.0, -1.0, -1.0),
    tv(1.0, 0.0, -1.0, -1.0, 1.0),
    tv(1.0, 1.0, -1.0, 1.0, 1.0),
    tv(0.0, 1.0, -1.0, 1.0, -1.0),
    // floor
    tv(0.0, 1.0, -3.0, -1.0, -3.0),
    tv(0.0, 0.0, -3.0, -1.0, 3.0),
    tv(1.0, 0.0, 3.0, -1.0, 3.0),
    tv(1.0, 1.0, 3.0, -1.0, -3.0),
];

/// Triangle indices for `quads` consecutive four-vertex quads.
pub fn quad_indices(quads: usize) -> Vec<u32> {
    (0..quads as u32)
        .flat_map(|q| {
            let base = q * 4;
            [base, base + 1, base + 2, base, base + 2, base + 3]
        })
        .collect()
}

/// A UV sphere around the origin, as vertices and triangle indices.
pub fn sphere(radius: f32, slices: u32, stacks: u32) -> (Vec<SolidVertex>, Vec<u32>) {
    let slices = slices.max(3);
    let stacks = stacks.max(2);
    let mut vertices = Vec::with_capacity(((slices + 1) * (stacks + 1)) as usize);
    for stack in 0..=stacks {
        let phi = std::f32::consts::PI * stack as f32 / stacks as f32;
        for slice in 0..=slices {
            let theta = std::f32::consts::TAU * slice as f32 / slices as f32;
            let normal = [phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()];
            vertices.push(SolidVertex {
                position: normal.map(|n| n * radius),
                normal,
            });
        }
    }

    let ring = slices + 1;
    let mut indices = Vec::with_capacity((slices * stacks * 6) as usize);
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack * ring + slice;
            let b = a + ring;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    (vertices, indices)
}
