//! Static geometry used by the demos.
//!
//! 2D shapes are given in normalized device coordinates. Texture coordinates
//! of the textured shapes have `v` pointing up, so their images are uploaded
//! with `flip_vertically`.

use cgmath::Vector3;

use crate::data_structures::{
    mesh::MeshData,
    vertex::{ModelVertex, PlainVertex, TexturedVertex2, Vertex},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Shape<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
}

impl<V> Shape<V> {
    pub fn mesh_data(&self) -> MeshData<'_, V> {
        MeshData::new(&self.vertices, &self.indices)
    }
}

pub fn triangle() -> Shape<PlainVertex> {
    Shape {
        vertices: vec![
            PlainVertex { position: [-0.5, -0.5] },
            PlainVertex { position: [0.0, 0.5] },
            PlainVertex { position: [0.5, -0.5] },
        ],
        indices: vec![0, 1, 2],
    }
}

pub fn square() -> Shape<PlainVertex> {
    Shape {
        vertices: vec![
            PlainVertex { position: [-0.5, 0.5] },
            PlainVertex { position: [0.5, 0.5] },
            PlainVertex { position: [-0.5, -0.5] },
            PlainVertex { position: [0.5, -0.5] },
        ],
        indices: vec![0, 2, 1, 2, 3, 1],
    }
}

/// Full screen quad with texture coordinates.
pub fn textured_quad() -> Shape<TexturedVertex2> {
    let vertex = |position: [f32; 2], tex_coords: [f32; 2]| TexturedVertex2 {
        position,
        tex_coords,
    };
    Shape {
        vertices: vec![
            vertex([-1.0, 1.0], [0.0, 1.0]),
            vertex([1.0, 1.0], [1.0, 1.0]),
            vertex([-1.0, -1.0], [0.0, 0.0]),
            vertex([1.0, -1.0], [1.0, 0.0]),
        ],
        indices: vec![0, 2, 1, 2, 3, 1],
    }
}

/// Two textured faces of a cube sharing the edge at x = 1, z = 1.
pub fn two_faces() -> Shape<Vertex> {
    let vertex = |position: [f32; 3], tex_coords: [f32; 2]| Vertex {
        position,
        tex_coords,
    };
    Shape {
        vertices: vec![
            // front, z = 1
            vertex([-1.0, 1.0, 1.0], [0.0, 1.0]),
            vertex([1.0, 1.0, 1.0], [1.0, 1.0]),
            vertex([-1.0, -1.0, 1.0], [0.0, 0.0]),
            vertex([1.0, -1.0, 1.0], [1.0, 0.0]),
            // right, x = 1
            vertex([1.0, 1.0, 1.0], [0.0, 1.0]),
            vertex([1.0, 1.0, -1.0], [1.0, 1.0]),
            vertex([1.0, -1.0, 1.0], [0.0, 0.0]),
            vertex([1.0, -1.0, -1.0], [1.0, 0.0]),
        ],
        indices: vec![0, 2, 1, 2, 3, 1, 4, 6, 5, 6, 7, 5],
    }
}

/// Unit cube centered at the origin, 6 vertices per face, counter-clockwise
/// when seen from outside.
pub fn cube() -> Shape<ModelVertex> {
    let faces: [(Vector3<f32>, Vector3<f32>, Vector3<f32>); 6] = [
        (Vector3::unit_x(), -Vector3::unit_z(), Vector3::unit_y()),
        (-Vector3::unit_x(), Vector3::unit_z(), Vector3::unit_y()),
        (Vector3::unit_y(), Vector3::unit_x(), -Vector3::unit_z()),
        (-Vector3::unit_y(), Vector3::unit_x(), Vector3::unit_z()),
        (Vector3::unit_z(), Vector3::unit_x(), Vector3::unit_y()),
        (-Vector3::unit_z(), -Vector3::unit_x(), Vector3::unit_y()),
    ];
    const CORNERS: [(f32, f32); 6] = [
        (0.0, 0.0),
        (1.0, 0.0),
        (1.0, 1.0),
        (0.0, 0.0),
        (1.0, 1.0),
        (0.0, 1.0),
    ];

    let vertices: Vec<ModelVertex> = faces
        .iter()
        .flat_map(|&(normal, u, v)| {
            CORNERS.iter().map(move |&(s, t)| {
                let position = normal * 0.5 + u * (s - 0.5) + v * (t - 0.5);
                ModelVertex {
                    position: position.into(),
                    tex_coords: [s, 1.0 - t],
                    normal: normal.into(),
                }
            })
        })
        .collect();
    let indices = (0..vertices.len() as u32).collect();
    Shape { vertices, indices }
}

/// Floor plane at y = 0 spanning [-1, 1] in x and z, facing up.
pub fn plane() -> Shape<ModelVertex> {
    let vertex = |x: f32, z: f32, u: f32, v: f32| ModelVertex {
        position: [x, 0.0, z],
        tex_coords: [u, v],
        normal: [0.0, 1.0, 0.0],
    };
    Shape {
        vertices: vec![
            vertex(-1.0, 1.0, 0.0, 1.0),
            vertex(-1.0, -1.0, 0.0, 0.0),
            vertex(1.0, -1.0, 1.0, 0.0),
            vertex(1.0, 1.0, 1.0, 1.0),
        ],
        indices: vec![0, 2, 1, 0, 3, 2],
    }
}
