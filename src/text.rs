//! Text layout: one textured quad per character.
//!
//! The layout is a single pass over the characters of a string. Each glyph is
//! looked up in the [`Font`], scaled from atlas pixels to scene units with
//! `pixel_scale * size` and placed relative to a pen that advances along +x.
//! Scene y points up, so offsets measured downwards in the atlas are negated.

use cgmath::Vector2;
use thiserror::Error;

use crate::data_structures::{
    font::Font,
    handle::Handle,
    mesh::{Mesh, MeshData, MeshError, MeshManager},
    texture::Texture,
    vertex::Vertex,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("Could not find character {0:?}")]
    UnsupportedCharacter(char),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Vertices and indices of a laid out string.
#[derive(Debug, Clone, PartialEq)]
pub struct TextGeometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Pen position after the last character.
    pub cursor: Vector2<f32>,
}

/// Lay out `text` starting with the pen at `position`.
///
/// Every character yields four vertices (top-right, top-left, bottom-left,
/// bottom-right) and the two triangles `0 1 2` and `0 2 3`. A character
/// outside the font's range aborts the whole layout.
pub fn layout_text(
    font: &Font,
    position: Vector2<f32>,
    text: &str,
    size: f32,
    pixel_scale: f32,
) -> Result<TextGeometry, TextError> {
    let scale = pixel_scale * size;
    let count = text.chars().count();
    let mut vertices = Vec::with_capacity(count * 4);
    let mut indices = Vec::with_capacity(count * 6);
    let mut cursor = position;

    for character in text.chars() {
        let (packed, quad) = font
            .glyph(character)
            .ok_or(TextError::UnsupportedCharacter(character))?;

        let glyph_w = packed.width() as f32 * scale;
        let glyph_h = packed.height() as f32 * scale;
        let left = cursor.x + packed.xoff * scale;
        let bottom = cursor.y - packed.yoff2 * scale;
        let right = left + glyph_w;
        let top = bottom + glyph_h;

        let base = vertices.len() as u32;
        vertices.extend_from_slice(&[
            Vertex {
                position: [right, top, 0.0],
                tex_coords: [quad.s1, quad.t0],
            },
            Vertex {
                position: [left, top, 0.0],
                tex_coords: [quad.s0, quad.t0],
            },
            Vertex {
                position: [left, bottom, 0.0],
                tex_coords: [quad.s0, quad.t1],
            },
            Vertex {
                position: [right, bottom, 0.0],
                tex_coords: [quad.s1, quad.t1],
            },
        ]);
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);

        cursor.x += packed.xadvance * scale;
    }

    Ok(TextGeometry {
        vertices,
        indices,
        cursor,
    })
}

/// Lay out `text` and upload it as a mesh textured with the font atlas.
#[allow(clippy::too_many_arguments)]
pub fn create_text_mesh(
    font: &Font,
    meshes: &mut MeshManager,
    device: &wgpu::Device,
    position: Vector2<f32>,
    text: &str,
    size: f32,
    pixel_scale: f32,
    atlas: Handle<Texture>,
) -> Result<Handle<Mesh>, TextError> {
    let geometry = layout_text(font, position, text, size, pixel_scale)?;
    let data = MeshData::new(&geometry.vertices, &geometry.indices).with_texture(atlas);
    let handle = meshes.create(device, &data)?;
    log::debug!("Created text mesh {:?} for {:?}", handle, text);
    Ok(handle)
}
