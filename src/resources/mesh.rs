use crate::data_structures::vertex::ModelVertex;

/// Vertices of a triangulated, single-index obj mesh.
///
/// Missing texture coordinates and normals default to zero. Present v
/// coordinates are flipped because obj puts the origin of texture space at
/// the bottom.
pub fn obj_vertices(mesh: &tobj::Mesh) -> Vec<ModelVertex> {
    (0..mesh.positions.len() / 3)
        .map(|i| ModelVertex {
            position: [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ],
            tex_coords: [
                mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| 1.0 - *f),
            ],
            normal: [
                mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
            ],
        })
        .collect()
}

/// Vertices and indices of one glTF primitive.
///
/// glTF already uses a top-left texture origin, so uvs are taken as is.
/// Primitives without indices are drawn in vertex order.
pub fn gltf_primitive(
    primitive: &gltf::Primitive<'_>,
    buffers: &[Vec<u8>],
) -> Option<(Vec<ModelVertex>, Vec<u32>)> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.as_slice()));
    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    let normals: Vec<[f32; 3]> = reader
        .read_normals()
        .map(|normals| normals.collect())
        .unwrap_or_default();
    let tex_coords: Vec<[f32; 2]> = reader
        .read_tex_coords(0)
        .map(|coords| coords.into_f32().collect())
        .unwrap_or_default();

    let vertices = positions
        .iter()
        .enumerate()
        .map(|(i, position)| ModelVertex {
            position: *position,
            tex_coords: tex_coords.get(i).copied().unwrap_or([0.0; 2]),
            normal: normals.get(i).copied().unwrap_or([0.0; 3]),
        })
        .collect::<Vec<_>>();
    let indices = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertices.len() as u32).collect(),
    };
    Some((vertices, indices))
}
