use cgmath::{InnerSpace, Vector3};
use jonark::{
    data_structures::mesh::{MeshData, MeshError},
    shapes,
};

fn triangle_normal(positions: [[f32; 3]; 3]) -> Vector3<f32> {
    let [a, b, c] = positions.map(Vector3::from);
    (b - a).cross(c - a)
}

#[test]
fn should_provide_valid_mesh_data() {
    shapes::triangle().mesh_data().validate().unwrap();
    shapes::square().mesh_data().validate().unwrap();
    shapes::textured_quad().mesh_data().validate().unwrap();
    shapes::two_faces().mesh_data().validate().unwrap();
    shapes::cube().mesh_data().validate().unwrap();
    shapes::plane().mesh_data().validate().unwrap();
}

#[test]
fn should_share_vertices_in_square() {
    let square = shapes::square();
    assert_eq!(square.vertices.len(), 4);
    assert_eq!(square.indices, vec![0, 2, 1, 2, 3, 1]);
}

#[test]
fn should_wind_cube_faces_outwards() {
    let cube = shapes::cube();
    assert_eq!(cube.vertices.len(), 36);
    for triangle in cube.indices.chunks(3) {
        let vertices = [0, 1, 2].map(|i| cube.vertices[triangle[i] as usize]);
        let winding = triangle_normal(vertices.map(|v| v.position));
        let normal = Vector3::from(vertices[0].normal);
        assert!(
            winding.dot(normal) > 0.0,
            "triangle {:?} faces inwards",
            triangle
        );
        for vertex in vertices {
            assert!(vertex.position.iter().all(|c| c.abs() <= 0.5));
        }
    }
}

#[test]
fn should_face_plane_upwards() {
    let plane = shapes::plane();
    for triangle in plane.indices.chunks(3) {
        let positions = [0, 1, 2].map(|i| plane.vertices[triangle[i] as usize].position);
        assert!(triangle_normal(positions).y > 0.0);
    }
}

#[test]
fn should_wind_two_faces_counter_clockwise() {
    let faces = shapes::two_faces();
    let expected = [Vector3::unit_z(), Vector3::unit_z(), Vector3::unit_x(), Vector3::unit_x()];
    for (triangle, outward) in faces.indices.chunks(3).zip(expected) {
        let positions = [0, 1, 2].map(|i| faces.vertices[triangle[i] as usize].position);
        assert!(triangle_normal(positions).normalize().dot(outward) > 0.99);
    }
}

#[test]
fn should_reject_broken_mesh_data() {
    let vertices = [[0.0f32; 2]; 3];
    assert_eq!(
        MeshData::<[f32; 2]>::new(&[], &[0]).validate(),
        Err(MeshError::NoVertices)
    );
    assert_eq!(
        MeshData::new(&vertices, &[]).validate(),
        Err(MeshError::NoIndices)
    );
    assert_eq!(
        MeshData::new(&vertices, &[0, 1, 3]).validate(),
        Err(MeshError::IndexOutOfRange {
            index: 3,
            vertex_count: 3
        })
    );
}
