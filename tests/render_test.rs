#![cfg(feature = "integration-tests")]

mod common;

use cgmath::Vector2;
use common::test_utils::{ATLAS_SIZE, srgb_u8, synthetic_font};
use jonark::{
    capture::OffscreenTarget,
    context::headless_device,
    data_structures::{
        font::FontManager,
        mesh::{Mesh, MeshManager},
        texture::{TextureError, TextureManager, TextureOptions},
        vertex::{PlainVertex, TexturedVertex2, VertexLayout},
    },
    pipelines::{
        basic::{DepthState, REPLACE},
        program::{Program, ProgramDescriptor, ProgramError, ProgramManager, ShaderSources},
    },
    render::DrawMesh,
    resources::shader_dir,
    shapes,
    text::create_text_mesh,
};

#[tokio::test]
async fn should_clear_offscreen_target() {
    let (device, queue) = headless_device().await.unwrap();
    let target = OffscreenTarget::new(&device, 8, 8);
    let clear = wgpu::Color {
        r: 0.2,
        g: 0.3,
        b: 0.3,
        a: 1.0,
    };

    let frame = target.render(&device, &queue, clear, |_| {}).await.unwrap();

    assert_eq!(frame.dimensions(), (8, 8));
    let pixel = frame.get_pixel(4, 4);
    for (actual, expected) in pixel.0[..3].iter().zip([clear.r, clear.g, clear.b]) {
        assert!(actual.abs_diff(srgb_u8(expected)) <= 1);
    }
    assert_eq!(pixel.0[3], 255);
}

#[tokio::test]
async fn should_draw_triangle_over_clear_colour() {
    let (device, queue) = headless_device().await.unwrap();
    let target = OffscreenTarget::new(&device, 32, 32);
    let sources = ShaderSources::load(shader_dir("triangle")).await.unwrap();
    let mut programs = ProgramManager::with_capacity(1).unwrap();
    let program = programs
        .create(
            &device,
            OffscreenTarget::FORMAT,
            &sources,
            &ProgramDescriptor {
                label: "triangle",
                vertex_layouts: &[PlainVertex::desc()],
                bind_group_layouts: &[],
                blend: Some(REPLACE),
                depth: Some(DepthState::opaque()),
                cull_mode: None,
            },
        )
        .await
        .unwrap();
    let triangle = shapes::triangle();
    let mesh = Mesh::new(&device, "triangle", &triangle.mesh_data()).unwrap();

    let frame = target
        .render(&device, &queue, wgpu::Color::BLACK, |pass| {
            programs.use_program(pass, program).unwrap();
            pass.draw_mesh(&mesh);
        })
        .await
        .unwrap();

    let centre = frame.get_pixel(16, 16).0;
    for (actual, expected) in centre[..3].iter().zip([1.0, 0.5, 0.2]) {
        assert!(actual.abs_diff(srgb_u8(expected)) <= 1);
    }
    assert_eq!(frame.get_pixel(1, 1).0, [0, 0, 0, 255]);
}

#[tokio::test]
async fn should_reject_program_with_missing_entry_point() {
    let (device, _queue) = headless_device().await.unwrap();
    let triangle = ShaderSources::load(shader_dir("triangle")).await.unwrap();
    let sources = ShaderSources {
        vertex: triangle.fragment.clone(),
        fragment: triangle.fragment,
    };
    let mut programs = ProgramManager::with_capacity(1).unwrap();

    let err = programs
        .create(
            &device,
            OffscreenTarget::FORMAT,
            &sources,
            &ProgramDescriptor {
                label: "swapped",
                vertex_layouts: &[PlainVertex::desc()],
                bind_group_layouts: &[],
                blend: Some(REPLACE),
                depth: None,
                cull_mode: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ProgramError::Link { .. }));
    assert!(programs.is_empty());
}

#[tokio::test]
async fn should_report_mismatched_stage_interfaces_as_link_error() {
    let (device, _queue) = headless_device().await.unwrap();
    let sources = ShaderSources {
        vertex: "@vertex\nfn vs_main(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {\n    return vec4<f32>(position, 0.0, 1.0);\n}\n".to_string(),
        fragment: "@fragment\nfn fs_main(@location(1) @interpolate(flat) id: vec2<u32>) -> @location(0) vec4<f32> {\n    return vec4<f32>(f32(id.x), 0.0, 0.0, 1.0);\n}\n".to_string(),
    };
    let mut programs = ProgramManager::with_capacity(1).unwrap();

    let err = programs
        .create(
            &device,
            OffscreenTarget::FORMAT,
            &sources,
            &ProgramDescriptor {
                label: "mismatched",
                vertex_layouts: &[PlainVertex::desc()],
                bind_group_layouts: &[],
                blend: Some(REPLACE),
                depth: Some(DepthState::opaque()),
                cull_mode: None,
            },
        )
        .await
        .unwrap_err();

    match err {
        ProgramError::Link { label, message } => {
            assert_eq!(label, "mismatched");
            assert!(!message.is_empty());
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(programs.is_empty());
}

#[tokio::test]
async fn should_report_missing_bind_group_as_link_error() {
    let (device, _queue) = headless_device().await.unwrap();
    let sources = ShaderSources::load(shader_dir("textures")).await.unwrap();

    let err = Program::new(
        &device,
        OffscreenTarget::FORMAT,
        &sources,
        &ProgramDescriptor {
            label: "textures without layouts",
            vertex_layouts: &[TexturedVertex2::desc()],
            bind_group_layouts: &[],
            blend: Some(REPLACE),
            depth: None,
            cull_mode: None,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ProgramError::Link { .. }));
}

#[tokio::test]
async fn should_build_text_mesh_from_font_atlas() {
    let (device, queue) = headless_device().await.unwrap();
    let mut fonts = FontManager::with_capacity(1).unwrap();
    let mut textures = TextureManager::with_capacity(1).unwrap();
    let mut meshes = MeshManager::with_capacity(2).unwrap();

    let font_handle = fonts.insert(synthetic_font()).unwrap();
    let font = fonts.get(font_handle).unwrap();
    let (width, height) = font.atlas_size();
    let atlas = textures
        .create_from_bitmap(&device, &queue, font.bitmap(), width, height)
        .unwrap();
    assert_eq!(textures.get(atlas).unwrap().width(), ATLAS_SIZE);

    let mesh = create_text_mesh(
        font,
        &mut meshes,
        &device,
        Vector2::new(0.0, 0.0),
        "ABC",
        1.0,
        0.1,
        atlas,
    )
    .unwrap();

    let mesh = meshes.get(mesh).unwrap();
    assert_eq!(mesh.num_indices, 18);
    assert_eq!(mesh.texture, Some(atlas));
}

#[tokio::test]
async fn should_upload_images_and_reject_bad_bitmaps() {
    let (device, queue) = headless_device().await.unwrap();
    let mut textures = TextureManager::with_capacity(2).unwrap();

    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        3,
        2,
        image::Rgba([10, 20, 30, 255]),
    ));
    let handle = textures
        .create_from_image(&device, &queue, &img, TextureOptions::default())
        .unwrap();
    let texture = textures.get(handle).unwrap();
    assert_eq!((texture.width(), texture.height()), (3, 2));

    let err = textures
        .create_from_bitmap(&device, &queue, &[0; 5], 2, 2)
        .unwrap_err();
    assert!(matches!(
        err,
        TextureError::SizeMismatch {
            expected: 4,
            actual: 5,
            ..
        }
    ));
    assert_eq!(textures.len(), 1);
}
