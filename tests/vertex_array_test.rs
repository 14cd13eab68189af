use jonark::data_structures::{
    handle::HandleError,
    vertex::{ModelVertex, Vertex, VertexLayout},
    vertex_array::{
        AttributeKind, VertexArrayError, VertexArrayObject, VertexArrayObjectManager,
        VertexAttributeEntry,
    },
};

#[test]
fn should_match_text_vertex_layout() {
    let vao = VertexArrayObject::new(&[
        VertexAttributeEntry::float(0, 3, 0, 0),
        VertexAttributeEntry::float(1, 2, 12, 0),
    ])
    .unwrap();

    assert_eq!(vao.binding_count(), 1);
    assert_eq!(vao.stride(0), Some(std::mem::size_of::<Vertex>() as u64));

    let layouts = vao.buffer_layouts();
    let expected = Vertex::desc();
    assert_eq!(layouts[0].array_stride, expected.array_stride);
    assert_eq!(layouts[0].attributes, expected.attributes);
}

#[test]
fn should_split_attributes_by_binding() {
    let vao = VertexArrayObject::new(&[
        VertexAttributeEntry::float(0, 3, 0, 0),
        VertexAttributeEntry::float(1, 4, 0, 1),
        VertexAttributeEntry::float(2, 2, 16, 1),
    ])
    .unwrap();

    assert_eq!(vao.binding_count(), 2);
    assert_eq!(vao.stride(0), Some(12));
    assert_eq!(vao.stride(1), Some(24));
    let layouts = vao.buffer_layouts();
    assert_eq!(layouts[1].attributes.len(), 2);
    assert_eq!(layouts[1].attributes[1].shader_location, 2);
    assert_eq!(layouts[1].attributes[1].offset, 16);
}

#[test]
fn should_allow_padding_through_stride() {
    let vao = VertexArrayObject::new(&[VertexAttributeEntry::float(0, 3, 0, 0)])
        .unwrap()
        .with_stride(0, std::mem::size_of::<ModelVertex>() as u64)
        .unwrap();
    assert_eq!(vao.stride(0), Some(32));

    let err = VertexArrayObject::new(&[VertexAttributeEntry::float(0, 3, 0, 0)])
        .unwrap()
        .with_stride(0, 8)
        .unwrap_err();
    assert_eq!(
        err,
        VertexArrayError::StrideTooSmall {
            binding: 0,
            stride: 8,
            required: 12
        }
    );
}

#[test]
fn should_reject_invalid_descriptions() {
    assert_eq!(VertexArrayObject::new(&[]).unwrap_err(), VertexArrayError::Empty);

    let duplicate = VertexArrayObject::new(&[
        VertexAttributeEntry::float(0, 3, 0, 0),
        VertexAttributeEntry::float(0, 2, 12, 0),
    ]);
    assert_eq!(duplicate.unwrap_err(), VertexArrayError::DuplicateLocation(0));

    let gap = VertexArrayObject::new(&[VertexAttributeEntry::float(0, 3, 0, 1)]);
    assert_eq!(gap.unwrap_err(), VertexArrayError::MissingBinding(0));

    let five = VertexArrayObject::new(&[VertexAttributeEntry::float(0, 5, 0, 0)]);
    assert!(matches!(
        five.unwrap_err(),
        VertexArrayError::UnsupportedFormat { size: 5, .. }
    ));
}

#[test]
fn should_map_integer_formats() {
    let entry = VertexAttributeEntry {
        index: 0,
        size: 4,
        kind: AttributeKind::Uint8,
        normalized: true,
        relative_offset: 0,
        binding_index: 0,
    };
    assert_eq!(entry.format().unwrap(), wgpu::VertexFormat::Unorm8x4);

    let float_normalized = VertexAttributeEntry {
        kind: AttributeKind::Float32,
        normalized: true,
        ..entry
    };
    assert!(float_normalized.format().is_err());

    let three_bytes = VertexAttributeEntry { size: 3, ..entry };
    assert!(three_bytes.format().is_err());
}

#[test]
fn should_respect_manager_capacity() {
    let mut manager = VertexArrayObjectManager::with_capacity(1).unwrap();
    let handle = manager
        .create(&[VertexAttributeEntry::float(0, 2, 0, 0)])
        .unwrap();
    assert_eq!(handle.index(), 0);
    assert_eq!(manager.get(handle).unwrap().stride(0), Some(8));

    let err = manager
        .create(&[VertexAttributeEntry::float(0, 2, 0, 0)])
        .unwrap_err();
    assert_eq!(
        err,
        VertexArrayError::Handle(HandleError::CapacityExceeded {
            kind: "vertex array",
            max: 1
        })
    );
}

fn bytes(index: u32, size: u32, relative_offset: u64) -> VertexAttributeEntry {
    VertexAttributeEntry {
        index,
        size,
        kind: AttributeKind::Uint8,
        normalized: true,
        relative_offset,
        binding_index: 0,
    }
}

#[test]
fn should_map_single_component_formats() {
    let cases = [
        (AttributeKind::Uint8, false, wgpu::VertexFormat::Uint8),
        (AttributeKind::Uint8, true, wgpu::VertexFormat::Unorm8),
        (AttributeKind::Sint8, true, wgpu::VertexFormat::Snorm8),
        (AttributeKind::Uint16, false, wgpu::VertexFormat::Uint16),
        (AttributeKind::Sint16, true, wgpu::VertexFormat::Snorm16),
        (AttributeKind::Float16, false, wgpu::VertexFormat::Float16),
    ];
    for (kind, normalized, expected) in cases {
        let entry = VertexAttributeEntry {
            kind,
            normalized,
            ..bytes(0, 1, 0)
        };
        assert_eq!(entry.format().unwrap(), expected, "{:?}", kind);
    }
}

#[test]
fn should_pad_computed_stride_to_vertex_alignment() {
    let vao = VertexArrayObject::new(&[bytes(0, 2, 0)]).unwrap();
    assert_eq!(vao.stride(0), Some(wgpu::VERTEX_ALIGNMENT));
    assert_eq!(vao.buffer_layouts()[0].array_stride % wgpu::VERTEX_ALIGNMENT, 0);

    let vao = VertexArrayObject::new(&[
        VertexAttributeEntry::float(0, 3, 0, 0),
        bytes(1, 1, 12),
    ])
    .unwrap();
    assert_eq!(vao.stride(0), Some(16));
}

#[test]
fn should_reject_misaligned_offsets() {
    let float = VertexArrayObject::new(&[
        bytes(0, 2, 0),
        VertexAttributeEntry::float(1, 2, 2, 0),
    ]);
    assert_eq!(
        float.unwrap_err(),
        VertexArrayError::MisalignedOffset {
            index: 1,
            offset: 2,
            alignment: 4
        }
    );

    let short = VertexAttributeEntry {
        kind: AttributeKind::Uint16,
        ..bytes(1, 1, 3)
    };
    assert!(matches!(
        VertexArrayObject::new(&[bytes(0, 2, 0), short]).unwrap_err(),
        VertexArrayError::MisalignedOffset { alignment: 2, .. }
    ));

    // single bytes may sit anywhere
    assert!(VertexArrayObject::new(&[bytes(0, 1, 0), bytes(1, 1, 3)]).is_ok());
}

#[test]
fn should_reject_misaligned_stride() {
    let err = VertexArrayObject::new(&[bytes(0, 2, 0)])
        .unwrap()
        .with_stride(0, 6)
        .unwrap_err();
    assert_eq!(
        err,
        VertexArrayError::MisalignedStride {
            binding: 0,
            stride: 6,
            alignment: 4
        }
    );
}
