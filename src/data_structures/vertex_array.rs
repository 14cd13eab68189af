//! Vertex array objects: attribute descriptions turned into wgpu buffer layouts.
//!
//! A [`VertexArrayObject`] is built from a list of [`VertexAttributeEntry`]s,
//! each naming a shader location, a component count and type, an offset
//! relative to the start of a vertex and the buffer binding it is read from.
//! Programs take their vertex layouts from it.
//!
//! wgpu requires strides to be a multiple of [`wgpu::VERTEX_ALIGNMENT`] and
//! attribute offsets to be aligned to `min(4, format size)`. Misaligned
//! offsets and explicit strides are rejected, strides computed from the
//! attributes are padded up to the alignment.

use thiserror::Error;

use super::handle::{Handle, HandleError, Manager, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Float32,
    Float16,
    Uint32,
    Sint32,
    Uint16,
    Sint16,
    Uint8,
    Sint8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttributeEntry {
    /// Shader location.
    pub index: u32,
    /// Component count, 1 to 4.
    pub size: u32,
    pub kind: AttributeKind,
    /// Integer data is mapped to `[0, 1]` (or `[-1, 1]`) in the shader.
    pub normalized: bool,
    /// Byte offset inside one vertex.
    pub relative_offset: u64,
    pub binding_index: u32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VertexArrayError {
    #[error("vertex array needs at least one attribute")]
    Empty,
    #[error("attribute {index}: {size} x {kind:?} (normalized: {normalized}) has no vertex format")]
    UnsupportedFormat {
        index: u32,
        size: u32,
        kind: AttributeKind,
        normalized: bool,
    },
    #[error("attribute location {0} is used more than once")]
    DuplicateLocation(u32),
    #[error("binding {0} has no attributes")]
    MissingBinding(u32),
    #[error("binding {0} does not exist")]
    UnknownBinding(u32),
    #[error("stride {stride} of binding {binding} is smaller than its attributes ({required} bytes)")]
    StrideTooSmall {
        binding: u32,
        stride: u64,
        required: u64,
    },
    #[error("offset {offset} of attribute {index} is not aligned to {alignment} bytes")]
    MisalignedOffset {
        index: u32,
        offset: u64,
        alignment: u64,
    },
    #[error("stride {stride} of binding {binding} is not a multiple of {alignment} bytes")]
    MisalignedStride {
        binding: u32,
        stride: u64,
        alignment: u64,
    },
    #[error(transparent)]
    Handle(#[from] HandleError),
}

impl VertexAttributeEntry {
    /// Non-normalized `f32` attribute, the most common case.
    pub fn float(index: u32, size: u32, relative_offset: u64, binding_index: u32) -> Self {
        Self {
            index,
            size,
            kind: AttributeKind::Float32,
            normalized: false,
            relative_offset,
            binding_index,
        }
    }

    pub fn format(&self) -> Result<wgpu::VertexFormat, VertexArrayError> {
        use AttributeKind::*;
        use wgpu::VertexFormat as F;

        let format = match (self.kind, self.size, self.normalized) {
            (Float32, 1, false) => Some(F::Float32),
            (Float32, 2, false) => Some(F::Float32x2),
            (Float32, 3, false) => Some(F::Float32x3),
            (Float32, 4, false) => Some(F::Float32x4),
            (Float16, 1, false) => Some(F::Float16),
            (Float16, 2, false) => Some(F::Float16x2),
            (Float16, 4, false) => Some(F::Float16x4),
            (Uint32, 1, false) => Some(F::Uint32),
            (Uint32, 2, false) => Some(F::Uint32x2),
            (Uint32, 3, false) => Some(F::Uint32x3),
            (Uint32, 4, false) => Some(F::Uint32x4),
            (Sint32, 1, false) => Some(F::Sint32),
            (Sint32, 2, false) => Some(F::Sint32x2),
            (Sint32, 3, false) => Some(F::Sint32x3),
            (Sint32, 4, false) => Some(F::Sint32x4),
            (Uint16, 1, false) => Some(F::Uint16),
            (Uint16, 2, false) => Some(F::Uint16x2),
            (Uint16, 4, false) => Some(F::Uint16x4),
            (Uint16, 1, true) => Some(F::Unorm16),
            (Uint16, 2, true) => Some(F::Unorm16x2),
            (Uint16, 4, true) => Some(F::Unorm16x4),
            (Sint16, 1, false) => Some(F::Sint16),
            (Sint16, 2, false) => Some(F::Sint16x2),
            (Sint16, 4, false) => Some(F::Sint16x4),
            (Sint16, 1, true) => Some(F::Snorm16),
            (Sint16, 2, true) => Some(F::Snorm16x2),
            (Sint16, 4, true) => Some(F::Snorm16x4),
            (Uint8, 1, false) => Some(F::Uint8),
            (Uint8, 2, false) => Some(F::Uint8x2),
            (Uint8, 4, false) => Some(F::Uint8x4),
            (Uint8, 1, true) => Some(F::Unorm8),
            (Uint8, 2, true) => Some(F::Unorm8x2),
            (Uint8, 4, true) => Some(F::Unorm8x4),
            (Sint8, 1, false) => Some(F::Sint8),
            (Sint8, 2, false) => Some(F::Sint8x2),
            (Sint8, 4, false) => Some(F::Sint8x4),
            (Sint8, 1, true) => Some(F::Snorm8),
            (Sint8, 2, true) => Some(F::Snorm8x2),
            (Sint8, 4, true) => Some(F::Snorm8x4),
            _ => None,
        };
        format.ok_or(VertexArrayError::UnsupportedFormat {
            index: self.index,
            size: self.size,
            kind: self.kind,
            normalized: self.normalized,
        })
    }
}

#[derive(Debug, Clone)]
struct Binding {
    stride: u64,
    attributes: Vec<wgpu::VertexAttribute>,
}

#[derive(Debug, Clone)]
pub struct VertexArrayObject {
    bindings: Vec<Binding>,
}

impl Resource for VertexArrayObject {
    const KIND: &'static str = "vertex array";
}

impl VertexArrayObject {
    pub fn new(entries: &[VertexAttributeEntry]) -> Result<Self, VertexArrayError> {
        if entries.is_empty() {
            return Err(VertexArrayError::Empty);
        }
        let mut seen = Vec::with_capacity(entries.len());
        for entry in entries {
            if seen.contains(&entry.index) {
                return Err(VertexArrayError::DuplicateLocation(entry.index));
            }
            seen.push(entry.index);
        }

        let binding_count = entries
            .iter()
            .map(|e| e.binding_index)
            .max()
            .map_or(0, |max| max + 1);
        let mut bindings = Vec::with_capacity(binding_count as usize);
        for binding in 0..binding_count {
            let mut stride = 0;
            let mut attributes = Vec::new();
            for entry in entries.iter().filter(|e| e.binding_index == binding) {
                let format = entry.format()?;
                let alignment = format.size().min(wgpu::VERTEX_ALIGNMENT);
                if entry.relative_offset % alignment != 0 {
                    return Err(VertexArrayError::MisalignedOffset {
                        index: entry.index,
                        offset: entry.relative_offset,
                        alignment,
                    });
                }
                stride = stride.max(entry.relative_offset + format.size());
                attributes.push(wgpu::VertexAttribute {
                    format,
                    offset: entry.relative_offset,
                    shader_location: entry.index,
                });
            }
            if attributes.is_empty() {
                return Err(VertexArrayError::MissingBinding(binding));
            }
            let stride = stride.next_multiple_of(wgpu::VERTEX_ALIGNMENT);
            bindings.push(Binding { stride, attributes });
        }
        Ok(Self { bindings })
    }

    /// Override the stride of `binding`, e.g. for interleaved data with padding.
    pub fn with_stride(mut self, binding: u32, stride: u64) -> Result<Self, VertexArrayError> {
        let entry = self
            .bindings
            .get_mut(binding as usize)
            .ok_or(VertexArrayError::UnknownBinding(binding))?;
        if stride % wgpu::VERTEX_ALIGNMENT != 0 {
            return Err(VertexArrayError::MisalignedStride {
                binding,
                stride,
                alignment: wgpu::VERTEX_ALIGNMENT,
            });
        }
        if stride < entry.stride {
            return Err(VertexArrayError::StrideTooSmall {
                binding,
                stride,
                required: entry.stride,
            });
        }
        entry.stride = stride;
        Ok(self)
    }

    pub fn stride(&self, binding: u32) -> Option<u64> {
        self.bindings.get(binding as usize).map(|b| b.stride)
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn buffer_layouts(&self) -> Vec<wgpu::VertexBufferLayout<'_>> {
        self.bindings
            .iter()
            .map(|binding| wgpu::VertexBufferLayout {
                array_stride: binding.stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &binding.attributes,
            })
            .collect()
    }
}

pub type VertexArrayObjectManager = Manager<VertexArrayObject>;

impl Manager<VertexArrayObject> {
    pub fn create(
        &mut self,
        entries: &[VertexAttributeEntry],
    ) -> Result<Handle<VertexArrayObject>, VertexArrayError> {
        self.ensure_capacity()?;
        let vao = VertexArrayObject::new(entries)?;
        Ok(self.insert(vao)?)
    }
}
