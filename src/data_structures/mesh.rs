//! Indexed meshes uploaded to GPU buffers.

use thiserror::Error;
use wgpu::util::DeviceExt;

use super::{
    handle::{Handle, HandleError, Manager, Resource},
    texture::Texture,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("Mesh data has no vertices")]
    NoVertices,
    #[error("Mesh data has no indices")]
    NoIndices,
    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error(transparent)]
    Handle(#[from] HandleError),
}

/// CPU-side input of a mesh.
#[derive(Debug, Clone, Copy)]
pub struct MeshData<'a, V> {
    pub vertices: &'a [V],
    pub indices: &'a [u32],
    /// Texture drawn on the mesh, if any.
    pub texture: Option<Handle<Texture>>,
}

impl<'a, V> MeshData<'a, V> {
    pub fn new(vertices: &'a [V], indices: &'a [u32]) -> Self {
        Self {
            vertices,
            indices,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: Handle<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.vertices.is_empty() {
            return Err(MeshError::NoVertices);
        }
        if self.indices.is_empty() {
            return Err(MeshError::NoIndices);
        }
        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.vertices.len())
        {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: self.vertices.len(),
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
    pub texture: Option<Handle<Texture>>,
}

impl Resource for Mesh {
    const KIND: &'static str = "mesh";

    fn release(self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

impl Mesh {
    pub fn new<V: bytemuck::Pod>(
        device: &wgpu::Device,
        name: &str,
        data: &MeshData<'_, V>,
    ) -> Result<Self, MeshError> {
        data.validate()?;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        log::debug!(
            "Created mesh '{}' with {} vertices and {} indices",
            name,
            data.vertices.len(),
            data.indices.len()
        );

        Ok(Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_indices: data.indices.len() as u32,
            texture: data.texture,
        })
    }
}

pub type MeshManager = Manager<Mesh>;

impl Manager<Mesh> {
    pub fn create<V: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        data: &MeshData<'_, V>,
    ) -> Result<Handle<Mesh>, MeshError> {
        self.ensure_valid()?;
        data.validate()?;
        self.ensure_capacity()?;
        let name = format!("mesh {}", self.len());
        let mesh = Mesh::new(device, &name, data)?;
        Ok(self.insert(mesh)?)
    }
}
