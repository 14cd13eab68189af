//! Models: a set of meshes, each drawn with one diffuse/specular material.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use super::{mesh::Mesh, texture::Texture};

#[derive(Debug)]
pub struct Material {
    pub name: String,
    /// Index into [`Model::textures`].
    pub diffuse: usize,
    /// Index into [`Model::textures`].
    pub specular: usize,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        textures: &TextureCache,
        diffuse: usize,
        specular: usize,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let diffuse_texture = &textures.textures[diffuse];
        let specular_texture = &textures.textures[specular];
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&diffuse_texture.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&specular_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&specular_texture.sampler),
                },
            ],
            label: Some(name),
        });
        Self {
            name: name.to_string(),
            diffuse,
            specular,
            bind_group,
        }
    }
}

#[derive(Debug)]
pub struct ModelMesh {
    pub mesh: Mesh,
    /// Index into [`Model::materials`].
    pub material: usize,
}

#[derive(Debug)]
pub struct Model {
    pub meshes: Vec<ModelMesh>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
}

/// Textures of one model, each source file loaded only once.
#[derive(Debug, Default)]
pub struct TextureCache {
    pub textures: Vec<Texture>,
    by_path: HashMap<(PathBuf, bool), usize>,
    white: Option<usize>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path, srgb: bool) -> Option<usize> {
        self.by_path.get(&(path.to_path_buf(), srgb)).copied()
    }

    pub fn insert(&mut self, path: PathBuf, srgb: bool, texture: Texture) -> usize {
        let index = self.push(texture);
        self.by_path.insert((path, srgb), index);
        index
    }

    pub fn push(&mut self, texture: Texture) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    /// Shared 1x1 white texture, created on first use.
    pub fn white(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> usize {
        match self.white {
            Some(index) => index,
            None => {
                let index = self.push(Texture::white(device, queue));
                self.white = Some(index);
                index
            }
        }
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Layout of a [`Material`]: diffuse texture and sampler, then specular texture and sampler.
pub fn material_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("material_bind_group_layout"),
    })
}
