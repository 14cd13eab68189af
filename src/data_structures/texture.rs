//! GPU textures and texture creation utilities.
//!
//! This module provides [`Texture`], a wrapper around a wgpu texture, its view
//! and sampler, together with constructors for depth buffers, single channel
//! bitmaps (font atlases) and decoded images.

use image::GenericImageView;
use thiserror::Error;

use super::handle::{Handle, HandleError, Manager, Resource};

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("bitmap has {actual} bytes but {width}x{height} needs {expected}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("texture must not be empty")]
    Empty,
    #[error(transparent)]
    Handle(#[from] HandleError),
}

/// How an image is turned into a texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureOptions {
    /// Flip rows so that the first image row ends up at `v = 1`.
    pub flip_vertically: bool,
    pub filter: wgpu::FilterMode,
    pub address_mode: wgpu::AddressMode,
    /// Colour textures are stored as sRGB, data textures (specular maps) are not.
    pub srgb: bool,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            flip_vertically: false,
            filter: wgpu::FilterMode::Linear,
            address_mode: wgpu::AddressMode::Repeat,
            srgb: true,
        }
    }
}

/// A GPU texture with its default view and sampler.
#[derive(Clone, Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Resource for Texture {
    const KIND: &'static str = "texture";

    fn release(self) {
        self.texture.destroy();
    }
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a depth texture for depth-testing during rendering.
    ///
    /// `size` is `[width, height]` in pixels; zero sizes are bumped to one.
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Upload a single channel bitmap, e.g. a baked font atlas.
    ///
    /// The texture uses linear filtering and clamps at the edges so glyphs at
    /// the atlas border do not bleed.
    pub fn from_r8_bitmap(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bitmap: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        let expected = width as usize * height as usize;
        if bitmap.len() != expected {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                expected,
                actual: bitmap.len(),
            });
        }
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });
        Ok(Self::upload(
            device,
            queue,
            bitmap,
            width,
            height,
            1,
            wgpu::TextureFormat::R8Unorm,
            sampler,
            label,
        ))
    }

    /// Decode an encoded image (PNG, JPEG, ...) and upload it as RGBA8.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
        options: TextureOptions,
    ) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes)?;
        Self::from_image(device, queue, &img, label, options)
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: &str,
        options: TextureOptions,
    ) -> Result<Self, TextureError> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        let rgba = if options.flip_vertically {
            img.flipv().to_rgba8()
        } else {
            img.to_rgba8()
        };
        let format = if options.srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: options.address_mode,
            address_mode_v: options.address_mode,
            address_mode_w: options.address_mode,
            mag_filter: options.filter,
            min_filter: options.filter,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });
        Ok(Self::upload(
            device, queue, &rgba, width, height, 4, format, sampler, label,
        ))
    }

    /// A 1x1 texture of a single colour, used where a material has no map.
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [u8; 4], label: &str) -> Self {
        let sampler = create_default_sampler(device);
        Self::upload(
            device,
            queue,
            &rgba,
            1,
            1,
            4,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            sampler,
            label,
        )
    }

    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::solid(device, queue, [255, 255, 255, 255], "white texture")
    }

    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    pub fn height(&self) -> u32 {
        self.texture.height()
    }

    /// Bind this texture and its sampler against [`texture_bind_group_layout`].
    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
            label: Some(label),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
        bytes_per_pixel: u32,
        format: wgpu::TextureFormat,
        sampler: wgpu::Sampler,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_pixel * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("Uploaded texture '{}' ({}x{}, {:?})", label, width, height, format);
        Self {
            texture,
            view,
            sampler,
        }
    }
}

pub fn create_default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}

/// Layout for one filterable 2D texture at binding 0 and its sampler at binding 1.
pub fn texture_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
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
        ],
        label: Some("texture_bind_group_layout"),
    })
}

pub type TextureManager = Manager<Texture>;

impl Manager<Texture> {
    pub fn create_from_bitmap(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bitmap: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Handle<Texture>, TextureError> {
        self.ensure_capacity()?;
        let label = format!("texture {}", self.len());
        let texture = Texture::from_r8_bitmap(device, queue, bitmap, width, height, &label)?;
        Ok(self.insert(texture)?)
    }

    pub fn create_from_image(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        options: TextureOptions,
    ) -> Result<Handle<Texture>, TextureError> {
        self.ensure_capacity()?;
        let label = format!("texture {}", self.len());
        let texture = Texture::from_image(device, queue, img, &label, options)?;
        Ok(self.insert(texture)?)
    }
}
