use std::path::Path;

use anyhow::Context;

use super::load_binary;
use crate::data_structures::texture::{Texture, TextureOptions};

pub async fn load_image(path: impl AsRef<Path>) -> anyhow::Result<image::DynamicImage> {
    let path = path.as_ref();
    let data = load_binary(path).await?;
    image::load_from_memory(&data).with_context(|| format!("Could not decode {}", path.display()))
}

pub async fn load_texture(
    path: impl AsRef<Path>,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    options: TextureOptions,
) -> anyhow::Result<Texture> {
    let path = path.as_ref();
    let img = load_image(path).await?;
    let texture = Texture::from_image(device, queue, &img, &path.display().to_string(), options)?;
    Ok(texture)
}
