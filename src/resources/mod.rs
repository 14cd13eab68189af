//! File access and asset loading.
//!
//! All paths are resolved relative to the working directory, demos are
//! expected to run from the repository root where `shaders/`, `textures/`,
//! `models/` and `fonts/` live.

use std::path::{Path, PathBuf};

use anyhow::Context;

pub mod mesh;
pub mod model;
pub mod texture;

pub use model::load_model;
pub use texture::{load_image, load_texture};

pub const SHADER_DIR: &str = "shaders";
pub const TEXTURE_DIR: &str = "textures";
pub const MODEL_DIR: &str = "models";
pub const FONT_DIR: &str = "fonts";

/// Directory holding `vertex.wgsl` and `fragment.wgsl` of a program.
pub fn shader_dir(name: &str) -> PathBuf {
    Path::new(SHADER_DIR).join(name)
}

pub async fn load_string(path: impl AsRef<Path>) -> anyhow::Result<String> {
    let path = path.as_ref();
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Could not read {}", path.display()))
}

pub async fn load_binary(path: impl AsRef<Path>) -> anyhow::Result<Vec<u8>> {
    let path = path.as_ref();
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Could not read {}", path.display()))
}
