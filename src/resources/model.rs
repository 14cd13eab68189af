//! Model loading for Wavefront obj and glTF files.
//!
//! Texture paths are resolved against the directory of the model file. A
//! texture that cannot be read or decoded does not fail the model: the
//! problem is logged and the material falls back to a white texture.

use std::{
    collections::HashSet,
    io::{BufReader, Cursor},
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};

use super::{load_binary, load_string, mesh};
use crate::data_structures::{
    mesh::{Mesh, MeshData},
    model::{Material, Model, ModelMesh, TextureCache, material_bind_group_layout},
    texture::{Texture, TextureOptions},
};

pub async fn load_model(
    path: impl AsRef<Path>,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Model> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    let model = match extension.as_deref() {
        Some("obj") => load_model_obj(path, device, queue).await,
        Some("gltf") | Some("glb") => load_model_gltf(path, device, queue).await,
        _ => bail!("Unsupported model format: {}", path.display()),
    }
    .with_context(|| format!("Could not load model {}", path.display()))?;
    log::info!(
        "Loaded model {} ({} meshes, {} materials, {} textures)",
        path.display(),
        model.meshes.len(),
        model.materials.len(),
        model.textures.len()
    );
    Ok(model)
}

fn model_directory(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Read every distinct texture file concurrently, then decode them in order.
async fn load_texture_files(
    requests: &[(PathBuf, bool)],
    cache: &mut TextureCache,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) {
    let mut seen = HashSet::new();
    let unique: Vec<_> = requests
        .iter()
        .filter(|request| cache.get(&request.0, request.1).is_none() && seen.insert((*request).clone()))
        .cloned()
        .collect();
    let files = futures::future::join_all(unique.iter().map(|(path, _)| load_binary(path))).await;

    for ((path, srgb), file) in unique.into_iter().zip(files) {
        let options = TextureOptions {
            srgb,
            ..Default::default()
        };
        let texture = file.and_then(|bytes| {
            Texture::from_bytes(device, queue, &bytes, &path.display().to_string(), options)
                .map_err(anyhow::Error::from)
        });
        match texture {
            Ok(texture) => {
                cache.insert(path, srgb, texture);
            }
            Err(e) => log::warn!("Texture {} could not be loaded: {:#}", path.display(), e),
        }
    }
}

/// Cached texture of `path`, or the white fallback when it failed to load.
fn texture_or_white(
    path: Option<&PathBuf>,
    srgb: bool,
    cache: &mut TextureCache,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> usize {
    match path.and_then(|path| cache.get(path, srgb)) {
        Some(index) => index,
        None => cache.white(device, queue),
    }
}

pub async fn load_model_obj(
    path: &Path,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Model> {
    let directory = model_directory(path);
    let obj_text = load_string(path).await?;
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));

    let (models, obj_materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p| {
            let mtl_path = directory.join(&p);
            async move {
                match load_string(&mtl_path).await {
                    Ok(text) => tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(text))),
                    Err(e) => {
                        log::warn!("{:#}", e);
                        Err(tobj::LoadError::OpenFileFailed)
                    }
                }
            }
        },
    )
    .await?;

    let obj_materials = obj_materials.unwrap_or_else(|e| {
        log::warn!("Materials of {} could not be loaded: {}", path.display(), e);
        Vec::new()
    });

    let texture_paths: Vec<_> = obj_materials
        .iter()
        .map(|m| {
            (
                m.diffuse_texture.as_ref().map(|t| directory.join(t)),
                m.specular_texture.as_ref().map(|t| directory.join(t)),
            )
        })
        .collect();
    let requests: Vec<_> = texture_paths
        .iter()
        .flat_map(|(diffuse, specular)| {
            diffuse
                .iter()
                .map(|p| (p.clone(), true))
                .chain(specular.iter().map(|p| (p.clone(), false)))
        })
        .collect();

    let mut cache = TextureCache::new();
    load_texture_files(&requests, &mut cache, device, queue).await;

    let layout = material_bind_group_layout(device);
    let mut materials = Vec::with_capacity(obj_materials.len() + 1);
    for (m, (diffuse_path, specular_path)) in obj_materials.iter().zip(&texture_paths) {
        let diffuse = texture_or_white(diffuse_path.as_ref(), true, &mut cache, device, queue);
        let specular = texture_or_white(specular_path.as_ref(), false, &mut cache, device, queue);
        materials.push(Material::new(device, &m.name, &cache, diffuse, specular, &layout));
    }

    let mut default_material = None;
    let mut meshes = Vec::with_capacity(models.len());
    for m in &models {
        let vertices = mesh::obj_vertices(&m.mesh);
        let data = MeshData::new(&vertices, &m.mesh.indices);
        let mesh = match Mesh::new(device, &m.name, &data) {
            Ok(mesh) => mesh,
            Err(e) => {
                log::warn!("Mesh {} in {} was skipped: {}", m.name, path.display(), e);
                continue;
            }
        };
        let material = match m.mesh.material_id.filter(|&id| id < materials.len()) {
            Some(id) => id,
            None => *default_material.get_or_insert_with(|| {
                let white = cache.white(device, queue);
                materials.push(Material::new(device, "default", &cache, white, white, &layout));
                materials.len() - 1
            }),
        };
        meshes.push(ModelMesh { mesh, material });
    }

    Ok(Model {
        meshes,
        materials,
        textures: cache.textures,
    })
}

pub async fn load_model_gltf(
    path: &Path,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Model> {
    let directory = model_directory(path);
    let gltf_bytes = load_binary(path).await?;
    let gltf = gltf::Gltf::from_slice(&gltf_bytes)?;

    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => match gltf.blob.as_deref() {
                Some(blob) => buffer_data.push(blob.to_vec()),
                None => bail!("glTF references a binary chunk it does not have"),
            },
            gltf::buffer::Source::Uri(uri) => {
                buffer_data.push(load_binary(directory.join(uri)).await?);
            }
        }
    }

    let mut cache = TextureCache::new();
    let uri_requests: Vec<_> = gltf
        .images()
        .filter_map(|image| match image.source() {
            gltf::image::Source::Uri { uri, .. } => Some((directory.join(uri), true)),
            gltf::image::Source::View { .. } => None,
        })
        .collect();
    load_texture_files(&uri_requests, &mut cache, device, queue).await;

    let layout = material_bind_group_layout(device);
    let mut materials = Vec::new();
    for material in gltf.materials() {
        let name = material.name().unwrap_or("material");
        let image = material
            .pbr_metallic_roughness()
            .base_color_texture()
            .map(|info| info.texture().source());
        let diffuse = match image.map(|image| image.source()) {
            Some(gltf::image::Source::Uri { uri, .. }) => {
                let uri_path = directory.join(uri);
                texture_or_white(Some(&uri_path), true, &mut cache, device, queue)
            }
            Some(gltf::image::Source::View { view, .. }) => {
                let start = view.offset();
                let bytes = buffer_data
                    .get(view.buffer().index())
                    .and_then(|data| data.get(start..start + view.length()));
                let texture = bytes.map(|bytes| {
                    Texture::from_bytes(device, queue, bytes, name, TextureOptions::default())
                });
                match texture {
                    Some(Ok(texture)) => cache.push(texture),
                    Some(Err(e)) => {
                        log::warn!("Embedded texture of {} could not be loaded: {}", name, e);
                        cache.white(device, queue)
                    }
                    None => {
                        log::warn!("Embedded texture of {} points outside its buffer", name);
                        cache.white(device, queue)
                    }
                }
            }
            None => cache.white(device, queue),
        };
        let specular = cache.white(device, queue);
        materials.push(Material::new(device, name, &cache, diffuse, specular, &layout));
    }

    let mut default_material = None;
    let mut meshes = Vec::new();
    for gltf_mesh in gltf.meshes() {
        let name = gltf_mesh.name().unwrap_or("mesh");
        for primitive in gltf_mesh.primitives() {
            let Some((vertices, indices)) = mesh::gltf_primitive(&primitive, &buffer_data) else {
                log::warn!("Primitive of {} has no positions and was skipped", name);
                continue;
            };
            let mesh = match Mesh::new(device, name, &MeshData::new(&vertices, &indices)) {
                Ok(mesh) => mesh,
                Err(e) => {
                    log::warn!("Mesh {} in {} was skipped: {}", name, path.display(), e);
                    continue;
                }
            };
            let material = match primitive.material().index().filter(|&i| i < materials.len()) {
                Some(index) => index,
                None => *default_material.get_or_insert_with(|| {
                    let white = cache.white(device, queue);
                    materials.push(Material::new(device, "default", &cache, white, white, &layout));
                    materials.len() - 1
                }),
            };
            meshes.push(ModelMesh { mesh, material });
        }
    }

    Ok(Model {
        meshes,
        materials,
        textures: cache.textures,
    })
}
