//! Shader programs: a vertex and a fragment WGSL module linked into a pipeline.
//!
//! Sources are parsed and validated with naga before they reach the device so
//! that a typo in a shader surfaces as a [`ProgramError`] carrying the
//! rendered diagnostic instead of a device-lost panic. Pipeline creation runs
//! inside a validation error scope, so interface mismatches between the
//! stages, the vertex layouts and the bind group layouts come back as
//! [`ProgramError::Link`].

use std::path::Path;

use anyhow::Context;
use thiserror::Error;

use super::basic::{DepthState, mk_render_pipeline};
use crate::{
    data_structures::handle::{Handle, HandleError, Manager, Resource},
    resources::load_string,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn entry_point(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }

    fn naga(&self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgramError {
    #[error("Could not compile {stage:?} shader '{label}':\n{message}")]
    Compile {
        label: String,
        stage: ShaderStage,
        message: String,
    },
    #[error("Could not link program '{label}': {message}")]
    Link { label: String, message: String },
    #[error(transparent)]
    Handle(#[from] HandleError),
}

/// WGSL source of both stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    /// Read `vertex.wgsl` and `fragment.wgsl` from `dir`.
    pub async fn load(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        let vertex = load_string(dir.join("vertex.wgsl"))
            .await
            .with_context(|| format!("Could not load vertex shader from {}", dir.display()))?;
        let fragment = load_string(dir.join("fragment.wgsl"))
            .await
            .with_context(|| format!("Could not load fragment shader from {}", dir.display()))?;
        Ok(Self { vertex, fragment })
    }
}

/// Parse and validate `source`, then check it provides the stage's entry point.
pub fn validate_wgsl(
    label: &str,
    source: &str,
    stage: ShaderStage,
) -> Result<naga::Module, ProgramError> {
    let compile_error = |message: String| ProgramError::Compile {
        label: label.to_string(),
        stage,
        message,
    };
    let module =
        naga::front::wgsl::parse_str(source).map_err(|e| compile_error(e.emit_to_string(source)))?;
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|e| compile_error(e.emit_to_string(source)))?;

    let has_entry_point = module
        .entry_points
        .iter()
        .any(|ep| ep.stage == stage.naga() && ep.name == stage.entry_point());
    if !has_entry_point {
        return Err(ProgramError::Link {
            label: label.to_string(),
            message: format!("no {:?} entry point named {}", stage, stage.entry_point()),
        });
    }
    Ok(module)
}

pub fn compile_shader(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    stage: ShaderStage,
) -> Result<wgpu::ShaderModule, ProgramError> {
    validate_wgsl(label, source, stage)?;
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    }))
}

/// Fixed-function state and resource layout of a program.
#[derive(Debug, Clone)]
pub struct ProgramDescriptor<'a> {
    pub label: &'a str,
    pub vertex_layouts: &'a [wgpu::VertexBufferLayout<'a>],
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub blend: Option<wgpu::BlendState>,
    pub depth: Option<DepthState>,
    pub cull_mode: Option<wgpu::Face>,
}

#[derive(Debug)]
pub struct Program {
    pub label: String,
    pub pipeline: wgpu::RenderPipeline,
}

impl Resource for Program {
    const KIND: &'static str = "program";
}

impl Program {
    pub async fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        sources: &ShaderSources,
        desc: &ProgramDescriptor<'_>,
    ) -> Result<Self, ProgramError> {
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let vertex = compile_shader(
            device,
            &format!("{} vertex shader", desc.label),
            &sources.vertex,
            ShaderStage::Vertex,
        )?;
        let fragment = compile_shader(
            device,
            &format!("{} fragment shader", desc.label),
            &sources.fragment,
            ShaderStage::Fragment,
        )?;
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Pipeline Layout", desc.label)),
            bind_group_layouts: desc.bind_group_layouts,
            immediate_size: 0,
        });
        let pipeline = mk_render_pipeline(
            device,
            desc.label,
            &layout,
            color_format,
            desc.blend,
            desc.depth,
            desc.cull_mode,
            desc.vertex_layouts,
            &vertex,
            &fragment,
        );
        if let Some(error) = scope.pop().await {
            return Err(ProgramError::Link {
                label: desc.label.to_string(),
                message: error.to_string(),
            });
        }
        log::debug!("Linked program '{}'", desc.label);
        Ok(Self {
            label: desc.label.to_string(),
            pipeline,
        })
    }
}

pub type ProgramManager = Manager<Program>;

impl Manager<Program> {
    pub async fn create(
        &mut self,
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        sources: &ShaderSources,
        desc: &ProgramDescriptor<'_>,
    ) -> Result<Handle<Program>, ProgramError> {
        self.ensure_capacity()?;
        let program = Program::new(device, color_format, sources, desc).await?;
        Ok(self.insert(program)?)
    }

    /// Make `handle` the active pipeline of `pass`.
    pub fn use_program(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        handle: Handle<Program>,
    ) -> Result<(), HandleError> {
        let program = self.get(handle)?;
        pass.set_pipeline(&program.pipeline);
        Ok(())
    }
}
