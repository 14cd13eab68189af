//! Window-bound GPU context.
//!
//! [`GraphicContext`] owns the surface, device and queue of the single window
//! a demo opens, plus the depth buffer matching the surface size. Only one
//! context may exist per process.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::Context as _;
use winit::window::Window;

use crate::data_structures::texture::Texture;

static CONTEXT_EXISTS: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, PartialEq)]
pub struct GraphicContextConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub present_mode: wgpu::PresentMode,
    pub clear_colour: wgpu::Color,
    /// Allocate a depth buffer and clear it every frame.
    pub depth: bool,
}

impl Default for GraphicContextConfig {
    fn default() -> Self {
        Self {
            title: "Jonark".to_string(),
            width: 640,
            height: 480,
            present_mode: wgpu::PresentMode::Fifo,
            clear_colour: wgpu::Color::BLACK,
            depth: true,
        }
    }
}

impl GraphicContextConfig {
    pub fn new(title: &str, width: u32, height: u32) -> Self {
        Self {
            title: title.to_string(),
            width,
            height,
            ..Default::default()
        }
    }
}

#[derive(Debug)]
pub struct GraphicContext {
    pub(crate) window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub depth_texture: Option<Texture>,
    pub clear_colour: wgpu::Color,
}

/// The parts of a [`GraphicContext`] a demo needs while it sets itself up.
///
/// Cloning only bumps the reference counts of the device and queue.
#[derive(Debug, Clone)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
}

impl From<&GraphicContext> for InitContext {
    fn from(ctx: &GraphicContext) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            format: ctx.config.format,
            width: ctx.config.width,
            height: ctx.config.height,
        }
    }
}

impl GraphicContext {
    pub async fn new(window: Arc<Window>, config: &GraphicContextConfig) -> anyhow::Result<Self> {
        if CONTEXT_EXISTS.swap(true, Ordering::SeqCst) {
            anyhow::bail!("Graphic context already exists");
        }
        match Self::create(window, config).await {
            Ok(ctx) => Ok(ctx),
            Err(e) => {
                CONTEXT_EXISTS.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    async fn create(window: Arc<Window>, config: &GraphicContextConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::debug!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Could not create window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Could not find a suitable GPU adapter")?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = request_device(&adapter).await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Shaders output linear colour, so an sRGB surface keeps textures looking right.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no supported formats")?;
        let present_mode = if surface_caps.present_modes.contains(&config.present_mode) {
            config.present_mode
        } else {
            log::warn!(
                "Present mode {:?} is not supported, falling back to Fifo",
                config.present_mode
            );
            wgpu::PresentMode::Fifo
        };
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_texture = config.depth.then(|| {
            Texture::create_depth_texture(
                &device,
                [surface_config.width, surface_config.height],
                "depth_texture",
            )
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config: surface_config,
            depth_texture,
            clear_colour: config.clear_colour,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Reconfigure the surface and depth buffer. Zero sizes (minimized
    /// windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        if self.depth_texture.is_some() {
            self.depth_texture = Some(Texture::create_depth_texture(
                &self.device,
                [width, height],
                "depth_texture",
            ));
        }
    }
}

impl Drop for GraphicContext {
    fn drop(&mut self) {
        CONTEXT_EXISTS.store(false, Ordering::SeqCst);
    }
}

async fn request_device(adapter: &wgpu::Adapter) -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("jonark device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::Off,
        })
        .await
        .context("Could not create device")
}

/// Device and queue without a window, for offscreen rendering and tests.
pub async fn headless_device() -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .context("Could not find a suitable GPU adapter")?;
    request_device(&adapter).await
}
