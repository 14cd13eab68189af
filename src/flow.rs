//! Demo runner and application event loop.
//!
//! A [`Demo`] owns its GPU resources and is driven by [`run`], which opens
//! the window, builds the [`GraphicContext`] and then calls the demo hooks
//! in this order every frame:
//!
//! 1. `on_window_event` for every winit window event
//! 2. `on_update` with the time since the previous frame
//! 3. `on_render` inside a render pass that already cleared colour and depth
//!
//! `Escape` or a close request ends the loop.

use std::{future::Future, iter, sync::Arc};

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::context::{GraphicContext, GraphicContextConfig, InitContext};

/// A self-contained scene driven by [`run`].
pub trait Demo {
    fn on_window_event(&mut self, _ctx: &GraphicContext, _event: &WindowEvent) {}

    /// Called once per frame before rendering.
    fn on_update(&mut self, _ctx: &GraphicContext, _dt: Duration) {}

    /// Called after the surface was reconfigured to a new non-zero size.
    fn on_resize(&mut self, _ctx: &GraphicContext, _width: u32, _height: u32) {}

    /// Record draw calls. The pass targets the surface and, when the context
    /// has one, its depth buffer.
    fn on_render(&self, pass: &mut wgpu::RenderPass<'_>);
}

struct AppState<D> {
    ctx: GraphicContext,
    demo: D,
}

impl<D: Demo> AppState<D> {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.ctx.resize(width, height);
        self.demo.on_resize(&self.ctx, width, height);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: self.ctx.depth_texture.as_ref().map(|depth| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });
            self.demo.on_render(&mut render_pass);
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        self.ctx.window.pre_present_notify();
        output.present();
        Ok(())
    }
}

struct App<D, F> {
    async_runtime: tokio::runtime::Runtime,
    config: GraphicContextConfig,
    constructor: Option<F>,
    state: Option<AppState<D>>,
    error: Option<anyhow::Error>,
    last_time: Instant,
}

impl<D, F, Fut> App<D, F>
where
    D: Demo,
    F: FnOnce(InitContext) -> Fut,
    Fut: Future<Output = anyhow::Result<D>>,
{
    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState<D>> {
        let constructor = self
            .constructor
            .take()
            .ok_or_else(|| anyhow::anyhow!("Demo was already constructed"))?;
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let config = &self.config;
        let init_future = async move {
            let ctx = GraphicContext::new(window, config).await?;
            // Only the Arcs inside device and queue are cloned here.
            let demo = constructor(InitContext::from(&ctx)).await?;
            anyhow::Ok(AppState { ctx, demo })
        };
        self.async_runtime.block_on(init_future)
    }
}

impl<D, F, Fut> ApplicationHandler for App<D, F>
where
    D: Demo,
    F: FnOnce(InitContext) -> Fut,
    Fut: Future<Output = anyhow::Result<D>>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.error.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(state) => {
                log::info!("{} initialised", self.config.title);
                self.last_time = Instant::now();
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("Initialisation failed: {:#}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.demo.on_window_event(&state.ctx, &event);

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                state.demo.on_update(&state.ctx, dt);

                match state.render() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Surface is out of memory");
                        event_loop.exit();
                    }
                    Err(e) => {
                        log::warn!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Set up `env_logger`, honouring `RUST_LOG` and defaulting to `info`.
/// Calling it again is harmless.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        log::debug!("Logger already initialised: {}", e);
    }
}

/// Open a window described by `config`, construct the demo and drive it until
/// the window is closed.
///
/// Errors while creating the window, the graphic context or the demo end the
/// event loop and are returned.
pub fn run<D, F, Fut>(config: GraphicContextConfig, constructor: F) -> anyhow::Result<()>
where
    D: Demo,
    F: FnOnce(InitContext) -> Fut,
    Fut: Future<Output = anyhow::Result<D>>,
{
    init_logging();

    let event_loop = EventLoop::new()?;
    let mut app = App {
        async_runtime: tokio::runtime::Runtime::new()?,
        config,
        constructor: Some(constructor),
        state: None,
        error: None,
        last_time: Instant::now(),
    };

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

