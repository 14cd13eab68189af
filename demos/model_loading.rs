use std::path::Path;

use cgmath::Deg;
use instant::Duration;
use jonark::{
    WindowEvent,
    camera::{Camera, CameraController, CameraUniform, Projection},
    context::{GraphicContext, GraphicContextConfig, InitContext},
    data_structures::{
        model::{Model, material_bind_group_layout},
        vertex::{ModelVertex, VertexLayout},
    },
    flow::{self, Demo},
    pipelines::{
        basic::{DepthState, REPLACE},
        program::{Program, ProgramDescriptor, ShaderSources},
        uniform::{TransformUniform, Uniform},
    },
    render::DrawModel,
    resources::{MODEL_DIR, load_model, shader_dir},
};

struct ModelLoading {
    program: Program,
    model: Model,
    camera: Camera,
    projection: Projection,
    controller: CameraController,
    camera_uniform: Uniform<CameraUniform>,
    transform: Uniform<TransformUniform>,
}

impl ModelLoading {
    async fn new(ctx: InitContext) -> anyhow::Result<Self> {
        let model_path = Path::new(MODEL_DIR).join("bunny").join("bunny.obj");
        let model = load_model(&model_path, &ctx.device, &ctx.queue).await?;

        let camera = Camera::new((0.0, 0.2, 3.0), Deg(-90.0), Deg(0.0));
        let projection = Projection::new(ctx.width, ctx.height, Deg(45.0), 0.1, 100.0);
        let mut camera_data = CameraUniform::new();
        camera_data.update_view_proj(&camera, &projection);
        let camera_uniform = Uniform::new(&ctx.device, "camera", camera_data);
        let transform = Uniform::new(&ctx.device, "model", TransformUniform::default());

        let material_layout = material_bind_group_layout(&ctx.device);
        let sources = ShaderSources::load(shader_dir("model")).await?;
        let program = Program::new(
            &ctx.device,
            ctx.format,
            &sources,
            &ProgramDescriptor {
                label: "model",
                vertex_layouts: &[ModelVertex::desc()],
                bind_group_layouts: &[
                    camera_uniform.layout(),
                    &material_layout,
                    transform.layout(),
                ],
                blend: Some(REPLACE),
                depth: Some(DepthState::opaque()),
                cull_mode: None,
            },
        )
        .await?;

        Ok(Self {
            program,
            model,
            camera,
            projection,
            controller: CameraController::new(1.0, 40.0),
            camera_uniform,
            transform,
        })
    }
}

impl Demo for ModelLoading {
    fn on_window_event(&mut self, _ctx: &GraphicContext, event: &WindowEvent) {
        self.controller.handle_window_events(event);
    }

    fn on_update(&mut self, ctx: &GraphicContext, dt: Duration) {
        self.controller.update(&mut self.camera, dt);
        let mut camera_data = *self.camera_uniform.value();
        camera_data.update_view_proj(&self.camera, &self.projection);
        self.camera_uniform.set(&ctx.queue, camera_data);
    }

    fn on_resize(&mut self, _ctx: &GraphicContext, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    fn on_render(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.program.pipeline);
        pass.set_bind_group(0, self.camera_uniform.bind_group(), &[]);
        pass.set_bind_group(2, self.transform.bind_group(), &[]);
        pass.draw_model(&self.model, 1);
    }
}

fn main() {
    let config = GraphicContextConfig::new("Model Loading", 800, 600);
    if let Err(e) = flow::run(config, ModelLoading::new) {
        eprintln!("model_loading failed: {:#}", e);
        std::process::exit(1);
    }
}
