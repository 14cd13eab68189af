use std::f32::consts::TAU;

use cgmath::{Deg, Matrix4, Rad, Vector3};
use instant::Duration;
use jonark::{
    camera::{CameraUniform, OPENGL_TO_WGPU_MATRIX},
    context::{GraphicContext, GraphicContextConfig, InitContext},
    data_structures::{
        mesh::Mesh,
        texture::{TextureOptions, texture_bind_group_layout},
        vertex::{Vertex, VertexLayout},
    },
    flow::{self, Demo},
    pipelines::{
        basic::{DepthState, REPLACE},
        program::{Program, ProgramDescriptor, ShaderSources},
        uniform::{TransformUniform, Uniform},
    },
    render::DrawMesh,
    resources::{TEXTURE_DIR, load_texture, shader_dir},
    shapes,
};

const ASPECT: f32 = 640.0 / 480.0;
const ROTATION_SPEED: f32 = 0.5;

fn view_proj() -> Matrix4<f32> {
    let projection = OPENGL_TO_WGPU_MATRIX * cgmath::perspective(Deg(45.0), ASPECT, 0.1, 10.0);
    let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -2.5));
    projection * view
}

fn model(angle: f32) -> Matrix4<f32> {
    Matrix4::from_scale(0.5) * Matrix4::from_angle_y(Rad(angle))
}

struct TwoFaces {
    program: Program,
    mesh: Mesh,
    texture_group: wgpu::BindGroup,
    camera: Uniform<CameraUniform>,
    transform: Uniform<TransformUniform>,
    angle: f32,
}

impl TwoFaces {
    async fn new(ctx: InitContext) -> anyhow::Result<Self> {
        let options = TextureOptions {
            flip_vertically: true,
            ..Default::default()
        };
        let path = std::path::Path::new(TEXTURE_DIR).join("Kita.jpg");
        let texture = load_texture(&path, &ctx.device, &ctx.queue, options).await?;
        let texture_layout = texture_bind_group_layout(&ctx.device);
        let texture_group = texture.bind_group(&ctx.device, &texture_layout, "Kita");

        let camera = Uniform::new(
            &ctx.device,
            "camera",
            CameraUniform {
                view_position: [0.0, 0.0, 2.5, 1.0],
                view_proj: view_proj().into(),
            },
        );
        let transform = Uniform::new(&ctx.device, "transform", TransformUniform::new(model(0.0)));

        let sources = ShaderSources::load(shader_dir("two_faces")).await?;
        let program = Program::new(
            &ctx.device,
            ctx.format,
            &sources,
            &ProgramDescriptor {
                label: "two faces",
                vertex_layouts: &[Vertex::desc()],
                bind_group_layouts: &[&texture_layout, camera.layout(), transform.layout()],
                blend: Some(REPLACE),
                depth: Some(DepthState::opaque()),
                cull_mode: None,
            },
        )
        .await?;
        let shape = shapes::two_faces();
        let mesh = Mesh::new(&ctx.device, "two faces", &shape.mesh_data())?;
        Ok(Self {
            program,
            mesh,
            texture_group,
            camera,
            transform,
            angle: 0.0,
        })
    }
}

impl Demo for TwoFaces {
    fn on_update(&mut self, ctx: &GraphicContext, dt: Duration) {
        self.angle = (self.angle + ROTATION_SPEED * dt.as_secs_f32()) % TAU;
        self.transform
            .set(&ctx.queue, TransformUniform::new(model(self.angle)));
    }

    fn on_render(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.program.pipeline);
        pass.set_bind_group(0, &self.texture_group, &[]);
        pass.set_bind_group(1, self.camera.bind_group(), &[]);
        pass.set_bind_group(2, self.transform.bind_group(), &[]);
        pass.draw_mesh(&self.mesh);
    }
}

fn main() {
    let config = GraphicContextConfig::new("Two Faces", 640, 480);
    if let Err(e) = flow::run(config, TwoFaces::new) {
        eprintln!("two_faces failed: {:#}", e);
        std::process::exit(1);
    }
}
