use cgmath::Matrix4;
use jonark::{
    context::{GraphicContextConfig, InitContext},
    data_structures::{
        mesh::Mesh,
        texture::{TextureOptions, texture_bind_group_layout},
        vertex::{TexturedVertex2, VertexLayout},
    },
    flow::{self, Demo},
    pipelines::{
        basic::ALPHA_BLENDING,
        program::{Program, ProgramDescriptor, ShaderSources},
        uniform::{TransformUniform, Uniform},
    },
    render::DrawMesh,
    resources::{TEXTURE_DIR, load_texture, shader_dir},
    shapes,
};

const SCALE: f32 = 0.5;

struct Textures {
    program: Program,
    mesh: Mesh,
    texture_group: wgpu::BindGroup,
    transform: Uniform<TransformUniform>,
}

impl Textures {
    async fn new(ctx: InitContext) -> anyhow::Result<Self> {
        let options = TextureOptions {
            flip_vertically: true,
            ..Default::default()
        };
        let path = std::path::Path::new(TEXTURE_DIR).join("Momoi.png");
        let texture = load_texture(&path, &ctx.device, &ctx.queue, options).await?;
        let texture_layout = texture_bind_group_layout(&ctx.device);
        let texture_group = texture.bind_group(&ctx.device, &texture_layout, "Momoi");

        let transform = Uniform::new(
            &ctx.device,
            "transform",
            TransformUniform::new(Matrix4::from_scale(SCALE)),
        );

        let sources = ShaderSources::load(shader_dir("textures")).await?;
        let program = Program::new(
            &ctx.device,
            ctx.format,
            &sources,
            &ProgramDescriptor {
                label: "textures",
                vertex_layouts: &[TexturedVertex2::desc()],
                bind_group_layouts: &[&texture_layout, transform.layout()],
                blend: Some(ALPHA_BLENDING),
                depth: None,
                cull_mode: None,
            },
        )
        .await?;
        let shape = shapes::textured_quad();
        let mesh = Mesh::new(&ctx.device, "quad", &shape.mesh_data())?;
        Ok(Self {
            program,
            mesh,
            texture_group,
            transform,
        })
    }
}

impl Demo for Textures {
    fn on_render(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.program.pipeline);
        pass.set_bind_group(0, &self.texture_group, &[]);
        pass.set_bind_group(1, self.transform.bind_group(), &[]);
        pass.draw_mesh(&self.mesh);
    }
}

fn main() {
    let config = GraphicContextConfig {
        depth: false,
        ..GraphicContextConfig::new("Textures", 640, 480)
    };
    if let Err(e) = flow::run(config, Textures::new) {
        eprintln!("textures failed: {:#}", e);
        std::process::exit(1);
    }
}
