use jonark::{
    context::{GraphicContextConfig, InitContext},
    data_structures::{
        mesh::Mesh,
        vertex::{PlainVertex, VertexLayout},
    },
    flow::{self, Demo},
    pipelines::{
        basic::REPLACE,
        program::{Program, ProgramDescriptor, ShaderSources},
    },
    render::DrawMesh,
    resources::shader_dir,
    shapes,
};

struct Triangle {
    program: Program,
    mesh: Mesh,
}

impl Triangle {
    async fn new(ctx: InitContext) -> anyhow::Result<Self> {
        let sources = ShaderSources::load(shader_dir("triangle")).await?;
        let program = Program::new(
            &ctx.device,
            ctx.format,
            &sources,
            &ProgramDescriptor {
                label: "triangle",
                vertex_layouts: &[PlainVertex::desc()],
                bind_group_layouts: &[],
                blend: Some(REPLACE),
                depth: None,
                cull_mode: None,
            },
        )
        .await?;
        let shape = shapes::triangle();
        let mesh = Mesh::new(&ctx.device, "triangle", &shape.mesh_data())?;
        Ok(Self { program, mesh })
    }
}

impl Demo for Triangle {
    fn on_render(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.program.pipeline);
        pass.draw_mesh(&self.mesh);
    }
}

fn main() {
    let config = GraphicContextConfig {
        depth: false,
        ..GraphicContextConfig::new("Triangle", 640, 480)
    };
    if let Err(e) = flow::run(config, Triangle::new) {
        eprintln!("triangle failed: {:#}", e);
        std::process::exit(1);
    }
}
