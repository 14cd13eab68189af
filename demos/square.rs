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

struct Square {
    program: Program,
    mesh: Mesh,
}

impl Square {
    async fn new(ctx: InitContext) -> anyhow::Result<Self> {
        let sources = ShaderSources::load(shader_dir("square")).await?;
        let program = Program::new(
            &ctx.device,
            ctx.format,
            &sources,
            &ProgramDescriptor {
                label: "square",
                vertex_layouts: &[PlainVertex::desc()],
                bind_group_layouts: &[],
                blend: Some(REPLACE),
                depth: None,
                cull_mode: None,
            },
        )
        .await?;
        let shape = shapes::square();
        let mesh = Mesh::new(&ctx.device, "square", &shape.mesh_data())?;
        Ok(Self { program, mesh })
    }
}

impl Demo for Square {
    fn on_render(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.program.pipeline);
        pass.draw_mesh(&self.mesh);
    }
}

fn main() {
    let config = GraphicContextConfig {
        depth: false,
        ..GraphicContextConfig::new("Square", 640, 480)
    };
    if let Err(e) = flow::run(config, Square::new) {
        eprintln!("square failed: {:#}", e);
        std::process::exit(1);
    }
}
