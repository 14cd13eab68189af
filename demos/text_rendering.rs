use std::path::Path;

use cgmath::Vector2;
use jonark::{
    context::{GraphicContextConfig, InitContext},
    data_structures::{
        font::{FontAtlasConfig, FontManager},
        handle::Handle,
        mesh::{Mesh, MeshManager},
        texture::{TextureManager, texture_bind_group_layout},
        vertex_array::{VertexArrayObjectManager, VertexAttributeEntry},
    },
    flow::{self, Demo},
    pipelines::{
        basic::{ALPHA_BLENDING, DepthState},
        program::{Program, ProgramDescriptor, ProgramManager, ShaderSources},
    },
    resources::{FONT_DIR, load_binary, shader_dir},
    text::create_text_mesh,
};

const WINDOW_SIZE: u32 = 600;
const ATLAS_DUMP_VAR: &str = "JONARK_DUMP_ATLAS";

struct TextRendering {
    programs: ProgramManager,
    meshes: MeshManager,
    program: Handle<Program>,
    texts: Vec<Handle<Mesh>>,
    atlas_group: wgpu::BindGroup,
    // Owns the atlas texture the bind group samples.
    _textures: TextureManager,
}

impl TextRendering {
    async fn new(ctx: InitContext) -> anyhow::Result<Self> {
        let mut programs = ProgramManager::with_capacity(1)?;
        let mut fonts = FontManager::with_capacity(1)?;
        let mut textures = TextureManager::with_capacity(2)?;
        let mut vertex_arrays = VertexArrayObjectManager::with_capacity(1)?;
        let mut meshes = MeshManager::with_capacity(3)?;

        let font_data = load_binary(Path::new(FONT_DIR).join("arial.ttf")).await?;
        let config = FontAtlasConfig::default();
        let font_handle = fonts.create(&font_data, &config)?;
        let font = fonts.get(font_handle)?;
        if std::env::var_os(ATLAS_DUMP_VAR).is_some() {
            font.save_atlas_png("fontAtlas.png")?;
        }

        let (atlas_width, atlas_height) = font.atlas_size();
        let atlas = textures.create_from_bitmap(
            &ctx.device,
            &ctx.queue,
            font.bitmap(),
            atlas_width,
            atlas_height,
        )?;
        let atlas_layout = texture_bind_group_layout(&ctx.device);
        let atlas_group = textures
            .get(atlas)?
            .bind_group(&ctx.device, &atlas_layout, "font atlas");

        let vao = vertex_arrays.create(&[
            VertexAttributeEntry::float(0, 3, 0, 0),
            VertexAttributeEntry::float(1, 2, 12, 0),
        ])?;
        let vertex_layouts = vertex_arrays.get(vao)?.buffer_layouts();

        let sources = ShaderSources::load(shader_dir("text")).await?;
        let program = programs.create(
            &ctx.device,
            ctx.format,
            &sources,
            &ProgramDescriptor {
                label: "text",
                vertex_layouts: &vertex_layouts,
                bind_group_layouts: &[&atlas_layout],
                blend: Some(ALPHA_BLENDING),
                depth: Some(DepthState::overlay()),
                cull_mode: None,
            },
        )
        .await?;

        let pixel_scale = 2.0 / WINDOW_SIZE as f32;
        let mut texts = Vec::new();
        for (position, text) in [(Vector2::new(0.0, 0.0), "Hola"), (Vector2::new(0.0, 0.5), "XDDDD")] {
            texts.push(create_text_mesh(
                font,
                &mut meshes,
                &ctx.device,
                position,
                text,
                1.0,
                pixel_scale,
                atlas,
            )?);
        }

        Ok(Self {
            programs,
            meshes,
            program,
            texts,
            atlas_group,
            _textures: textures,
        })
    }
}

impl Demo for TextRendering {
    fn on_render(&self, pass: &mut wgpu::RenderPass<'_>) {
        if let Err(e) = self.programs.use_program(pass, self.program) {
            log::error!("{}", e);
            return;
        }
        pass.set_bind_group(0, &self.atlas_group, &[]);
        for text in &self.texts {
            if let Err(e) = self.meshes.draw(pass, *text) {
                log::error!("{}", e);
            }
        }
    }
}

fn main() {
    let config = GraphicContextConfig::new("Jonark", WINDOW_SIZE, WINDOW_SIZE);
    if let Err(e) = flow::run(config, TextRendering::new) {
        eprintln!("text_rendering failed: {:#}", e);
        std::process::exit(1);
    }
}
