use std::path::Path;

use cgmath::{Deg, Matrix4, Vector3};
use instant::Duration;
use jonark::{
    WindowEvent,
    camera::{Camera, CameraController, CameraUniform, Projection},
    context::{GraphicContext, GraphicContextConfig, InitContext},
    data_structures::{
        mesh::Mesh,
        model::{Material, TextureCache, material_bind_group_layout},
        texture::{Texture, TextureOptions},
        vertex::{ModelVertex, VertexLayout},
    },
    flow::{self, Demo},
    pipelines::{
        basic::{DepthState, REPLACE},
        light::{Light, LightUniform},
        program::{Program, ProgramDescriptor, ShaderSources},
        uniform::{TransformUniform, Uniform},
    },
    render::DrawMesh,
    resources::{TEXTURE_DIR, load_texture, shader_dir},
    shapes,
};

const LAMP_SCALE: f32 = 0.25;

struct Lighting {
    objects: Program,
    lamp: Program,
    cube: Mesh,
    plane: Mesh,
    // Keeps the textures referenced by the material alive.
    _textures: TextureCache,
    material: Material,
    camera: Camera,
    projection: Projection,
    controller: CameraController,
    camera_uniform: Uniform<CameraUniform>,
    light: Uniform<LightUniform>,
    cube_transform: Uniform<TransformUniform>,
    plane_transform: Uniform<TransformUniform>,
    lamp_transform: Uniform<TransformUniform>,
}

async fn load_container_texture(
    ctx: &InitContext,
    name: &str,
    srgb: bool,
) -> anyhow::Result<Texture> {
    let options = TextureOptions {
        flip_vertically: true,
        srgb,
        ..Default::default()
    };
    load_texture(Path::new(TEXTURE_DIR).join(name), &ctx.device, &ctx.queue, options).await
}

impl Lighting {
    async fn new(ctx: InitContext) -> anyhow::Result<Self> {
        let (diffuse, specular) = futures::try_join!(
            load_container_texture(&ctx, "container2.png", true),
            load_container_texture(&ctx, "container2_specular.png", false),
        )?;
        let mut textures = TextureCache::new();
        let diffuse = textures.push(diffuse);
        let specular = textures.push(specular);
        let material_layout = material_bind_group_layout(&ctx.device);
        let material = Material::new(
            &ctx.device,
            "container",
            &textures,
            diffuse,
            specular,
            &material_layout,
        );

        let camera = Camera::new((0.0, 0.2, 3.0), Deg(-90.0), Deg(0.0));
        let projection = Projection::new(ctx.width, ctx.height, Deg(45.0), 0.1, 100.0);
        let mut camera_data = CameraUniform::new();
        camera_data.update_view_proj(&camera, &projection);
        let camera_uniform = Uniform::new(&ctx.device, "camera", camera_data);

        let light_source = Light::default();
        let light = Uniform::new(&ctx.device, "light", light_source.to_uniform());
        let cube_transform = Uniform::new(&ctx.device, "cube", TransformUniform::default());
        let plane_transform = Uniform::new(
            &ctx.device,
            "plane",
            TransformUniform::new(Matrix4::from_translation(Vector3::new(0.0, -0.5, 0.0))),
        );
        let lamp_transform = Uniform::new(
            &ctx.device,
            "lamp",
            TransformUniform::new(light_source.lamp_transform(LAMP_SCALE)),
        );

        let (object_sources, lamp_sources) = futures::try_join!(
            ShaderSources::load(shader_dir("lighting")),
            ShaderSources::load(shader_dir("lamp")),
        )?;
        let objects = Program::new(
            &ctx.device,
            ctx.format,
            &object_sources,
            &ProgramDescriptor {
                label: "lit objects",
                vertex_layouts: &[ModelVertex::desc()],
                bind_group_layouts: &[
                    camera_uniform.layout(),
                    light.layout(),
                    &material_layout,
                    cube_transform.layout(),
                ],
                blend: Some(REPLACE),
                depth: Some(DepthState::opaque()),
                cull_mode: Some(wgpu::Face::Back),
            },
        )
        .await?;
        let lamp = Program::new(
            &ctx.device,
            ctx.format,
            &lamp_sources,
            &ProgramDescriptor {
                label: "lamp",
                vertex_layouts: &[ModelVertex::desc()],
                bind_group_layouts: &[camera_uniform.layout(), lamp_transform.layout()],
                blend: Some(REPLACE),
                depth: Some(DepthState::opaque()),
                cull_mode: Some(wgpu::Face::Back),
            },
        )
        .await?;

        let cube = Mesh::new(&ctx.device, "cube", &shapes::cube().mesh_data())?;
        let plane = Mesh::new(&ctx.device, "plane", &shapes::plane().mesh_data())?;

        Ok(Self {
            objects,
            lamp,
            cube,
            plane,
            _textures: textures,
            material,
            camera,
            projection,
            controller: CameraController::new(1.0, 40.0),
            camera_uniform,
            light,
            cube_transform,
            plane_transform,
            lamp_transform,
        })
    }
}

impl Demo for Lighting {
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
        pass.set_pipeline(&self.lamp.pipeline);
        pass.set_bind_group(0, self.camera_uniform.bind_group(), &[]);
        pass.set_bind_group(1, self.lamp_transform.bind_group(), &[]);
        pass.draw_mesh(&self.cube);

        pass.set_pipeline(&self.objects.pipeline);
        pass.set_bind_group(0, self.camera_uniform.bind_group(), &[]);
        pass.set_bind_group(1, self.light.bind_group(), &[]);
        pass.set_bind_group(2, &self.material.bind_group, &[]);
        pass.set_bind_group(3, self.cube_transform.bind_group(), &[]);
        pass.draw_mesh(&self.cube);
        pass.set_bind_group(3, self.plane_transform.bind_group(), &[]);
        pass.draw_mesh(&self.plane);
    }
}

fn main() {
    let config = GraphicContextConfig::new("CameraControl", 800, 600);
    if let Err(e) = flow::run(config, Lighting::new) {
        eprintln!("lighting failed: {:#}", e);
        std::process::exit(1);
    }
}
