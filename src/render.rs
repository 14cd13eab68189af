//! Draw helpers on top of [`wgpu::RenderPass`].

use crate::data_structures::{
    handle::{Handle, HandleError, Manager},
    mesh::Mesh,
    model::Model,
};

pub trait DrawMesh {
    /// Bind the mesh buffers to vertex slot 0 and draw all its indices.
    fn draw_mesh(&mut self, mesh: &Mesh);
}

impl DrawMesh for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &Mesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.num_indices, 0, 0..1);
    }
}

pub trait DrawModel {
    /// Draw every mesh of `model`, binding its material at `material_group`.
    fn draw_model(&mut self, model: &Model, material_group: u32);
}

impl DrawModel for wgpu::RenderPass<'_> {
    fn draw_model(&mut self, model: &Model, material_group: u32) {
        for model_mesh in &model.meshes {
            if let Some(material) = model.materials.get(model_mesh.material) {
                self.set_bind_group(material_group, &material.bind_group, &[]);
            }
            self.draw_mesh(&model_mesh.mesh);
        }
    }
}

impl Manager<Mesh> {
    /// Draw the mesh behind `handle` with whatever pipeline is bound.
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        handle: Handle<Mesh>,
    ) -> Result<(), HandleError> {
        let mesh = self.get(handle)?;
        pass.draw_mesh(mesh);
        Ok(())
    }
}
