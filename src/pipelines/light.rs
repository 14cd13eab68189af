//! Phong lighting uniforms.

use cgmath::{Matrix4, Vector3};

/// A point light with separate ambient, diffuse and specular intensities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.3, 0.9, 0.8),
            ambient: Vector3::new(0.2, 0.2, 0.2),
            diffuse: Vector3::new(0.5, 0.5, 0.5),
            specular: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Light {
    pub fn to_uniform(&self) -> LightUniform {
        LightUniform {
            position: self.position.into(),
            _padding: 0,
            ambient: self.ambient.into(),
            _padding2: 0,
            diffuse: self.diffuse.into(),
            _padding3: 0,
            specular: self.specular.into(),
            _padding4: 0,
        }
    }

    /// Model matrix of the small cube drawn where the light is.
    pub fn lamp_transform(&self, scale: f32) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * Matrix4::from_scale(scale)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
    pub ambient: [f32; 3],
    _padding2: u32,
    pub diffuse: [f32; 3],
    _padding3: u32,
    pub specular: [f32; 3],
    _padding4: u32,
}

