//! Fly camera: position and yaw/pitch orientation, a perspective projection
//! and a keyboard controller.
//!
//! The controller keeps the state of every key it cares about so that holding
//! a key moves the camera smoothly, independent of key repeat.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, Zero, perspective};
use instant::Duration;
use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Pitch stays just short of straight up/down so the view basis never degenerates.
const MAX_PITCH: Rad<f32> = Rad(89.9 * std::f32::consts::PI / 180.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Unit vector the camera looks along.
    pub fn front(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.front(), Vector3::unit_y())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyboard fly controller.
///
/// W/S move along the view direction, A/D strafe, Space and left Control move
/// along world up. The arrow keys turn the camera.
#[derive(Debug, Clone, Default)]
pub struct CameraController {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    turn_left: bool,
    turn_right: bool,
    turn_up: bool,
    turn_down: bool,
    speed: f32,
    rotation_speed: f32,
}

impl CameraController {
    /// `speed` is in units per second, `rotation_speed` in degrees per second.
    pub fn new(speed: f32, rotation_speed: f32) -> Self {
        Self {
            speed,
            rotation_speed,
            ..Default::default()
        }
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => self.process_keyboard(*key, *state),
            _ => false,
        }
    }

    /// Track a key press or release. Returns whether the key is used by the camera.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let pressed = state == ElementState::Pressed;
        let flag = match key {
            KeyCode::KeyW => &mut self.forward,
            KeyCode::KeyS => &mut self.backward,
            KeyCode::KeyA => &mut self.left,
            KeyCode::KeyD => &mut self.right,
            KeyCode::Space => &mut self.up,
            KeyCode::ControlLeft => &mut self.down,
            KeyCode::ArrowLeft => &mut self.turn_left,
            KeyCode::ArrowRight => &mut self.turn_right,
            KeyCode::ArrowUp => &mut self.turn_up,
            KeyCode::ArrowDown => &mut self.turn_down,
            _ => return false,
        };
        *flag = pressed;
        true
    }

    pub fn update(&self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();
        let front = camera.front();
        let world_up = Vector3::unit_y();
        let right = front.cross(world_up).normalize();

        let mut direction = Vector3::zero();
        if self.forward {
            direction += front;
        }
        if self.backward {
            direction -= front;
        }
        if self.right {
            direction += right;
        }
        if self.left {
            direction -= right;
        }
        if self.up {
            direction += world_up;
        }
        if self.down {
            direction -= world_up;
        }
        if direction.magnitude2() > 0.0 {
            camera.position += direction.normalize() * self.speed * dt;
        }

        let step = Rad::from(cgmath::Deg(self.rotation_speed * dt));
        if self.turn_right {
            camera.yaw += step;
        }
        if self.turn_left {
            camera.yaw -= step;
        }
        if self.turn_up {
            camera.pitch += step;
        }
        if self.turn_down {
            camera.pitch -= step;
        }
        if camera.pitch > MAX_PITCH {
            camera.pitch = MAX_PITCH;
        } else if camera.pitch < -MAX_PITCH {
            camera.pitch = -MAX_PITCH;
        }
    }
}
