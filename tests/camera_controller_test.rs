mod common;

use cgmath::{Deg, InnerSpace, Point3, Rad, Vector4};
use common::test_utils::assert_close;
use instant::Duration;
use jonark::camera::{Camera, CameraController, CameraUniform, Projection};
use winit::{event::ElementState, keyboard::KeyCode};

fn start_camera() -> Camera {
    Camera::new((0.0, 0.2, 3.0), Deg(-90.0), Deg(0.0))
}

#[test]
fn should_look_down_negative_z_at_start() {
    let front = start_camera().front();
    assert_close(front.x, 0.0);
    assert_close(front.y, 0.0);
    assert_close(front.z, -1.0);
}

#[test]
fn should_move_forward_at_configured_speed() {
    let mut camera = start_camera();
    let mut controller = CameraController::new(1.0, 40.0);
    assert!(controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed));

    controller.update(&mut camera, Duration::from_millis(500));
    assert_close(camera.position.z, 2.5);
    assert_close(camera.position.y, 0.2);

    controller.process_keyboard(KeyCode::KeyW, ElementState::Released);
    controller.update(&mut camera, Duration::from_secs(1));
    assert_close(camera.position.z, 2.5);
}

#[test]
fn should_normalize_diagonal_movement() {
    let mut camera = start_camera();
    let mut controller = CameraController::new(2.0, 40.0);
    controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
    controller.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
    controller.process_keyboard(KeyCode::Space, ElementState::Pressed);

    let before = camera.position;
    controller.update(&mut camera, Duration::from_secs(1));
    assert_close((camera.position - before).magnitude(), 2.0);
    assert!(camera.position.x > 0.0);
    assert!(camera.position.y > before.y);
}

#[test]
fn should_cancel_opposite_keys() {
    let mut camera = start_camera();
    let mut controller = CameraController::new(1.0, 40.0);
    controller.process_keyboard(KeyCode::KeyA, ElementState::Pressed);
    controller.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
    controller.update(&mut camera, Duration::from_secs(1));
    assert_eq!(camera.position, Point3::new(0.0, 0.2, 3.0));
}

#[test]
fn should_turn_with_arrow_keys() {
    let mut camera = start_camera();
    let mut controller = CameraController::new(1.0, 40.0);
    controller.process_keyboard(KeyCode::ArrowRight, ElementState::Pressed);
    controller.update(&mut camera, Duration::from_millis(250));

    let yaw: Deg<f32> = camera.yaw.into();
    assert!((yaw.0 + 80.0).abs() < 1e-3, "yaw is {:?}", yaw);
}

#[test]
fn should_clamp_pitch() {
    let mut camera = start_camera();
    let mut controller = CameraController::new(1.0, 40.0);
    controller.process_keyboard(KeyCode::ArrowUp, ElementState::Pressed);
    controller.update(&mut camera, Duration::from_secs(10));

    let pitch: Deg<f32> = camera.pitch.into();
    assert!(pitch.0 < 90.0);
    assert!(pitch.0 > 89.0);

    controller.process_keyboard(KeyCode::ArrowUp, ElementState::Released);
    controller.process_keyboard(KeyCode::ArrowDown, ElementState::Pressed);
    controller.update(&mut camera, Duration::from_secs(10));
    assert!(camera.pitch > Rad(-std::f32::consts::FRAC_PI_2));
}

#[test]
fn should_ignore_unrelated_keys() {
    let mut controller = CameraController::new(1.0, 40.0);
    assert!(!controller.process_keyboard(KeyCode::KeyQ, ElementState::Pressed));
}

#[test]
fn should_keep_aspect_on_zero_height() {
    let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    assert_close(projection.aspect(), 800.0 / 600.0);
    projection.resize(600, 0);
    assert_close(projection.aspect(), 800.0 / 600.0);
    projection.resize(600, 600);
    assert_close(projection.aspect(), 1.0);
}

#[test]
fn should_project_points_in_front_into_clip_space() {
    let camera = start_camera();
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let mut uniform = CameraUniform::new();
    uniform.update_view_proj(&camera, &projection);

    assert_eq!(uniform.view_position, [0.0, 0.2, 3.0, 1.0]);

    let view_proj = cgmath::Matrix4::from(uniform.view_proj);
    let clip = view_proj * Vector4::new(0.0, 0.2, 0.0, 1.0);
    let ndc_z = clip.z / clip.w;
    assert_close(clip.x / clip.w, 0.0);
    assert_close(clip.y / clip.w, 0.0);
    assert!(ndc_z > 0.0 && ndc_z < 1.0);
}
