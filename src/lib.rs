//! jonark
//!
//! A small collection of rendering demos built on `wgpu` and `winit`, from a
//! single clear screen up to lit models and bitmap-font text. The demos share
//! handle-based managers for fonts, meshes, textures, programs and vertex
//! array layouts.
//!
//! High-level modules
//! - `camera`: fly camera, projection, controller and uniforms
//! - `capture`: offscreen rendering read back into images
//! - `context`: the window-bound GPU context
//! - `data_structures`: handle managers and GPU resources
//! - `flow`: demo trait and event loop
//! - `pipelines`: programs, pipelines and uniforms
//! - `render`: draw helpers for meshes and models
//! - `resources`: file access and model/texture loading
//! - `shapes`: static geometry used by the demos
//! - `text`: glyph quad layout for baked fonts
//!

pub mod camera;
pub mod capture;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod shapes;
pub mod text;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use wgpu;
pub use winit;
pub use winit::event::WindowEvent;
