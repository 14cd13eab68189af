//! Engine data structures: handle managers and the GPU resources they own.
//!
//! - `handle` is the generic slot manager behind every resource manager
//! - `vertex` and `vertex_array` describe vertex formats and buffer layouts
//! - `mesh` holds vertex and index buffers
//! - `texture` wraps GPU textures and their samplers
//! - `font` bakes fonts into glyph atlases
//! - `model` groups meshes and materials loaded from files

pub mod font;
pub mod handle;
pub mod mesh;
pub mod model;
pub mod texture;
pub mod vertex;
pub mod vertex_array;
