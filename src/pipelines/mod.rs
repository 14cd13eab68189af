//! Render pipelines and the data bound to them.
//!
//! - `basic` builds render pipelines from shader modules
//! - `program` compiles validated WGSL into managed programs
//! - `uniform` wraps uniform buffers with their bind groups
//! - `light` describes the Phong light uniform and the lamp placement

pub mod basic;
pub mod light;
pub mod program;
pub mod uniform;
