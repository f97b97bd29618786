// src/gfx/rendering/mod.rs
//! Rendering surface implementations
//!
//! [`WgpuSurface`] draws into a window through wgpu; [`HeadlessSurface`] keeps
//! everything in memory.

pub mod headless;
pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use headless::HeadlessSurface;
pub use pipeline_manager::{DrawKind, PipelineConfig, PipelineManager};
pub use render_engine::WgpuSurface;
