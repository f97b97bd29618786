// src/lib.rs
//! Codescape
//!
//! A procedural animated background: floating code panels, pulsing network
//! nodes and falling particle layers, reacting to the pointer and drawn every
//! display frame with wgpu.

pub mod animation;
pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod interaction;
pub mod prelude;
pub mod scene;

// Re-export main types for convenience
pub use app::BackdropApp;
pub use config::{CameraConfig, SceneConfig};
pub use error::{SceneError, SceneResult};
pub use interaction::InteractionTracker;
pub use scene::{SceneOwner, VariantKind};

/// Creates a window host showing the stock network scene
pub fn default() -> anyhow::Result<BackdropApp> {
    BackdropApp::new(SceneConfig::default())
}
