//! # Codescape Prelude
//!
//! Commonly used types in one import.
//!
//! ```rust
//! use codescape::prelude::*;
//!
//! let mut owner = SceneOwner::new(SceneConfig::default().with_variant(VariantKind::Geometric));
//! owner.activate(HeadlessSurface::new(640, 480)).unwrap();
//! owner.tracker().on_pointer_move(320.0, 240.0);
//! assert!(owner.frame());
//! ```

// Re-export core application types
pub use crate::app::BackdropApp;
pub use crate::config::{CameraConfig, SceneConfig};
pub use crate::error::{SceneError, SceneResult};

// Re-export scene and animation types
pub use crate::animation::{AnimationClock, FrameDriver, StopHandle};
pub use crate::interaction::{InteractionSnapshot, InteractionTracker};
pub use crate::scene::{
    CloudKind, ObjectKind, Population, SceneOwner, SceneVariant, VariantKind,
};

// Re-export rendering surfaces
pub use crate::gfx::{HeadlessSurface, RenderSurface, WgpuSurface};

// Re-export common external dependencies
pub use cgmath::{Vector2, Vector3};
