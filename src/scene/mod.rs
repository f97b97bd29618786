//! # Animated scene
//!
//! The object model, the two scene variants and the owner that ties a
//! population to a rendering surface.
//!
//! - [`objects`] - animated objects, edges and particle clouds
//! - [`variant`] - the [`SceneVariant`] trait and variant selection
//! - [`network`] / [`geometric`] - the two built-in themes
//! - [`registry`] - scoped resource allocation during bootstrap
//! - [`owner`] - [`SceneOwner`], activation and teardown

pub mod geometric;
pub mod network;
pub mod objects;
pub mod owner;
pub mod registry;
pub mod variant;

pub use objects::{AnimatedObject, CloudKind, Edge, ObjectKind, ParticleCloud, Population};
pub use owner::{SceneOwner, SceneState};
pub use registry::ResourceRegistry;
pub use variant::{FrameContext, SceneVariant, VariantKind};
