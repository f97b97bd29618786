//! # Graphics Module
//!
//! Everything the animated scene needs from a graphics stack, kept behind the
//! [`RenderSurface`] capability so the animation itself never depends on a GPU.
//!
//! ## Architecture Overview
//!
//! - **Camera** ([`camera`]) - Perspective camera with an idle drift offset
//! - **Geometry** ([`geometry`]) - Procedural boxes, spheres and tori
//! - **Resources** ([`resources`]) - Materials and depth buffers
//! - **Surface** ([`surface`]) - The capability trait and resource handles
//! - **Rendering** ([`rendering`]) - wgpu and headless surface implementations
//!
//! ## Usage
//!
//! ```no_run
//! use codescape::gfx::{HeadlessSurface, RenderSurface};
//!
//! let surface = HeadlessSurface::new(800, 600);
//! assert_eq!(surface.size(), (800, 600));
//! ```

pub mod camera;
pub mod color;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod surface;
pub mod vertex;

// Re-export commonly used types
pub use camera::DriftCamera;
pub use rendering::{HeadlessSurface, WgpuSurface};
pub use surface::{BufferId, DrawCommand, FrameView, MaterialId, MeshId, RenderSurface, ResourceId};
