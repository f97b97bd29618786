//! # Procedural Geometry Generation
//!
//! Functions generating the primitive shapes the scene is built from. Nothing
//! is loaded from disk: every mesh is produced at start-up.
//!
//! ## Supported Primitives
//!
//! - **Box**: code panels and cubes
//! - **Sphere**: network nodes
//! - **Torus**: rings of the geometric variant
//!
//! ## Usage
//!
//! ```rust
//! use codescape::gfx::geometry::{generate_box, generate_sphere};
//!
//! let panel = generate_box(0.8, 0.8, 0.1);
//! let node = generate_sphere(0.15, 8, 8);
//! assert_eq!(panel.triangle_count(), 12);
//! assert!(node.vertex_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleave positions and normals into the renderer's vertex format
    pub fn to_scene_format(&self) -> (Vec<crate::gfx::vertex::Vertex3D>, Vec<u32>) {
        use crate::gfx::vertex::Vertex3D;

        let vertices: Vec<Vertex3D> = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
