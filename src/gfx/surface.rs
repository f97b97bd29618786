//! # Rendering surface capability
//!
//! The scene never talks to a graphics API directly. Everything it needs from
//! the host (allocating meshes, materials and particle buffers, resizing, and
//! drawing a frame) goes through [`RenderSurface`].
//!
//! Resources are identified by typed handles. The surface owns the actual
//! allocations; whoever created a handle is responsible for passing it back to
//! [`RenderSurface::release`] exactly once.

use cgmath::Matrix4;

use crate::error::SceneResult;
use crate::gfx::{
    camera::CameraUniform, geometry::GeometryData, resources::Material, vertex::PointVertex,
};

macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl From<$name> for ResourceId {
            fn from(id: $name) -> Self {
                ResourceId::$name(id)
            }
        }
    };
}

resource_id!(
    /// Triangle mesh uploaded from [`GeometryData`]
    MeshId
);
resource_id!(
    /// Registered [`Material`]
    MaterialId
);
resource_id!(
    /// Vertex buffer of [`PointVertex`], drawn as particles or as a line list
    BufferId
);

/// Any handle a surface can release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceId {
    MeshId(MeshId),
    MaterialId(MaterialId),
    BufferId(BufferId),
}

impl ResourceId {
    pub fn raw(&self) -> u32 {
        match self {
            ResourceId::MeshId(id) => id.0,
            ResourceId::MaterialId(id) => id.0,
            ResourceId::BufferId(id) => id.0,
        }
    }
}

/// One draw issued for a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Triangle mesh with an object transform
    Mesh {
        mesh: MeshId,
        material: MaterialId,
        model: Matrix4<f32>,
    },
    /// Point buffer drawn as camera-facing quads
    Points {
        buffer: BufferId,
        material: MaterialId,
        model: Matrix4<f32>,
    },
    /// Point buffer drawn as a line list (pairs of vertices)
    Lines {
        buffer: BufferId,
        material: MaterialId,
    },
}

/// Everything a surface needs to draw one frame
#[derive(Debug, Clone)]
pub struct FrameView {
    pub camera: CameraUniform,
    /// Aspect ratio the projection was built with
    pub aspect: f32,
    pub draws: Vec<DrawCommand>,
}

/// Graphics capability the scene draws upon
pub trait RenderSurface {
    /// Current drawable size in pixels
    fn size(&self) -> (u32, u32);

    fn create_mesh(&mut self, geometry: &GeometryData) -> SceneResult<MeshId>;

    fn create_material(&mut self, material: &Material) -> SceneResult<MaterialId>;

    /// Allocates a vertex buffer that can be rewritten with [`Self::write_points`]
    fn create_point_buffer(&mut self, points: &[PointVertex]) -> SceneResult<BufferId>;

    /// Overwrites a buffer created by [`Self::create_point_buffer`]; the point
    /// count must not change
    fn write_points(&mut self, buffer: BufferId, points: &[PointVertex]) -> SceneResult<()>;

    /// Reconfigures the drawable to a new pixel size
    fn resize(&mut self, width: u32, height: u32);

    fn render(&mut self, frame: &FrameView) -> SceneResult<()>;

    fn release(&mut self, resource: ResourceId) -> SceneResult<()>;
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    fn create_mesh(&mut self, geometry: &GeometryData) -> SceneResult<MeshId> {
        (**self).create_mesh(geometry)
    }

    fn create_material(&mut self, material: &Material) -> SceneResult<MaterialId> {
        (**self).create_material(material)
    }

    fn create_point_buffer(&mut self, points: &[PointVertex]) -> SceneResult<BufferId> {
        (**self).create_point_buffer(points)
    }

    fn write_points(&mut self, buffer: BufferId, points: &[PointVertex]) -> SceneResult<()> {
        (**self).write_points(buffer, points)
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height)
    }

    fn render(&mut self, frame: &FrameView) -> SceneResult<()> {
        (**self).render(frame)
    }

    fn release(&mut self, resource: ResourceId) -> SceneResult<()> {
        (**self).release(resource)
    }
}
