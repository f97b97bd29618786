//! In-memory rendering surface
//!
//! Keeps every resource on the CPU and records what it was asked to draw.
//! Useful when no GPU is present (the scene still animates, nothing is shown)
//! and for inspecting frames in tests.

use std::collections::HashMap;

use crate::error::{SceneError, SceneResult};
use crate::gfx::{
    geometry::GeometryData,
    resources::Material,
    surface::{BufferId, FrameView, MaterialId, MeshId, RenderSurface, ResourceId},
    vertex::PointVertex,
};

#[derive(Debug, Clone)]
enum HeadlessResource {
    Mesh { triangles: usize },
    Material(Material),
    Buffer(Vec<PointVertex>),
}

pub struct HeadlessSurface {
    width: u32,
    height: u32,
    next_id: u32,
    resources: HashMap<u32, HeadlessResource>,
    allocation_limit: Option<usize>,
    allocations: usize,
    releases: usize,
    frames_rendered: u64,
    last_frame: Option<FrameView>,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            next_id: 1,
            resources: HashMap::new(),
            allocation_limit: None,
            allocations: 0,
            releases: 0,
            frames_rendered: 0,
            last_frame: None,
        }
    }

    /// Refuses every allocation past the first `limit` ones
    pub fn with_allocation_limit(mut self, limit: usize) -> Self {
        self.allocation_limit = Some(limit);
        self
    }

    /// Resources allocated and not yet released
    pub fn live_resources(&self) -> usize {
        self.resources.len()
    }

    pub fn total_allocations(&self) -> usize {
        self.allocations
    }

    pub fn total_releases(&self) -> usize {
        self.releases
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn last_frame(&self) -> Option<&FrameView> {
        self.last_frame.as_ref()
    }

    /// Current contents of a point buffer
    pub fn points(&self, buffer: BufferId) -> Option<&[PointVertex]> {
        match self.resources.get(&buffer.0) {
            Some(HeadlessResource::Buffer(points)) => Some(points),
            _ => None,
        }
    }

    pub fn material(&self, material: MaterialId) -> Option<&Material> {
        match self.resources.get(&material.0) {
            Some(HeadlessResource::Material(material)) => Some(material),
            _ => None,
        }
    }

    pub fn mesh_triangles(&self, mesh: MeshId) -> Option<usize> {
        match self.resources.get(&mesh.0) {
            Some(HeadlessResource::Mesh { triangles }) => Some(*triangles),
            _ => None,
        }
    }

    fn allocate(&mut self, kind: &'static str, resource: HeadlessResource) -> SceneResult<u32> {
        if let Some(limit) = self.allocation_limit {
            if self.allocations >= limit {
                return Err(SceneError::exhausted(
                    kind,
                    format!("allocation limit of {limit} reached"),
                ));
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.allocations += 1;
        self.resources.insert(id, resource);
        Ok(id)
    }
}

impl RenderSurface for HeadlessSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn create_mesh(&mut self, geometry: &GeometryData) -> SceneResult<MeshId> {
        let triangles = geometry.triangle_count();
        self.allocate("mesh", HeadlessResource::Mesh { triangles })
            .map(MeshId)
    }

    fn create_material(&mut self, material: &Material) -> SceneResult<MaterialId> {
        self.allocate("material", HeadlessResource::Material(material.clone()))
            .map(MaterialId)
    }

    fn create_point_buffer(&mut self, points: &[PointVertex]) -> SceneResult<BufferId> {
        self.allocate("point buffer", HeadlessResource::Buffer(points.to_vec()))
            .map(BufferId)
    }

    fn write_points(&mut self, buffer: BufferId, points: &[PointVertex]) -> SceneResult<()> {
        match self.resources.get_mut(&buffer.0) {
            Some(HeadlessResource::Buffer(stored)) if stored.len() == points.len() => {
                stored.copy_from_slice(points);
                Ok(())
            }
            Some(HeadlessResource::Buffer(stored)) => Err(SceneError::Surface(format!(
                "point buffer #{} holds {} points, got {}",
                buffer.0,
                stored.len(),
                points.len()
            ))),
            _ => Err(SceneError::UnknownResource(buffer.0)),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn render(&mut self, frame: &FrameView) -> SceneResult<()> {
        self.frames_rendered += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn release(&mut self, resource: ResourceId) -> SceneResult<()> {
        match self.resources.remove(&resource.raw()) {
            Some(_) => {
                self.releases += 1;
                Ok(())
            }
            None => Err(SceneError::UnknownResource(resource.raw())),
        }
    }
}
