//! Scoped resource acquisition for scene bootstrap
//!
//! Every handle allocated through a [`ResourceRegistry`] is recorded. If the
//! registry is dropped before [`ResourceRegistry::commit`] (a bootstrap step
//! failed, or a panic unwound through it) everything recorded so far is
//! released again, so a failed activation leaves nothing behind.

use crate::error::SceneResult;
use crate::gfx::{
    geometry::GeometryData,
    resources::Material,
    surface::{BufferId, MaterialId, MeshId, RenderSurface, ResourceId},
    vertex::PointVertex,
};

pub struct ResourceRegistry<'s> {
    surface: &'s mut dyn RenderSurface,
    owned: Vec<ResourceId>,
}

impl<'s> ResourceRegistry<'s> {
    pub fn new(surface: &'s mut dyn RenderSurface) -> Self {
        Self {
            surface,
            owned: Vec::new(),
        }
    }

    pub fn mesh(&mut self, geometry: &GeometryData) -> SceneResult<MeshId> {
        let id = self.surface.create_mesh(geometry)?;
        self.owned.push(id.into());
        Ok(id)
    }

    pub fn material(&mut self, material: &Material) -> SceneResult<MaterialId> {
        let id = self.surface.create_material(material)?;
        self.owned.push(id.into());
        Ok(id)
    }

    pub fn point_buffer(&mut self, points: &[PointVertex]) -> SceneResult<BufferId> {
        let id = self.surface.create_point_buffer(points)?;
        self.owned.push(id.into());
        Ok(id)
    }

    /// Number of handles allocated so far
    pub fn len(&self) -> usize {
        self.owned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }

    /// Hands ownership of every recorded handle to the caller
    pub fn commit(mut self) -> Vec<ResourceId> {
        std::mem::take(&mut self.owned)
    }
}

impl Drop for ResourceRegistry<'_> {
    fn drop(&mut self) {
        if self.owned.is_empty() {
            return;
        }

        log::debug!(
            "releasing {} resources of an incomplete bootstrap",
            self.owned.len()
        );
        for resource in self.owned.drain(..).rev() {
            if let Err(e) = self.surface.release(resource) {
                log::warn!("failed to release {resource:?}: {e}");
            }
        }
    }
}
