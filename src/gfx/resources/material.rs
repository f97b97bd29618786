//! Material definitions
//!
//! Unlit, flat-colored materials. A material is registered once with the
//! surface and shared by every object that references its `MaterialId`.

use crate::gfx::color::rgba_from_hex;

/// How a material's fragments are combined with what is already drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Standard "over" compositing using the fragment alpha
    Alpha,
    /// Fragment color scaled by alpha and added to the target
    Additive,
}

/// GPU uniform data for a single draw
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x: point size in world units, y: 1.0 when vertex colors are used
    pub params: [f32; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// RGBA base color; alpha is the material opacity
    pub base_color: [f32; 4],
    pub blend: BlendMode,
    /// Side length of a particle quad, ignored by meshes and lines
    pub point_size: f32,
    /// Take the color from the vertex instead of `base_color`
    pub vertex_colors: bool,
}

impl Material {
    pub fn new(name: &str, base_color: [f32; 4]) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            blend: BlendMode::Alpha,
            point_size: 1.0,
            vertex_colors: false,
        }
    }

    /// Translucent flat color from a `0xRRGGBB` value
    pub fn from_hex(name: &str, hex: u32, opacity: f32) -> Self {
        Self::new(name, rgba_from_hex(hex, opacity))
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    pub fn with_vertex_colors(mut self) -> Self {
        self.vertex_colors = true;
        self
    }

    /// Packs the material together with an object transform for upload
    pub fn uniform(&self, model: [[f32; 4]; 4]) -> DrawUniform {
        DrawUniform {
            model,
            color: self.base_color,
            params: [
                self.point_size,
                if self.vertex_colors { 1.0 } else { 0.0 },
                0.0,
                0.0,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_packs_material_flags() {
        let material = Material::from_hex("stream", 0xffffff, 0.8)
            .with_blend(BlendMode::Additive)
            .with_point_size(0.05)
            .with_vertex_colors();
        let uniform = material.uniform([[0.0; 4]; 4]);

        assert_eq!(uniform.color, [1.0, 1.0, 1.0, 0.8]);
        assert_eq!(uniform.params[0], 0.05);
        assert_eq!(uniform.params[1], 1.0);
        assert_eq!(std::mem::size_of::<DrawUniform>(), 96);
    }
}
