//! Render pipeline management
//!
//! One pipeline per (draw kind, blend mode) pair, all built from a single WGSL
//! module when the surface is created.

use std::collections::HashMap;
use wgpu::*;

use crate::gfx::{
    resources::{BlendMode, TextureResource},
    vertex::{PointVertex, Vertex3D},
};

/// Primitive families the scene draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawKind {
    Mesh,
    Lines,
    Points,
}

impl DrawKind {
    pub const ALL: [DrawKind; 3] = [DrawKind::Mesh, DrawKind::Lines, DrawKind::Points];

    fn vertex_entry(&self) -> &'static str {
        match self {
            DrawKind::Mesh => "vs_mesh",
            DrawKind::Lines => "vs_line",
            DrawKind::Points => "vs_point",
        }
    }

    fn topology(&self) -> PrimitiveTopology {
        match self {
            DrawKind::Lines => PrimitiveTopology::LineList,
            DrawKind::Mesh | DrawKind::Points => PrimitiveTopology::TriangleList,
        }
    }

    fn vertex_layout(&self) -> VertexBufferLayout<'static> {
        match self {
            DrawKind::Mesh => Vertex3D::desc(),
            DrawKind::Lines => PointVertex::desc(VertexStepMode::Vertex),
            // six generated corners per point instance
            DrawKind::Points => PointVertex::desc(VertexStepMode::Instance),
        }
    }
}

impl BlendMode {
    fn blend_state(&self) -> BlendState {
        match self {
            BlendMode::Alpha => BlendState::ALPHA_BLENDING,
            BlendMode::Additive => BlendState {
                color: BlendComponent {
                    src_factor: BlendFactor::SrcAlpha,
                    dst_factor: BlendFactor::One,
                    operation: BlendOperation::Add,
                },
                alpha: BlendComponent {
                    src_factor: BlendFactor::One,
                    dst_factor: BlendFactor::One,
                    operation: BlendOperation::Add,
                },
            },
        }
    }
}

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub kind: DrawKind,
    pub blend: BlendMode,
    pub depth_write: bool,
}

impl PipelineConfig {
    pub fn new(kind: DrawKind, blend: BlendMode) -> Self {
        Self {
            label: format!("{kind:?} {blend:?} Pipeline"),
            kind,
            blend,
            // translucent particles and lines must not hide each other
            depth_write: kind == DrawKind::Mesh,
        }
    }
}

pub struct PipelineManager {
    pipelines: HashMap<(DrawKind, BlendMode), RenderPipeline>,
}

impl PipelineManager {
    /// Builds every pipeline the scene can request
    ///
    /// # Arguments
    /// * `device` - wgpu device
    /// * `format` - Surface color format
    /// * `bind_group_layouts` - Camera layout (group 0) then per-draw layout (group 1)
    pub fn new(device: &Device, format: TextureFormat, bind_group_layouts: &[&BindGroupLayout]) -> Self {
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Backdrop Shader"),
            source: ShaderSource::Wgsl(include_str!("backdrop.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Backdrop Pipeline Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        let mut pipelines = HashMap::new();
        for kind in DrawKind::ALL {
            for blend in [BlendMode::Alpha, BlendMode::Additive] {
                let config = PipelineConfig::new(kind, blend);
                let pipeline = Self::create_pipeline(device, &shader, &layout, format, &config);
                pipelines.insert((kind, blend), pipeline);
            }
        }

        Self { pipelines }
    }

    pub fn get(&self, kind: DrawKind, blend: BlendMode) -> Option<&RenderPipeline> {
        self.pipelines.get(&(kind, blend))
    }

    fn create_pipeline(
        device: &Device,
        shader: &ShaderModule,
        layout: &PipelineLayout,
        format: TextureFormat,
        config: &PipelineConfig,
    ) -> RenderPipeline {
        device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&config.label),
            layout: Some(layout),
            vertex: VertexState {
                module: shader,
                entry_point: Some(config.kind.vertex_entry()),
                compilation_options: PipelineCompilationOptions::default(),
                buffers: &[config.kind.vertex_layout()],
            },
            primitive: PrimitiveState {
                topology: config.kind.topology(),
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                // panels are translucent, both faces stay visible
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(DepthStencilState {
                format: TextureResource::DEPTH_FORMAT,
                depth_write_enabled: config.depth_write,
                depth_compare: CompareFunction::Less,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState::default(),
            fragment: Some(FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                targets: &[Some(ColorTargetState {
                    format,
                    blend: Some(config.blend.blend_state()),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_meshes_write_depth() {
        assert!(PipelineConfig::new(DrawKind::Mesh, BlendMode::Alpha).depth_write);
        assert!(!PipelineConfig::new(DrawKind::Points, BlendMode::Additive).depth_write);
        assert!(!PipelineConfig::new(DrawKind::Lines, BlendMode::Alpha).depth_write);
    }

    #[test]
    fn test_line_topology() {
        assert_eq!(DrawKind::Lines.topology(), PrimitiveTopology::LineList);
        assert_eq!(DrawKind::Points.topology(), PrimitiveTopology::TriangleList);
    }
}
