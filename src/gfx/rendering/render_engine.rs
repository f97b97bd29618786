//! WGPU-based rendering surface
//!
//! Implements [`RenderSurface`] on top of a wgpu surface: device and swap chain
//! setup, resource allocation with out-of-memory detection, and the single
//! render pass drawing meshes, edges and particle clouds.

use std::collections::HashMap;

use cgmath::{Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::error::{SceneError, SceneResult};
use crate::gfx::{
    camera::CameraUniform,
    geometry::GeometryData,
    resources::{DrawUniform, Material, TextureResource},
    surface::{BufferId, DrawCommand, FrameView, MaterialId, MeshId, RenderSurface, ResourceId},
    vertex::PointVertex,
};

use super::pipeline_manager::{DrawKind, PipelineManager};

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuPointBuffer {
    buffer: wgpu::Buffer,
    count: u32,
}

/// Per-draw uniform buffer, reused across frames
struct DrawSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// A draw with every handle looked up
struct ResolvedDraw<'a> {
    kind: DrawKind,
    material: &'a Material,
    model: Matrix4<f32>,
    source: DrawSource<'a>,
}

enum DrawSource<'a> {
    Mesh(&'a GpuMesh),
    Points(&'a GpuPointBuffer),
}

/// Rendering surface bound to a window (or any other wgpu surface target)
///
/// Owns the device, the swap chain and every buffer created through it.
pub struct WgpuSurface {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draw_slots: Vec<DrawSlot>,
    next_id: u32,
    meshes: HashMap<MeshId, GpuMesh>,
    materials: HashMap<MaterialId, Material>,
    buffers: HashMap<BufferId, GpuPointBuffer>,
}

impl WgpuSurface {
    /// Creates a surface for the given target
    ///
    /// # Arguments
    /// * `target` - Window (or other surface target) to draw into
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    ///
    /// # Errors
    /// [`SceneError::CapabilityUnavailable`] when no adapter, device or
    /// compatible surface format exists. Callers should skip the effect.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> SceneResult<WgpuSurface> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(target)
            .map_err(|e| SceneError::CapabilityUnavailable(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| SceneError::CapabilityUnavailable(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Backdrop Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| SceneError::CapabilityUnavailable(e.to_string()))?;

        device.on_uncaptured_error(Box::new(|error: wgpu::Error| {
            log::error!("uncaptured wgpu error: {error}");
        }));

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| {
                SceneError::CapabilityUnavailable("surface reports no formats".to_string())
            })?;

        // transparent clear color only composites over the page with a
        // non-opaque alpha mode
        let alpha_mode = [
            wgpu::CompositeAlphaMode::PostMultiplied,
            wgpu::CompositeAlphaMode::PreMultiplied,
        ]
        .into_iter()
        .find(|mode| surface_capabilities.alpha_modes.contains(mode))
        .or_else(|| surface_capabilities.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            // one frame per display refresh
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "Backdrop Depth Texture");

        let camera_layout = Self::uniform_layout(&device, "Camera Bind Group Layout");
        let draw_layout = Self::uniform_layout(&device, "Draw Bind Group Layout");

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
            contents: bytemuck::bytes_of(&CameraUniform::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_manager =
            PipelineManager::new(&device, format, &[&camera_layout, &draw_layout]);

        log::info!(
            "wgpu surface ready: {} ({:?}), {}x{} {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            config.width,
            config.height,
            format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            pipeline_manager,
            camera_buffer,
            camera_bind_group,
            draw_layout,
            draw_slots: Vec::new(),
            next_id: 1,
            meshes: HashMap::new(),
            materials: HashMap::new(),
            buffers: HashMap::new(),
        })
    }

    fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Runs `create` inside an out-of-memory error scope
    fn checked<T>(
        &self,
        resource: &'static str,
        create: impl FnOnce(&wgpu::Device) -> T,
    ) -> SceneResult<T> {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let value = create(&self.device);
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(error) => Err(SceneError::exhausted(resource, error.to_string())),
            None => Ok(value),
        }
    }

    fn ensure_draw_slots(&mut self, count: usize) {
        while self.draw_slots.len() < count {
            let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Draw Uniform Buffer"),
                size: std::mem::size_of::<DrawUniform>() as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Draw Bind Group"),
                layout: &self.draw_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.draw_slots.push(DrawSlot { buffer, bind_group });
        }
    }

    fn material(&self, id: MaterialId) -> SceneResult<&Material> {
        self.materials
            .get(&id)
            .ok_or(SceneError::UnknownResource(id.0))
    }

    fn point_buffer(&self, id: BufferId) -> SceneResult<&GpuPointBuffer> {
        self.buffers
            .get(&id)
            .ok_or(SceneError::UnknownResource(id.0))
    }

    fn resolve<'a>(&'a self, draw: &DrawCommand) -> SceneResult<ResolvedDraw<'a>> {
        Ok(match *draw {
            DrawCommand::Mesh {
                mesh,
                material,
                model,
            } => ResolvedDraw {
                kind: DrawKind::Mesh,
                material: self.material(material)?,
                model,
                source: DrawSource::Mesh(
                    self.meshes
                        .get(&mesh)
                        .ok_or(SceneError::UnknownResource(mesh.0))?,
                ),
            },
            DrawCommand::Points {
                buffer,
                material,
                model,
            } => ResolvedDraw {
                kind: DrawKind::Points,
                material: self.material(material)?,
                model,
                source: DrawSource::Points(self.point_buffer(buffer)?),
            },
            DrawCommand::Lines { buffer, material } => ResolvedDraw {
                kind: DrawKind::Lines,
                material: self.material(material)?,
                model: Matrix4::identity(),
                source: DrawSource::Points(self.point_buffer(buffer)?),
            },
        })
    }

    fn encode_frame(&self, frame: &FrameView, target: &wgpu::TextureView) -> SceneResult<()> {
        let draws = frame
            .draws
            .iter()
            .map(|draw| self.resolve(draw))
            .collect::<SceneResult<Vec<_>>>()?;

        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&frame.camera));
        for (slot, draw) in self.draw_slots.iter().zip(&draws) {
            let uniform = draw.material.uniform(draw.model.into());
            self.queue
                .write_buffer(&slot.buffer, 0, bytemuck::bytes_of(&uniform));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Backdrop Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Backdrop Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

            for (slot, draw) in self.draw_slots.iter().zip(&draws) {
                let Some(pipeline) = self.pipeline_manager.get(draw.kind, draw.material.blend)
                else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &slot.bind_group, &[]);

                match (&draw.kind, &draw.source) {
                    (DrawKind::Mesh, DrawSource::Mesh(mesh)) => {
                        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                        render_pass
                            .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                    }
                    (DrawKind::Points, DrawSource::Points(points)) => {
                        render_pass.set_vertex_buffer(0, points.buffer.slice(..));
                        render_pass.draw(0..6, 0..points.count);
                    }
                    (DrawKind::Lines, DrawSource::Points(points)) => {
                        render_pass.set_vertex_buffer(0, points.buffer.slice(..));
                        render_pass.draw(0..points.count, 0..1);
                    }
                    _ => {}
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}

impl RenderSurface for WgpuSurface {
    fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn create_mesh(&mut self, geometry: &GeometryData) -> SceneResult<MeshId> {
        if geometry.indices.is_empty() {
            return Err(SceneError::exhausted("mesh", "geometry has no triangles"));
        }

        let (vertices, indices) = geometry.to_scene_format();
        let mesh = self.checked("mesh", |device| GpuMesh {
            vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            index_count: indices.len() as u32,
        })?;

        let id = MeshId(self.next_id());
        self.meshes.insert(id, mesh);
        Ok(id)
    }

    fn create_material(&mut self, material: &Material) -> SceneResult<MaterialId> {
        let id = MaterialId(self.next_id());
        self.materials.insert(id, material.clone());
        Ok(id)
    }

    fn create_point_buffer(&mut self, points: &[PointVertex]) -> SceneResult<BufferId> {
        if points.is_empty() {
            return Err(SceneError::exhausted("point buffer", "no points"));
        }

        let buffer = self.checked("point buffer", |device| GpuPointBuffer {
            buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Point Buffer"),
                contents: bytemuck::cast_slice(points),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            }),
            count: points.len() as u32,
        })?;

        let id = BufferId(self.next_id());
        self.buffers.insert(id, buffer);
        Ok(id)
    }

    fn write_points(&mut self, buffer: BufferId, points: &[PointVertex]) -> SceneResult<()> {
        let target = self.point_buffer(buffer)?;
        if target.count as usize != points.len() {
            return Err(SceneError::Surface(format!(
                "point buffer #{} holds {} points, got {}",
                buffer.0,
                target.count,
                points.len()
            )));
        }
        self.queue
            .write_buffer(&target.buffer, 0, bytemuck::cast_slice(points));
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("ignoring resize to {width}x{height}");
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture.destroy();
        self.depth_texture = TextureResource::create_depth_texture(
            &self.device,
            &self.config,
            "Backdrop Depth Texture",
        );
    }

    fn render(&mut self, frame: &FrameView) -> SceneResult<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timed out, frame dropped");
                return Ok(());
            }
            Err(error) => return Err(SceneError::Surface(error.to_string())),
        };

        self.ensure_draw_slots(frame.draws.len());

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.encode_frame(frame, &view)?;
        output.present();
        Ok(())
    }

    fn release(&mut self, resource: ResourceId) -> SceneResult<()> {
        match resource {
            ResourceId::MeshId(id) => {
                let mesh = self
                    .meshes
                    .remove(&id)
                    .ok_or(SceneError::UnknownResource(id.0))?;
                mesh.vertex_buffer.destroy();
                mesh.index_buffer.destroy();
            }
            ResourceId::MaterialId(id) => {
                self.materials
                    .remove(&id)
                    .ok_or(SceneError::UnknownResource(id.0))?;
            }
            ResourceId::BufferId(id) => {
                let points = self
                    .buffers
                    .remove(&id)
                    .ok_or(SceneError::UnknownResource(id.0))?;
                points.buffer.destroy();
            }
        }
        Ok(())
    }
}

impl Drop for WgpuSurface {
    fn drop(&mut self) {
        for slot in &self.draw_slots {
            slot.buffer.destroy();
        }
        self.camera_buffer.destroy();
        self.depth_texture.destroy();
        log::debug!(
            "wgpu surface dropped with {} meshes, {} buffers still registered",
            self.meshes.len(),
            self.buffers.len()
        );
    }
}
