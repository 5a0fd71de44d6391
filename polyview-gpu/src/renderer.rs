//! Scene renderer: surface, pipelines and per-frame drawing

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use image::RgbaImage;
use nalgebra::{Matrix4, Vector3};
use polyview_core::{Error, Result};
use winit::window::Window;

use crate::device::GpuContext;
use crate::texture;
use crate::vertex::{FlatVertex, MeshVertex};

/// Camera uniform data
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view_pos: [f32; 3],
    pub _padding: f32,
}

/// Fixed scene lighting: one directional light plus an ambient term
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightingUniform {
    pub light_position: [f32; 3],
    pub light_intensity: f32,
    pub light_color: [f32; 3],
    pub ambient_strength: f32,
}

impl Default for LightingUniform {
    fn default() -> Self {
        Self {
            light_position: [100.0, 100.0, 100.0],
            light_intensity: 1.5,
            light_color: [1.0, 1.0, 1.0],
            ambient_strength: 0.5,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub background_color: [f64; 4],
    pub msaa_samples: u32,
    pub lighting: LightingUniform,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            // 0x666666 gray
            background_color: [0.4, 0.4, 0.4, 1.0],
            msaa_samples: 4,
            lighting: LightingUniform::default(),
        }
    }
}

/// Renderer for the contour scene: reference grid, contour point cloud
/// and the textured ground mesh.
///
/// Owns the window surface and all GPU resources; dropping it releases
/// them.
pub struct SceneRenderer {
    context: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    config: RenderConfig,

    msaa_view: Option<wgpu::TextureView>,
    depth_view: wgpu::TextureView,

    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    texture_bind_group_layout: wgpu::BindGroupLayout,
    mesh_sampler: wgpu::Sampler,
    mesh_texture_bind_group: wgpu::BindGroup,

    line_pipeline: wgpu::RenderPipeline,
    quad_pipeline: wgpu::RenderPipeline,
    mesh_pipeline: wgpu::RenderPipeline,

    grid: Option<(wgpu::Buffer, u32)>,
    points: Option<(wgpu::Buffer, u32)>,
    mesh: Option<(wgpu::Buffer, u32)>,
}

impl SceneRenderer {
    /// Create a renderer bound to `window`.
    pub async fn new(window: Arc<Window>, config: RenderConfig) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| Error::Gpu(format!("failed to create surface: {e}")))?;

        let context = GpuContext::for_surface(&instance, &surface).await?;

        let surface_caps = surface.get_capabilities(&context.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &surface_config);

        let samples = config.msaa_samples.max(1);
        let msaa_view = create_msaa_view(&context.device, &surface_config, samples);
        let depth_view = create_depth_view(&context.device, &surface_config, samples);

        // Camera + lighting uniforms, shared by every pipeline
        let camera_uniform = CameraUniform {
            view_proj: Matrix4::identity().into(),
            view_pos: [0.0, 0.0, 0.0],
            _padding: 0.0,
        };
        let camera_buffer = context.create_buffer_init(
            "Camera Buffer",
            &[camera_uniform],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let lighting_buffer = context.create_buffer_init(
            "Lighting Buffer",
            &[config.lighting],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let uniform_bind_group_layout =
            context
                .device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("uniform_bind_group_layout"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                    ],
                });

        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform_bind_group"),
                layout: &uniform_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: camera_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: lighting_buffer.as_entire_binding(),
                    },
                ],
            });

        // Mesh texture, starting from a white placeholder until the
        // remote image resolves
        let texture_bind_group_layout =
            context
                .device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("texture_bind_group_layout"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                });

        let mesh_sampler = context.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Mesh Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let placeholder = texture::upload_rgba(
            &context.device,
            &context.queue,
            &texture::placeholder_rgba(),
            "Placeholder Mesh Texture",
        );
        let mesh_texture_bind_group = create_texture_bind_group(
            &context.device,
            &texture_bind_group_layout,
            &placeholder,
            &mesh_sampler,
        );

        // Pipelines
        let flat_shader = context.create_shader_module(
            "Flat Color Shader",
            include_str!("shaders/flat_color.wgsl"),
        );
        let mesh_shader =
            context.create_shader_module("Mesh Shader", include_str!("shaders/mesh.wgsl"));

        let flat_pipeline_layout =
            context
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("Flat Pipeline Layout"),
                    bind_group_layouts: &[&uniform_bind_group_layout],
                    push_constant_ranges: &[],
                });
        let mesh_pipeline_layout =
            context
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("Mesh Pipeline Layout"),
                    bind_group_layouts: &[&uniform_bind_group_layout, &texture_bind_group_layout],
                    push_constant_ranges: &[],
                });

        let line_pipeline = create_pipeline(
            &context.device,
            "Grid Pipeline",
            &flat_pipeline_layout,
            &flat_shader,
            FlatVertex::desc(),
            wgpu::PrimitiveTopology::LineList,
            surface_format,
            samples,
        );
        let quad_pipeline = create_pipeline(
            &context.device,
            "Point Quad Pipeline",
            &flat_pipeline_layout,
            &flat_shader,
            FlatVertex::desc(),
            wgpu::PrimitiveTopology::TriangleList,
            surface_format,
            samples,
        );
        let mesh_pipeline = create_pipeline(
            &context.device,
            "Mesh Pipeline",
            &mesh_pipeline_layout,
            &mesh_shader,
            MeshVertex::desc(),
            wgpu::PrimitiveTopology::TriangleList,
            surface_format,
            samples,
        );

        tracing::debug!(
            format = ?surface_format,
            width = surface_config.width,
            height = surface_config.height,
            samples,
            "scene renderer ready"
        );

        Ok(Self {
            context,
            surface,
            surface_config,
            config,
            msaa_view,
            depth_view,
            camera_uniform,
            camera_buffer,
            uniform_bind_group,
            texture_bind_group_layout,
            mesh_sampler,
            mesh_texture_bind_group,
            line_pipeline,
            quad_pipeline,
            mesh_pipeline,
            grid: None,
            points: None,
            mesh: None,
        })
    }

    /// Current surface dimensions.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Resize the surface and its MSAA/depth targets; zero-sized
    /// dimensions are ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface
            .configure(&self.context.device, &self.surface_config);

        let samples = self.config.msaa_samples.max(1);
        self.msaa_view = create_msaa_view(&self.context.device, &self.surface_config, samples);
        self.depth_view = create_depth_view(&self.context.device, &self.surface_config, samples);
    }

    /// Update camera view and projection matrices
    pub fn update_camera(
        &mut self,
        view_matrix: Matrix4<f32>,
        proj_matrix: Matrix4<f32>,
        camera_pos: Vector3<f32>,
    ) {
        let view_proj = proj_matrix * view_matrix;
        self.camera_uniform.view_proj = view_proj.into();
        self.camera_uniform.view_pos = [camera_pos.x, camera_pos.y, camera_pos.z];

        self.context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&self.camera_uniform),
        );
    }

    /// Upload the reference grid lines.
    pub fn set_grid(&mut self, vertices: &[FlatVertex]) {
        self.grid = self.upload_vertices("Grid Vertex Buffer", vertices);
    }

    /// Upload the contour point quads.
    pub fn set_points(&mut self, vertices: &[FlatVertex]) {
        self.points = self.upload_vertices("Point Cloud Vertex Buffer", vertices);
    }

    /// Upload the ground mesh vertices.
    pub fn set_mesh(&mut self, vertices: &[MeshVertex]) {
        self.mesh = self.upload_vertices("Mesh Vertex Buffer", vertices);
    }

    /// Swap the mesh texture for a resolved remote image.
    pub fn set_mesh_texture(&mut self, image: &RgbaImage) {
        let texture = texture::upload_rgba(
            &self.context.device,
            &self.context.queue,
            image,
            "Mesh Texture",
        );
        self.mesh_texture_bind_group = create_texture_bind_group(
            &self.context.device,
            &self.texture_bind_group_layout,
            &texture,
            &self.mesh_sampler,
        );
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "mesh texture updated"
        );
    }

    fn upload_vertices<T: Pod>(&self, label: &str, vertices: &[T]) -> Option<(wgpu::Buffer, u32)> {
        if vertices.is_empty() {
            return None;
        }
        let buffer =
            self.context
                .create_buffer_init(label, vertices, wgpu::BufferUsages::VERTEX);
        Some((buffer, vertices.len() as u32))
    }

    /// Draw one frame: grid, then points, then the textured mesh.
    pub fn render(&self) -> Result<()> {
        let output = self
            .surface
            .get_current_texture()
            .map_err(|e| Error::Gpu(format!("failed to get surface texture: {e}")))?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Scene Render Encoder"),
                });

        {
            let [r, g, b, a] = self.config.background_color;
            let (view, resolve_target) = match &self.msaa_view {
                Some(msaa) => (msaa, Some(&surface_view)),
                None => (&surface_view, None),
            };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            if let Some((buffer, count)) = &self.grid {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..*count, 0..1);
            }
            if let Some((buffer, count)) = &self.points {
                render_pass.set_pipeline(&self.quad_pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..*count, 0..1);
            }
            if let Some((buffer, count)) = &self.mesh {
                render_pass.set_pipeline(&self.mesh_pipeline);
                render_pass.set_bind_group(1, &self.mesh_texture_bind_group, &[]);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..*count, 0..1);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_msaa_view(
    device: &wgpu::Device,
    surface_config: &wgpu::SurfaceConfiguration,
    samples: u32,
) -> Option<wgpu::TextureView> {
    if samples <= 1 {
        return None;
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("MSAA Texture"),
        size: wgpu::Extent3d {
            width: surface_config.width,
            height: surface_config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: samples,
        dimension: wgpu::TextureDimension::D2,
        format: surface_config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}

fn create_depth_view(
    device: &wgpu::Device,
    surface_config: &wgpu::SurfaceConfiguration,
    samples: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: surface_config.width,
            height: surface_config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: samples,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &wgpu::Texture,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("mesh_texture_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[allow(clippy::too_many_arguments)]
fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    vertex_layout: wgpu::VertexBufferLayout,
    topology: wgpu::PrimitiveTopology,
    format: wgpu::TextureFormat,
    samples: u32,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[vertex_layout],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // the mesh is double-sided and the grid has no facing at all
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: samples,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
