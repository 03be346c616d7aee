// wgpu renderer for textured triangle lists.
//
// Every frame the draws submitted through `DrawTarget` are packed into one
// position buffer and one UV buffer; each draw gets its model matrix through a
// dynamic-offset uniform and its texture through a per-texture bind group.
//
// Bind groups:
//   0: camera   (Projection, View)
//   1: model    (Model, dynamic offset per draw)
//   2: texture  (texture + myTextureSampler)
//
// The renderer is also the game's `AssetServer`: textures are shared per file
// and reference counted; the GPU texture is dropped with the last release.

use std::collections::HashMap;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};
use wgpu::util::DeviceExt;
use super::assets::{load_obj, load_texture_image, AssetError, AssetServer};
use super::mesh::{MeshData, TextureHandle};
use super::scene::CameraMatrices;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MODEL_UNIFORM_SIZE: u64 = std::mem::size_of::<[[f32; 4]; 4]>() as u64;
const INITIAL_VERTEX_CAPACITY: usize = 16 * 1024;
const INITIAL_DRAW_CAPACITY: usize = 64;

/// Receiver of per-object draw calls.
pub trait DrawTarget {
    /// Draw `positions` (object-local, triangle list) with matching `uvs`,
    /// sampled from `texture`, placed in the world by `model`.
    fn draw(&mut self, positions: &[Vec3], uvs: &[Vec2], texture: &TextureHandle, model: Mat4);
}

#[derive(thiserror::Error, Debug)]
pub enum RendererError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter found")]
    NoAdapter,

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

// ============================================================================
// GPU DATA
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniform {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
}

impl CameraUniform {
    fn new(camera: &CameraMatrices) -> Self {
        Self {
            projection: camera.projection.to_cols_array_2d(),
            view: camera.view.to_cols_array_2d(),
        }
    }
}

fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

fn uv_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x2,
        }],
    }
}

struct GpuTexture {
    path: PathBuf,
    refs: usize,
    bind_group: wgpu::BindGroup,
    // Kept alive for the bind group.
    _texture: wgpu::Texture,
}

#[derive(Clone, Copy)]
struct DrawCall {
    first_vertex: u32,
    vertex_count: u32,
    texture: u32,
}

/// Geometry and draws collected between two `present` calls.
#[derive(Default)]
struct FrameBatch {
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    models: Vec<Mat4>,
    draws: Vec<DrawCall>,
}

impl FrameBatch {
    fn clear(&mut self) {
        self.positions.clear();
        self.uvs.clear();
        self.models.clear();
        self.draws.clear();
    }
}

/// Per-frame numbers for the debug overlay.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInfo {
    pub draw_calls: u32,
}

// ============================================================================
// RENDERER
// ============================================================================

pub struct GpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: wgpu::RenderPipeline,
    depth_view: wgpu::TextureView,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    model_layout: wgpu::BindGroupLayout,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    model_stride: u64,
    draw_capacity: usize,

    position_buffer: wgpu::Buffer,
    uv_buffer: wgpu::Buffer,
    vertex_capacity: usize,

    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: HashMap<u32, GpuTexture>,
    texture_ids: HashMap<PathBuf, u32>,
    next_texture_id: u32,
    meshes: HashMap<PathBuf, MeshData>,
    asset_root: PathBuf,

    frame: FrameBatch,
}

impl GpuRenderer {
    pub async fn new(
        window: Arc<winit::window::Window>,
        asset_root: PathBuf,
    ) -> Result<Self, RendererError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::NoAdapter)?;
        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(RendererError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shader.wgsl").into()),
        });

        // ---- Camera (group 0) ----------------------------------------------
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform {
                projection: Mat4::IDENTITY.to_cols_array_2d(),
                view: Mat4::IDENTITY.to_cols_array_2d(),
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("camera_bind_group_layout"),
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        // ---- Model (group 1, dynamic offset) -------------------------------
        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(MODEL_UNIFORM_SIZE),
                },
                count: None,
            }],
            label: Some("model_bind_group_layout"),
        });

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let model_stride = MODEL_UNIFORM_SIZE.div_ceil(alignment) * alignment;
        let model_buffer = create_model_buffer(&device, model_stride, INITIAL_DRAW_CAPACITY);
        let model_bind_group = create_model_bind_group(&device, &model_layout, &model_buffer);

        // ---- Texture (group 2) ---------------------------------------------
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("texture_bind_group_layout"),
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("myTextureSampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&camera_layout, &model_layout, &texture_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[position_layout(), uv_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Sphere and OBJ windings differ; draw both sides.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let position_buffer = create_vertex_buffer(
            &device,
            "Position Buffer",
            INITIAL_VERTEX_CAPACITY * std::mem::size_of::<[f32; 3]>(),
        );
        let uv_buffer = create_vertex_buffer(
            &device,
            "UV Buffer",
            INITIAL_VERTEX_CAPACITY * std::mem::size_of::<[f32; 2]>(),
        );

        let depth_view = create_depth_view(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            render_pipeline,
            depth_view,
            camera_buffer,
            camera_bind_group,
            model_layout,
            model_buffer,
            model_bind_group,
            model_stride,
            draw_capacity: INITIAL_DRAW_CAPACITY,
            position_buffer,
            uv_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            texture_layout,
            sampler,
            textures: HashMap::new(),
            texture_ids: HashMap::new(),
            next_texture_id: 0,
            meshes: HashMap::new(),
            asset_root,
            frame: FrameBatch::default(),
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height as f32
    }

    /// Number of textures currently resident on the GPU.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
        }
    }

    /// Render the draws collected since the last call, then let `overlay`
    /// record extra passes onto the same frame before presenting.
    pub fn present(
        &mut self,
        camera: &CameraMatrices,
        overlay: impl FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    ) -> Result<FrameInfo, wgpu::SurfaceError> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(e) => {
                self.frame.clear();
                return Err(e);
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.upload_frame(camera);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let mut draw_calls = 0;
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
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
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if !self.frame.draws.is_empty() {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.position_buffer.slice(..));
                render_pass.set_vertex_buffer(1, self.uv_buffer.slice(..));

                for (index, draw) in self.frame.draws.iter().enumerate() {
                    // A texture released earlier in the frame has nothing to bind.
                    let Some(texture) = self.textures.get(&draw.texture) else {
                        continue;
                    };
                    let offset = (index as u64 * self.model_stride) as wgpu::DynamicOffset;
                    render_pass.set_bind_group(1, &self.model_bind_group, &[offset]);
                    render_pass.set_bind_group(2, &texture.bind_group, &[]);
                    render_pass.draw(
                        draw.first_vertex..draw.first_vertex + draw.vertex_count,
                        0..1,
                    );
                    draw_calls += 1;
                }
            }
        }

        overlay(&self.device, &self.queue, &mut encoder, &view);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.frame.clear();
        Ok(FrameInfo { draw_calls })
    }

    // Copy the frame batch into GPU buffers, growing them when needed.
    fn upload_frame(&mut self, camera: &CameraMatrices) {
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[CameraUniform::new(camera)]),
        );

        let vertex_count = self.frame.positions.len();
        if vertex_count > self.vertex_capacity {
            self.vertex_capacity = vertex_count.next_power_of_two();
            log::debug!("growing vertex buffers to {} vertices", self.vertex_capacity);
            self.position_buffer = create_vertex_buffer(
                &self.device,
                "Position Buffer",
                self.vertex_capacity * std::mem::size_of::<[f32; 3]>(),
            );
            self.uv_buffer = create_vertex_buffer(
                &self.device,
                "UV Buffer",
                self.vertex_capacity * std::mem::size_of::<[f32; 2]>(),
            );
        }
        if vertex_count > 0 {
            self.queue.write_buffer(
                &self.position_buffer,
                0,
                bytemuck::cast_slice(&self.frame.positions),
            );
            self.queue
                .write_buffer(&self.uv_buffer, 0, bytemuck::cast_slice(&self.frame.uvs));
        }

        let draw_count = self.frame.models.len();
        if draw_count > self.draw_capacity {
            self.draw_capacity = draw_count.next_power_of_two();
            self.model_buffer = create_model_buffer(&self.device, self.model_stride, self.draw_capacity);
            self.model_bind_group =
                create_model_bind_group(&self.device, &self.model_layout, &self.model_buffer);
        }
        if draw_count > 0 {
            let stride = self.model_stride as usize;
            let mut bytes = vec![0u8; draw_count * stride];
            for (slot, model) in bytes.chunks_exact_mut(stride).zip(&self.frame.models) {
                let matrix = model.to_cols_array();
                slot[..MODEL_UNIFORM_SIZE as usize].copy_from_slice(bytemuck::cast_slice(&matrix));
            }
            self.queue.write_buffer(&self.model_buffer, 0, &bytes);
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.asset_root.join(path)
    }
}

impl DrawTarget for GpuRenderer {
    fn draw(&mut self, positions: &[Vec3], uvs: &[Vec2], texture: &TextureHandle, model: Mat4) {
        if positions.is_empty() {
            return;
        }
        let frame = &mut self.frame;
        let first_vertex = frame.positions.len() as u32;
        frame.positions.extend(positions.iter().map(|p| p.to_array()));
        // Meshes without texture coordinates sample the texture origin.
        frame.uvs.extend(
            (0..positions.len()).map(|i| uvs.get(i).copied().unwrap_or(Vec2::ZERO).to_array()),
        );
        frame.models.push(model);
        frame.draws.push(DrawCall {
            first_vertex,
            vertex_count: positions.len() as u32,
            texture: texture.id(),
        });
    }
}

impl AssetServer for GpuRenderer {
    fn load_texture(&mut self, path: &Path) -> Result<TextureHandle, AssetError> {
        let full_path = self.resolve(path);
        if let Some(&id) = self.texture_ids.get(&full_path) {
            if let Some(texture) = self.textures.get_mut(&id) {
                texture.refs += 1;
                return Ok(TextureHandle::new(id));
            }
        }

        let image = load_texture_image(&full_path)?;
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: full_path.to_str(),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
            label: Some("texture_bind_group"),
        });

        let id = self.next_texture_id;
        self.next_texture_id += 1;
        log::info!(
            "loaded texture {} ({}x{})",
            full_path.display(),
            image.width,
            image.height
        );
        self.texture_ids.insert(full_path.clone(), id);
        self.textures.insert(
            id,
            GpuTexture {
                path: full_path,
                refs: 1,
                bind_group,
                _texture: texture,
            },
        );
        Ok(TextureHandle::new(id))
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        let id = handle.id();
        let Some(texture) = self.textures.get_mut(&id) else {
            log::warn!("release of unknown texture {id}");
            return;
        };
        texture.refs -= 1;
        if texture.refs == 0 {
            if let Some(texture) = self.textures.remove(&id) {
                log::debug!("freed texture {}", texture.path.display());
                self.texture_ids.remove(&texture.path);
            }
        }
    }

    fn load_mesh(&mut self, path: &Path) -> Result<MeshData, AssetError> {
        let full_path = self.resolve(path);
        if let Some(mesh) = self.meshes.get(&full_path) {
            return Ok(mesh.clone());
        }
        let mesh = load_obj(&full_path)?;
        log::info!("loaded mesh {} ({} vertices)", full_path.display(), mesh.vertex_count());
        self.meshes.insert(full_path, mesh.clone());
        Ok(mesh)
    }
}

// ============================================================================
// BUFFER HELPERS
// ============================================================================

fn create_vertex_buffer(device: &wgpu::Device, label: &str, bytes: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: bytes as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_model_buffer(device: &wgpu::Device, stride: u64, draws: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Model Buffer"),
        size: stride * draws as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_model_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: NonZeroU64::new(MODEL_UNIFORM_SIZE),
            }),
        }],
        label: Some("model_bind_group"),
    })
}

fn create_depth_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
