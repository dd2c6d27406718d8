use std::sync::{Arc, Mutex};
use std::time::Instant;
use wgpu::util::DeviceExt;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use glam::{Mat4, Vec3};
use showcase_core::asset::{self, CarModel, EnvironmentMap, MeshPrimitive, TextureData};
use showcase_core::{
    car_transform, fit_to_length, nudge_for_key, Calibrator, Camera, CameraGlide, CameraPose,
    CameraView, DecorConfig, DecorKind, FitTransform, OrbitRig, ParticleField, RoadScroll,
    SceneContents, ShowcaseState, Ticker, BODY_ENV_BOOST, BODY_METALLIC, BODY_ROUGHNESS,
    CAR_TARGET_LENGTH, PAINTS, PARTICLE_FIELD_EXTENT, PARTICLE_SIZE, XRAY_COLOR, XRAY_OPACITY,
};

const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    inv_view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    camera_right: [f32; 4],
    camera_up: [f32; 4],
    sun_dir: [f32; 4],
    sun_color: [f32; 4],
    env: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniforms {
    model: [[f32; 4]; 4],
    base_color: [f32; 4],
    material: [f32; 4],
    uv_repeat: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PostUniforms {
    resolution: [f32; 2],
    time: f32,
    exposure: f32,
    blur_dir: [f32; 2],
    bloom_strength: f32,
    threshold: f32,
    chroma_amount: f32,
    bloom_radius: f32,
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ParticleInstance {
    pos: [f32; 3],
    size: f32,
    color: [f32; 4],
}

struct GpuPrimitive {
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,
    index_count: u32,
    uniform_buf: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    base_color: [f32; 4],
    metallic: f32,
    roughness: f32,
    is_body: bool,
    uv_repeat: [f32; 2],
}

struct FrameParams<'p> {
    eye: Vec3,
    target: Vec3,
    particle_positions: &'p [Vec3],
    car_transform: Mat4,
    ground_offset_z: f32,
    paint_rgb: [f32; 3],
    xray: bool,
    dt_sec: f32,
}

/// Native renderer: sky + meshes + particles into an HDR target, then a
/// tonemap resolve to the swapchain. No bloom chain on this path.
struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    decor: DecorConfig,

    sky_pipeline: wgpu::RenderPipeline,
    mesh_pipeline: wgpu::RenderPipeline,
    particle_pipeline: wgpu::RenderPipeline,
    tonemap_pipeline: wgpu::RenderPipeline,

    globals_buf: wgpu::Buffer,
    globals_bgl: wgpu::BindGroupLayout,
    globals_bind_group: wgpu::BindGroup,
    env_view: wgpu::TextureView,
    env_sampler: wgpu::Sampler,

    draw_bgl: wgpu::BindGroupLayout,
    draw_sampler: wgpu::Sampler,
    white_view: wgpu::TextureView,

    ground: GpuPrimitive,
    car: Vec<GpuPrimitive>,
    fallback: Option<GpuPrimitive>,

    particle_vb: wgpu::Buffer,
    particle_capacity: usize,

    hdr_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    post_bgl: wgpu::BindGroupLayout,
    post_uniform_buf: wgpu::Buffer,
    post_sampler: wgpu::Sampler,
    tonemap_bind_group: wgpu::BindGroup,

    width: u32,
    height: u32,
    time_accum: f32,
    last_frame: Instant,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window, decor: DecorConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(showcase_core::SCENE_WGSL.into()),
        });
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(showcase_core::POST_WGSL.into()),
        });

        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
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
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let draw_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
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
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let post_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
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

        let globals_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let post_uniform_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("post_uniforms"),
            size: std::mem::size_of::<PostUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let env_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("env_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let draw_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("draw_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let post_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("post_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let env_view = upload_f16_pixel(
            &device,
            &queue,
            [
                decor.clear_color[0] * 2.0,
                decor.clear_color[1] * 2.0,
                decor.clear_color[2] * 2.0,
                1.0,
            ],
        );
        let white_view = upload_rgba8_pixel(&device, &queue, [255, 255, 255, 255]);
        let globals_bind_group =
            make_globals_bind_group(&device, &globals_bgl, &globals_buf, &env_view, &env_sampler);

        // Pipelines
        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 24,
                    shader_location: 2,
                },
            ],
        };
        let particle_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 12,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 16,
                    shader_location: 2,
                },
            ],
        };

        let scene_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&globals_bgl, &draw_bgl],
            push_constant_ranges: &[],
        });
        let sky_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sky_pl"),
            bind_group_layouts: &[&globals_bgl],
            push_constant_ranges: &[],
        });
        let tonemap_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tonemap_pl"),
            bind_group_layouts: &[&post_bgl],
            push_constant_ranges: &[],
        });

        let depth_state = |write: bool, compare: wgpu::CompareFunction| {
            Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: write,
                depth_compare: compare,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            })
        };

        let sky_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sky_pipeline"),
            layout: Some(&sky_pl),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_sky"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: depth_state(false, wgpu::CompareFunction::Always),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &scene_shader,
                entry_point: Some("fs_sky"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&scene_pl),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_mesh"),
                buffers: &[vertex_layout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: depth_state(true, wgpu::CompareFunction::Less),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &scene_shader,
                entry_point: Some("fs_mesh"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        let particle_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("particle_pipeline"),
            layout: Some(&sky_pl),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_particles"),
                buffers: &[particle_layout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: depth_state(false, wgpu::CompareFunction::Less),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &scene_shader,
                entry_point: Some("fs_particles"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent::OVER,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        let tonemap_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tonemap_pipeline"),
            layout: Some(&tonemap_pl),
            vertex: wgpu::VertexState {
                module: &post_shader,
                entry_point: Some("vs_fullscreen"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &post_shader,
                entry_point: Some("fs_tonemap"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let (hdr_view, depth_view) =
            create_targets(&device, config.width, config.height);
        let tonemap_bind_group = make_post_bind_group(
            &device,
            &post_bgl,
            &hdr_view,
            &post_sampler,
            &post_uniform_buf,
        );

        let ground = {
            let h = decor.ground.half_extent;
            let y = decor.ground.y_offset;
            let vertices = [
                Vertex {
                    position: [-h, y, -h],
                    normal: [0.0, 1.0, 0.0],
                    uv: [0.0, 0.0],
                },
                Vertex {
                    position: [h, y, -h],
                    normal: [0.0, 1.0, 0.0],
                    uv: [1.0, 0.0],
                },
                Vertex {
                    position: [h, y, h],
                    normal: [0.0, 1.0, 0.0],
                    uv: [1.0, 1.0],
                },
                Vertex {
                    position: [-h, y, h],
                    normal: [0.0, 1.0, 0.0],
                    uv: [0.0, 1.0],
                },
            ];
            let indices: [u32; 6] = [0, 2, 1, 0, 3, 2];
            make_primitive(
                &device,
                &draw_bgl,
                &draw_sampler,
                &white_view,
                "ground",
                bytemuck::cast_slice(&vertices),
                bytemuck::cast_slice(&indices),
                indices.len() as u32,
                [1.0, 1.0, 1.0, 1.0],
                decor.ground.metalness,
                decor.ground.roughness,
                false,
                [decor.ground.texture_repeat, decor.ground.texture_repeat],
            )
        };

        let particle_capacity = decor.particle_count;
        let particle_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particle_vb"),
            size: (std::mem::size_of::<ParticleInstance>() * particle_capacity.max(1)) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            decor,
            sky_pipeline,
            mesh_pipeline,
            particle_pipeline,
            tonemap_pipeline,
            globals_buf,
            globals_bgl,
            globals_bind_group,
            env_view,
            env_sampler,
            draw_bgl,
            draw_sampler,
            white_view,
            ground,
            car: Vec::new(),
            fallback: None,
            particle_vb,
            particle_capacity,
            hdr_view,
            depth_view,
            post_bgl,
            post_uniform_buf,
            post_sampler,
            tonemap_bind_group,
            width: size.width.max(1),
            height: size.height.max(1),
            time_accum: 0.0,
            last_frame: Instant::now(),
        })
    }

    fn upload_model(&mut self, model: &CarModel) {
        self.car.clear();
        for prim in &model.primitives {
            self.car.push(self.upload_primitive(prim));
        }
        log::info!("uploaded car: {} primitives", self.car.len());
    }

    fn upload_fallback(&mut self, prim: &MeshPrimitive) {
        self.fallback = Some(self.upload_primitive(prim));
    }

    fn upload_primitive(&self, prim: &MeshPrimitive) -> GpuPrimitive {
        let vertices: Vec<Vertex> = prim
            .positions
            .iter()
            .zip(prim.normals.iter())
            .zip(prim.uvs.iter())
            .map(|((p, n), uv)| Vertex {
                position: *p,
                normal: *n,
                uv: *uv,
            })
            .collect();
        make_primitive(
            &self.device,
            &self.draw_bgl,
            &self.draw_sampler,
            &self.white_view,
            &prim.name,
            bytemuck::cast_slice(&vertices),
            bytemuck::cast_slice(&prim.indices),
            prim.indices.len() as u32,
            prim.base_color,
            prim.metallic,
            prim.roughness,
            prim.is_body,
            [1.0, 1.0],
        )
    }

    fn set_environment(&mut self, env: &EnvironmentMap) {
        let mut half: Vec<u16> = Vec::with_capacity(env.pixels.len() * 4);
        for px in &env.pixels {
            for c in px {
                half.push(f32_to_f16_bits(*c));
            }
        }
        let tex = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("env_tex"),
            size: wgpu::Extent3d {
                width: env.width,
                height: env.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: HDR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&half),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(env.width * 8),
                rows_per_image: Some(env.height),
            },
            wgpu::Extent3d {
                width: env.width,
                height: env.height,
                depth_or_array_layers: 1,
            },
        );
        self.env_view = tex.create_view(&wgpu::TextureViewDescriptor::default());
        self.globals_bind_group = make_globals_bind_group(
            &self.device,
            &self.globals_bgl,
            &self.globals_buf,
            &self.env_view,
            &self.env_sampler,
        );
    }

    fn set_ground_texture(&mut self, tex: &TextureData) {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ground_color"),
            size: wgpu::Extent3d {
                width: tex.width,
                height: tex.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &tex.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(tex.width * 4),
                rows_per_image: Some(tex.height),
            },
            wgpu::Extent3d {
                width: tex.width,
                height: tex.height,
                depth_or_array_layers: 1,
            },
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.ground.bind_group = make_draw_bind_group(
            &self.device,
            &self.draw_bgl,
            &self.ground.uniform_buf,
            &view,
            &self.draw_sampler,
        );
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        let (hdr_view, depth_view) = create_targets(&self.device, self.width, self.height);
        self.hdr_view = hdr_view;
        self.depth_view = depth_view;
        self.tonemap_bind_group = make_post_bind_group(
            &self.device,
            &self.post_bgl,
            &self.hdr_view,
            &self.post_sampler,
            &self.post_uniform_buf,
        );
    }

    fn render(&mut self, params: &FrameParams) -> Result<(), wgpu::SurfaceError> {
        self.time_accum += params.dt_sec;
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let aspect = self.width.max(1) as f32 / self.height.max(1) as f32;
        let mut camera = Camera::showcase_default(aspect);
        camera.eye = params.eye;
        camera.target = params.target;
        let view_proj = camera.view_proj();
        let forward = (params.target - params.eye).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);
        let globals = Globals {
            view_proj: view_proj.to_cols_array_2d(),
            inv_view_proj: view_proj.inverse().to_cols_array_2d(),
            camera_pos: params.eye.extend(1.0).to_array(),
            camera_right: right.extend(0.0).to_array(),
            camera_up: up.extend(0.0).to_array(),
            sun_dir: self
                .decor
                .sun
                .direction
                .extend(self.decor.sun.intensity)
                .to_array(),
            sun_color: [
                self.decor.sun.color[0],
                self.decor.sun.color[1],
                self.decor.sun.color[2],
                0.0,
            ],
            env: [
                self.decor.environment_intensity,
                self.decor.background_intensity,
                self.time_accum,
                0.0,
            ],
        };
        self.queue
            .write_buffer(&self.globals_buf, 0, bytemuck::bytes_of(&globals));

        let ground_model = Mat4::from_translation(Vec3::new(0.0, 0.0, params.ground_offset_z));
        write_draw_uniforms(&self.queue, &self.ground, ground_model, params, false);
        if let Some(fallback) = &self.fallback {
            write_draw_uniforms(&self.queue, fallback, Mat4::IDENTITY, params, false);
        }
        for prim in &self.car {
            write_draw_uniforms(&self.queue, prim, params.car_transform, params, true);
        }

        let count = params.particle_positions.len().min(self.particle_capacity);
        if count > 0 {
            let instances: Vec<ParticleInstance> = params.particle_positions[..count]
                .iter()
                .map(|p| ParticleInstance {
                    pos: p.to_array(),
                    size: PARTICLE_SIZE,
                    color: [
                        self.decor.particle_color[0],
                        self.decor.particle_color[1],
                        self.decor.particle_color[2],
                        self.decor.particle_opacity,
                    ],
                })
                .collect();
            self.queue
                .write_buffer(&self.particle_vb, 0, bytemuck::cast_slice(&instances));
        }

        let post = PostUniforms {
            resolution: [self.width as f32, self.height as f32],
            time: self.time_accum,
            exposure: self.decor.exposure,
            blur_dir: [0.0, 0.0],
            bloom_strength: 0.0,
            threshold: self.decor.bloom.threshold,
            chroma_amount: 0.0,
            bloom_radius: 0.0,
            _pad: [0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.post_uniform_buf, 0, bytemuck::bytes_of(&post));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: self.decor.clear_color[0] as f64,
                            g: self.decor.clear_color[1] as f64,
                            b: self.decor.clear_color[2] as f64,
                            a: 1.0,
                        }),
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

            rpass.set_pipeline(&self.sky_pipeline);
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);
            rpass.draw(0..3, 0..1);

            rpass.set_pipeline(&self.mesh_pipeline);
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);
            let draw_prim = |rpass: &mut wgpu::RenderPass, prim: &GpuPrimitive| {
                rpass.set_bind_group(1, &prim.bind_group, &[]);
                rpass.set_vertex_buffer(0, prim.vertex_buf.slice(..));
                rpass.set_index_buffer(prim.index_buf.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..prim.index_count, 0, 0..1);
            };
            draw_prim(&mut rpass, &self.ground);
            if let Some(fallback) = &self.fallback {
                draw_prim(&mut rpass, fallback);
            }
            for prim in &self.car {
                draw_prim(&mut rpass, prim);
            }

            if count > 0 {
                rpass.set_pipeline(&self.particle_pipeline);
                rpass.set_bind_group(0, &self.globals_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.particle_vb.slice(..));
                rpass.draw(0..6, 0..count as u32);
            }
        }
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tonemap_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.tonemap_pipeline);
            rpass.set_bind_group(0, &self.tonemap_bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

// ---------------------------------------------------------------- helpers

fn create_targets(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::TextureView, wgpu::TextureView) {
    let hdr = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("hdr_tex"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: HDR_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let depth = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_tex"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    (
        hdr.create_view(&wgpu::TextureViewDescriptor::default()),
        depth.create_view(&wgpu::TextureViewDescriptor::default()),
    )
}

fn make_globals_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    globals_buf: &wgpu::Buffer,
    env_view: &wgpu::TextureView,
    env_sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("globals_bg"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(env_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(env_sampler),
            },
        ],
    })
}

fn make_post_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    hdr_view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    post_uniform_buf: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("tonemap_bg"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(hdr_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: post_uniform_buf.as_entire_binding(),
            },
        ],
    })
}

fn make_draw_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniform_buf: &wgpu::Buffer,
    texture_view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("draw_bg"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(texture_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[allow(clippy::too_many_arguments)]
fn make_primitive(
    device: &wgpu::Device,
    draw_bgl: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    texture_view: &wgpu::TextureView,
    label: &str,
    vertex_bytes: &[u8],
    index_bytes: &[u8],
    index_count: u32,
    base_color: [f32; 4],
    metallic: f32,
    roughness: f32,
    is_body: bool,
    uv_repeat: [f32; 2],
) -> GpuPrimitive {
    let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: vertex_bytes,
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: index_bytes,
        usage: wgpu::BufferUsages::INDEX,
    });
    let uniform_buf = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<DrawUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = make_draw_bind_group(device, draw_bgl, &uniform_buf, texture_view, sampler);
    GpuPrimitive {
        vertex_buf,
        index_buf,
        index_count,
        uniform_buf,
        bind_group,
        base_color,
        metallic,
        roughness,
        is_body,
        uv_repeat,
    }
}

fn write_draw_uniforms(
    queue: &wgpu::Queue,
    prim: &GpuPrimitive,
    model: Mat4,
    params: &FrameParams,
    xray_applies: bool,
) {
    let (base_color, material) = if params.xray && xray_applies {
        (
            [XRAY_COLOR[0], XRAY_COLOR[1], XRAY_COLOR[2], XRAY_OPACITY],
            [0.0, 1.0, 0.0, 1.0],
        )
    } else if prim.is_body {
        (
            [
                params.paint_rgb[0],
                params.paint_rgb[1],
                params.paint_rgb[2],
                1.0,
            ],
            [BODY_METALLIC, BODY_ROUGHNESS, BODY_ENV_BOOST, 0.0],
        )
    } else {
        (prim.base_color, [prim.metallic, prim.roughness, 1.0, 0.0])
    };
    let uniforms = DrawUniforms {
        model: model.to_cols_array_2d(),
        base_color,
        material,
        uv_repeat: [prim.uv_repeat[0], prim.uv_repeat[1], 0.0, 0.0],
    };
    queue.write_buffer(&prim.uniform_buf, 0, bytemuck::bytes_of(&uniforms));
}

fn upload_f16_pixel(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [f32; 4]) -> wgpu::TextureView {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("pixel_f16"),
        size: wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: HDR_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let half: Vec<u16> = rgba.iter().map(|c| f32_to_f16_bits(*c)).collect();
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &tex,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        bytemuck::cast_slice(&half),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(8),
            rows_per_image: Some(1),
        },
        wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
    );
    tex.create_view(&wgpu::TextureViewDescriptor::default())
}

fn upload_rgba8_pixel(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    rgba: [u8; 4],
) -> wgpu::TextureView {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("pixel_rgba8"),
        size: wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &tex,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4),
            rows_per_image: Some(1),
        },
        wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
    );
    tex.create_view(&wgpu::TextureViewDescriptor::default())
}

fn f32_to_f16_bits(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exp = ((bits >> 23) & 0xff) as i32;
    let mut frac = bits & 0x007f_ffff;
    if exp == 0xff {
        return sign | 0x7c00;
    }
    let e = exp - 127 + 15;
    if e >= 0x1f {
        return sign | 0x7c00;
    }
    if e <= 0 {
        if e < -10 {
            return sign;
        }
        frac |= 0x0080_0000;
        let shift = (14 - e) as u32;
        return sign | (frac >> shift) as u16;
    }
    sign | ((e as u16) << 10) | (frac >> 13) as u16
}

// ---------------------------------------------------------------- showcase

struct Showcase {
    state: ShowcaseState,
    pose: CameraPose,
    rig: OrbitRig,
    glide: CameraGlide,
    particles: ParticleField,
    road: RoadScroll,
    ticker: Ticker,
    calibrator: Calibrator,
    scene: SceneContents,
    fit: Option<FitTransform>,
    mouse_down: bool,
    mouse_last: (f32, f32),
}

impl Showcase {
    fn new(decor: &DecorConfig) -> Self {
        let pose = CameraPose::showcase_default();
        Self {
            state: ShowcaseState::new(),
            rig: OrbitRig::new(pose.eye, pose.target),
            pose,
            glide: CameraGlide::new(),
            particles: ParticleField::new(decor.particle_count, PARTICLE_FIELD_EXTENT, 7),
            road: RoadScroll::new(),
            ticker: Ticker::new(42),
            calibrator: Calibrator::from_placement(decor.car_offset, decor.car_rotation_y),
            scene: SceneContents::new(),
            fit: None,
            mouse_down: false,
            mouse_last: (0.0, 0.0),
        }
    }

    fn handle_key(&mut self, key: &Key, audio: &EngineAudio) {
        match key {
            Key::Named(NamedKey::Space) => {
                let warping = self.state.toggle_warp();
                if warping {
                    self.glide.cancel();
                } else {
                    self.road.reset();
                }
                log::info!("status: {}", self.state.status().label());
            }
            Key::Named(NamedKey::Enter) => audio.trigger_engine_rumble(),
            Key::Character(s) => match s.as_str() {
                "x" | "X" => {
                    if self.scene.car.is_some() {
                        self.state.toggle_xray();
                    }
                }
                "p" | "P" => {
                    let next = (self.state.paint_index + 1) % PAINTS.len();
                    if self.state.select_paint(next) {
                        log::info!("paint: {}", PAINTS[next].name);
                    }
                }
                "1" | "2" | "3" | "4" => {
                    let view = match s.as_str() {
                        "1" => CameraView::Front,
                        "2" => CameraView::Side,
                        "3" => CameraView::Back,
                        _ => CameraView::Auto,
                    };
                    match self.state.select_view(view) {
                        Some(goal) => self.glide.begin(goal),
                        None => self.glide.cancel(),
                    }
                    self.road.reset();
                }
                other => {
                    if let Some(nudge) = nudge_for_key(other) {
                        self.calibrator.apply(nudge);
                        log::info!("{}", self.calibrator.report());
                    }
                }
            },
            _ => {}
        }
    }
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let kind = std::env::args()
        .nth(1)
        .and_then(|name| DecorKind::from_name(&name))
        .unwrap_or(DecorKind::Road);
    let decor = DecorConfig::preset(kind);
    log::info!("decor: {}", decor.name);

    let mut showcase = Showcase::new(&decor);
    let audio = EngineAudio::start();

    let event_loop = EventLoop::new().expect("event loop");
    let window = WindowBuilder::new()
        .with_title("Car Showcase (native)")
        .build(&event_loop)
        .expect("window");

    let mut gpu = pollster::block_on(GpuState::new(&window, decor)).expect("gpu");

    // Disk asset loads: success attaches, failure follows the decor policy.
    showcase
        .scene
        .attach_model(asset::import_model(decor.assets.model), &decor);
    if let Some(model) = &showcase.scene.car {
        showcase.fit = fit_to_length(model.aabb, CAR_TARGET_LENGTH, 0.0)
            .or(Some(FitTransform::IDENTITY));
        gpu.upload_model(model);
    }
    if let Some(plane) = &showcase.scene.fallback_ground {
        gpu.upload_fallback(plane);
    }
    if let Some(message) = showcase.scene.alert.take() {
        // The desktop build has no dialog layer; the log is the alert.
        log::error!("{message}");
    }
    match std::fs::read(decor.assets.environment)
        .map_err(asset::AssetError::from)
        .and_then(|bytes| asset::decode_environment(&bytes))
    {
        Ok(env) => gpu.set_environment(&env),
        Err(e) => log::error!("environment load failed: {e}"),
    }
    match std::fs::read(decor.assets.ground_color)
        .map_err(asset::AssetError::from)
        .and_then(|bytes| asset::decode_texture(&bytes))
    {
        Ok(tex) => gpu.set_ground_texture(&tex),
        Err(e) => log::error!("ground texture load failed: {e}"),
    }

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                ..
            } => gpu.resize(size),
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => elwt.exit(),
            Event::WindowEvent {
                event:
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                logical_key,
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    },
                ..
            } => showcase.handle_key(&logical_key, &audio),
            Event::WindowEvent {
                event: WindowEvent::MouseInput { state, button, .. },
                ..
            } => {
                if button == MouseButton::Left {
                    showcase.mouse_down = state == ElementState::Pressed;
                }
            }
            Event::WindowEvent {
                event: WindowEvent::CursorMoved { position, .. },
                ..
            } => {
                let (x, y) = (position.x as f32, position.y as f32);
                if showcase.mouse_down {
                    let dx = x - showcase.mouse_last.0;
                    let dy = y - showcase.mouse_last.1;
                    showcase.rig.drag(dx, dy);
                }
                showcase.mouse_last = (x, y);
            }
            Event::WindowEvent {
                event: WindowEvent::MouseWheel { delta, .. },
                ..
            } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * 40.0,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                showcase.rig.zoom(-dy);
            }
            Event::AboutToWait => {
                let now = Instant::now();
                let dt = (now - gpu.last_frame).as_secs_f32().min(0.1);
                gpu.last_frame = now;

                let out = showcase.ticker.advance(
                    dt,
                    &showcase.state,
                    &mut showcase.pose,
                    &mut showcase.rig,
                    &mut showcase.glide,
                    &mut showcase.particles,
                    &mut showcase.road,
                );
                let cal = showcase.calibrator;
                let car = match showcase.fit {
                    Some(fit) => car_transform(fit, cal.position, cal.rotation),
                    None => Mat4::IDENTITY,
                };
                let paint = PAINTS
                    .get(showcase.state.paint_index)
                    .map(|p| p.rgb)
                    .unwrap_or([1.0, 1.0, 1.0]);
                let params = FrameParams {
                    eye: showcase.pose.eye + out.eye_jitter,
                    target: showcase.pose.target,
                    particle_positions: showcase.particles.positions(),
                    car_transform: car,
                    ground_offset_z: showcase.road.offset(),
                    paint_rgb: paint,
                    xray: showcase.state.xray,
                    dt_sec: dt,
                };
                match gpu.render(&params) {
                    Ok(_) => gpu.window.request_redraw(),
                    Err(wgpu::SurfaceError::Lost) => gpu.resize(gpu.window.inner_size()),
                    Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                    Err(_) => {}
                }
            }
            _ => {}
        })
        .unwrap();
}

// ---------------------------------------------------------------- audio

#[derive(Clone, Copy)]
enum WaveKind {
    Sine,
    Saw,
}

#[derive(Clone)]
struct ActiveOscillator {
    amplitude: f32,
    phase: f32,     // radians
    phase_inc: f32, // radians per sample
    total_samples: u32,
    samples_emitted: u32,
    attack_samples: u32,
    release_samples: u32,
    wave: WaveKind,
}

struct AudioState {
    sample_rate: f32,
    oscillators: Vec<ActiveOscillator>,
}

/// Best-effort engine-start sound: a short synthesized rumble through cpal.
/// If no output device exists the showcase simply runs silent.
struct EngineAudio {
    state: Option<Arc<Mutex<AudioState>>>,
    _stream: Option<cpal::Stream>,
}

impl EngineAudio {
    fn start() -> Self {
        match build_output() {
            Some((state, stream)) => Self {
                state: Some(state),
                _stream: Some(stream),
            },
            None => {
                log::warn!("no audio output; engine sound disabled");
                Self {
                    state: None,
                    _stream: None,
                }
            }
        }
    }

    /// Layer two low oscillators with a quick attack and a long release.
    fn trigger_engine_rumble(&self) {
        let Some(state) = &self.state else { return };
        let mut guard = state.lock().unwrap();
        let sr = guard.sample_rate;
        let layers: [(f32, f32, WaveKind); 3] = [
            (38.0, 0.50, WaveKind::Sine),
            (55.0, 0.35, WaveKind::Saw),
            (110.0, 0.18, WaveKind::Saw),
        ];
        for (freq, amp, wave) in layers {
            let total = (1.6 * sr) as u32;
            guard.oscillators.push(ActiveOscillator {
                amplitude: amp,
                phase: 0.0,
                phase_inc: 2.0 * std::f32::consts::PI * freq / sr,
                total_samples: total.max(1),
                samples_emitted: 0,
                attack_samples: (0.05 * sr) as u32,
                release_samples: (0.9 * sr) as u32,
                wave,
            });
        }
    }
}

fn build_output() -> Option<(Arc<Mutex<AudioState>>, cpal::Stream)> {
    let host = cpal::default_host();
    let device = host.default_output_device()?;
    let config = device.default_output_config().ok()?;
    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let state = Arc::new(Mutex::new(AudioState {
        sample_rate,
        oscillators: Vec::new(),
    }));

    let err_fn = |err| eprintln!("audio stream error: {err}");
    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => {
            build_stream_f32(&device, &config.into(), channels, Arc::clone(&state), err_fn).ok()?
        }
        cpal::SampleFormat::I16 => {
            build_stream_i16(&device, &config.into(), channels, Arc::clone(&state), err_fn).ok()?
        }
        _ => return None,
    };
    stream.play().ok()?;
    Some((state, stream))
}

fn render_wave_sample(phase: f32, wave: WaveKind) -> f32 {
    match wave {
        WaveKind::Sine => phase.sin(),
        WaveKind::Saw => {
            let t = phase / (2.0 * std::f32::consts::PI);
            (2.0 * (t - t.floor())) * 2.0 - 1.0
        }
    }
}

fn mix_sample(oscillators: &mut Vec<ActiveOscillator>) -> f32 {
    let mut mixed = 0.0f32;
    let mut i = 0usize;
    while i < oscillators.len() {
        let osc = &mut oscillators[i];
        let n = osc.samples_emitted;
        let a = if n < osc.attack_samples {
            n as f32 / osc.attack_samples.max(1) as f32
        } else if n > osc.total_samples.saturating_sub(osc.release_samples) {
            let rel_n = n.saturating_sub(osc.total_samples - osc.release_samples);
            1.0 - (rel_n as f32 / osc.release_samples.max(1) as f32)
        } else {
            1.0
        };
        mixed += render_wave_sample(osc.phase, osc.wave) * osc.amplitude * a;
        osc.phase += osc.phase_inc;
        if osc.phase > 2.0 * std::f32::consts::PI {
            osc.phase -= 2.0 * std::f32::consts::PI;
        }
        osc.samples_emitted += 1;
        if osc.samples_emitted >= osc.total_samples {
            oscillators.swap_remove(i);
            continue;
        }
        i += 1;
    }
    mixed.tanh()
}

fn build_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    state: Arc<Mutex<AudioState>>,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    device.build_output_stream(
        config,
        move |data: &mut [f32], _| {
            let mut guard = state.lock().unwrap();
            let oscillators = &mut guard.oscillators;
            for frame in data.chunks_mut(channels) {
                let v = mix_sample(oscillators);
                for sample in frame {
                    *sample = v;
                }
            }
        },
        err_fn,
        None,
    )
}

fn build_stream_i16(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    state: Arc<Mutex<AudioState>>,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    device.build_output_stream(
        config,
        move |data: &mut [i16], _| {
            let mut guard = state.lock().unwrap();
            let oscillators = &mut guard.oscillators;
            for frame in data.chunks_mut(channels) {
                let v = (mix_sample(oscillators) * i16::MAX as f32) as i16;
                for sample in frame {
                    *sample = v;
                }
            }
        },
        err_fn,
        None,
    )
}
