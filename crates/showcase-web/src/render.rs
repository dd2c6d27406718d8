use glam::{Mat4, Vec3};
use showcase_core::asset::{CarModel, EnvironmentMap, MeshPrimitive, TextureData};
use showcase_core::{DecorConfig, BODY_ENV_BOOST, BODY_METALLIC, BODY_ROUGHNESS, PARTICLE_SIZE, XRAY_COLOR, XRAY_OPACITY};
use web_sys as web;
use wgpu;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Globals {
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
pub(crate) struct DrawUniforms {
    model: [[f32; 4]; 4],
    base_color: [f32; 4],
    material: [f32; 4],
    uv_repeat: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
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
pub(crate) struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ParticleInstance {
    pos: [f32; 3],
    size: f32,
    color: [f32; 4],
}

pub struct RenderTargets {
    pub hdr_tex: wgpu::Texture,
    pub hdr_view: wgpu::TextureView,
    pub depth_tex: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
    pub bloom_a: wgpu::Texture,
    pub bloom_a_view: wgpu::TextureView,
    pub bloom_b: wgpu::Texture,
    pub bloom_b_view: wgpu::TextureView,
}

/// One uploaded primitive: geometry plus its per-draw uniform slot.
pub struct GpuPrimitive {
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

/// Everything the renderer passes through per frame.
pub struct FrameParams<'p> {
    pub eye: Vec3,
    pub target: Vec3,
    pub particle_positions: &'p [Vec3],
    pub car_transform: Mat4,
    pub ground_offset_z: f32,
    pub paint_rgb: [f32; 3],
    pub xray: bool,
    pub chroma_amount: f32,
    pub dt_sec: f32,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    decor: DecorConfig,

    // Scene pipelines
    sky_pipeline: wgpu::RenderPipeline,
    mesh_pipeline: wgpu::RenderPipeline,
    particle_pipeline: wgpu::RenderPipeline,

    globals_buf: wgpu::Buffer,
    globals_bgl: wgpu::BindGroupLayout,
    globals_bind_group: wgpu::BindGroup,
    env_view: wgpu::TextureView,
    env_sampler: wgpu::Sampler,

    draw_bgl: wgpu::BindGroupLayout,
    draw_sampler: wgpu::Sampler,
    white_view: wgpu::TextureView,

    ground: GpuPrimitive,
    ground_texture_view: Option<wgpu::TextureView>,
    car: Vec<GpuPrimitive>,
    fallback: Option<GpuPrimitive>,

    particle_vb: wgpu::Buffer,
    particle_capacity: usize,

    // Post-processing resources
    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    post_bgl0: wgpu::BindGroupLayout,
    post_bgl1: wgpu::BindGroupLayout,
    post_uniform_buf: wgpu::Buffer,
    bg_hdr: wgpu::BindGroup,
    bg_from_bloom_a: wgpu::BindGroup,
    bg_from_bloom_b: wgpu::BindGroup,
    bg_bloom_a_only: wgpu::BindGroup,
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,

    width: u32,
    height: u32,
    time_accum: f32,
}

const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

impl<'a> GpuState<'a> {
    pub async fn new(
        canvas: &'a web::HtmlCanvasElement,
        decor: DecorConfig,
    ) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
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
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let targets = create_targets(&device, width, height);

        // ----- scene shader and bind group layouts -----
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(showcase_core::SCENE_WGSL.into()),
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

        let globals_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let env_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("env_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let draw_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("draw_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Placeholder textures until the real assets land: a dim sky pixel
        // for the environment, plain white for surfaces.
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

        let globals_bind_group = make_globals_bind_group(
            &device,
            &globals_bgl,
            &globals_buf,
            &env_view,
            &env_sampler,
        );

        // ----- scene pipelines -----
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

        let depth_for = |write: bool, compare: wgpu::CompareFunction| {
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
            depth_stencil: depth_for(false, wgpu::CompareFunction::Always),
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
            depth_stencil: depth_for(true, wgpu::CompareFunction::Less),
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
            depth_stencil: depth_for(false, wgpu::CompareFunction::Less),
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

        // ----- ground plane -----
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

        // ----- post shader + pipelines -----
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(showcase_core::POST_WGSL.into()),
        });
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let post_bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl0"),
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
        let post_bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl1"),
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
            ],
        });
        let post_uniform_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("post_uniforms"),
            size: std::mem::size_of::<PostUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let (bg_hdr, bg_from_bloom_a, bg_from_bloom_b, bg_bloom_a_only) = make_post_bind_groups(
            &device,
            &post_bgl0,
            &post_bgl1,
            &post_uniform_buf,
            &linear_sampler,
            &targets,
        );

        let post_pl0 = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_0"),
            bind_group_layouts: &[&post_bgl0],
            push_constant_ranges: &[],
        });
        let post_pl_comp = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_comp"),
            bind_group_layouts: &[&post_bgl0, &post_bgl1],
            push_constant_ranges: &[],
        });
        let make_post_pipeline = |label: &str,
                                  layout: &wgpu::PipelineLayout,
                                  entry: &str,
                                  target: wgpu::TextureFormat| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
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
                    entry_point: Some(entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: target,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                cache: None,
                multiview: None,
            })
        };
        let bright_pipeline = make_post_pipeline("bright_pipeline", &post_pl0, "fs_bright", HDR_FORMAT);
        let blur_pipeline = make_post_pipeline("blur_pipeline", &post_pl0, "fs_blur", HDR_FORMAT);
        let composite_pipeline =
            make_post_pipeline("composite_pipeline", &post_pl_comp, "fs_composite", format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            decor,
            sky_pipeline,
            mesh_pipeline,
            particle_pipeline,
            globals_buf,
            globals_bgl,
            globals_bind_group,
            env_view,
            env_sampler,
            draw_bgl,
            draw_sampler,
            white_view,
            ground,
            ground_texture_view: None,
            car: Vec::new(),
            fallback: None,
            particle_vb,
            particle_capacity,
            targets,
            linear_sampler,
            post_bgl0,
            post_bgl1,
            post_uniform_buf,
            bg_hdr,
            bg_from_bloom_a,
            bg_from_bloom_b,
            bg_bloom_a_only,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            width,
            height,
            time_accum: 0.0,
        })
    }

    /// Upload the parsed car: one vertex/index/uniform set per primitive.
    pub fn upload_model(&mut self, model: &CarModel) {
        self.car.clear();
        for prim in &model.primitives {
            self.car.push(self.upload_primitive(prim, [1.0, 1.0]));
        }
        log::info!("uploaded car: {} primitives", self.car.len());
    }

    pub fn upload_fallback(&mut self, prim: &MeshPrimitive) {
        self.fallback = Some(self.upload_primitive(prim, [1.0, 1.0]));
    }

    fn upload_primitive(&self, prim: &MeshPrimitive, uv_repeat: [f32; 2]) -> GpuPrimitive {
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
            uv_repeat,
        )
    }

    /// Swap in the decoded HDR panorama as the environment and background.
    pub fn set_environment(&mut self, env: &EnvironmentMap) {
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

    /// Swap the ground's white placeholder for the decoded color map.
    pub fn set_ground_texture(&mut self, tex: &TextureData) {
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
        self.ground_texture_view = Some(view);
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.targets = create_targets(&self.device, width, height);
            let (bg_hdr, bg_a, bg_b, bg_a_only) = make_post_bind_groups(
                &self.device,
                &self.post_bgl0,
                &self.post_bgl1,
                &self.post_uniform_buf,
                &self.linear_sampler,
                &self.targets,
            );
            self.bg_hdr = bg_hdr;
            self.bg_from_bloom_a = bg_a;
            self.bg_from_bloom_b = bg_b;
            self.bg_bloom_a_only = bg_a_only;
        }
    }

    pub fn render(&mut self, params: &FrameParams) -> Result<(), wgpu::SurfaceError> {
        self.time_accum += params.dt_sec;
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Globals
        let aspect = self.width.max(1) as f32 / self.height.max(1) as f32;
        let mut camera = showcase_core::Camera::showcase_default(aspect);
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

        // Per-draw uniforms
        let ground_model = Mat4::from_translation(Vec3::new(0.0, 0.0, params.ground_offset_z));
        write_draw_uniforms(&self.queue, &self.ground, ground_model, params, false);
        if let Some(fallback) = &self.fallback {
            write_draw_uniforms(&self.queue, fallback, Mat4::IDENTITY, params, false);
        }
        for prim in &self.car {
            write_draw_uniforms(&self.queue, prim, params.car_transform, params, true);
        }

        // Particle instances
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

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.hdr_view,
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
                    view: &self.targets.depth_view,
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

        // Post chain: bright -> blur H -> blur V -> composite.
        let half_res = [
            (self.width.max(1) / 2).max(1) as f32,
            (self.height.max(1) / 2).max(1) as f32,
        ];
        let mut post = PostUniforms {
            resolution: half_res,
            time: self.time_accum,
            exposure: self.decor.exposure,
            blur_dir: [0.0, 0.0],
            bloom_strength: self.decor.bloom.strength,
            threshold: self.decor.bloom.threshold,
            chroma_amount: params.chroma_amount,
            bloom_radius: self.decor.bloom.radius * 4.0,
            _pad: [0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.post_uniform_buf, 0, bytemuck::bytes_of(&post));
        self.blit(
            &mut encoder,
            "bright_pass",
            &self.targets.bloom_a_view,
            &self.bright_pipeline,
            &self.bg_hdr,
            None,
        );

        post.blur_dir = [1.0, 0.0];
        self.queue
            .write_buffer(&self.post_uniform_buf, 0, bytemuck::bytes_of(&post));
        self.blit(
            &mut encoder,
            "blur_h",
            &self.targets.bloom_b_view,
            &self.blur_pipeline,
            &self.bg_from_bloom_a,
            None,
        );

        post.blur_dir = [0.0, 1.0];
        self.queue
            .write_buffer(&self.post_uniform_buf, 0, bytemuck::bytes_of(&post));
        self.blit(
            &mut encoder,
            "blur_v",
            &self.targets.bloom_a_view,
            &self.blur_pipeline,
            &self.bg_from_bloom_b,
            None,
        );

        post.blur_dir = [0.0, 0.0];
        self.queue
            .write_buffer(&self.post_uniform_buf, 0, bytemuck::bytes_of(&post));
        self.blit(
            &mut encoder,
            "composite",
            &view,
            &self.composite_pipeline,
            &self.bg_hdr,
            Some(&self.bg_bloom_a_only),
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn blit(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        label: &str,
        target: &wgpu::TextureView,
        pipeline: &wgpu::RenderPipeline,
        bg0: &wgpu::BindGroup,
        bg1: Option<&wgpu::BindGroup>,
    ) {
        let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
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
        r.set_pipeline(pipeline);
        r.set_bind_group(0, bg0, &[]);
        if let Some(g1) = bg1 {
            r.set_bind_group(1, g1, &[]);
        }
        r.draw(0..3, 0..1);
        drop(r);
    }
}

// ----------------------------------------------------------------- helpers

fn create_targets(device: &wgpu::Device, width: u32, height: u32) -> RenderTargets {
    let make = |label: &str, w: u32, h: u32, format: wgpu::TextureFormat| {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        })
    };
    let hdr_tex = make("hdr_tex", width.max(1), height.max(1), HDR_FORMAT);
    let hdr_view = hdr_tex.create_view(&wgpu::TextureViewDescriptor::default());
    let depth_tex = device.create_texture(&wgpu::TextureDescriptor {
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
    let depth_view = depth_tex.create_view(&wgpu::TextureViewDescriptor::default());
    let bloom_w = (width.max(1) / 2).max(1);
    let bloom_h = (height.max(1) / 2).max(1);
    let bloom_a = make("bloom_a", bloom_w, bloom_h, HDR_FORMAT);
    let bloom_b = make("bloom_b", bloom_w, bloom_h, HDR_FORMAT);
    let bloom_a_view = bloom_a.create_view(&wgpu::TextureViewDescriptor::default());
    let bloom_b_view = bloom_b.create_view(&wgpu::TextureViewDescriptor::default());
    RenderTargets {
        hdr_tex,
        hdr_view,
        depth_tex,
        depth_view,
        bloom_a,
        bloom_a_view,
        bloom_b,
        bloom_b_view,
    }
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
    use wgpu::util::DeviceExt;
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

/// Resolve this primitive's effective material for the frame and write its
/// uniform slot. X-ray overrides everything; body primitives take the
/// selected paint in place of their authored base color.
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
        (
            prim.base_color,
            [prim.metallic, prim.roughness, 1.0, 0.0],
        )
    };
    let uniforms = DrawUniforms {
        model: model.to_cols_array_2d(),
        base_color,
        material,
        uv_repeat: [prim.uv_repeat[0], prim.uv_repeat[1], 0.0, 0.0],
    };
    queue.write_buffer(&prim.uniform_buf, 0, bytemuck::bytes_of(&uniforms));
}

fn make_post_bind_groups(
    device: &wgpu::Device,
    bgl0: &wgpu::BindGroupLayout,
    bgl1: &wgpu::BindGroupLayout,
    post_uniform_buf: &wgpu::Buffer,
    sampler: &wgpu::Sampler,
    targets: &RenderTargets,
) -> (
    wgpu::BindGroup,
    wgpu::BindGroup,
    wgpu::BindGroup,
    wgpu::BindGroup,
) {
    let make0 = |label: &str, view: &wgpu::TextureView| {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: bgl0,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
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
    };
    let bg_hdr = make0("bg_hdr", &targets.hdr_view);
    let bg_from_bloom_a = make0("bg_from_bloom_a", &targets.bloom_a_view);
    let bg_from_bloom_b = make0("bg_from_bloom_b", &targets.bloom_b_view);
    let bg_bloom_a_only = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("bg_bloom_a_only"),
        layout: bgl1,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    (bg_hdr, bg_from_bloom_a, bg_from_bloom_b, bg_bloom_a_only)
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

/// IEEE 754 binary32 -> binary16 with round-toward-zero; good enough for
/// texture payloads.
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

#[cfg(test)]
mod tests {
    use super::f32_to_f16_bits;

    #[test]
    fn f16_conversion_known_values() {
        assert_eq!(f32_to_f16_bits(0.0), 0x0000);
        assert_eq!(f32_to_f16_bits(1.0), 0x3c00);
        assert_eq!(f32_to_f16_bits(-2.0), 0xc000);
        assert_eq!(f32_to_f16_bits(65504.0), 0x7bff);
        assert_eq!(f32_to_f16_bits(1e9), 0x7c00); // overflow -> inf
    }
}
