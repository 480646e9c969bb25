use std::borrow::Cow;
use std::path::Path;

use image::imageops::flip_vertical_in_place;
use wgpu::util::{BufferInitDescriptor, DeviceExt, TextureDataOrder};

use crate::compile::{CompileError, ComputeShaderInfo};
use crate::gpu::uniforms::SceneUniforms;

/// A linked compute program plus its declared work-group size.
///
/// Owned by the reload controller's program slot; a successful reload drops
/// the previous instance when the new one is installed.
pub(crate) struct ComputeProgram {
    pub pipeline: wgpu::ComputePipeline,
    pub workgroup_size: (u32, u32),
}

impl ComputeProgram {
    /// Builds the pipeline from an already-validated naga module.
    ///
    /// Creation runs inside a validation error scope so a rejected module or
    /// pipeline surfaces as a recoverable `CompileError` instead of an
    /// uncaptured device error.
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        info: ComputeShaderInfo,
    ) -> Result<Self, CompileError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene compute shader"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(info.module)),
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("scene compute pipeline"),
            layout: Some(layout),
            module: &module,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(CompileError::Pipeline(err.to_string()));
        }

        Ok(Self {
            pipeline,
            workgroup_size: info.workgroup_size,
        })
    }
}

/// Floor texture plus sampler, kept alive for the bind group.
struct FloorResources {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

/// Fixed GPU resources shared by every compiled program: the uniform buffer,
/// the output storage texture, and the floor texture.
///
/// The bind group layout is part of the reload contract — every recompiled
/// shader binds the same four slots, so programs can be swapped without
/// touching any resource.
pub(crate) struct ComputeResources {
    pub pipeline_layout: wgpu::PipelineLayout,
    pub bind_group: wgpu::BindGroup,
    pub uniform_buffer: wgpu::Buffer,
    pub output_view: wgpu::TextureView,
    _output_texture: wgpu::Texture,
    _floor: FloorResources,
}

impl ComputeResources {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        resolution: u32,
        floor_texture: Option<&Path>,
        uniforms: &SceneUniforms,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("compute bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: wgpu::TextureFormat::Rgba32Float,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("compute pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let uniform_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("scene uniforms"),
            contents: bytemuck::bytes_of(uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Allocated once at startup, never resized.
        let output_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ray-traced output"),
            size: wgpu::Extent3d {
                width: resolution,
                height: resolution,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba32Float,
            usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let output_view = output_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let floor = create_floor_resources(device, queue, floor_texture);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("compute bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&output_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&floor.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&floor.sampler),
                },
            ],
        });

        Self {
            pipeline_layout,
            bind_group,
            uniform_buffer,
            output_view,
            _output_texture: output_texture,
            _floor: floor,
        }
    }
}

/// Loads the floor texture, falling back to a flat placeholder when no path
/// is configured or the file cannot be decoded.
fn create_floor_resources(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: Option<&Path>,
) -> FloorResources {
    match path {
        Some(path) => match load_floor_texture(device, queue, path) {
            Ok(resources) => resources,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to load floor texture; using placeholder"
                );
                create_placeholder_floor(device, queue)
            }
        },
        None => create_placeholder_floor(device, queue),
    }
}

fn create_placeholder_floor(device: &wgpu::Device, queue: &wgpu::Queue) -> FloorResources {
    let data = [96u8, 96, 96, 255];
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("placeholder floor texture"),
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
        },
        TextureDataOrder::LayerMajor,
        &data,
    );

    FloorResources {
        view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
        sampler: create_floor_sampler(device),
        _texture: texture,
    }
}

fn load_floor_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
) -> anyhow::Result<FloorResources> {
    use anyhow::Context;

    let image = image::open(path)
        .with_context(|| format!("failed to open floor texture at {}", path.display()))?;

    let mut rgba = image.to_rgba8();
    let width = rgba.width();
    let height = rgba.height();
    if width == 0 || height == 0 {
        anyhow::bail!("floor texture has zero extent ({width}x{height})");
    }

    flip_vertical_in_place(&mut rgba);

    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("floor texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        rgba.as_raw(),
    );

    tracing::info!(path = %path.display(), width, height, "loaded floor texture");

    Ok(FloorResources {
        view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
        sampler: create_floor_sampler(device),
        _texture: texture,
    })
}

fn create_floor_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("floor sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
