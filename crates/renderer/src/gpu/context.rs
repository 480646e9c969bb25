use std::sync::Arc;

use anyhow::{Context, Result};
use winit::window::Window;

/// Surface, device, and queue for the demo window.
///
/// The surface is configured once at the fixed demo resolution and never
/// resized; `reconfigure` re-applies the same configuration after a
/// Lost/Outdated surface error.
pub(crate) struct GpuContext {
    /// Kept alive for the lifetime of the surface it produced.
    _instance: wgpu::Instance,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
}

impl GpuContext {
    pub fn new(window: Arc<Window>, resolution: u32) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .context("failed to create rendering surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        tracing::info!(adapter = %info.name, backend = ?info.backend, "selected GPU adapter");

        let limits = adapter.limits();
        if resolution > limits.max_texture_dimension_2d {
            anyhow::bail!(
                "GPU max texture dimension is {}, demo resolution is {resolution}",
                limits.max_texture_dimension_2d
            );
        }

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("raylab device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::default(),
        }))
        .context("failed to create GPU device")?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .unwrap_or(caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: resolution,
            height: resolution,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &config);

        Ok(Self {
            _instance: instance,
            surface,
            device,
            queue,
            config,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Re-applies the fixed-size surface configuration.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}
