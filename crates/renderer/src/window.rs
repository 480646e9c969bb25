use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::error;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::camera::{orbit_eye, Camera, LOOK_TARGET, WORLD_UP};
use crate::compile::dispatch_extent;
use crate::gpu::blit::BlitPipeline;
use crate::gpu::compute::ComputeResources;
use crate::gpu::context::GpuContext;
use crate::gpu::uniforms::SceneUniforms;
use crate::overlay::{Overlay, PanelState};
use crate::reload::ReloadController;
use crate::scene::{SceneParameters, SliderSpecs};
use crate::types::RendererConfig;

/// Opens the demo window and drives the winit event loop to completion.
pub(crate) fn run(config: RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let mut app = DemoApp::new(config);
    event_loop
        .run_app(&mut app)
        .context("event loop terminated with error")?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// winit application: creates the window and GPU state on `resumed`, then
/// renders one frame per redraw at the configured cadence.
struct DemoApp {
    config: RendererConfig,
    frame_interval: Option<Duration>,
    next_frame: Instant,
    state: Option<WindowState>,
    failure: Option<anyhow::Error>,
}

impl DemoApp {
    fn new(config: RendererConfig) -> Self {
        let frame_interval = config
            .target_fps
            .filter(|fps| *fps > 0.0)
            .map(|fps| Duration::from_secs_f32(1.0 / fps));

        Self {
            config,
            frame_interval,
            next_frame: Instant::now(),
            state: None,
            failure: None,
        }
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match WindowState::new(event_loop, &self.config) {
            Ok(state) => {
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(err) => {
                error!("failed to initialise demo window: {err:?}");
                self.failure = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = self.state.as_ref() else {
            return;
        };

        match self.frame_interval {
            Some(interval) => {
                let now = Instant::now();
                if now >= self.next_frame {
                    // One interval forward from now, so long stalls do not
                    // burst into a run of catch-up frames.
                    self.next_frame = now + interval;
                    state.window.request_redraw();
                }
                event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
            }
            None => {
                event_loop.set_control_flow(ControlFlow::Poll);
                state.window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if window_id != state.window.id() {
            return;
        }

        let response = state.overlay.on_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let space_pressed = event.state == ElementState::Pressed
                    && !event.repeat
                    && matches!(event.physical_key, PhysicalKey::Code(KeyCode::Space));
                if space_pressed && !response.consumed {
                    state.reload();
                }
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                // The output resolution is fixed for the process lifetime;
                // the window is non-resizable and resize events are no-ops.
            }
            WindowEvent::RedrawRequested => match state.render_frame() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    state.gpu.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("surface out of memory; exiting");
                    event_loop.exit();
                }
                Err(wgpu::SurfaceError::Timeout) => {
                    tracing::debug!("surface timeout; retrying next frame");
                }
                Err(other) => {
                    error!("surface error: {other:?}; retrying next frame");
                }
            },
            _ => {}
        }
    }
}

/// Aggregates everything a frame touches: window, GPU state, overlay,
/// reload controller, camera, and the mutable scene parameters.
struct WindowState {
    window: Arc<Window>,
    gpu: GpuContext,
    compute: ComputeResources,
    blit: BlitPipeline,
    overlay: Overlay,
    reload: ReloadController,
    camera: Camera,
    params: SceneParameters,
    specs: SliderSpecs,
    uniforms: SceneUniforms,
    auto_recompile_interval: u32,
    resolution: u32,
}

impl WindowState {
    fn new(event_loop: &ActiveEventLoop, config: &RendererConfig) -> Result<Self> {
        let resolution = config.resolution;
        let attrs = Window::default_attributes()
            .with_title("Ray Lab")
            .with_inner_size(PhysicalSize::new(resolution, resolution))
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create demo window")?,
        );

        let gpu = GpuContext::new(window.clone(), resolution)?;

        let specs = config.sliders;
        let params = SceneParameters::from_specs(&specs);
        let mut camera = Camera::new();
        camera.set_perspective(60.0, 1.0, 1.0, 2.0);
        camera.set_look_at(orbit_eye(&params), LOOK_TARGET, WORLD_UP);

        let mut uniforms = SceneUniforms::new();
        uniforms.update(&params, &camera);

        let compute = ComputeResources::new(
            &gpu.device,
            &gpu.queue,
            resolution,
            config.floor_texture.as_deref(),
            &uniforms,
        );
        let blit = BlitPipeline::new(&gpu.device, gpu.surface_format(), &compute.output_view);
        let overlay = Overlay::new(&window, &gpu.device, gpu.surface_format(), resolution);

        let mut reload = ReloadController::new(config.shader_source.clone());
        reload.reload(&gpu.device, &compute.pipeline_layout);

        Ok(Self {
            window,
            gpu,
            compute,
            blit,
            overlay,
            reload,
            camera,
            params,
            specs,
            uniforms,
            auto_recompile_interval: config.auto_recompile_interval,
            resolution,
        })
    }

    fn reload(&mut self) {
        self.reload
            .reload(&self.gpu.device, &self.compute.pipeline_layout);
    }

    /// One frame: update phase, then render phase, strictly in that order.
    fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Reloads only ever happen between frames; the opt-in cadence check
        // sits before the update phase for the same reason.
        if self.reload.auto_reload_due(self.auto_recompile_interval) {
            self.reload();
        }

        // Update phase: advance fixed-step time, take an immutable snapshot
        // of the parameters, orient the orbit camera, and push uniforms if
        // dispatch is enabled.
        self.params.advance_time();
        let params = self.params;
        self.camera
            .set_look_at(orbit_eye(&params), LOOK_TARGET, WORLD_UP);
        if self.reload.draw_enabled() {
            self.uniforms.update(&params, &self.camera);
            self.gpu.queue.write_buffer(
                &self.compute.uniform_buffer,
                0,
                bytemuck::bytes_of(&self.uniforms),
            );
        }

        // Render phase: overlay UI first (it reads FPS and mutates sliders),
        // then compute dispatch, then the unconditional blit + overlay draw.
        let fps = self.overlay.fps_tick();
        let shader_ok = self.reload.draw_enabled();
        let mut interval = self.auto_recompile_interval;
        let frame_ui = self.overlay.run(
            &self.window,
            PanelState {
                params: &mut self.params,
                specs: &self.specs,
                recompile_interval: &mut interval,
                fps,
                shader_ok,
            },
        );
        self.auto_recompile_interval = interval;

        let frame = self.gpu.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        if self.reload.draw_enabled() {
            if let Some(program) = self.reload.program() {
                let (groups_x, groups_y) = dispatch_extent(self.resolution, program.workgroup_size);
                let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("ray trace pass"),
                    timestamp_writes: None,
                });
                pass.set_pipeline(&program.pipeline);
                pass.set_bind_group(0, &self.compute.bind_group, &[]);
                pass.dispatch_workgroups(groups_x, groups_y, 1);
            }
        }

        self.overlay
            .prepare(&self.gpu.device, &self.gpu.queue, &mut encoder, &frame_ui);

        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("present pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        depth_slice: None,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();
            pass.set_pipeline(&self.blit.pipeline);
            pass.set_bind_group(0, &self.blit.bind_group, &[]);
            pass.draw(0..3, 0..1);
            self.overlay.paint(&mut pass, &frame_ui);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        self.overlay.cleanup(frame_ui);
        Ok(())
    }
}
