use std::time::{Duration, Instant};

use winit::event::WindowEvent;
use winit::window::Window;

use crate::scene::{SceneParameters, SliderSpec, SliderSpecs};

/// Frames-per-second estimate over a rolling window.
struct FpsCounter {
    frames: u32,
    window_start: Instant,
    value: f32,
}

impl FpsCounter {
    const WINDOW: Duration = Duration::from_millis(300);

    fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            window_start: now,
            value: 0.0,
        }
    }

    fn tick(&mut self, now: Instant) -> f32 {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed >= Self::WINDOW {
            self.value = self.frames as f32 / elapsed.as_secs_f32();
            self.frames = 0;
            self.window_start = now;
        }
        self.value
    }
}

/// Everything the debug panel reads and writes during one frame.
pub(crate) struct PanelState<'a> {
    pub params: &'a mut SceneParameters,
    pub specs: &'a SliderSpecs,
    pub recompile_interval: &'a mut u32,
    pub fps: f32,
    pub shader_ok: bool,
}

/// Tessellated UI for one frame, handed back to the render pass.
pub(crate) struct OverlayFrame {
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
}

/// egui context, winit bridge, and wgpu renderer for the debug overlay.
///
/// The overlay draws the FPS readout and the nine debug sliders; the
/// ray-traced scene never shows error state, only the panel does.
pub(crate) struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    screen: egui_wgpu::ScreenDescriptor,
    fps: FpsCounter,
}

impl Overlay {
    pub fn new(
        window: &Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        resolution: u32,
    ) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            egui_wgpu::RendererOptions {
                msaa_samples: 1,
                depth_stencil_format: None,
                dithering: false,
                ..egui_wgpu::RendererOptions::default()
            },
        );
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [resolution, resolution],
            pixels_per_point: window.scale_factor() as f32,
        };

        Self {
            ctx,
            state,
            renderer,
            screen,
            fps: FpsCounter::new(Instant::now()),
        }
    }

    /// Forwards a window event to egui; the caller checks `consumed` before
    /// acting on keys the panel may have swallowed.
    pub fn on_window_event(
        &mut self,
        window: &Window,
        event: &WindowEvent,
    ) -> egui_winit::EventResponse {
        self.state.on_window_event(window, event)
    }

    /// Counts the frame and returns the current FPS estimate.
    pub fn fps_tick(&mut self) -> f32 {
        self.fps.tick(Instant::now())
    }

    /// Runs the UI for this frame and tessellates it.
    pub fn run(&mut self, window: &Window, panel: PanelState<'_>) -> OverlayFrame {
        let raw_input = self.state.take_egui_input(window);
        let mut panel = panel;
        let full_output = self.ctx.run(raw_input, |ctx| draw_panel(ctx, &mut panel));
        self.state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, self.screen.pixels_per_point);

        OverlayFrame {
            paint_jobs,
            textures_delta: full_output.textures_delta,
        }
    }

    /// Uploads textures and buffers ahead of the render pass.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        frame: &OverlayFrame,
    ) {
        for (id, delta) in &frame.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        let _ = self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &frame.paint_jobs,
            &self.screen,
        );
    }

    /// Draws the UI into the pass; the scene blit must already be recorded.
    pub fn paint(&mut self, pass: &mut wgpu::RenderPass<'static>, frame: &OverlayFrame) {
        self.renderer.render(pass, &frame.paint_jobs, &self.screen);
    }

    /// Releases textures egui freed this frame.
    pub fn cleanup(&mut self, frame: OverlayFrame) {
        for id in &frame.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

fn draw_panel(ctx: &egui::Context, state: &mut PanelState<'_>) {
    egui::TopBottomPanel::top("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("FPS: {:.0}", state.fps));
            if !state.shader_ok {
                ui.separator();
                ui.colored_label(
                    egui::Color32::from_rgb(230, 90, 70),
                    "shader error - see log",
                );
            }
        });
    });

    egui::SidePanel::left("sliders")
        .resizable(false)
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("Scene");
            slider(ui, &mut state.params.intensity, &state.specs.intensity);
            slider(ui, &mut state.params.light_x, &state.specs.light_x);
            slider(ui, &mut state.params.light_z, &state.specs.light_z);
            slider(ui, &mut state.params.light_height, &state.specs.light_height);
            slider(ui, &mut state.params.exposure, &state.specs.exposure);

            ui.separator();
            ui.heading("Camera");
            slider(ui, &mut state.params.rotation_angle, &state.specs.rotation);
            slider(
                ui,
                &mut state.params.orbit_distance,
                &state.specs.orbit_distance,
            );
            slider(
                ui,
                &mut state.params.orbit_height,
                &state.specs.orbit_height,
            );

            ui.separator();
            ui.heading("Shader");
            let spec = &state.specs.recompile_interval;
            let mut interval = *state.recompile_interval as f32;
            if ui
                .add(
                    egui::Slider::new(&mut interval, spec.range())
                        .integer()
                        .text(spec.label),
                )
                .changed()
            {
                *state.recompile_interval = interval as u32;
            }
            ui.label("Space recompiles the shader");
        });
}

fn slider(ui: &mut egui::Ui, value: &mut f32, spec: &SliderSpec) {
    ui.add(egui::Slider::new(value, spec.range()).text(spec.label));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_counter_reports_after_window_elapses() {
        let start = Instant::now();
        let mut counter = FpsCounter::new(start);

        // Frames inside the measurement window leave the estimate untouched.
        for _ in 0..29 {
            assert_eq!(counter.tick(start + Duration::from_millis(100)), 0.0);
        }

        let value = counter.tick(start + Duration::from_secs(1));
        assert!((value - 30.0).abs() < 0.5, "value = {value}");
    }

    #[test]
    fn fps_counter_resets_between_windows() {
        let start = Instant::now();
        let mut counter = FpsCounter::new(start);

        for _ in 0..9 {
            counter.tick(start + Duration::from_millis(50));
        }
        counter.tick(start + Duration::from_millis(500));

        // The next window starts counting from zero frames again.
        let value = counter.tick(start + Duration::from_millis(1500));
        assert!((value - 1.0).abs() < 0.1, "value = {value}");
    }
}
