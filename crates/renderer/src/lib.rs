//! Renderer crate for raylab, a windowed GPU compute ray-tracing demo.
//!
//! The crate glues a winit window, a wgpu compute pipeline, and an egui debug
//! overlay together. The overall per-frame flow is:
//!
//! ```text
//!   raylab CLI
//!        │ RendererConfig
//!        ▼
//!   Renderer::run ──▶ winit event loop ──▶ render_frame()
//!                                              │
//!            sliders/time ─▶ Camera ─▶ SceneUniforms ─▶ compute dispatch
//!                                              │              │
//!                                              ▼              ▼
//!                                        egui overlay    output texture
//!                                              └──────┬───────┘
//!                                                     ▼
//!                                          full-screen blit + present
//! ```
//!
//! Orthogonal to that flow sits the shader reload controller: it compiles
//! the GLSL compute source from disk (at startup, on Space, or on an opt-in
//! frame cadence) and gates the dispatch step off whenever the most recent
//! attempt failed, leaving the last good program and frame contents alone.

mod camera;
mod compile;
mod gpu;
mod overlay;
mod reload;
mod scene;
mod types;
mod window;

pub use camera::{orbit_eye, Camera, LOOK_TARGET, WORLD_UP};
pub use compile::{dispatch_extent, reflect, CompileError, ComputeShaderInfo};
pub use scene::{SceneParameters, SliderSpec, SliderSpecs, TIME_STEP};
pub use types::RendererConfig;

use anyhow::Result;

/// High-level entry point that owns the chosen configuration.
///
/// The heavy lifting lives in the window module; `Renderer` simply hands the
/// configuration to the event loop.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the demo window and blocks until it closes.
    ///
    /// Returns an error when the platform refuses a window or GPU device;
    /// shader compile failures are not errors at this level, they only gate
    /// dispatch off.
    pub fn run(&mut self) -> Result<()> {
        window::run(self.config.clone())
    }
}
