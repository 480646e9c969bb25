use std::path::PathBuf;

use crate::scene::SliderSpecs;

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors the demo profile and CLI flags: which shader
/// file to compile, the fixed output resolution, the frame-rate cap, and the
/// slider ranges the overlay exposes.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Square output resolution in physical pixels; fixed for the process
    /// lifetime and required to be a multiple of the shader's work-group
    /// size.
    pub resolution: u32,
    /// Path to the GLSL compute shader, re-read on every reload.
    pub shader_source: PathBuf,
    /// Optional floor texture bound to the compute pass; a broken path falls
    /// back to a placeholder.
    pub floor_texture: Option<PathBuf>,
    /// Frame-rate cap; `None` renders every redraw.
    pub target_fps: Option<f32>,
    /// Recompile the shader every N frames; 0 = disabled.
    pub auto_recompile_interval: u32,
    /// Ranges, defaults, and labels for the debug sliders.
    pub sliders: SliderSpecs,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            resolution: 600,
            shader_source: PathBuf::from("shaders/raytrace.comp"),
            floor_texture: None,
            target_fps: Some(60.0),
            auto_recompile_interval: 0,
            sliders: SliderSpecs::default(),
        }
    }
}
