use democonfig::{DemoProfile, SliderRange};
use renderer::{RendererConfig, SliderSpec, SliderSpecs};

/// Maps a parsed demo profile onto the renderer's configuration.
///
/// Slider labels are owned by the renderer (each of the nine is distinct);
/// the profile only supplies ranges and defaults.
pub fn renderer_config_from_profile(profile: &DemoProfile) -> RendererConfig {
    RendererConfig {
        resolution: profile.resolution,
        shader_source: profile.shader.clone(),
        floor_texture: profile.floor_texture.clone(),
        target_fps: (profile.target_fps > 0.0).then_some(profile.target_fps),
        auto_recompile_interval: profile.auto_recompile_interval,
        sliders: slider_specs_from_profile(profile),
    }
}

fn with_range(spec: SliderSpec, range: SliderRange) -> SliderSpec {
    SliderSpec {
        label: spec.label,
        min: range.min,
        max: range.max,
        default: range.default,
    }
}

fn slider_specs_from_profile(profile: &DemoProfile) -> SliderSpecs {
    let base = SliderSpecs::default();
    let sliders = &profile.sliders;
    SliderSpecs {
        intensity: with_range(base.intensity, sliders.intensity),
        light_x: with_range(base.light_x, sliders.light_x),
        light_z: with_range(base.light_z, sliders.light_z),
        light_height: with_range(base.light_height, sliders.light_height),
        exposure: with_range(base.exposure, sliders.exposure),
        rotation: with_range(base.rotation, sliders.rotation),
        orbit_distance: with_range(base.orbit_distance, sliders.orbit_distance),
        orbit_height: with_range(base.orbit_height, sliders.orbit_height),
        recompile_interval: with_range(base.recompile_interval, sliders.recompile_interval),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_matches_default_specs() {
        let config = renderer_config_from_profile(&DemoProfile::default());
        assert_eq!(config.resolution, 600);
        assert_eq!(config.target_fps, Some(60.0));
        assert_eq!(config.sliders, SliderSpecs::default());
    }

    #[test]
    fn profile_ranges_override_defaults_but_keep_labels() {
        let mut profile = DemoProfile::default();
        profile.sliders.intensity = SliderRange::new(0.0, 4.0, 2.0);
        profile.target_fps = 0.0;

        let config = renderer_config_from_profile(&profile);
        assert_eq!(config.sliders.intensity.max, 4.0);
        assert_eq!(config.sliders.intensity.default, 2.0);
        assert_eq!(
            config.sliders.intensity.label,
            SliderSpecs::default().intensity.label
        );
        // fps == 0 means uncapped.
        assert_eq!(config.target_fps, None);
    }
}
