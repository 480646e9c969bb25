/// Fixed amount `time` advances per update phase.
///
/// Playback speed is deliberately tied to frame rate rather than wall-clock
/// time.
pub const TIME_STEP: f32 = 0.01;

/// Range and default of one debug slider, plus its on-screen label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSpec {
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl SliderSpec {
    pub const fn new(label: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            label,
            min,
            max,
            default,
        }
    }

    pub fn range(&self) -> std::ops::RangeInclusive<f32> {
        self.min..=self.max
    }
}

/// Specs for all nine debug sliders. Every slider carries a distinct label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSpecs {
    pub intensity: SliderSpec,
    pub light_x: SliderSpec,
    pub light_z: SliderSpec,
    pub light_height: SliderSpec,
    pub exposure: SliderSpec,
    pub rotation: SliderSpec,
    pub orbit_distance: SliderSpec,
    pub orbit_height: SliderSpec,
    pub recompile_interval: SliderSpec,
}

impl Default for SliderSpecs {
    fn default() -> Self {
        Self {
            intensity: SliderSpec::new("Intensity", 0.0, 10.0, 1.0),
            light_x: SliderSpec::new("Light x", -5.0, 5.0, 0.0),
            light_z: SliderSpec::new("Light z", -5.0, 5.0, 0.0),
            light_height: SliderSpec::new("Light height", -1.0, 10.0, 0.0),
            exposure: SliderSpec::new("Exposure", -1.0, 10.0, 1.0),
            rotation: SliderSpec::new("Rotation", -std::f32::consts::PI, std::f32::consts::PI, 0.2),
            orbit_distance: SliderSpec::new("Orbit distance", 0.0, 20.0, 8.0),
            orbit_height: SliderSpec::new("Orbit height", -5.0, 10.0, 2.0),
            recompile_interval: SliderSpec::new("Recompile every N frames", 0.0, 1000.0, 0.0),
        }
    }
}

/// Scene parameters consumed by the camera and the uniform upload.
///
/// The sliders mutate this struct between frames; the update phase takes an
/// immutable copy and threads it through the rest of the frame so there are
/// no ordering dependencies on ambient state. `time` is the only field owned
/// by the loop itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneParameters {
    pub rotation_angle: f32,
    pub orbit_distance: f32,
    pub orbit_height: f32,
    pub light_x: f32,
    pub light_height: f32,
    pub light_z: f32,
    pub intensity: f32,
    pub exposure: f32,
    pub time: f32,
}

impl SceneParameters {
    /// Seeds every parameter from its slider default, with `time` at zero.
    pub fn from_specs(specs: &SliderSpecs) -> Self {
        Self {
            rotation_angle: specs.rotation.default,
            orbit_distance: specs.orbit_distance.default,
            orbit_height: specs.orbit_height.default,
            light_x: specs.light_x.default,
            light_height: specs.light_height.default,
            light_z: specs.light_z.default,
            intensity: specs.intensity.default,
            exposure: specs.exposure.default,
            time: 0.0,
        }
    }

    /// Advances `time` by the fixed per-frame step.
    pub fn advance_time(&mut self) {
        self.time += TIME_STEP;
    }
}

impl Default for SceneParameters {
    fn default() -> Self {
        Self::from_specs(&SliderSpecs::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_accumulates_by_fixed_step() {
        let mut params = SceneParameters::default();
        for _ in 0..100 {
            params.advance_time();
        }
        assert!((params.time - 1.0).abs() < 1e-4, "time = {}", params.time);
    }

    #[test]
    fn defaults_follow_slider_specs() {
        let specs = SliderSpecs::default();
        let params = SceneParameters::from_specs(&specs);
        assert_eq!(params.orbit_distance, 8.0);
        assert_eq!(params.orbit_height, 2.0);
        assert_eq!(params.intensity, 1.0);
        assert_eq!(params.time, 0.0);
    }

    #[test]
    fn slider_labels_are_distinct() {
        let specs = SliderSpecs::default();
        let labels = [
            specs.intensity.label,
            specs.light_x.label,
            specs.light_z.label,
            specs.light_height.label,
            specs.exposure.label,
            specs.rotation.label,
            specs.orbit_distance.label,
            specs.orbit_height.label,
            specs.recompile_interval.label,
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in labels.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
