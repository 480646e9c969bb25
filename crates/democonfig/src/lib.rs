//! Demo profile for the raylab ray-tracing demo.
//!
//! A profile is a small TOML document that pins everything the renderer needs
//! to know before it opens a window: output resolution, shader and floor
//! texture paths, the frame-rate cap, the opt-in auto-recompile interval, and
//! the range/default of every debug slider. Missing tables fall back to the
//! built-in defaults, which reproduce the stock demo scene.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("failed to read profile at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse profile: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid profile: {0}")]
    Invalid(String),
}

/// Range and default value of a single debug slider.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }

    fn validate(&self, name: &str) -> Result<(), ProfileError> {
        if !self.min.is_finite() || !self.max.is_finite() || !self.default.is_finite() {
            return Err(ProfileError::Invalid(format!(
                "slider '{name}' must use finite values"
            )));
        }
        if self.min >= self.max {
            return Err(ProfileError::Invalid(format!(
                "slider '{name}' must satisfy min < max (got {} >= {})",
                self.min, self.max
            )));
        }
        if self.default < self.min || self.default > self.max {
            return Err(ProfileError::Invalid(format!(
                "slider '{name}' default {} is outside [{}, {}]",
                self.default, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// The nine debug sliders of the demo, each with its own distinct name.
///
/// The scene sliders feed the compute shader and the orbit camera; the
/// `recompile_interval` slider adjusts the opt-in auto-recompile cadence at
/// run time. Unknown slider names are rejected rather than silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Sliders {
    #[serde(default = "default_intensity")]
    pub intensity: SliderRange,
    #[serde(default = "default_light_x")]
    pub light_x: SliderRange,
    #[serde(default = "default_light_z")]
    pub light_z: SliderRange,
    #[serde(default = "default_light_height")]
    pub light_height: SliderRange,
    #[serde(default = "default_exposure")]
    pub exposure: SliderRange,
    #[serde(default = "default_rotation")]
    pub rotation: SliderRange,
    #[serde(default = "default_orbit_distance")]
    pub orbit_distance: SliderRange,
    #[serde(default = "default_orbit_height")]
    pub orbit_height: SliderRange,
    #[serde(default = "default_recompile_interval")]
    pub recompile_interval: SliderRange,
}

impl Default for Sliders {
    fn default() -> Self {
        Self {
            intensity: default_intensity(),
            light_x: default_light_x(),
            light_z: default_light_z(),
            light_height: default_light_height(),
            exposure: default_exposure(),
            rotation: default_rotation(),
            orbit_distance: default_orbit_distance(),
            orbit_height: default_orbit_height(),
            recompile_interval: default_recompile_interval(),
        }
    }
}

fn default_intensity() -> SliderRange {
    SliderRange::new(0.0, 10.0, 1.0)
}

fn default_light_x() -> SliderRange {
    SliderRange::new(-5.0, 5.0, 0.0)
}

fn default_light_z() -> SliderRange {
    SliderRange::new(-5.0, 5.0, 0.0)
}

fn default_light_height() -> SliderRange {
    SliderRange::new(-1.0, 10.0, 0.0)
}

fn default_exposure() -> SliderRange {
    SliderRange::new(-1.0, 10.0, 1.0)
}

fn default_rotation() -> SliderRange {
    SliderRange::new(-std::f32::consts::PI, std::f32::consts::PI, 0.2)
}

fn default_orbit_distance() -> SliderRange {
    SliderRange::new(0.0, 20.0, 8.0)
}

fn default_orbit_height() -> SliderRange {
    SliderRange::new(-5.0, 10.0, 2.0)
}

fn default_recompile_interval() -> SliderRange {
    SliderRange::new(0.0, 1000.0, 0.0)
}

/// Full demo profile as parsed from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DemoProfile {
    pub version: u32,
    /// Square output resolution in pixels; must be a multiple of the
    /// shader's 8x8 work-group size.
    #[serde(default = "default_resolution")]
    pub resolution: u32,
    /// Frame-rate cap; 0 = uncapped.
    #[serde(default = "default_target_fps")]
    pub target_fps: f32,
    /// Path of the GLSL compute shader, re-read on every reload.
    #[serde(default = "default_shader")]
    pub shader: PathBuf,
    /// Optional floor texture; a missing or broken path falls back to a
    /// placeholder at run time.
    #[serde(default)]
    pub floor_texture: Option<PathBuf>,
    /// Recompile the shader every N frames; 0 = disabled.
    #[serde(default)]
    pub auto_recompile_interval: u32,
    #[serde(default)]
    pub sliders: Sliders,
}

fn default_resolution() -> u32 {
    600
}

fn default_target_fps() -> f32 {
    60.0
}

fn default_shader() -> PathBuf {
    PathBuf::from("shaders/raytrace.comp")
}

impl Default for DemoProfile {
    fn default() -> Self {
        Self {
            version: 1,
            resolution: default_resolution(),
            target_fps: default_target_fps(),
            shader: default_shader(),
            floor_texture: None,
            auto_recompile_interval: 0,
            sliders: Sliders::default(),
        }
    }
}

impl DemoProfile {
    pub fn from_toml_str(input: &str) -> Result<Self, ProfileError> {
        let profile: DemoProfile = toml::from_str(input)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.version != 1 {
            return Err(ProfileError::Invalid(format!(
                "unsupported profile version {}; expected 1",
                self.version
            )));
        }

        if self.resolution == 0 {
            return Err(ProfileError::Invalid(
                "resolution must be greater than zero".into(),
            ));
        }

        // The bundled shader declares an 8x8 work-group; the dispatch uses
        // exact integer division, so a non-multiple resolution would leave
        // uncovered pixels.
        if self.resolution % 8 != 0 {
            return Err(ProfileError::Invalid(format!(
                "resolution {} must be a multiple of 8",
                self.resolution
            )));
        }

        if !self.target_fps.is_finite() || self.target_fps < 0.0 {
            return Err(ProfileError::Invalid(
                "target_fps must be >= 0 (0 = uncapped)".into(),
            ));
        }

        if self.shader.as_os_str().is_empty() {
            return Err(ProfileError::Invalid("shader path may not be empty".into()));
        }

        self.sliders.intensity.validate("intensity")?;
        self.sliders.light_x.validate("light_x")?;
        self.sliders.light_z.validate("light_z")?;
        self.sliders.light_height.validate("light_height")?;
        self.sliders.exposure.validate("exposure")?;
        self.sliders.rotation.validate("rotation")?;
        self.sliders.orbit_distance.validate("orbit_distance")?;
        self.sliders.orbit_height.validate("orbit_height")?;
        self.sliders.recompile_interval.validate("recompile_interval")?;

        if self.sliders.recompile_interval.min < 0.0 {
            return Err(ProfileError::Invalid(
                "recompile_interval may not go below zero frames".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
version = 1
resolution = 600
target_fps = 60
shader = "shaders/raytrace.comp"
auto_recompile_interval = 120

[sliders.intensity]
min = 0.0
max = 4.0
default = 2.0

[sliders.rotation]
min = -3.0
max = 3.0
default = 0.0
"#;

    #[test]
    fn parses_sample_profile() {
        let profile = DemoProfile::from_toml_str(SAMPLE).expect("parse profile");
        assert_eq!(profile.version, 1);
        assert_eq!(profile.resolution, 600);
        assert_eq!(profile.auto_recompile_interval, 120);
        assert_eq!(profile.sliders.intensity.max, 4.0);
        // Untouched sliders keep their built-in defaults.
        assert_eq!(profile.sliders.orbit_distance.default, 8.0);
    }

    #[test]
    fn default_profile_is_valid() {
        DemoProfile::default().validate().expect("defaults validate");
    }

    #[test]
    fn rejects_unknown_version() {
        let err = DemoProfile::from_toml_str("version = 2").unwrap_err();
        assert!(matches!(err, ProfileError::Invalid(_)));
    }

    #[test]
    fn rejects_non_multiple_resolution() {
        let err = DemoProfile::from_toml_str("version = 1\nresolution = 601").unwrap_err();
        assert!(matches!(err, ProfileError::Invalid(_)));
    }

    #[test]
    fn rejects_inverted_slider_range() {
        let input = r#"
version = 1

[sliders.exposure]
min = 5.0
max = 1.0
default = 2.0
"#;
        let err = DemoProfile::from_toml_str(input).unwrap_err();
        assert!(matches!(err, ProfileError::Invalid(_)));
    }

    #[test]
    fn rejects_default_outside_range() {
        let input = r#"
version = 1

[sliders.light_x]
min = -1.0
max = 1.0
default = 3.0
"#;
        let err = DemoProfile::from_toml_str(input).unwrap_err();
        assert!(matches!(err, ProfileError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_slider() {
        let input = r#"
version = 1

[sliders.bogus]
min = 0.0
max = 1.0
default = 0.5
"#;
        assert!(matches!(
            DemoProfile::from_toml_str(input).unwrap_err(),
            ProfileError::Parse(_)
        ));
    }

    #[test]
    fn loads_profile_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write profile");
        let profile = DemoProfile::load(file.path()).expect("load profile");
        assert_eq!(profile.sliders.intensity.default, 2.0);
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = DemoProfile::load(Path::new("/nonexistent/raylab.toml")).unwrap_err();
        assert!(matches!(err, ProfileError::Io { .. }));
    }
}
