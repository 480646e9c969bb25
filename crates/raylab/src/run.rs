use std::path::Path;

use anyhow::{Context, Result};
use democonfig::DemoProfile;
use renderer::Renderer;
use tracing_subscriber::EnvFilter;

use crate::bindings::renderer_config_from_profile;
use crate::cli::Cli;

const DEFAULT_PROFILE: &str = "raylab.toml";

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let profile = load_profile(cli.profile.as_deref())?;
    let mut config = renderer_config_from_profile(&profile);

    if let Some(shader) = cli.shader {
        config.shader_source = shader;
    }
    if let Some(size) = cli.size {
        config.resolution = size;
    }
    if let Some(fps) = cli.fps {
        config.target_fps = (fps > 0.0).then_some(fps);
    }
    if let Some(frames) = cli.recompile_every {
        config.auto_recompile_interval = frames;
    }

    tracing::info!(
        resolution = config.resolution,
        shader = %config.shader_source.display(),
        fps = ?config.target_fps,
        auto_recompile_interval = config.auto_recompile_interval,
        "starting raylab"
    );

    Renderer::new(config).run()
}

fn load_profile(path: Option<&Path>) -> Result<DemoProfile> {
    match path {
        Some(path) => DemoProfile::load(path)
            .with_context(|| format!("failed to load profile {}", path.display())),
        None => {
            let fallback = Path::new(DEFAULT_PROFILE);
            if fallback.exists() {
                tracing::debug!(path = %fallback.display(), "using profile from working directory");
                DemoProfile::load(fallback)
                    .with_context(|| format!("failed to load profile {}", fallback.display()))
            } else {
                Ok(DemoProfile::default())
            }
        }
    }
}
