use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "raylab",
    author,
    version,
    about = "Windowed real-time ray-tracing demo (GPU compute shader)"
)]
pub struct Cli {
    /// Demo profile TOML; falls back to `raylab.toml` in the working
    /// directory when present, then to built-in defaults.
    #[arg(value_name = "PROFILE")]
    pub profile: Option<PathBuf>,

    /// Override the compute shader path from the profile.
    #[arg(long, value_name = "PATH")]
    pub shader: Option<PathBuf>,

    /// Override the square output resolution (e.g. `600` or `600x600`).
    #[arg(long, value_name = "SIZE", value_parser = parse_resolution)]
    pub size: Option<u32>,

    /// Frame-rate cap; 0 = uncapped.
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Recompile the shader every N frames; 0 = disabled.
    #[arg(long, value_name = "FRAMES")]
    pub recompile_every: Option<u32>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_resolution(value: &str) -> Result<u32, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("resolution must not be empty".to_string());
    }

    let side = match trimmed.split_once(['x', 'X']) {
        Some((w, h)) => {
            let width = w
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid width in '{trimmed}'"))?;
            let height = h
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid height in '{trimmed}'"))?;
            if width != height {
                return Err(format!("output must be square; got {width}x{height}"));
            }
            width
        }
        None => trimmed
            .parse::<u32>()
            .map_err(|_| format!("invalid resolution '{trimmed}'; expected N or NxN"))?,
    };

    if side == 0 {
        return Err("resolution must be greater than zero".to_string());
    }
    if side % 8 != 0 {
        return Err(format!(
            "resolution {side} must be a multiple of the 8x8 work-group size"
        ));
    }

    Ok(side)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_resolution_variants() {
        assert_eq!(parse_resolution("600").unwrap(), 600);
        assert_eq!(parse_resolution("600x600").unwrap(), 600);
        assert_eq!(parse_resolution(" 512X512 ").unwrap(), 512);
    }

    #[test]
    fn rejects_bad_resolutions() {
        assert!(parse_resolution("").is_err());
        assert!(parse_resolution("0").is_err());
        assert!(parse_resolution("601").is_err());
        assert!(parse_resolution("640x480").is_err());
        assert!(parse_resolution("abc").is_err());
    }
}
