//! Runtime settings resolved from the environment.
//!
//! Values come from process env (a `.env` file is honored via `dotenvy`) and can
//! be overridden per invocation by CLI flags.

use std::path::PathBuf;

use crate::error::CurveError;

pub const ENV_DATA_DIR: &str = "YCP_DATA_DIR";
pub const ENV_OUTPUT_DIR: &str = "YCP_OUTPUT_DIR";
pub const ENV_IMAGE_SIZE: &str = "YCP_IMAGE_SIZE";
pub const ENV_FONT: &str = "YCP_FONT";
pub const ENV_NO_SHOW: &str = "YCP_NO_SHOW";

/// 12x9 inches at 100 dpi.
pub const DEFAULT_IMAGE_SIZE: (u32, u32) = (1200, 900);

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory holding `{name}.csv` curve files.
    pub data_dir: PathBuf,
    /// Directory persisted charts are written to.
    pub output_dir: PathBuf,
    pub image_width: u32,
    pub image_height: u32,
    /// Explicit font file for PNG text; system fonts are tried otherwise.
    pub font_path: Option<PathBuf>,
    /// Present charts in the terminal viewer.
    pub interactive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            image_width: DEFAULT_IMAGE_SIZE.0,
            image_height: DEFAULT_IMAGE_SIZE.1,
            font_path: None,
            interactive: true,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, CurveError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings from an arbitrary key lookup (env, map, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CurveError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(dir) = get(ENV_DATA_DIR) {
            settings.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            settings.output_dir = PathBuf::from(dir);
        }
        if let Some(size) = get(ENV_IMAGE_SIZE) {
            let (w, h) = parse_image_size(&size)
                .map_err(|e| CurveError::Config(format!("{ENV_IMAGE_SIZE}: {e}")))?;
            settings.image_width = w;
            settings.image_height = h;
        }
        settings.font_path = get(ENV_FONT).map(PathBuf::from);
        if let Some(flag) = get(ENV_NO_SHOW) {
            settings.interactive = !parse_flag(&flag)
                .ok_or_else(|| CurveError::Config(format!("{ENV_NO_SHOW}: expected a boolean, got '{flag}'")))?;
        }

        Ok(settings)
    }
}

/// Parse `WIDTHxHEIGHT`.
pub fn parse_image_size(raw: &str) -> Result<(u32, u32), String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{raw}'"))?;
    let w: u32 = w.trim().parse().map_err(|_| format!("invalid width '{w}'"))?;
    let h: u32 = h.trim().parse().map_err(|_| format!("invalid height '{h}'"))?;
    if w < 100 || h < 100 {
        return Err(format!("image size {w}x{h} is too small (min 100x100)"));
    }
    Ok((w, h))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
