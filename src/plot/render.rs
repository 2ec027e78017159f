//! Persist and/or present a built chart.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::CurveError;
use crate::plot::bitmap;
use crate::plot::chart::ChartSpec;

/// Where and how a chart is delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Write a PNG artifact.
    pub persist: bool,
    /// Explicit artifact path; defaults to `{output_dir}/{file_stem}.png`.
    pub output_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// Open the terminal viewer (only when stdout is a terminal).
    pub interactive: bool,
    pub width: u32,
    pub height: u32,
    pub font_path: Option<PathBuf>,
}

impl RenderOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            persist: false,
            output_path: None,
            output_dir: settings.output_dir.clone(),
            interactive: settings.interactive,
            width: settings.image_width,
            height: settings.image_height,
            font_path: settings.font_path.clone(),
        }
    }

    pub fn resolve_output_path(&self, chart: &ChartSpec) -> PathBuf {
        match &self.output_path {
            Some(path) => path.clone(),
            None => self.output_dir.join(format!("{}.png", chart.file_stem)),
        }
    }
}

/// What `render` actually did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOutcome {
    pub saved: Option<PathBuf>,
    pub presented: bool,
}

/// Persist first, then present. Presentation blocks until the viewer is closed.
pub fn render(chart: &ChartSpec, options: &RenderOptions) -> Result<RenderOutcome, CurveError> {
    let mut outcome = RenderOutcome::default();

    if options.persist {
        let path = options.resolve_output_path(chart);
        persist(chart, &path, options)?;
        outcome.saved = Some(path);
    }

    if options.interactive {
        if std::io::stdout().is_terminal() {
            crate::tui::present(chart)?;
            outcome.presented = true;
        } else {
            log::info!("stdout is not a terminal; skipping chart viewer");
        }
    }

    Ok(outcome)
}

fn persist(chart: &ChartSpec, path: &Path, options: &RenderOptions) -> Result<(), CurveError> {
    if options.width == 0 || options.height == 0 {
        return Err(CurveError::Config(format!(
            "image size must be positive, got {}x{}",
            options.width, options.height
        )));
    }
    let text = bitmap::ensure_font(options.font_path.as_deref());
    bitmap::write_png(chart, path, (options.width, options.height), text)
}
