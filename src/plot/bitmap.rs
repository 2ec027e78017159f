//! PNG artifacts.
//!
//! Charts are drawn into an in-memory RGB buffer and only written to disk once
//! drawing succeeded, so a failed render never leaves a half-drawn file behind.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use plotters::prelude::*;

use crate::error::CurveError;
use crate::plot::chart::ChartSpec;
use crate::plot::draw::{DrawMode, draw_chart};

/// Font files tried when none is configured.
const SYSTEM_FONTS: [&str; 6] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT_READY: OnceLock<bool> = OnceLock::new();

/// Register a `sans-serif` font with Plotters once per process.
///
/// Returns whether text can be drawn. The first call decides; later calls
/// reuse its outcome regardless of `configured`.
pub fn ensure_font(configured: Option<&Path>) -> bool {
    *FONT_READY.get_or_init(|| {
        let candidates = configured
            .map(Path::to_path_buf)
            .into_iter()
            .chain(SYSTEM_FONTS.iter().map(PathBuf::from));

        for path in candidates {
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };
            // Plotters keeps registered fonts for the life of the process.
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            match plotters::style::register_font("sans-serif", plotters::style::FontStyle::Normal, bytes) {
                Ok(()) => {
                    log::debug!("registered chart font {}", path.display());
                    return true;
                }
                Err(_) => log::warn!("ignoring unreadable font {}", path.display()),
            }
        }

        log::warn!("no usable font found (set YCP_FONT); charts are saved without text");
        false
    })
}

/// Draw `chart` to a PNG at `path`, overwriting any existing file.
pub fn write_png(
    chart: &ChartSpec,
    path: &Path,
    (width, height): (u32, u32),
    text: bool,
) -> Result<(), CurveError> {
    let target = path.display().to_string();
    let mut buffer = vec![0u8; width as usize * height as usize * 3];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| CurveError::render(&target, e))?;
        draw_chart(&root, chart, DrawMode::Raster { text }).map_err(|e| CurveError::render(&target, e))?;
        root.present().map_err(|e| CurveError::render(&target, e))?;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| CurveError::render(&target, format!("failed to create output directory: {e}")))?;
    }

    let image = image::RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| CurveError::render(&target, "raster buffer has the wrong size"))?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| CurveError::render(&target, e))?;

    log::info!("saved chart '{}' to {}", chart.title, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SeriesName, fixtures};
    use crate::plot::compare::{Comparison, ComparisonRequest};

    #[test]
    fn writes_png_with_expected_dimensions() {
        let a = fixtures::discount("A", &[1.0, 2.0, 3.0], &[0.01, 0.02, 0.025]);
        let b = fixtures::discount("B", &[1.0, 2.0, 3.0], &[0.015, 0.019, 0.024]);
        let chart = ComparisonRequest::new(Comparison::Pairwise {
            first: &a,
            second: &b,
            series: SeriesName::SimpleRate,
        })
        .build()
        .unwrap();

        let dir = std::env::temp_dir().join(format!("ycp-bitmap-{}", std::process::id()));
        let path = dir.join("nested").join(format!("{}.png", chart.file_stem));

        // Text off keeps the test independent of installed fonts.
        write_png(&chart, &path, (320, 240), false).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (320, 240));

        // A second write to the same path overwrites it.
        write_png(&chart, &path, (400, 300), false).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (400, 300));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
