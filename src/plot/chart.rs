//! Render-only chart description.
//!
//! A `ChartSpec` is everything a surface needs to draw: labels, bounds and the
//! styled series. It is produced by a comparison request and consumed by the
//! raster writer or the terminal viewer; neither of them makes data decisions.

use crate::plot::style::SeriesStyle;

pub const DEFAULT_X_LABEL: &str = "Time to maturity";
pub const DEFAULT_Y_LABEL: &str = "Yield";

/// One plotted series.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    /// Stable key used to address the series in style overrides.
    pub key: String,
    /// Legend text.
    pub label: String,
    pub style: SeriesStyle,
    /// `(timeToMaturity, value)` pairs.
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<PlotSeries>,
    /// X bounds (years).
    pub x_bounds: [f64; 2],
    /// Y bounds, padded.
    pub y_bounds: [f64; 2],
    /// Artifact file name without extension.
    pub file_stem: String,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, file_stem: impl Into<String>, series: Vec<PlotSeries>) -> Self {
        let (x_bounds, y_bounds) = bounds(&series);
        Self {
            title: title.into(),
            x_label: DEFAULT_X_LABEL.to_string(),
            y_label: DEFAULT_Y_LABEL.to_string(),
            series,
            x_bounds,
            y_bounds,
            file_stem: file_stem.into(),
        }
    }

    pub fn series_keys(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.key.as_str())
    }
}

/// Data bounds over all finite points, with 5% vertical padding.
fn bounds(series: &[PlotSeries]) -> ([f64; 2], [f64; 2]) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);

    for &(x, y) in series.iter().flat_map(|s| s.points.iter()) {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !x_min.is_finite() || !x_max.is_finite() {
        x_min = 0.0;
        x_max = 1.0;
    }
    if x_max <= x_min {
        x_min -= 0.5;
        x_max += 0.5;
    }

    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }
    if y_max <= y_min {
        let half = (y_min.abs() * 0.05).max(1e-4);
        y_min -= half;
        y_max += half;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    ([x_min, x_max], [y_min - pad, y_max + pad])
}
