//! Chart building and rendering.
//!
//! - `compare`: turns curves plus a comparison mode into a [`ChartSpec`]
//! - `style`: colors, markers and user overrides
//! - `draw`: Plotters drawing shared by every surface
//! - `bitmap` / `render`: PNG artifacts and delivery

pub mod bitmap;
pub mod chart;
pub mod compare;
pub mod draw;
pub mod render;
pub mod style;

pub use chart::{ChartSpec, DEFAULT_X_LABEL, DEFAULT_Y_LABEL, PlotSeries};
pub use compare::{Comparison, ComparisonRequest, Styling};
pub use render::{RenderOptions, RenderOutcome, render};
pub use style::{LineStyle, Marker, Rgb, SeriesStyle, StyleOverride};
