//! Series selection for the three comparison modes.
//!
//! Each mode validates its inputs up front and produces a [`ChartSpec`]; a
//! request that fails here never reaches a drawing surface.
//!
//! | mode     | series keys             | file stem                      |
//! |----------|-------------------------|--------------------------------|
//! | overlay  | column name             | `{name}` or `{name}-fit`       |
//! | pairwise | curve name              | `{curve1}-{curve2}-{series}`   |
//! | fit      | `{curve}:{column}`      | `{curve1}-{curve2}-Fit`        |

use std::collections::HashSet;

use crate::domain::{CurveRecord, SeriesName, SeriesPurpose};
use crate::error::CurveError;
use crate::plot::chart::{ChartSpec, PlotSeries};
use crate::plot::style::{Rgb, SeriesStyle, StyleOverride, model_color};

/// Chart-level labels and per-series style overrides.
#[derive(Debug, Clone, Default)]
pub struct Styling {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub overrides: Vec<StyleOverride>,
}

/// What to compare.
#[derive(Debug, Clone, Copy)]
pub enum Comparison<'a> {
    /// Several series of one curve on a shared time axis.
    Overlay {
        curve: &'a CurveRecord,
        series: &'a [SeriesName],
    },
    /// One series taken from each of two curves.
    Pairwise {
        first: &'a CurveRecord,
        second: &'a CurveRecord,
        series: SeriesName,
    },
    /// Observed curve as markers against a fitted curve as lines, per series.
    Fit {
        observed: &'a CurveRecord,
        fitted: &'a CurveRecord,
        series: &'a [SeriesName],
    },
}

/// One rendering operation: the comparison plus its styling.
#[derive(Debug, Clone)]
pub struct ComparisonRequest<'a> {
    pub comparison: Comparison<'a>,
    pub styling: Styling,
}

impl<'a> ComparisonRequest<'a> {
    pub fn new(comparison: Comparison<'a>) -> Self {
        Self {
            comparison,
            styling: Styling::default(),
        }
    }

    pub fn with_styling(mut self, styling: Styling) -> Self {
        self.styling = styling;
        self
    }

    /// Validate the request and produce the chart to draw.
    pub fn build(&self) -> Result<ChartSpec, CurveError> {
        let mut chart = match self.comparison {
            Comparison::Overlay { curve, series } => overlay(curve, series)?,
            Comparison::Pairwise {
                first,
                second,
                series,
            } => pairwise(first, second, series)?,
            Comparison::Fit {
                observed,
                fitted,
                series,
            } => fit(observed, fitted, series)?,
        };
        apply_styling(&mut chart, &self.styling)?;
        log::debug!(
            "built chart '{}' with {} series: {:?}",
            chart.title,
            chart.series.len(),
            chart.series_keys().collect::<Vec<_>>()
        );
        Ok(chart)
    }
}

fn overlay(curve: &CurveRecord, series: &[SeriesName]) -> Result<ChartSpec, CurveError> {
    check_selection(series, 1)?;

    let mut plotted = Vec::with_capacity(series.len());
    let mut model_idx = 0;
    for &s in series {
        let points = curve.points(s)?;
        let style = match s.purpose() {
            SeriesPurpose::Observed => SeriesStyle::markers(Rgb::RED),
            _ => {
                let style = SeriesStyle::line(model_color(model_idx));
                model_idx += 1;
                style
            }
        };
        plotted.push(PlotSeries {
            key: s.column().to_string(),
            label: s.display_label().to_string(),
            style,
            points,
        });
    }

    let has_observed = series.iter().any(|s| s.purpose() == SeriesPurpose::Observed);
    let stem = if has_observed {
        format!("{}-fit", curve.name())
    } else {
        curve.name().to_string()
    };

    Ok(ChartSpec::new(curve.name(), stem, plotted))
}

fn pairwise(first: &CurveRecord, second: &CurveRecord, series: SeriesName) -> Result<ChartSpec, CurveError> {
    check_selection(&[series], 1)?;

    // Both lookups run before anything is built.
    let first_points = first.points(series)?;
    let second_points = second.points(series)?;

    let plotted = vec![
        PlotSeries {
            key: first.name().to_string(),
            label: first.name().to_string(),
            style: SeriesStyle::markers(Rgb::RED),
            points: first_points,
        },
        PlotSeries {
            key: second.name().to_string(),
            label: second.name().to_string(),
            style: SeriesStyle::line(Rgb::NAVY),
            points: second_points,
        },
    ];

    let title = format!(
        "{} vs {}: {}",
        first.name(),
        second.name(),
        series.display_label()
    );
    let stem = format!("{}-{}-{}", first.name(), second.name(), series.column());
    Ok(ChartSpec::new(title, stem, plotted))
}

fn fit(observed: &CurveRecord, fitted: &CurveRecord, series: &[SeriesName]) -> Result<ChartSpec, CurveError> {
    check_selection(series, 2)?;

    let mut pairs = Vec::with_capacity(series.len());
    for &s in series {
        pairs.push((s, observed.points(s)?, fitted.points(s)?));
    }

    let mut plotted = Vec::with_capacity(series.len() * 2);
    for (idx, (s, obs_points, fit_points)) in pairs.into_iter().enumerate() {
        let color = model_color(idx);
        plotted.push(PlotSeries {
            key: format!("{}:{}", observed.name(), s.column()),
            label: format!("{}: {}", observed.name(), s.display_label()),
            style: SeriesStyle::markers(color),
            points: obs_points,
        });
        plotted.push(PlotSeries {
            key: format!("{}:{}", fitted.name(), s.column()),
            label: format!("{}: {}", fitted.name(), s.display_label()),
            style: SeriesStyle::line(color),
            points: fit_points,
        });
    }

    let title = format!("{} vs {}: fit", observed.name(), fitted.name());
    let stem = format!("{}-{}-Fit", observed.name(), fitted.name());
    Ok(ChartSpec::new(title, stem, plotted))
}

fn check_selection(series: &[SeriesName], min: usize) -> Result<(), CurveError> {
    if series.len() < min {
        return Err(CurveError::InvalidRequest(format!(
            "at least {min} series required, got {}",
            series.len()
        )));
    }
    if series.contains(&SeriesName::TimeToMaturity) {
        return Err(CurveError::InvalidRequest(
            "`timeToMaturity` is the x-axis and cannot be plotted as a series".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = series.iter().find(|s| !seen.insert(**s)) {
        return Err(CurveError::InvalidRequest(format!("series `{dup}` requested twice")));
    }
    Ok(())
}

fn apply_styling(chart: &mut ChartSpec, styling: &Styling) -> Result<(), CurveError> {
    if let Some(title) = &styling.title {
        chart.title.clone_from(title);
    }
    if let Some(x) = &styling.x_label {
        chart.x_label.clone_from(x);
    }
    if let Some(y) = &styling.y_label {
        chart.y_label.clone_from(y);
    }

    for o in &styling.overrides {
        let mut matched = false;
        for s in chart.series.iter_mut().filter(|s| s.key == o.target) {
            o.apply(&mut s.style, &mut s.label);
            if !s.style.is_visible() {
                return Err(CurveError::InvalidRequest(format!(
                    "style for `{}` hides both line and marker",
                    s.key
                )));
            }
            matched = true;
        }
        if !matched {
            let known: Vec<&str> = chart.series_keys().collect();
            return Err(CurveError::InvalidRequest(format!(
                "style target `{}` matches no series (available: {})",
                o.target,
                known.join(", ")
            )));
        }
    }
    Ok(())
}
