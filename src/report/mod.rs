//! Reporting utilities: curve summaries and fit diagnostics.
//!
//! Numbers are computed here; `format` turns them into terminal text.

use serde::Serialize;

use crate::domain::{CurveRecord, CurveShape, SeriesName, SeriesPurpose};
use crate::error::CurveError;

pub mod format;

pub use format::{format_fit_diagnostics, format_summary};

/// Basic statistics for one series of a curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub series: SeriesName,
    pub purpose: SeriesPurpose,
    pub min: f64,
    pub max: f64,
    pub first: f64,
    pub last: f64,
}

/// What a loaded curve contains.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveSummary {
    pub name: String,
    pub shape: CurveShape,
    pub rows: usize,
    pub tenor_min: f64,
    pub tenor_max: f64,
    pub series: Vec<SeriesSummary>,
}

pub fn summarize(record: &CurveRecord) -> CurveSummary {
    let time = record.time_to_maturity();
    let series = record
        .series_names()
        .filter(|s| *s != SeriesName::TimeToMaturity)
        .filter_map(|s| record.get(s).map(|values| summarize_series(s, values)))
        .collect();

    CurveSummary {
        name: record.name().to_string(),
        shape: record.shape(),
        rows: record.len(),
        tenor_min: time.first().copied().unwrap_or(f64::NAN),
        tenor_max: time.last().copied().unwrap_or(f64::NAN),
        series,
    }
}

fn summarize_series(series: SeriesName, values: &[f64]) -> SeriesSummary {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    SeriesSummary {
        series,
        purpose: series.purpose(),
        min,
        max,
        first: values.first().copied().unwrap_or(f64::NAN),
        last: values.last().copied().unwrap_or(f64::NAN),
    }
}

/// Agreement between one observed and one fitted series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairDiagnostic {
    /// `{curve}:{column}` of the observations.
    pub observed: String,
    /// `{curve}:{column}` of the fitted values.
    pub fitted: String,
    /// Observed tenors that fell inside the fitted range.
    pub samples: usize,
    /// Observed tenors outside the fitted range (not compared).
    pub skipped: usize,
    /// Root mean squared error, decimal units. `None` when nothing overlapped.
    pub rmse: Option<f64>,
    pub max_abs_error: Option<f64>,
}

impl PairDiagnostic {
    fn from_errors(observed: String, fitted: String, errors: &[f64], skipped: usize) -> Self {
        let samples = errors.len();
        let (rmse, max_abs_error) = if samples == 0 {
            (None, None)
        } else {
            let sse: f64 = errors.iter().map(|e| e * e).sum();
            let max = errors.iter().fold(0.0_f64, |m, e| m.max(e.abs()));
            (Some((sse / samples as f64).sqrt()), Some(max))
        };
        Self {
            observed,
            fitted,
            samples,
            skipped,
            rmse,
            max_abs_error,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FitDiagnostics {
    pub pairs: Vec<PairDiagnostic>,
}

impl FitDiagnostics {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Compare each `series` of `observed` against the same series of `fitted`.
///
/// Fitted values are linearly interpolated at the observed tenors; observed
/// tenors outside the fitted time range are skipped.
pub fn fit_diagnostics(
    observed: &CurveRecord,
    fitted: &CurveRecord,
    series: &[SeriesName],
) -> Result<FitDiagnostics, CurveError> {
    let mut pairs = Vec::with_capacity(series.len());
    for &s in series {
        let obs = observed.points(s)?;
        let fit_t = fitted.time_to_maturity();
        let fit_y = fitted.series(s)?;

        let mut errors = Vec::with_capacity(obs.len());
        let mut skipped = 0;
        for (t, y) in obs {
            match interpolate(fit_t, fit_y, t) {
                Some(model) => errors.push(y - model),
                None => skipped += 1,
            }
        }

        pairs.push(PairDiagnostic::from_errors(
            format!("{}:{}", observed.name(), s.column()),
            format!("{}:{}", fitted.name(), s.column()),
            &errors,
            skipped,
        ));
    }
    Ok(FitDiagnostics { pairs })
}

/// Pair each selected observed series with its model counterpart in the same
/// curve, when both were selected.
pub fn overlay_diagnostics(record: &CurveRecord, series: &[SeriesName]) -> Result<FitDiagnostics, CurveError> {
    let mut pairs = Vec::new();
    for &obs in series {
        let Some(model) = obs.model_counterpart().filter(|m| series.contains(m)) else {
            continue;
        };
        let observed = record.series(obs)?;
        let fitted = record.series(model)?;
        let errors: Vec<f64> = observed.iter().zip(fitted).map(|(o, f)| o - f).collect();
        pairs.push(PairDiagnostic::from_errors(
            format!("{}:{}", record.name(), obs.column()),
            format!("{}:{}", record.name(), model.column()),
            &errors,
            0,
        ));
    }
    Ok(FitDiagnostics { pairs })
}

/// Linear interpolation of `(xs, ys)` at `x`; `None` outside `[xs[0], xs[n-1]]`.
///
/// `xs` must be non-decreasing.
fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> Option<f64> {
    let (&first, &last) = (xs.first()?, xs.last()?);
    if x < first || x > last {
        return None;
    }
    let i = xs.partition_point(|&t| t < x);
    if xs[i] == x {
        return ys.get(i).copied();
    }
    let (x0, x1) = (xs[i - 1], xs[i]);
    let (y0, y1) = (*ys.get(i - 1)?, *ys.get(i)?);
    Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures;

    #[test]
    fn summary_covers_every_value_series() {
        let curve = fixtures::nss("N");
        let summary = summarize(&curve);
        assert_eq!(summary.rows, 3);
        assert_eq!((summary.tenor_min, summary.tenor_max), (1.0, 3.0));
        assert_eq!(summary.series.len(), 3);

        let obs = summary
            .series
            .iter()
            .find(|s| s.series == SeriesName::ObservedSpotRate)
            .unwrap();
        assert_eq!(obs.purpose, SeriesPurpose::Observed);
        assert_eq!((obs.min, obs.max), (0.020, 0.027));
        assert_eq!((obs.first, obs.last), (0.020, 0.027));
    }

    #[test]
    fn summary_serializes_camel_case() {
        let json = serde_json::to_value(summarize(&fixtures::nss("N"))).unwrap();
        assert_eq!(json["shape"], "nelson-siegel");
        assert_eq!(json["tenorMax"], 3.0);
        assert_eq!(json["series"][0]["series"], "observedSpotRate");
    }

    #[test]
    fn interpolation_inside_and_outside_range() {
        let xs = [1.0, 2.0, 4.0];
        let ys = [0.01, 0.02, 0.04];
        assert_eq!(interpolate(&xs, &ys, 1.0), Some(0.01));
        assert_eq!(interpolate(&xs, &ys, 4.0), Some(0.04));
        assert!((interpolate(&xs, &ys, 3.0).unwrap() - 0.03).abs() < 1e-12);
        assert_eq!(interpolate(&xs, &ys, 0.5), None);
        assert_eq!(interpolate(&xs, &ys, 4.5), None);
    }

    #[test]
    fn fit_diagnostics_interpolate_fitted_curve() {
        let observed = fixtures::discount("obs", &[0.5, 1.5, 2.5], &[0.010, 0.021, 0.025]);
        let fitted = fixtures::discount("fit", &[1.0, 2.0, 3.0], &[0.010, 0.020, 0.030]);

        let diag = fit_diagnostics(&observed, &fitted, &[SeriesName::SimpleRate]).unwrap();
        let pair = &diag.pairs[0];
        assert_eq!(pair.observed, "obs:simpleRate");
        assert_eq!(pair.fitted, "fit:simpleRate");
        assert_eq!(pair.samples, 2);
        assert_eq!(pair.skipped, 1);

        // Errors at 1.5 and 2.5 are +0.006 and +0.0 after interpolation (0.015, 0.025).
        let rmse = pair.rmse.unwrap();
        assert!((rmse - (0.006_f64.powi(2) / 2.0).sqrt()).abs() < 1e-12);
        assert!((pair.max_abs_error.unwrap() - 0.006).abs() < 1e-12);
    }

    #[test]
    fn fit_diagnostics_without_overlap_has_no_error_stats() {
        let observed = fixtures::discount("obs", &[5.0, 6.0], &[0.01, 0.02]);
        let fitted = fixtures::discount("fit", &[1.0, 2.0], &[0.01, 0.02]);
        let diag = fit_diagnostics(&observed, &fitted, &[SeriesName::SimpleRate]).unwrap();
        assert_eq!(diag.pairs[0].samples, 0);
        assert_eq!(diag.pairs[0].rmse, None);
    }

    #[test]
    fn fit_diagnostics_missing_series_fails() {
        let observed = fixtures::nss("obs");
        let fitted = fixtures::discount("fit", &[1.0, 2.0], &[0.01, 0.02]);
        let err = fit_diagnostics(&observed, &fitted, &[SeriesName::NssSpotRate]).unwrap_err();
        assert!(matches!(err, CurveError::SeriesNotFound { .. }));
    }

    #[test]
    fn overlay_diagnostics_pair_observed_with_model() {
        let curve = fixtures::nss("N");
        let diag = overlay_diagnostics(&curve, curve.shape().default_overlay()).unwrap();
        assert_eq!(diag.pairs.len(), 1);
        let pair = &diag.pairs[0];
        assert_eq!(pair.observed, "N:observedSpotRate");
        assert_eq!(pair.fitted, "N:nssSpotRate");
        assert_eq!(pair.samples, 3);
        assert!((pair.max_abs_error.unwrap() - 0.001).abs() < 1e-12);

        // Without the model series selected there is nothing to compare.
        let diag = overlay_diagnostics(&curve, &[SeriesName::ObservedSpotRate]).unwrap();
        assert!(diag.is_empty());
    }
}
