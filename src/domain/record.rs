//! In-memory representation of one curve's sampled series.

use std::collections::BTreeMap;

use crate::domain::{CurveShape, SeriesName};
use crate::error::CurveError;

/// One named yield curve: a time axis plus parallel rate series.
///
/// Built once (by the loader or [`CurveRecord::from_series`]) and read-only
/// afterwards. Construction enforces:
///
/// - `timeToMaturity` is present and non-decreasing
/// - every series has the same, non-zero length
/// - every value is finite
/// - the shape's required series are all present
#[derive(Debug, Clone, PartialEq)]
pub struct CurveRecord {
    name: String,
    shape: CurveShape,
    series: BTreeMap<SeriesName, Vec<f64>>,
}

impl CurveRecord {
    /// Build a record from already-parsed columns.
    pub fn from_series(
        name: impl Into<String>,
        shape: CurveShape,
        series: BTreeMap<SeriesName, Vec<f64>>,
    ) -> Result<Self, CurveError> {
        let name = name.into();

        for required in shape.required() {
            if !series.contains_key(required) {
                return Err(CurveError::SeriesNotFound {
                    curve: name,
                    series: *required,
                });
            }
        }
        if let Some(extra) = series.keys().find(|s| !shape.accepts(**s)) {
            return Err(CurveError::InvalidRequest(format!(
                "series `{extra}` does not belong to a {} curve",
                shape.display_name()
            )));
        }

        let n = series[&SeriesName::TimeToMaturity].len();
        if n == 0 {
            return Err(CurveError::data_load(&name, "curve has no samples"));
        }
        for (s, values) in &series {
            if values.len() != n {
                return Err(CurveError::SeriesLengthMismatch {
                    curve: name,
                    series: *s,
                    expected: n,
                    actual: values.len(),
                });
            }
            if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
                return Err(CurveError::data_load(
                    &name,
                    format!("non-finite value in `{s}` at sample {idx}"),
                ));
            }
        }

        let time = &series[&SeriesName::TimeToMaturity];
        if let Some(idx) = time.windows(2).position(|w| w[1] < w[0]) {
            return Err(CurveError::data_load(
                &name,
                format!(
                    "`timeToMaturity` decreases at sample {} ({} after {})",
                    idx + 1,
                    time[idx + 1],
                    time[idx]
                ),
            ));
        }

        Ok(Self {
            name,
            shape,
            series,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> CurveShape {
        self.shape
    }

    /// Number of sample rows.
    pub fn len(&self) -> usize {
        self.time_to_maturity().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn time_to_maturity(&self) -> &[f64] {
        self.series
            .get(&SeriesName::TimeToMaturity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get(&self, series: SeriesName) -> Option<&[f64]> {
        self.series.get(&series).map(Vec::as_slice)
    }

    pub fn series(&self, series: SeriesName) -> Result<&[f64], CurveError> {
        self.get(series).ok_or_else(|| CurveError::SeriesNotFound {
            curve: self.name.clone(),
            series,
        })
    }

    pub fn contains(&self, series: SeriesName) -> bool {
        self.series.contains_key(&series)
    }

    /// Series carried by this record, in `SeriesName` order (time axis first).
    pub fn series_names(&self) -> impl Iterator<Item = SeriesName> + '_ {
        self.series.keys().copied()
    }

    /// `(timeToMaturity, value)` pairs for one series.
    pub fn points(&self, series: SeriesName) -> Result<Vec<(f64, f64)>, CurveError> {
        let values = self.series(series)?;
        let time = self.time_to_maturity();
        if values.len() != time.len() {
            return Err(CurveError::SeriesLengthMismatch {
                curve: self.name.clone(),
                series,
                expected: time.len(),
                actual: values.len(),
            });
        }
        Ok(time.iter().copied().zip(values.iter().copied()).collect())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Small discount-shaped curve for tests.
    pub fn discount(name: &str, time: &[f64], simple: &[f64]) -> CurveRecord {
        let mut series = BTreeMap::new();
        series.insert(SeriesName::TimeToMaturity, time.to_vec());
        series.insert(SeriesName::SimpleRate, simple.to_vec());
        series.insert(
            SeriesName::ContinuousRate,
            simple.iter().map(|r| r * 0.99).collect(),
        );
        series.insert(
            SeriesName::InstantaneousForwardRate,
            simple.iter().map(|r| r * 1.05).collect(),
        );
        CurveRecord::from_series(name, CurveShape::Discount, series).expect("valid fixture")
    }

    /// Small Nelson-Siegel-shaped curve for tests.
    pub fn nss(name: &str) -> CurveRecord {
        let mut series = BTreeMap::new();
        series.insert(SeriesName::TimeToMaturity, vec![1.0, 2.0, 3.0]);
        series.insert(SeriesName::ObservedSpotRate, vec![0.020, 0.025, 0.027]);
        series.insert(SeriesName::NssSpotRate, vec![0.021, 0.024, 0.028]);
        series.insert(SeriesName::NssForwardRate, vec![0.022, 0.026, 0.031]);
        CurveRecord::from_series(name, CurveShape::NelsonSiegel, series).expect("valid fixture")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_series_rejects_unequal_lengths() {
        let mut series = BTreeMap::new();
        series.insert(SeriesName::TimeToMaturity, vec![1.0, 2.0]);
        series.insert(SeriesName::SimpleRate, vec![0.01, 0.02]);
        series.insert(SeriesName::ContinuousRate, vec![0.01]);
        series.insert(SeriesName::InstantaneousForwardRate, vec![0.01, 0.02]);

        let err = CurveRecord::from_series("a", CurveShape::Discount, series).unwrap_err();
        assert!(matches!(
            err,
            CurveError::SeriesLengthMismatch {
                series: SeriesName::ContinuousRate,
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn from_series_rejects_decreasing_time_axis() {
        let mut series = BTreeMap::new();
        series.insert(SeriesName::TimeToMaturity, vec![1.0, 3.0, 2.0]);
        series.insert(SeriesName::ObservedSpotRate, vec![0.0; 3]);
        series.insert(SeriesName::NssSpotRate, vec![0.0; 3]);
        series.insert(SeriesName::NssForwardRate, vec![0.0; 3]);

        let err = CurveRecord::from_series("a", CurveShape::NelsonSiegel, series).unwrap_err();
        assert!(matches!(err, CurveError::DataLoad { .. }), "got {err:?}");
    }

    #[test]
    fn from_series_requires_shape_columns() {
        let mut series = BTreeMap::new();
        series.insert(SeriesName::TimeToMaturity, vec![1.0]);
        series.insert(SeriesName::SimpleRate, vec![0.01]);

        let err = CurveRecord::from_series("a", CurveShape::Discount, series).unwrap_err();
        assert!(matches!(err, CurveError::SeriesNotFound { .. }));
    }

    #[test]
    fn points_pair_values_with_time_axis() {
        let curve = fixtures::discount("a", &[1.0, 2.0], &[0.01, 0.02]);
        assert_eq!(curve.len(), 2);
        assert_eq!(
            curve.points(SeriesName::SimpleRate).unwrap(),
            vec![(1.0, 0.01), (2.0, 0.02)]
        );
        assert!(matches!(
            curve.points(SeriesName::NssSpotRate),
            Err(CurveError::SeriesNotFound { .. })
        ));
    }
}
