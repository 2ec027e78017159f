//! CSV ingest for calibrated curve files.
//!
//! The calibration step writes one CSV per curve with a header row and one
//! sample per line. This module turns such a file into a [`CurveRecord`]:
//!
//! - **Strict schema**: every declared column must parse on every row
//! - **All or nothing**: the first bad row aborts the load
//! - **Tolerant layout**: header case, BOMs, blank trailing header cells and
//!   unused extra columns are accepted

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::domain::{CurveRecord, CurveShape, SeriesName};
use crate::error::CurveError;

/// A directory of `{name}.csv` curve files.
#[derive(Debug, Clone)]
pub struct CurveStore {
    root: PathBuf,
}

impl CurveStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Backing file for a curve name.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, CurveError> {
        validate_name(name)?;
        Ok(self.root.join(format!("{name}.csv")))
    }

    /// Load a curve by name, using `shape` or detecting it from the header.
    pub fn load(&self, name: &str, shape: Option<CurveShape>) -> Result<CurveRecord, CurveError> {
        let path = self.path_for(name)?;
        load_curve_file(name, &path, shape)
    }
}

/// Load a curve from an explicit file path.
pub fn load_curve_file(
    name: &str,
    path: &Path,
    shape: Option<CurveShape>,
) -> Result<CurveRecord, CurveError> {
    let file = File::open(path).map_err(|e| {
        let reason = if e.kind() == ErrorKind::NotFound {
            format!("resource not found at '{}'", path.display())
        } else {
            format!("failed to open '{}': {e}", path.display())
        };
        CurveError::data_load(name, reason)
    })?;

    let curve = parse_curve(name, file, shape)?;
    log::info!(
        "loaded curve '{}' from {} ({} rows, {})",
        curve.name(),
        path.display(),
        curve.len(),
        curve.shape().display_name()
    );
    Ok(curve)
}

/// Parse curve CSV text from any reader.
pub fn parse_curve<R: Read>(
    name: &str,
    reader: R,
    shape: Option<CurveShape>,
) -> Result<CurveRecord, CurveError> {
    validate_name(name)?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| CurveError::data_load(name, format!("failed to read header row: {e}")))?
        .clone();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(CurveError::data_load(name, "resource is empty"));
    }

    let header_map = build_header_map(&headers);
    let shape = match shape {
        Some(shape) => shape,
        None => detect_shape(&header_map)
            .ok_or_else(|| CurveError::data_load(name, "could not detect curve shape from header row"))?,
    };

    let columns = resolve_columns(name, shape, &header_map)?;
    log::debug!(
        "curve '{name}': {} schema, columns {:?}",
        shape.display_name(),
        columns.iter().map(|(s, _)| s.column()).collect::<Vec<_>>()
    );

    let mut series: BTreeMap<SeriesName, Vec<f64>> =
        columns.iter().map(|(s, _)| (*s, Vec::new())).collect();

    for (idx, result) in reader.records().enumerate() {
        // +2: one header line, 1-based line numbers.
        let line = idx + 2;
        let record = result
            .map_err(|e| CurveError::data_load(name, format!("line {line}: CSV parse error: {e}")))?;

        for (s, col) in &columns {
            let value = parse_value(&record, *col, *s).map_err(|reason| {
                CurveError::data_load(name, format!("line {line}: {reason}"))
            })?;
            if let Some(values) = series.get_mut(s) {
                values.push(value);
            }
        }
    }

    if series
        .get(&SeriesName::TimeToMaturity)
        .is_none_or(|t| t.is_empty())
    {
        return Err(CurveError::data_load(name, "resource has a header but no data rows"));
    }

    CurveRecord::from_series(name, shape, series)
}

/// Pick the schema from the columns present.
pub fn detect_shape(header_map: &HashMap<String, usize>) -> Option<CurveShape> {
    let has = |s: SeriesName| header_map.contains_key(&normalize_header_name(s.column()));
    if has(SeriesName::NssSpotRate) {
        Some(CurveShape::NelsonSiegel)
    } else if has(SeriesName::ContinuousRate) {
        Some(CurveShape::Discount)
    } else {
        None
    }
}

pub fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        let key = normalize_header_name(name);
        if key.is_empty() {
            continue;
        }
        // First occurrence wins on duplicated headers.
        map.entry(key).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Strip a UTF-8 BOM from the first header so schema checks still match.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

/// Map declared series (required + optional present) to column indices.
fn resolve_columns(
    name: &str,
    shape: CurveShape,
    header_map: &HashMap<String, usize>,
) -> Result<Vec<(SeriesName, usize)>, CurveError> {
    let mut columns = Vec::new();
    for s in shape.required() {
        let idx = header_map
            .get(&normalize_header_name(s.column()))
            .ok_or_else(|| {
                CurveError::data_load(
                    name,
                    format!(
                        "missing required column `{}` for a {} curve",
                        s.column(),
                        shape.display_name()
                    ),
                )
            })?;
        columns.push((*s, *idx));
    }
    for s in shape.optional() {
        if let Some(idx) = header_map.get(&normalize_header_name(s.column())) {
            columns.push((*s, *idx));
        }
    }
    Ok(columns)
}

fn parse_value(record: &StringRecord, col: usize, series: SeriesName) -> Result<f64, String> {
    let raw = record
        .get(col)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("missing value for column `{series}`"))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("invalid number '{raw}' in column `{series}`"))?;
    if !value.is_finite() {
        return Err(format!("non-finite value '{raw}' in column `{series}`"));
    }
    Ok(value)
}

fn validate_name(name: &str) -> Result<(), CurveError> {
    if name.trim().is_empty() {
        return Err(CurveError::data_load(name, "curve name is empty"));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(CurveError::data_load(
            name,
            "curve name must not contain path separators",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NSS_CSV: &str = "\
timeToMaturity,observedSpotRate,nssSpotRate,nssForwardRate
1.0,0.02,0.021,0.022
2.0,0.025,0.024,0.026
";

    /// Layout written by the discount-curve exporter: trailing comma in the
    /// header, extra price columns, one fewer field per data row.
    const DISCOUNT_CSV: &str = "\
timeToMaturity,discountPrice,logDiscountPrice,simpleRate,continuousRate,instantaneousForwardRate,derivativeInstantaneousForwardRate,
0.050000,0.998790,-0.001211,0.024224,0.024210,0.024190,-0.000412
0.100000,0.997582,-0.002421,0.024220,0.024205,0.024170,-0.000398
0.150000,0.996376,-0.003630,0.024217,0.024200,0.024150,-0.000385
";

    fn unique_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ycp-ingest-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_nelson_siegel_rows() {
        let curve = parse_curve("canada", NSS_CSV.as_bytes(), None).unwrap();

        assert_eq!(curve.shape(), CurveShape::NelsonSiegel);
        assert_eq!(curve.time_to_maturity(), &[1.0, 2.0]);
        assert_eq!(curve.series(SeriesName::ObservedSpotRate).unwrap(), &[0.02, 0.025]);
        assert_eq!(curve.series(SeriesName::NssSpotRate).unwrap(), &[0.021, 0.024]);
        assert_eq!(curve.series(SeriesName::NssForwardRate).unwrap(), &[0.022, 0.026]);
        for s in curve.series_names() {
            assert_eq!(curve.series(s).unwrap().len(), 2);
        }
        // Optional derivative columns were not declared.
        assert!(!curve.contains(SeriesName::NssDerivativeForwardRate));
    }

    #[test]
    fn loads_discount_layout_with_trailing_header_cell() {
        let curve = parse_curve("initialCanadianCurve", DISCOUNT_CSV.as_bytes(), None).unwrap();

        assert_eq!(curve.shape(), CurveShape::Discount);
        assert_eq!(curve.len(), 3);
        let names: Vec<_> = curve.series_names().collect();
        assert_eq!(names.len(), 7);
        assert_eq!(curve.series(SeriesName::SimpleRate).unwrap()[2], 0.024217);
        assert_eq!(
            curve.series(SeriesName::DerivativeInstantaneousForwardRate).unwrap()[0],
            -0.000412
        );
    }

    #[test]
    fn headers_match_case_insensitively_and_skip_bom() {
        let csv = "\u{feff}TimeToMaturity,SIMPLERATE,continuousrate,instantaneousForwardRate,unused\n1,0.01,0.01,0.01,x\n";
        let curve = parse_curve("a", csv.as_bytes(), None).unwrap();
        assert_eq!(curve.shape(), CurveShape::Discount);
        assert_eq!(curve.len(), 1);
    }

    #[test]
    fn row_missing_required_value_fails() {
        let csv = "\
timeToMaturity,observedSpotRate,nssSpotRate,nssForwardRate
1.0,0.02,0.021,0.022
2.0,0.025,0.024
";
        let err = parse_curve("broken", csv.as_bytes(), None).unwrap_err();
        match err {
            CurveError::DataLoad { resource, reason } => {
                assert_eq!(resource, "broken");
                assert!(reason.contains("line 3"), "reason: {reason}");
                assert!(reason.contains("nssForwardRate"), "reason: {reason}");
            }
            other => panic!("expected DataLoad, got {other:?}"),
        }
    }

    #[test]
    fn row_of_empty_fields_fails() {
        let csv = "\
timeToMaturity,observedSpotRate,nssSpotRate,nssForwardRate
1.0,0.02,0.021,0.022
,,,
2.0,0.025,0.024,0.026
";
        let err = parse_curve("blank-row", csv.as_bytes(), None).unwrap_err();
        match err {
            CurveError::DataLoad { reason, .. } => {
                assert!(reason.contains("line 3"), "reason: {reason}");
                assert!(reason.contains("missing value for column `timeToMaturity`"), "reason: {reason}");
            }
            other => panic!("expected DataLoad, got {other:?}"),
        }
    }

    #[test]
    fn missing_required_column_fails() {
        let csv = "timeToMaturity,observedSpotRate,nssSpotRate\n1.0,0.02,0.021\n";
        let err = parse_curve("a", csv.as_bytes(), Some(CurveShape::NelsonSiegel)).unwrap_err();
        assert!(err.to_string().contains("nssForwardRate"), "{err}");
    }

    #[test]
    fn non_numeric_and_non_finite_values_fail() {
        let csv = "timeToMaturity,simpleRate,continuousRate,instantaneousForwardRate\n1.0,abc,0.01,0.01\n";
        let err = parse_curve("a", csv.as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("invalid number 'abc'"), "{err}");

        let csv = "timeToMaturity,simpleRate,continuousRate,instantaneousForwardRate\n1.0,NaN,0.01,0.01\n";
        let err = parse_curve("a", csv.as_bytes(), None).unwrap_err();
        assert!(matches!(err, CurveError::DataLoad { .. }));
    }

    #[test]
    fn empty_and_header_only_resources_fail() {
        let err = parse_curve("a", "".as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("empty"), "{err}");

        let err = parse_curve("a", NSS_CSV.lines().next().unwrap().as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("no data rows"), "{err}");
    }

    #[test]
    fn unknown_layout_fails_detection() {
        let err = parse_curve("a", "tenor,yield\n1,0.02\n".as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("detect"), "{err}");
    }

    #[test]
    fn unsorted_time_axis_fails() {
        let csv = "timeToMaturity,simpleRate,continuousRate,instantaneousForwardRate\n2.0,0.01,0.01,0.01\n1.0,0.01,0.01,0.01\n";
        let err = parse_curve("a", csv.as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("decreases"), "{err}");
    }

    #[test]
    fn store_loads_by_name_deterministically() {
        let dir = unique_dir("store");
        std::fs::write(dir.join("svensson.csv"), NSS_CSV).unwrap();
        let store = CurveStore::new(&dir);

        let first = store.load("svensson", None).unwrap();
        let second = store.load("svensson", None).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.name(), "svensson");

        let err = store.load("absent", None).unwrap_err();
        assert!(err.to_string().contains("not found"), "{err}");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn names_with_separators_are_rejected() {
        let store = CurveStore::new("data");
        assert!(store.path_for("../etc/passwd").is_err());
        assert!(store.path_for("").is_err());
        assert_eq!(store.path_for("a").unwrap(), PathBuf::from("data").join("a.csv"));
    }
}
