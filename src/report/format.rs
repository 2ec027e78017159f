//! Formatted terminal output for summaries and diagnostics.

use crate::report::{CurveSummary, FitDiagnostics};

/// Format what a loaded curve contains.
pub fn format_summary(summary: &CurveSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", summary.name));
    out.push_str(&format!("Shape: {}\n", summary.shape.display_name()));
    out.push_str(&format!(
        "Rows: n={} | tenor=[{:.3}, {:.3}]y\n",
        summary.rows, summary.tenor_min, summary.tenor_max
    ));
    out.push('\n');

    out.push_str(
        format!(
            "{:<36} {:<9} {:>10} {:>10} {:>10} {:>10}",
            "series", "purpose", "min", "max", "first", "last"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<36} {:-<9} {:-<10} {:-<10} {:-<10} {:-<10}",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for s in &summary.series {
        out.push_str(
            format!(
                "{:<36} {:<9} {:>10.6} {:>10.6} {:>10.6} {:>10.6}",
                truncate(s.series.column(), 36),
                format!("{:?}", s.purpose).to_lowercase(),
                s.min,
                s.max,
                s.first,
                s.last,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format fit diagnostics; errors are shown in basis points.
pub fn format_fit_diagnostics(diag: &FitDiagnostics) -> String {
    let mut out = String::new();
    out.push_str("Fit diagnostics:\n");
    if diag.pairs.is_empty() {
        out.push_str("  (no observed/fitted pairs)\n");
        return out;
    }

    for p in &diag.pairs {
        let stats = match (p.rmse, p.max_abs_error) {
            (Some(rmse), Some(max)) => format!("RMSE={:.2}bp max|err|={:.2}bp", rmse * 1e4, max * 1e4),
            _ => "no overlapping tenors".to_string(),
        };
        out.push_str(&format!("- {} vs {}: n={} {stats}", p.observed, p.fitted, p.samples));
        if p.skipped > 0 {
            out.push_str(&format!(" (skipped {} outside fitted range)", p.skipped));
        }
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures;
    use crate::report::{PairDiagnostic, summarize};

    #[test]
    fn summary_lists_each_series() {
        let text = format_summary(&summarize(&fixtures::nss("canadaZeroCurveSvensson")));
        assert!(text.starts_with("=== canadaZeroCurveSvensson ===\n"));
        assert!(text.contains("Shape: Nelson-Siegel/Svensson"));
        assert!(text.contains("Rows: n=3 | tenor=[1.000, 3.000]y"));
        assert!(text.lines().any(|l| l.starts_with("observedSpotRate") && l.contains("observed")));
        assert!(text.lines().any(|l| l.starts_with("nssForwardRate") && l.contains("model")));
    }

    #[test]
    fn diagnostics_are_reported_in_bp() {
        let diag = FitDiagnostics {
            pairs: vec![
                PairDiagnostic {
                    observed: "A:simpleRate".to_string(),
                    fitted: "B:simpleRate".to_string(),
                    samples: 4,
                    skipped: 1,
                    rmse: Some(0.0005),
                    max_abs_error: Some(0.001),
                },
                PairDiagnostic {
                    observed: "A:continuousRate".to_string(),
                    fitted: "B:continuousRate".to_string(),
                    samples: 0,
                    skipped: 3,
                    rmse: None,
                    max_abs_error: None,
                },
            ],
        };
        let text = format_fit_diagnostics(&diag);
        assert!(text.contains(
            "- A:simpleRate vs B:simpleRate: n=4 RMSE=5.00bp max|err|=10.00bp (skipped 1 outside fitted range)"
        ));
        assert!(text.contains("n=0 no overlapping tenors"));
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdefgh", 5), "abcd.");
    }
}
