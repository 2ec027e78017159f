use thiserror::Error;

use crate::domain::SeriesName;

/// Errors raised while loading curves or building/rendering charts.
#[derive(Debug, Clone, Error)]
pub enum CurveError {
    /// The backing resource is missing, empty or malformed.
    #[error("failed to load curve '{resource}': {reason}")]
    DataLoad { resource: String, reason: String },

    /// A requested series is absent from a curve.
    #[error("series `{series}` not found in curve '{curve}'")]
    SeriesNotFound { curve: String, series: SeriesName },

    /// A series does not line up with its curve's time axis.
    #[error("series `{series}` in curve '{curve}' has {actual} values, expected {expected}")]
    SeriesLengthMismatch {
        curve: String,
        series: SeriesName,
        expected: usize,
        actual: usize,
    },

    /// The comparison request itself is inconsistent (empty selection, unknown style target, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to render '{target}': {reason}")]
    Render { target: String, reason: String },

    #[error("terminal error: {0}")]
    Terminal(String),
}

impl CurveError {
    pub fn data_load(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataLoad {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    pub fn render(target: impl Into<String>, reason: impl ToString) -> Self {
        Self::Render {
            target: target.into(),
            reason: reason.to_string(),
        }
    }
}

/// Process-level error: a message plus the exit code the binary reports.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CurveError> for AppError {
    fn from(err: CurveError) -> Self {
        let exit_code = match &err {
            CurveError::DataLoad { .. } | CurveError::Config(_) => 2,
            CurveError::SeriesNotFound { .. }
            | CurveError::SeriesLengthMismatch { .. }
            | CurveError::InvalidRequest(_) => 3,
            CurveError::Render { .. } | CurveError::Terminal(_) => 4,
        };
        Self::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let load: AppError = CurveError::data_load("a", "missing").into();
        assert_eq!(load.exit_code(), 2);

        let missing: AppError = CurveError::SeriesNotFound {
            curve: "a".to_string(),
            series: SeriesName::SimpleRate,
        }
        .into();
        assert_eq!(missing.exit_code(), 3);
        assert_eq!(missing.to_string(), "series `simpleRate` not found in curve 'a'");

        let render: AppError = CurveError::render("out.png", "disk full").into();
        assert_eq!(render.exit_code(), 4);
    }
}
