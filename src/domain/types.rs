//! Series and curve-shape vocabulary.
//!
//! The upstream calibration writes a fixed set of columns. Every one of them is a
//! `SeriesName` variant, so selecting a series never goes through a free-form
//! string once input has been parsed.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Every series a curve CSV can carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "camelCase")]
pub enum SeriesName {
    #[value(name = "timeToMaturity", alias = "timeToMat")]
    TimeToMaturity,
    #[value(name = "observedSpotRate", alias = "obsSpotRate")]
    ObservedSpotRate,
    #[value(name = "observedDerivativeSpotRate", alias = "obsDerivSpotRate")]
    ObservedDerivativeSpotRate,
    #[value(name = "nssSpotRate", alias = "nssSpot")]
    NssSpotRate,
    #[value(name = "nssForwardRate", alias = "nssForward")]
    NssForwardRate,
    #[value(name = "nssDerivativeForwardRate", alias = "nssDerivForward")]
    NssDerivativeForwardRate,
    #[value(name = "discountPrice", alias = "price")]
    DiscountPrice,
    #[value(name = "logDiscountPrice", alias = "logPrice")]
    LogDiscountPrice,
    #[value(name = "simpleRate", alias = "simple")]
    SimpleRate,
    #[value(name = "continuousRate", alias = "contRate")]
    ContinuousRate,
    #[value(name = "instantaneousForwardRate", alias = "forwRate")]
    InstantaneousForwardRate,
    #[value(name = "derivativeInstantaneousForwardRate", alias = "derivForwRate")]
    DerivativeInstantaneousForwardRate,
}

/// What a series represents on a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesPurpose {
    /// The shared x-axis.
    Axis,
    /// Market observations the model was fitted to.
    Observed,
    /// Values produced by the fitted/interpolated curve.
    Model,
}

impl SeriesName {
    pub const ALL: [SeriesName; 12] = [
        SeriesName::TimeToMaturity,
        SeriesName::ObservedSpotRate,
        SeriesName::ObservedDerivativeSpotRate,
        SeriesName::NssSpotRate,
        SeriesName::NssForwardRate,
        SeriesName::NssDerivativeForwardRate,
        SeriesName::DiscountPrice,
        SeriesName::LogDiscountPrice,
        SeriesName::SimpleRate,
        SeriesName::ContinuousRate,
        SeriesName::InstantaneousForwardRate,
        SeriesName::DerivativeInstantaneousForwardRate,
    ];

    /// CSV header written by the calibration step.
    pub fn column(self) -> &'static str {
        match self {
            SeriesName::TimeToMaturity => "timeToMaturity",
            SeriesName::ObservedSpotRate => "observedSpotRate",
            SeriesName::ObservedDerivativeSpotRate => "observedDerivativeSpotRate",
            SeriesName::NssSpotRate => "nssSpotRate",
            SeriesName::NssForwardRate => "nssForwardRate",
            SeriesName::NssDerivativeForwardRate => "nssDerivativeForwardRate",
            SeriesName::DiscountPrice => "discountPrice",
            SeriesName::LogDiscountPrice => "logDiscountPrice",
            SeriesName::SimpleRate => "simpleRate",
            SeriesName::ContinuousRate => "continuousRate",
            SeriesName::InstantaneousForwardRate => "instantaneousForwardRate",
            SeriesName::DerivativeInstantaneousForwardRate => "derivativeInstantaneousForwardRate",
        }
    }

    /// Short key accepted wherever a series name is parsed.
    pub fn alias(self) -> &'static str {
        match self {
            SeriesName::TimeToMaturity => "timeToMat",
            SeriesName::ObservedSpotRate => "obsSpotRate",
            SeriesName::ObservedDerivativeSpotRate => "obsDerivSpotRate",
            SeriesName::NssSpotRate => "nssSpot",
            SeriesName::NssForwardRate => "nssForward",
            SeriesName::NssDerivativeForwardRate => "nssDerivForward",
            SeriesName::DiscountPrice => "price",
            SeriesName::LogDiscountPrice => "logPrice",
            SeriesName::SimpleRate => "simple",
            SeriesName::ContinuousRate => "contRate",
            SeriesName::InstantaneousForwardRate => "forwRate",
            SeriesName::DerivativeInstantaneousForwardRate => "derivForwRate",
        }
    }

    /// Default legend label.
    pub fn display_label(self) -> &'static str {
        match self {
            SeriesName::TimeToMaturity => "Time to maturity",
            SeriesName::ObservedSpotRate => "Observed rates",
            SeriesName::ObservedDerivativeSpotRate => "Observed spot rate derivative",
            SeriesName::NssSpotRate => "Nelson siegel (Svensson) spot rate",
            SeriesName::NssForwardRate => "Nelson siegel (Svensson) forward rate",
            SeriesName::NssDerivativeForwardRate => "Nelson siegel (Svensson) forward rate derivative",
            SeriesName::DiscountPrice => "Discount price",
            SeriesName::LogDiscountPrice => "Log discount price",
            SeriesName::SimpleRate => "Simple rate",
            SeriesName::ContinuousRate => "Continuous rate",
            SeriesName::InstantaneousForwardRate => "Instantaneous forward rate",
            SeriesName::DerivativeInstantaneousForwardRate => "Derivative instantaneous forward rate",
        }
    }

    pub fn purpose(self) -> SeriesPurpose {
        match self {
            SeriesName::TimeToMaturity => SeriesPurpose::Axis,
            SeriesName::ObservedSpotRate | SeriesName::ObservedDerivativeSpotRate => {
                SeriesPurpose::Observed
            }
            _ => SeriesPurpose::Model,
        }
    }

    /// The model series an observed series is fitted by, if any.
    pub fn model_counterpart(self) -> Option<SeriesName> {
        match self {
            SeriesName::ObservedSpotRate => Some(SeriesName::NssSpotRate),
            SeriesName::ObservedDerivativeSpotRate => Some(SeriesName::NssDerivativeForwardRate),
            _ => None,
        }
    }

    /// Parse a column name or alias (case-insensitive).
    pub fn parse(name: &str) -> Option<SeriesName> {
        let name = name.trim();
        SeriesName::ALL.into_iter().find(|s| {
            s.column().eq_ignore_ascii_case(name) || s.alias().eq_ignore_ascii_case(name)
        })
    }
}

impl fmt::Display for SeriesName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Column layout of a curve CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CurveShape {
    /// Nelson–Siegel / Svensson fit output: observed and model spot/forward rates.
    #[value(name = "nss", alias = "nelson-siegel")]
    NelsonSiegel,
    /// Discount-curve output: simple, continuous and forward rates.
    #[value(name = "discount")]
    Discount,
}

impl CurveShape {
    pub fn display_name(self) -> &'static str {
        match self {
            CurveShape::NelsonSiegel => "Nelson-Siegel/Svensson",
            CurveShape::Discount => "Discount curve",
        }
    }

    /// Columns every row must carry.
    pub fn required(self) -> &'static [SeriesName] {
        match self {
            CurveShape::NelsonSiegel => &[
                SeriesName::TimeToMaturity,
                SeriesName::ObservedSpotRate,
                SeriesName::NssSpotRate,
                SeriesName::NssForwardRate,
            ],
            CurveShape::Discount => &[
                SeriesName::TimeToMaturity,
                SeriesName::SimpleRate,
                SeriesName::ContinuousRate,
                SeriesName::InstantaneousForwardRate,
            ],
        }
    }

    /// Columns loaded only when the header declares them.
    pub fn optional(self) -> &'static [SeriesName] {
        match self {
            CurveShape::NelsonSiegel => &[
                SeriesName::ObservedDerivativeSpotRate,
                SeriesName::NssDerivativeForwardRate,
            ],
            CurveShape::Discount => &[
                SeriesName::DerivativeInstantaneousForwardRate,
                SeriesName::DiscountPrice,
                SeriesName::LogDiscountPrice,
            ],
        }
    }

    pub fn accepts(self, series: SeriesName) -> bool {
        self.required().contains(&series) || self.optional().contains(&series)
    }

    /// Series drawn by a single-curve overlay when none are requested.
    pub fn default_overlay(self) -> &'static [SeriesName] {
        match self {
            CurveShape::NelsonSiegel => &[
                SeriesName::ObservedSpotRate,
                SeriesName::NssSpotRate,
                SeriesName::NssForwardRate,
            ],
            CurveShape::Discount => &[
                SeriesName::SimpleRate,
                SeriesName::ContinuousRate,
                SeriesName::InstantaneousForwardRate,
            ],
        }
    }

    /// Series pairs drawn by a fit comparison when none are requested.
    pub fn default_fit(self) -> &'static [SeriesName] {
        match self {
            CurveShape::NelsonSiegel => &[SeriesName::NssSpotRate, SeriesName::NssForwardRate],
            CurveShape::Discount => &[
                SeriesName::InstantaneousForwardRate,
                SeriesName::ContinuousRate,
            ],
        }
    }
}
