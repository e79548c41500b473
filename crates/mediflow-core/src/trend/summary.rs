use super::series::Observation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a series from its earliest to its latest observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    /// Only one observation; no trend can be stated.
    InsufficientData,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::InsufficientData => "insufficient data",
        };
        f.write_str(label)
    }
}

/// First and last observation of a sorted series plus its direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub first: Observation,
    pub last: Observation,
    pub direction: TrendDirection,
}

impl TrendSummary {
    /// `last.value - first.value`.
    pub fn change(&self) -> f64 {
        self.last.value - self.first.value
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrendSummarizer;

impl TrendSummarizer {
    pub fn new() -> Self {
        Self
    }

    /// Summarizes a series that the caller has already sorted by date.
    ///
    /// A strictly lower last value is `Decreasing`; anything else, including
    /// an unchanged value, is `Increasing`. Returns `None` for an empty series.
    pub fn summarize(&self, series: &[Observation]) -> Option<TrendSummary> {
        let first = series.first()?;
        let last = series.last()?;

        let direction = if series.len() < 2 {
            TrendDirection::InsufficientData
        } else if last.value < first.value {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Increasing
        };

        Some(TrendSummary {
            first: first.clone(),
            last: last.clone(),
            direction,
        })
    }
}
