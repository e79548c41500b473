//! Canonical report types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A named, unit-bearing numeric measurement taken from one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Grouping key across reports (e.g. "Hemoglobin").
    pub name: String,
    pub value: f64,
    pub unit: String,
}

/// One validated analysis result.
///
/// Reports live only for the duration of a single aggregation run and are
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub filename: String,
    /// The date exactly as the analysis service reported it.
    pub date: String,
    /// `date` parsed to a calendar day; used for ordering.
    pub parsed_date: NaiveDate,
    /// Metrics in the order the service listed them.
    pub metrics: Vec<Metric>,
}
