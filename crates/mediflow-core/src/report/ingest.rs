//! Validation of raw analysis results.
//!
//! The analysis service returns loosely-shaped JSON. Nothing in it is trusted
//! until it has passed through [`ReportIngestor`].

use super::date::parse_report_date;
use super::model::{Metric, Report};
use serde_json::{Map, Value};
use thiserror::Error;

/// Filename used when the service omits one.
pub const UNKNOWN_FILENAME: &str = "unknown";

/// Reasons a single raw result is excluded from aggregation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("analysis result is not a JSON object")]
    NotAnObject,

    #[error("analysis result has no date")]
    MissingDate,

    #[error("analysis result date '{0}' is not a calendar date")]
    InvalidDate(String),

    #[error("analysis result has no metrics list")]
    MissingMetrics,
}

/// Result of ingesting a batch: the usable reports plus what was dropped.
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub reports: Vec<Report>,
    /// Position in the input batch and the reason the entry was dropped.
    pub rejected: Vec<(usize, IngestError)>,
}

/// Normalizes raw analysis results into [`Report`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportIngestor;

impl ReportIngestor {
    pub fn new() -> Self {
        Self
    }

    /// Validates and normalizes one raw result.
    ///
    /// Individual malformed metric entries are skipped; only a missing or
    /// unusable `date`/`metrics` rejects the whole report.
    pub fn ingest(&self, raw: &Value) -> Result<Report, IngestError> {
        let object = raw.as_object().ok_or(IngestError::NotAnObject)?;

        let date = match object.get("date") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            _ => return Err(IngestError::MissingDate),
        };
        let parsed_date =
            parse_report_date(&date).ok_or_else(|| IngestError::InvalidDate(date.clone()))?;

        let entries = object
            .get("metrics")
            .and_then(Value::as_array)
            .ok_or(IngestError::MissingMetrics)?;

        let filename = object
            .get("filename")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(UNKNOWN_FILENAME)
            .to_string();

        let metrics = entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                let metric = entry.as_object().and_then(metric_from_object);
                if metric.is_none() {
                    tracing::warn!(
                        "[ReportIngestor] Skipping malformed metric #{} in '{}'",
                        position,
                        filename
                    );
                }
                metric
            })
            .collect();

        Ok(Report {
            filename,
            date,
            parsed_date,
            metrics,
        })
    }

    /// Ingests a batch, dropping invalid entries instead of failing the batch.
    pub fn ingest_batch(&self, raws: &[Value]) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();

        for (index, raw) in raws.iter().enumerate() {
            match self.ingest(raw) {
                Ok(report) => outcome.reports.push(report),
                Err(err) => {
                    tracing::warn!("[ReportIngestor] Dropping result #{}: {}", index, err);
                    outcome.rejected.push((index, err));
                }
            }
        }

        outcome
    }
}

fn metric_from_object(object: &Map<String, Value>) -> Option<Metric> {
    let name = object.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let value = coerce_number(object.get("value")?)?;

    let unit = object
        .get("unit")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    Some(Metric {
        name: name.to_string(),
        value,
        unit,
    })
}

/// Accepts JSON numbers and numeric strings; rejects NaN and infinities.
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}
