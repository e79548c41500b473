//! Report domain module.
//!
//! # Module Structure
//!
//! - `model`: Canonical `Report` and `Metric` types
//! - `date`: Calendar date parsing shared by ingestion and series ordering
//! - `ingest`: Validation of raw analysis results (`ReportIngestor`)

mod date;
mod ingest;
mod model;

pub use date::parse_report_date;
pub use ingest::{IngestError, IngestOutcome, ReportIngestor};
pub use model::{Metric, Report};
