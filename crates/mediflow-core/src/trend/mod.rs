//! Biomarker trend aggregation.
//!
//! Reports are grouped into per-metric series by [`MetricSeriesBuilder`] and a
//! sorted series is summarized by [`TrendSummarizer`].
//!
//! Series keep observations in insertion order. Ordering by date happens when
//! a series is read (`MetricSeries::sorted`), never when it is built.

mod series;
mod summary;

pub use series::{MetricSeries, MetricSeriesBuilder, Observation, SeriesMap};
pub use summary::{TrendDirection, TrendSummarizer, TrendSummary};
