//! Trend analysis over a batch of uploaded reports.

use crate::outbound::with_timeout;
use mediflow_core::analysis::{AnalysisService, DocumentUpload, ServiceError};
use mediflow_core::report::ReportIngestor;
use mediflow_core::trend::{
    MetricSeriesBuilder, Observation, SeriesMap, TrendSummarizer, TrendSummary,
};
use std::sync::Arc;
use std::time::Duration;

pub const TREND_NETWORK_ERROR: &str = "Network Error: Could not reach the server. Is it running?";

/// What the trend screen should show.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TrendView {
    #[default]
    NotAttempted,
    /// The service answered but no usable metric came out of it.
    Empty,
    Ready {
        series: SeriesMap,
        selected: String,
    },
    Failed {
        message: String,
    },
}

pub struct TrendAnalysisUseCase {
    service: Arc<dyn AnalysisService>,
    ingestor: ReportIngestor,
    builder: MetricSeriesBuilder,
    summarizer: TrendSummarizer,
    request_timeout: Duration,
    view: TrendView,
}

impl TrendAnalysisUseCase {
    pub fn new(service: Arc<dyn AnalysisService>, request_timeout: Duration) -> Self {
        Self {
            service,
            ingestor: ReportIngestor::new(),
            builder: MetricSeriesBuilder::new(),
            summarizer: TrendSummarizer::new(),
            request_timeout,
            view: TrendView::NotAttempted,
        }
    }

    pub fn view(&self) -> &TrendView {
        &self.view
    }

    /// Sends all uploads in one request and rebuilds the view from the results.
    ///
    /// An empty upload list leaves the current view untouched.
    pub async fn analyze(&mut self, uploads: &[DocumentUpload]) -> &TrendView {
        if uploads.is_empty() {
            return &self.view;
        }

        tracing::info!("[TrendAnalysis] Analyzing {} file(s)", uploads.len());
        let result = with_timeout(self.request_timeout, self.service.analyze_trends(uploads)).await;

        self.view = match result {
            Ok(raw_results) => self.build_view(&raw_results),
            Err(err) => {
                tracing::warn!("[TrendAnalysis] Trend request failed: {}", err);
                TrendView::Failed {
                    message: failure_message(&err),
                }
            }
        };
        &self.view
    }

    /// Switches the charted metric. Unknown names are ignored.
    pub fn select(&mut self, name: &str) -> bool {
        match &mut self.view {
            TrendView::Ready { series, selected } if series.contains(name) => {
                *selected = name.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        match &self.view {
            TrendView::Ready { selected, .. } => Some(selected),
            _ => None,
        }
    }

    /// The selected series ordered by date.
    pub fn chart_data(&self) -> Vec<Observation> {
        match &self.view {
            TrendView::Ready { series, selected } => {
                series.sorted_observations(selected).unwrap_or_default()
            }
            _ => Vec::new(),
        }
    }

    pub fn summary(&self) -> Option<TrendSummary> {
        self.summarizer.summarize(&self.chart_data())
    }

    fn build_view(&self, raw_results: &[serde_json::Value]) -> TrendView {
        let outcome = self.ingestor.ingest_batch(raw_results);
        if !outcome.rejected.is_empty() {
            tracing::info!(
                "[TrendAnalysis] {} of {} result(s) were unusable",
                outcome.rejected.len(),
                raw_results.len()
            );
        }

        let series = self.builder.build(&outcome.reports);
        match series.default_metric().map(str::to_string) {
            Some(selected) => TrendView::Ready { series, selected },
            None => TrendView::Empty,
        }
    }
}

fn failure_message(err: &ServiceError) -> String {
    match err {
        ServiceError::Server { status, detail } => format!("Server Error ({status}): {detail}"),
        ServiceError::Network(_) | ServiceError::Timeout(_) => TREND_NETWORK_ERROR.to_string(),
        ServiceError::Client(message) => message.clone(),
    }
}
