//! Standalone single-document analysis. Never feeds the chat context.

use crate::outbound::with_timeout;
use mediflow_core::analysis::{AnalysisService, DocumentUpload};
use std::sync::Arc;
use std::time::Duration;

pub const REPORT_ANALYSIS_ERROR: &str = "Failed to analyze report. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReportView {
    #[default]
    NotAttempted,
    Ready(String),
    Failed(String),
}

pub struct ReportAnalysisUseCase {
    service: Arc<dyn AnalysisService>,
    request_timeout: Duration,
    view: ReportView,
}

impl ReportAnalysisUseCase {
    pub fn new(service: Arc<dyn AnalysisService>, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
            view: ReportView::NotAttempted,
        }
    }

    pub fn view(&self) -> &ReportView {
        &self.view
    }

    pub async fn analyze(&mut self, upload: &DocumentUpload) -> &ReportView {
        let result = with_timeout(self.request_timeout, self.service.analyze_report(upload)).await;

        self.view = match result {
            Ok(text) => ReportView::Ready(text),
            Err(err) => {
                tracing::warn!(
                    "[ReportAnalysis] Analysis of '{}' failed: {}",
                    upload.filename,
                    err
                );
                ReportView::Failed(REPORT_ANALYSIS_ERROR.to_string())
            }
        };
        &self.view
    }
}
