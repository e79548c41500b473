//! HTTP adapters for the external analysis service.

pub mod http_analysis_client;

pub use http_analysis_client::HttpAnalysisClient;
