//! Use cases of the MediFlow client engine.
//!
//! `ChatSession` drives the conversation, `TrendAnalysisUseCase` and
//! `ReportAnalysisUseCase` back the trend and report screens, and
//! `MediflowEngine` wires them to the local store and the HTTP client.

pub mod bootstrap;
pub mod chat_session;
mod outbound;
pub mod report_usecase;
pub mod telemetry;
pub mod trend_usecase;

pub use bootstrap::MediflowEngine;
pub use chat_session::{ChatSession, ExchangeOutcome};
pub use report_usecase::{ReportAnalysisUseCase, ReportView};
pub use trend_usecase::{TrendAnalysisUseCase, TrendView};
