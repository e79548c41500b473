//! Domain layer of the MediFlow client engine.
//!
//! Pure models and algorithms (report ingestion, series building, trend
//! summaries, context injection) plus the capability traits the outer crates
//! implement (`PersistenceStore`, `AnalysisService`, `VoiceInputSource`).
//! Nothing in this crate performs I/O on its own.

pub mod analysis;
pub mod config;
pub mod error;
pub mod report;
pub mod session;
pub mod storage;
pub mod trend;
pub mod voice;

// Re-export common error type
pub use error::{MediflowError, Result};
