//! External analysis service boundary.
//!
//! The analysis backend (chat answers, document interpretation, metric
//! extraction) is an opaque collaborator. This module defines the contract the
//! engine needs from it and the error taxonomy its failures map into.

mod service;
mod upload;

pub use service::{AnalysisService, ServiceError};
pub use upload::DocumentUpload;
