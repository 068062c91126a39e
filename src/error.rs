//! Error types for Vitalytics

use thiserror::Error;

/// Errors that can occur during analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("insufficient data: {required} entries required, {actual} available")]
    InsufficientData { required: usize, actual: usize },

    #[error("invalid analysis window: {0}")]
    InvalidWindow(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
