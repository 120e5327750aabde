//! Test error types.

use thiserror::Error;

/// Errors that can occur while inspecting a test invocation.
#[derive(Debug, Error)]
pub enum TestError {
    /// The invocation failed, so there is no output to inspect.
    #[error("Invocation failed: {0}")]
    Failed(String),
    /// The invocation succeeded where a failure was expected.
    #[error("Invocation unexpectedly succeeded")]
    Succeeded,
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
