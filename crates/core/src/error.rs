//! Error types for the memhook domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Store failures carry
//! enough detail for logging; the pipeline never lets them reach the host.

use thiserror::Error;

/// The top-level error type for memhook operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Hook input errors ---
    #[error("Invalid hook input: {0}")]
    Input(String),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures talking to the memory store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Memory store returned HTTP {status_code}: {body}")]
    Status { status_code: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl StoreError {
    /// The HTTP status when the store answered with a non-success code.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// True when the store could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Network(_))
    }
}
