use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure body returned by the backend on rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

/// Typed outcome of every client-side scheduling operation. Nothing in the
/// client layer panics or propagates a transport fault past its boundary;
/// each failure lands in exactly one of these buckets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Detected before any network call, e.g. a missing required field.
    #[error("{0}")]
    Validation(String),
    /// Text input that does not parse into the expected type.
    #[error("invalid input: {0}")]
    Parse(String),
    /// The server answered with a non-success status or a failure ack.
    #[error("{message}")]
    Backend { status: u16, message: String },
    /// Transport failure, no usable response.
    #[error("network error: {0}")]
    Network(String),
}

impl ActionError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ActionError::Validation(_) | ActionError::Parse(_))
    }
}
