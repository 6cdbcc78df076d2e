//! Error types for envelope construction.

use thiserror::Error;

/// Errors raised while building an [`crate::Envelope`].
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("Envelope serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
