//! Error types for schema loading and log decoding.

use alloy_primitives::{Address, B256};
use thiserror::Error;

/// Errors raised while loading or constructing event schemas.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Unknown solidity type '{ty}' in schema '{schema}': {reason}")]
    UnknownType {
        schema: String,
        ty: String,
        reason: String,
    },

    #[error("Invalid contract address '{value}' in schema '{schema}'")]
    InvalidAddress { schema: String, value: String },

    #[error("Schema definition parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while decoding a log against the schema set.
///
/// Both variants signal a configuration or implementation defect and must
/// abort the operation; "no matching schema" is not an error (the log
/// passes through undecorated).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(
        "More than one matching event schema identified for event with address {address}, topic {topic:?}"
    )]
    AmbiguousSchema {
        address: Address,
        topic: Option<B256>,
    },

    #[error("Mismatched number of decoded arguments: expected {expected}, got {actual}")]
    ArgumentCountMismatch { expected: usize, actual: usize },

    #[error("ABI decode failed: {reason}")]
    AbiDecodeFailed { reason: String },
}
