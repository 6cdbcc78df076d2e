//! # chainstream-abi
//!
//! The contract-event side of chainstream: declared event schemas with
//! precomputed topic fingerprints, the log decoder that matches raw logs
//! against them, and `Error(string)` revert-reason decoding.

pub mod decoder;
pub mod error;
pub mod fingerprint;
pub mod revert;
pub mod schema;
pub mod store;

pub use decoder::decode;
pub use error::{DecodeError, SchemaError};
pub use revert::{decode_error_string, ERROR_STRING_SELECTOR};
pub use schema::{EventParameter, EventSchema};
pub use store::{EventSchemas, SchemaStore};
