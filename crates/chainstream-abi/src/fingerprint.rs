//! Event topic fingerprint computation.
//!
//! The fingerprint of a named event is the keccak256 hash of its canonical
//! signature, e.g.:
//!   keccak256("Transfer(address,address,uint256)")
//!   → 0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef
//!
//! The signature uses canonical lowercase solidity type names in declared
//! parameter order, so two schemas with the same name and parameter shape
//! always fingerprint identically.

use alloy_primitives::B256;
use tiny_keccak::{Hasher, Keccak};

/// Canonical event signature string: `"<name>(<type1>,<type2>,…)"`.
pub fn event_signature<S: AsRef<str>>(name: &str, parameter_types: &[S]) -> String {
    let types: Vec<&str> = parameter_types.iter().map(|t| t.as_ref()).collect();
    format!("{name}({})", types.join(","))
}

/// keccak256 of a canonical signature string.
pub fn signature_topic(signature: &str) -> B256 {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(signature.as_bytes());
    hasher.finalize(&mut output);
    B256::from(output)
}
