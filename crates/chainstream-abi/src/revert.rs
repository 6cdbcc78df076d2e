//! Decode `Error(string)` revert payloads.
//!
//! `require(cond, "message")` reverts with
//! `keccak256("Error(string)")[..4]` ++ ABI-encode(string). Anything that
//! does not match that shape yields `None` — receipts with undecodable
//! revert data are simply not reported as reverted.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};

/// The 4-byte selector for `Error(string)`.
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Try to decode revert data as an `Error(string)` payload.
pub fn decode_error_string(data: &[u8]) -> Option<String> {
    if data.len() < 4 || data[..4] != ERROR_STRING_SELECTOR {
        return None;
    }
    match DynSolType::String.abi_decode(&data[4..]) {
        Ok(DynSolValue::String(message)) => Some(message),
        _ => None,
    }
}
