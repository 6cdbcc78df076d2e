//! Hex rendering of chain quantities.
//!
//! Numeric chain quantities go on the wire as `"0x"`-prefixed lowercase
//! hexadecimal with minimal digits: `0` renders as `"0x0"`, never `"0x00"`.

use alloy_primitives::U256;

/// Format a `u64` quantity.
pub fn format_u64(value: u64) -> String {
    format!("{value:#x}")
}

/// Format a `U256` quantity.
pub fn format_u256(value: &U256) -> String {
    format!("{value:#x}")
}

/// Format a byte string as `0x`-prefixed lowercase hex.
pub fn hex_bytes(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}
