//! Composite payloads for block and transaction events.

use alloy_primitives::U256;

use crate::types::{BlockHeader, Transaction};

/// Payload of block lifecycle events.
///
/// Total difficulty is only reported for propagated blocks; added/reorged
/// blocks carry the header alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPayload {
    pub header: BlockHeader,
    pub total_difficulty: Option<U256>,
}

impl BlockPayload {
    pub fn new(header: BlockHeader) -> Self {
        Self { header, total_difficulty: None }
    }

    pub fn with_total_difficulty(header: BlockHeader, total_difficulty: Option<U256>) -> Self {
        Self { header, total_difficulty }
    }
}

/// Payload of transaction lifecycle events.
///
/// Pool events (added/dropped) carry the bare transaction. Reverted-
/// transaction events additionally carry the enclosing block header and the
/// decoded revert reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPayload {
    pub transaction: Transaction,
    pub block_header: Option<BlockHeader>,
    pub revert_reason: Option<String>,
}

impl TransactionPayload {
    pub fn new(transaction: Transaction) -> Self {
        Self { transaction, block_header: None, revert_reason: None }
    }

    pub fn reverted(transaction: Transaction, header: BlockHeader, reason: String) -> Self {
        Self {
            transaction,
            block_header: Some(header),
            revert_reason: Some(reason),
        }
    }
}
