//! Host-view value records.
//!
//! The node hands the pipeline strongly-typed views of chain objects. Only
//! the fields this pipeline actually reads are modeled; the host's full type
//! hierarchy stays on the host side of the seam.

use alloy_primitives::{Address, Bytes, B256, U256};

/// Block header fields carried on block events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub hash: B256,
    pub number: u64,
    pub nonce: u64,
    pub difficulty: U256,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub coinbase: Address,
    pub extra_data: Bytes,
    pub logs_bloom: Bytes,
    pub mix_hash: B256,
    pub ommers_hash: B256,
    pub parent_hash: B256,
    pub receipts_root: B256,
    pub transactions_root: B256,
    pub state_root: B256,
}

/// Transaction fields carried on transaction events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub hash: B256,
    pub nonce: u64,
    pub gas_limit: u64,
    pub value: U256,
    pub v: U256,
    pub r: U256,
    pub s: U256,
    pub from: Address,
    pub input: Bytes,
    /// Legacy transactions only.
    pub gas_price: Option<U256>,
    /// EIP-1559 transactions only; present together with
    /// `max_priority_fee_per_gas`.
    pub max_fee_per_gas: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
    /// Absent for contract creations.
    pub to: Option<Address>,
    pub chain_id: Option<U256>,
}

/// The part of a transaction receipt this pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionReceipt {
    /// Raw revert payload, when the transaction reverted with one.
    pub revert_reason: Option<Bytes>,
}

/// A contract log with its block/transaction coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub block_number: u64,
    pub block_hash: B256,
    pub transaction_hash: B256,
    pub transaction_index: u32,
    /// The emitting contract.
    pub address: Address,
    pub data: Bytes,
    /// `topics[0]` is the event signature hash, except for anonymous events
    /// where every topic is an indexed argument value.
    pub topics: Vec<B256>,
    pub removed: bool,
    pub log_index: u32,
}

/// A log record plus, when a schema matched, its decoded rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLog {
    record: LogRecord,
    decoded: Option<String>,
}

impl DecodedLog {
    /// An undecorated log (no topics, or no matching schema).
    pub fn raw(record: LogRecord) -> Self {
        Self { record, decoded: None }
    }

    /// A log decorated with its human-readable decoded arguments,
    /// e.g. `"Transfer(0xc2ca…,0x06e0…,801976598137298011761447)"`.
    pub fn decorated(record: LogRecord, decoded: String) -> Self {
        Self { record, decoded: Some(decoded) }
    }

    pub fn record(&self) -> &LogRecord {
        &self.record
    }

    pub fn decoded(&self) -> Option<&str> {
        self.decoded.as_deref()
    }
}

/// Node sync progress, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncStatus {
    pub starting_block: u64,
    pub current_block: u64,
    pub highest_block: u64,
}

/// Context for a block propagated over the gossip network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagatedBlockContext {
    pub header: BlockHeader,
    pub total_difficulty: Option<U256>,
}

/// Context for a block imported into (or reorged out of) the canonical
/// chain. Transactions and receipts are index-aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedBlockContext {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
    pub receipts: Vec<TransactionReceipt>,
}
