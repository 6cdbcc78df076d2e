//! Payload serializers — chain objects to their wire JSON values.
//!
//! Quantities render per [`crate::quantity`]; hashes, addresses, and byte
//! strings render as `0x`-prefixed lowercase hex.

use serde_json::{json, Map, Value};

use crate::payload::{BlockPayload, TransactionPayload};
use crate::quantity::{format_u256, format_u64, hex_bytes};
use crate::types::{BlockHeader, DecodedLog, SyncStatus, Transaction};

/// Sync status payload. A node that is not syncing reports the explicit
/// JSON `false` sentinel rather than an empty object.
pub fn sync_status(status: Option<&SyncStatus>) -> Value {
    match status {
        Some(status) => json!({
            "startingBlock": format_u64(status.starting_block),
            "currentBlock": format_u64(status.current_block),
            "highestBlock": format_u64(status.highest_block),
        }),
        None => Value::Bool(false),
    }
}

/// Block header payload.
pub fn block_header(header: &BlockHeader) -> Value {
    json!({
        "hash": hex_bytes(header.hash),
        "number": format_u64(header.number),
        "nonce": format_u64(header.nonce),
        "difficulty": format_u256(&header.difficulty),
        "gasLimit": format_u64(header.gas_limit),
        "gasUsed": format_u64(header.gas_used),
        "timestamp": format_u64(header.timestamp),
        "coinbase": hex_bytes(header.coinbase),
        "extraData": hex_bytes(&header.extra_data),
        "logsBloom": hex_bytes(&header.logs_bloom),
        "mixHash": hex_bytes(header.mix_hash),
        "ommersHash": hex_bytes(header.ommers_hash),
        "parentHash": hex_bytes(header.parent_hash),
        "receiptsRoot": hex_bytes(header.receipts_root),
        "transactionsRoot": hex_bytes(header.transactions_root),
        "stateRoot": hex_bytes(header.state_root),
    })
}

/// Transaction payload. Fee fields depend on the transaction flavor:
/// legacy transactions report `gasPrice`, EIP-1559 transactions report
/// `maxFeePerGas` and `maxPriorityFeePerGas`.
pub fn transaction(tx: &Transaction) -> Value {
    let mut node = Map::new();
    node.insert("nonce".into(), json!(format_u64(tx.nonce)));
    node.insert("gas".into(), json!(format_u64(tx.gas_limit)));
    node.insert("value".into(), json!(format_u256(&tx.value)));
    node.insert("v".into(), json!(format_u256(&tx.v)));
    node.insert("r".into(), json!(format_u256(&tx.r)));
    node.insert("s".into(), json!(format_u256(&tx.s)));
    node.insert("from".into(), json!(hex_bytes(tx.from)));
    node.insert("input".into(), json!(hex_bytes(&tx.input)));
    node.insert("hash".into(), json!(hex_bytes(tx.hash)));
    if let Some(gas_price) = &tx.gas_price {
        node.insert("gasPrice".into(), json!(format_u256(gas_price)));
    }
    if let Some(max_fee) = &tx.max_fee_per_gas {
        node.insert("maxFeePerGas".into(), json!(format_u256(max_fee)));
        if let Some(max_priority_fee) = &tx.max_priority_fee_per_gas {
            node.insert(
                "maxPriorityFeePerGas".into(),
                json!(format_u256(max_priority_fee)),
            );
        }
    }
    if let Some(to) = &tx.to {
        node.insert("to".into(), json!(hex_bytes(to)));
    }
    if let Some(chain_id) = &tx.chain_id {
        node.insert("chainId".into(), json!(format_u256(chain_id)));
    }
    Value::Object(node)
}

/// Block payload: header plus total difficulty when known.
pub fn block_payload(payload: &BlockPayload) -> Value {
    let mut node = Map::new();
    node.insert("blockHeader".into(), block_header(&payload.header));
    if let Some(total_difficulty) = &payload.total_difficulty {
        node.insert("totalDifficulty".into(), json!(format_u256(total_difficulty)));
    }
    Value::Object(node)
}

/// Transaction payload: block header and revert reason only when present.
pub fn transaction_payload(payload: &TransactionPayload) -> Value {
    let mut node = Map::new();
    if let Some(header) = &payload.block_header {
        node.insert("blockHeader".into(), block_header(header));
    }
    node.insert("transaction".into(), transaction(&payload.transaction));
    if let Some(reason) = &payload.revert_reason {
        node.insert("revertReason".into(), json!(reason));
    }
    Value::Object(node)
}

/// Log payload; `decoded` is present only for logs a schema matched.
pub fn log(decoded_log: &DecodedLog) -> Value {
    let record = decoded_log.record();
    let mut node = Map::new();
    node.insert("blockNumber".into(), json!(format_u64(record.block_number)));
    node.insert("blockHash".into(), json!(hex_bytes(record.block_hash)));
    node.insert(
        "transactionHash".into(),
        json!(hex_bytes(record.transaction_hash)),
    );
    node.insert(
        "transactionIndex".into(),
        json!(format_u64(record.transaction_index as u64)),
    );
    node.insert("address".into(), json!(hex_bytes(record.address)));
    node.insert("data".into(), json!(hex_bytes(&record.data)));
    node.insert(
        "topics".into(),
        Value::Array(record.topics.iter().map(|t| json!(hex_bytes(t))).collect()),
    );
    node.insert("removed".into(), json!(record.removed));
    node.insert("logIndex".into(), json!(format_u64(record.log_index as u64)));
    if let Some(decoded) = decoded_log.decoded() {
        node.insert("decoded".into(), json!(decoded));
    }
    Value::Object(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures;
    use alloy_primitives::{Address, Bytes, B256, U256};

    #[test]
    fn sync_status_sentinel_when_absent() {
        assert_eq!(sync_status(None), Value::Bool(false));
    }

    #[test]
    fn sync_status_fields() {
        let status = SyncStatus { starting_block: 0, current_block: 50, highest_block: 100 };
        let value = sync_status(Some(&status));
        assert_eq!(value["startingBlock"], "0x0");
        assert_eq!(value["currentBlock"], "0x32");
        assert_eq!(value["highestBlock"], "0x64");
    }

    #[test]
    fn block_header_keys() {
        let header = fixtures::block_header(100, B256::repeat_byte(0x10));
        let value = block_header(&header);
        let object = value.as_object().unwrap();
        for key in [
            "hash", "number", "nonce", "difficulty", "gasLimit", "gasUsed", "timestamp",
            "coinbase", "extraData", "logsBloom", "mixHash", "ommersHash", "parentHash",
            "receiptsRoot", "transactionsRoot", "stateRoot",
        ] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert_eq!(value["number"], "0x64");
    }

    #[test]
    fn legacy_transaction_reports_gas_price_only() {
        let tx = fixtures::transaction(B256::repeat_byte(0x20));
        let value = transaction(&tx);
        assert!(value.get("gasPrice").is_some());
        assert!(value.get("maxFeePerGas").is_none());
        assert_eq!(value["to"], format!("0x{}", "cc".repeat(20)));
    }

    #[test]
    fn eip1559_transaction_reports_fee_caps() {
        let mut tx = fixtures::transaction(B256::repeat_byte(0x21));
        tx.gas_price = None;
        tx.max_fee_per_gas = Some(U256::from(100u64));
        tx.max_priority_fee_per_gas = Some(U256::from(2u64));
        let value = transaction(&tx);
        assert!(value.get("gasPrice").is_none());
        assert_eq!(value["maxFeePerGas"], "0x64");
        assert_eq!(value["maxPriorityFeePerGas"], "0x2");
    }

    #[test]
    fn contract_creation_omits_to() {
        let mut tx = fixtures::transaction(B256::repeat_byte(0x22));
        tx.to = None;
        let value = transaction(&tx);
        assert!(value.get("to").is_none());
    }

    #[test]
    fn block_payload_total_difficulty_optional() {
        let header = fixtures::block_header(7, B256::repeat_byte(0x30));
        let without = block_payload(&BlockPayload::new(header.clone()));
        assert!(without.get("totalDifficulty").is_none());

        let with = block_payload(&BlockPayload::with_total_difficulty(
            header,
            Some(U256::from(1_000u64)),
        ));
        assert_eq!(with["totalDifficulty"], "0x3e8");
    }

    #[test]
    fn log_decoded_field_only_when_decorated() {
        let record = crate::types::LogRecord {
            block_number: 5,
            block_hash: B256::repeat_byte(0x40),
            transaction_hash: B256::repeat_byte(0x41),
            transaction_index: 1,
            address: Address::repeat_byte(0x42),
            data: Bytes::from(vec![0u8; 32]),
            topics: vec![B256::repeat_byte(0x43)],
            removed: false,
            log_index: 0,
        };
        let raw = log(&DecodedLog::raw(record.clone()));
        assert!(raw.get("decoded").is_none());
        assert_eq!(raw["topics"].as_array().unwrap().len(), 1);

        let decorated = log(&DecodedLog::decorated(record, "Transfer(1,2)".into()));
        assert_eq!(decorated["decoded"], "Transfer(1,2)");
    }
}
