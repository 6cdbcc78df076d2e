//! End-to-end pipeline scenarios: notifications in, envelopes out.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use tokio::sync::mpsc;

use chainstream_abi::schema::{EventParameter, EventSchema};
use chainstream_abi::store::{EventSchemas, SchemaStore};
use chainstream_core::domain::DomainObjectType;
use chainstream_core::envelope::Envelope;
use chainstream_core::publish::{DomainObjectTopicResolver, Publisher, TopicResolver};
use chainstream_core::types::{
    AddedBlockContext, BlockHeader, LogRecord, PropagatedBlockContext, SyncStatus, Transaction,
    TransactionReceipt,
};
use chainstream_pipeline::{ChainEventListener, MemoryKeyValueStore, MetadataDb};

type Captured = (DomainObjectType, String, serde_json::Value);

/// Publisher that forwards every envelope to the test for inspection.
struct CapturingPublisher {
    sender: mpsc::UnboundedSender<Captured>,
}

#[async_trait]
impl Publisher for CapturingPublisher {
    async fn publish(
        &self,
        kind: DomainObjectType,
        topic_resolver: &dyn TopicResolver,
        event: &Envelope,
    ) {
        let topic = topic_resolver.resolve(kind, event);
        let wire = serde_json::from_str(event.as_json()).unwrap();
        let _ = self.sender.send((kind, topic, wire));
    }
}

fn make_listener(
    metadata_db: Option<MetadataDb>,
    schemas: Arc<SchemaStore>,
) -> (ChainEventListener, mpsc::UnboundedReceiver<Captured>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let listener = ChainEventListener::new(
        Arc::new(CapturingPublisher { sender }),
        Arc::new(DomainObjectTopicResolver::new("test-")),
        metadata_db,
        schemas,
        tokio::runtime::Handle::current(),
    );
    (listener, receiver)
}

fn header(number: u64, hash: B256) -> BlockHeader {
    BlockHeader {
        hash,
        number,
        nonce: 0,
        difficulty: U256::from(2u64),
        gas_limit: 30_000_000,
        gas_used: 11_000_000,
        timestamp: 1_700_000_000 + number * 12,
        coinbase: Address::repeat_byte(0xaa),
        extra_data: Bytes::new(),
        logs_bloom: Bytes::from(vec![0u8; 256]),
        mix_hash: B256::repeat_byte(0x01),
        ommers_hash: B256::repeat_byte(0x02),
        parent_hash: B256::repeat_byte(0x03),
        receipts_root: B256::repeat_byte(0x04),
        transactions_root: B256::repeat_byte(0x05),
        state_root: B256::repeat_byte(0x06),
    }
}

fn transaction(hash: B256) -> Transaction {
    Transaction {
        hash,
        nonce: 1,
        gas_limit: 21_000,
        value: U256::from(10u64),
        v: U256::from(27u64),
        r: U256::from(1u64),
        s: U256::from(2u64),
        from: Address::repeat_byte(0xbb),
        input: Bytes::new(),
        gas_price: Some(U256::from(1_000_000_000u64)),
        max_fee_per_gas: None,
        max_priority_fee_per_gas: None,
        to: Some(Address::repeat_byte(0xcc)),
        chain_id: Some(U256::from(1u64)),
    }
}

fn propagated(number: u64, hash: B256) -> PropagatedBlockContext {
    PropagatedBlockContext {
        header: header(number, hash),
        total_difficulty: Some(U256::from(1_000_000u64)),
    }
}

async fn collect(receiver: &mut mpsc::UnboundedReceiver<Captured>, count: usize) -> Vec<Captured> {
    let mut captured = Vec::with_capacity(count);
    for _ in 0..count {
        captured.push(receiver.recv().await.unwrap());
    }
    captured
}

async fn assert_drained(receiver: &mut mpsc::UnboundedReceiver<Captured>) {
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(receiver.try_recv().is_err(), "unexpected extra envelope");
}

#[tokio::test]
async fn propagated_block_dedup_scenario() {
    let db = MetadataDb::new(Box::new(MemoryKeyValueStore::new()));
    let (listener, mut receiver) = make_listener(Some(db), Arc::new(SchemaStore::empty()));

    let hash_a = B256::repeat_byte(0xaa);
    let hash_b = B256::repeat_byte(0xbb);

    listener.on_block_propagated(&propagated(100, hash_a));
    listener.on_block_propagated(&propagated(100, hash_b));
    listener.on_block_propagated(&propagated(101, hash_b));
    // Exact repeat of an already-recorded header: rejected.
    listener.on_block_propagated(&propagated(100, hash_a));

    let captured = collect(&mut receiver, 3).await;
    assert_drained(&mut receiver).await;

    for (kind, topic, wire) in &captured {
        assert_eq!(*kind, DomainObjectType::Block);
        assert_eq!(topic, "test-block");
        assert_eq!(wire["type"], "BlockPropagated");
        assert_eq!(wire["event"]["totalDifficulty"], "0xf4240");
    }
    // Dispatch order is not guaranteed; compare as a set of headers.
    let mut seen: Vec<(String, String)> = captured
        .iter()
        .map(|(_, _, wire)| {
            (
                wire["event"]["blockHeader"]["number"].as_str().unwrap().to_string(),
                wire["event"]["blockHeader"]["hash"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    seen.sort();
    let mut expected = vec![
        ("0x64".to_string(), format!("0x{}", "aa".repeat(32))),
        ("0x64".to_string(), format!("0x{}", "bb".repeat(32))),
        ("0x65".to_string(), format!("0x{}", "bb".repeat(32))),
    ];
    expected.sort();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn no_metadata_db_publishes_everything() {
    let (listener, mut receiver) = make_listener(None, Arc::new(SchemaStore::empty()));

    let hash = B256::repeat_byte(0xaa);
    for _ in 0..3 {
        listener.on_block_propagated(&propagated(100, hash));
    }

    let captured = collect(&mut receiver, 3).await;
    assert_drained(&mut receiver).await;
    assert!(captured.iter().all(|(_, _, wire)| wire["type"] == "BlockPropagated"));
}

#[tokio::test]
async fn checkpoint_write_failure_still_publishes() {
    let store = Arc::new(MemoryKeyValueStore::new());
    store.set_fail_commits(true);
    let db = MetadataDb::new(Box::new(Arc::clone(&store)));
    let (listener, mut receiver) = make_listener(Some(db), Arc::new(SchemaStore::empty()));

    listener.on_block_propagated(&propagated(100, B256::repeat_byte(0xaa)));
    let captured = collect(&mut receiver, 1).await;
    assert_eq!(captured[0].2["type"], "BlockPropagated");

    // The checkpoint never landed, so the same block is still news.
    listener.on_block_propagated(&propagated(100, B256::repeat_byte(0xaa)));
    collect(&mut receiver, 1).await;
}

#[tokio::test]
async fn block_added_scans_receipts_for_reverts() {
    let (listener, mut receiver) = make_listener(None, Arc::new(SchemaStore::empty()));

    // require(false, "Not enough tokens to transfer")
    let revert_data = hex::decode(
        "08c379a00000000000000000000000000000000000000000000000000000000000000020000000000000000000000000000000000000000000000000000000000000001e4e6f7420656e6f75676820746f6b656e7320746f207472616e73666572000000",
    )
    .unwrap();
    let context = AddedBlockContext {
        header: header(200, B256::repeat_byte(0xd0)),
        transactions: vec![
            transaction(B256::repeat_byte(0x01)),
            transaction(B256::repeat_byte(0x02)),
            transaction(B256::repeat_byte(0x03)),
        ],
        receipts: vec![
            TransactionReceipt { revert_reason: None },
            TransactionReceipt { revert_reason: Some(Bytes::from(revert_data)) },
            // Wrong selector: tolerated, not reported.
            TransactionReceipt { revert_reason: Some(Bytes::from(vec![0xde, 0xad, 0xbe, 0xef])) },
        ],
    };
    listener.on_block_added(&context);

    let captured = collect(&mut receiver, 2).await;
    assert_drained(&mut receiver).await;

    let added = captured.iter().find(|(_, _, w)| w["type"] == "BlockAdded").unwrap();
    assert_eq!(added.1, "test-block");
    assert!(added.2["event"].get("totalDifficulty").is_none());

    let reverted = captured
        .iter()
        .find(|(_, _, w)| w["type"] == "TransactionReverted")
        .unwrap();
    assert_eq!(reverted.0, DomainObjectType::Transaction);
    assert_eq!(reverted.1, "test-transaction");
    assert_eq!(
        reverted.2["event"]["revertReason"],
        "Not enough tokens to transfer"
    );
    assert_eq!(
        reverted.2["event"]["transaction"]["hash"],
        format!("0x{}", "02".repeat(32))
    );
    assert!(reverted.2["event"]["blockHeader"].is_object());
}

#[tokio::test]
async fn block_reorg_skips_revert_scan() {
    let (listener, mut receiver) = make_listener(None, Arc::new(SchemaStore::empty()));

    let revert_data = hex::decode(
        "08c379a00000000000000000000000000000000000000000000000000000000000000020000000000000000000000000000000000000000000000000000000000000001e4e6f7420656e6f75676820746f6b656e7320746f207472616e73666572000000",
    )
    .unwrap();
    let context = AddedBlockContext {
        header: header(201, B256::repeat_byte(0xd1)),
        transactions: vec![transaction(B256::repeat_byte(0x01))],
        receipts: vec![TransactionReceipt { revert_reason: Some(Bytes::from(revert_data)) }],
    };
    listener.on_block_reorg(&context);

    let captured = collect(&mut receiver, 1).await;
    assert_drained(&mut receiver).await;
    assert_eq!(captured[0].2["type"], "BlockReorg");
}

#[tokio::test]
async fn transaction_pool_events() {
    let (listener, mut receiver) = make_listener(None, Arc::new(SchemaStore::empty()));

    listener.on_transaction_added(&transaction(B256::repeat_byte(0x11)));
    listener.on_transaction_dropped(&transaction(B256::repeat_byte(0x12)));

    let captured = collect(&mut receiver, 2).await;
    let types: Vec<&str> = captured
        .iter()
        .map(|(_, _, w)| w["type"].as_str().unwrap())
        .collect();
    assert!(types.contains(&"TransactionAdded"));
    assert!(types.contains(&"TransactionDropped"));
    assert!(captured.iter().all(|(kind, topic, _)| {
        *kind == DomainObjectType::Transaction && topic == "test-transaction"
    }));
}

#[tokio::test]
async fn sync_status_uses_false_sentinel_when_absent() {
    let (listener, mut receiver) = make_listener(None, Arc::new(SchemaStore::empty()));

    listener.on_sync_status_changed(Some(&SyncStatus {
        starting_block: 0,
        current_block: 5,
        highest_block: 10,
    }));
    listener.on_sync_status_changed(None);

    let captured = collect(&mut receiver, 2).await;
    let syncing = captured.iter().find(|(_, _, w)| w["event"].is_object()).unwrap();
    assert_eq!(syncing.2["event"]["highestBlock"], "0xa");
    assert_eq!(syncing.1, "test-node");

    let idle = captured.iter().find(|(_, _, w)| w["event"].is_boolean()).unwrap();
    assert_eq!(idle.2["event"], serde_json::Value::Bool(false));
}

#[tokio::test]
async fn log_emitted_decorates_against_schema_snapshot() {
    let contract: Address = "0x1dea979ae76f26071870f824088da78979eb91c8".parse().unwrap();
    let schemas = Arc::new(SchemaStore::new(EventSchemas::new(vec![EventSchema::new(
        "erc20-transfer",
        contract,
        Some("Transfer".into()),
        vec![
            EventParameter::parse("erc20-transfer", "address", true).unwrap(),
            EventParameter::parse("erc20-transfer", "address", true).unwrap(),
            EventParameter::parse("erc20-transfer", "uint256", false).unwrap(),
        ],
    )])));
    let (listener, mut receiver) = make_listener(None, schemas);

    let log = LogRecord {
        block_number: 19_000_000,
        block_hash: B256::repeat_byte(0xe0),
        transaction_hash: B256::repeat_byte(0xe1),
        transaction_index: 4,
        address: contract,
        data: Bytes::from(
            hex::decode("00000000000000000000000000000000000000000000a9d33d0e47bfd6c72b27")
                .unwrap(),
        ),
        topics: vec![
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
                .parse()
                .unwrap(),
            "0x000000000000000000000000c2ca8977e5c582f938c30f7a5328ac1d101bd564"
                .parse()
                .unwrap(),
            "0x00000000000000000000000006e01587ad6b033d4b05156003c3412e8997bfe3"
                .parse()
                .unwrap(),
        ],
        removed: false,
        log_index: 2,
    };
    listener.on_log_emitted(&log).unwrap();

    let captured = collect(&mut receiver, 1).await;
    let (kind, topic, wire) = &captured[0];
    assert_eq!(*kind, DomainObjectType::Log);
    assert_eq!(topic, "test-log");
    assert_eq!(wire["type"], "LogEmitted");
    assert_eq!(
        wire["event"]["decoded"],
        "Transfer(0xc2ca8977e5c582f938c30f7a5328ac1d101bd564,0x06e01587ad6b033d4b05156003c3412e8997bfe3,801976598137298011761447)"
    );
    assert_eq!(wire["event"]["logIndex"], "0x2");
}

#[tokio::test]
async fn ambiguous_schema_configuration_aborts_log_publish() {
    let contract: Address = "0x1dea979ae76f26071870f824088da78979eb91c8".parse().unwrap();
    let params = || {
        vec![
            EventParameter::parse("dup", "address", true).unwrap(),
            EventParameter::parse("dup", "address", true).unwrap(),
            EventParameter::parse("dup", "uint256", false).unwrap(),
        ]
    };
    let schemas = Arc::new(SchemaStore::new(EventSchemas::new(vec![
        EventSchema::new("a", contract, Some("Transfer".into()), params()),
        EventSchema::new("b", contract, Some("Transfer".into()), params()),
    ])));
    let (listener, mut receiver) = make_listener(None, schemas);

    let log = LogRecord {
        block_number: 1,
        block_hash: B256::repeat_byte(0xe2),
        transaction_hash: B256::repeat_byte(0xe3),
        transaction_index: 0,
        address: contract,
        data: Bytes::from(vec![0u8; 32]),
        topics: vec![
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
                .parse()
                .unwrap(),
            B256::ZERO,
            B256::ZERO,
        ],
        removed: false,
        log_index: 0,
    };

    assert!(listener.on_log_emitted(&log).is_err());
    assert_drained(&mut receiver).await;
}

#[tokio::test]
async fn envelope_wire_shape() {
    let (listener, mut receiver) = make_listener(None, Arc::new(SchemaStore::empty()));

    listener.on_sync_status_changed(None);
    let captured = collect(&mut receiver, 1).await;
    let wire = captured[0].2.as_object().unwrap();
    assert_eq!(wire.len(), 4);
    for key in ["uuid", "type", "timestamp", "event"] {
        assert!(wire.contains_key(key), "missing key {key}");
    }
    assert!(wire["timestamp"].is_i64());
}
