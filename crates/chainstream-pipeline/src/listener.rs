//! Chain event listener — fans the node's notifications into envelopes.
//!
//! The node invokes the handlers synchronously, one call per chain event.
//! Envelope construction (including wire serialization) happens on the
//! calling thread; the publish itself is spawned onto the runtime and
//! never blocks the notification thread. Spawned publishes may complete
//! in any order, so no cross-envelope ordering is guaranteed toward the
//! broker.

use std::sync::Arc;

use alloy_primitives::B256;
use serde_json::Value;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use chainstream_abi::error::DecodeError;
use chainstream_abi::{decoder, revert, SchemaStore};
use chainstream_core::domain::{DomainObjectType, EventType};
use chainstream_core::envelope::Envelope;
use chainstream_core::payload::{BlockPayload, TransactionPayload};
use chainstream_core::publish::{Publisher, TopicResolver};
use chainstream_core::serialize;
use chainstream_core::types::{
    AddedBlockContext, LogRecord, PropagatedBlockContext, SyncStatus, Transaction,
};

use crate::metadata::MetadataDb;

/// Receives each raw chain notification, applies dedup and log decoding,
/// and dispatches the resulting envelope.
///
/// Without a metadata db, dedup is disabled and every propagated-block
/// notification publishes (over-reporting beats silent gaps).
pub struct ChainEventListener {
    publisher: Arc<dyn Publisher>,
    topic_resolver: Arc<dyn TopicResolver>,
    metadata_db: Option<MetadataDb>,
    schemas: Arc<SchemaStore>,
    runtime: Handle,
}

impl ChainEventListener {
    pub fn new(
        publisher: Arc<dyn Publisher>,
        topic_resolver: Arc<dyn TopicResolver>,
        metadata_db: Option<MetadataDb>,
        schemas: Arc<SchemaStore>,
        runtime: Handle,
    ) -> Self {
        Self { publisher, topic_resolver, metadata_db, schemas, runtime }
    }

    /// A block propagated over the gossip network.
    ///
    /// Deduplicated against the checkpoint; on acceptance the checkpoint
    /// write is best effort and never gates the publish.
    pub fn on_block_propagated(&self, context: &PropagatedBlockContext) {
        if !self.should_publish(context.header.number, &context.header.hash) {
            return;
        }
        let payload = BlockPayload::with_total_difficulty(
            context.header.clone(),
            context.total_difficulty,
        );
        self.apply_event(
            DomainObjectType::Block,
            EventType::BlockPropagated,
            serialize::block_payload(&payload),
        );
        if let Some(db) = &self.metadata_db {
            db.record_latest(context.header.number, &context.header.hash);
        }
    }

    /// A block imported into the canonical chain. The node already
    /// deduplicates these upstream, so every notification publishes;
    /// afterwards the block's receipts are scanned for revert reasons.
    pub fn on_block_added(&self, context: &AddedBlockContext) {
        self.apply_event(
            DomainObjectType::Block,
            EventType::BlockAdded,
            serialize::block_payload(&BlockPayload::new(context.header.clone())),
        );
        self.scan_reverted_transactions(context);
    }

    /// A block reorged out of the canonical chain. No revert scan.
    pub fn on_block_reorg(&self, context: &AddedBlockContext) {
        self.apply_event(
            DomainObjectType::Block,
            EventType::BlockReorg,
            serialize::block_payload(&BlockPayload::new(context.header.clone())),
        );
    }

    pub fn on_transaction_added(&self, transaction: &Transaction) {
        self.apply_event(
            DomainObjectType::Transaction,
            EventType::TransactionAdded,
            serialize::transaction_payload(&TransactionPayload::new(transaction.clone())),
        );
    }

    pub fn on_transaction_dropped(&self, transaction: &Transaction) {
        self.apply_event(
            DomainObjectType::Transaction,
            EventType::TransactionDropped,
            serialize::transaction_payload(&TransactionPayload::new(transaction.clone())),
        );
    }

    pub fn on_sync_status_changed(&self, status: Option<&SyncStatus>) {
        self.apply_event(
            DomainObjectType::Node,
            EventType::SyncStatusChanged,
            serialize::sync_status(status),
        );
    }

    /// A contract log. Decoded against the current schema snapshot; an
    /// ambiguous schema configuration or an argument-count mismatch is a
    /// defect and aborts the operation instead of publishing a guess.
    pub fn on_log_emitted(&self, log: &LogRecord) -> Result<(), DecodeError> {
        let schemas = self.schemas.current();
        let decoded = decoder::decode(&schemas, log)?;
        self.apply_event(
            DomainObjectType::Log,
            EventType::LogEmitted,
            serialize::log(&decoded),
        );
        Ok(())
    }

    fn should_publish(&self, block_number: u64, block_hash: &B256) -> bool {
        self.metadata_db
            .as_ref()
            .map(|db| db.should_publish(block_number, block_hash))
            .unwrap_or(true)
    }

    /// Emit a TransactionReverted envelope for every receipt whose revert
    /// data decodes as `Error(string)`. Receipts without a reason, or whose
    /// bytes don't decode, are skipped silently.
    fn scan_reverted_transactions(&self, context: &AddedBlockContext) {
        for (transaction, receipt) in context.transactions.iter().zip(&context.receipts) {
            let Some(revert_bytes) = &receipt.revert_reason else {
                continue;
            };
            let Some(reason) = revert::decode_error_string(revert_bytes) else {
                continue;
            };
            let payload = TransactionPayload::reverted(
                transaction.clone(),
                context.header.clone(),
                reason,
            );
            self.apply_event(
                DomainObjectType::Transaction,
                EventType::TransactionReverted,
                serialize::transaction_payload(&payload),
            );
        }
    }

    /// Build the envelope on the calling thread, then hand it to the
    /// publisher on the runtime, fire-and-forget. A serialization failure
    /// drops this one event with a warning; the stream keeps flowing.
    fn apply_event(&self, kind: DomainObjectType, event_type: EventType, payload: Value) {
        debug!("Publishing message of type: {event_type}");
        match Envelope::create(event_type, payload) {
            Ok(event) => {
                let publisher = Arc::clone(&self.publisher);
                let topic_resolver = Arc::clone(&self.topic_resolver);
                self.runtime.spawn(async move {
                    publisher.publish(kind, topic_resolver.as_ref(), &event).await;
                });
            }
            Err(e) => warn!("Cannot publish event: {e}"),
        }
    }
}
