//! Checkpoint metadata store — dedup for propagated-block notifications.
//!
//! The node's key-value store is an external collaborator behind the
//! [`KeyValueStore`] seam. The checkpoint is two fixed keys, always
//! written together in one transaction. Reads decide whether a propagated
//! block is news; writes are best effort and never gate publishing.

use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::B256;
use thiserror::Error;
use tracing::{error, warn};

/// Key for the highest accepted block number (u64, big-endian).
pub const LATEST_BLOCK_NUMBER_KEY: &[u8] = b"LATEST_BLOCK_NUMBER";
/// Key for the hash recorded alongside that block number (32 bytes).
pub const LATEST_BLOCK_HASH_KEY: &[u8] = b"LATEST_BLOCK_HASH";

/// Errors surfaced by a key-value store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),
}

/// A batch of writes applied atomically.
///
/// A failed [`commit`](StoreTransaction::commit) leaves the store
/// untouched; [`rollback`](StoreTransaction::rollback) abandons the batch
/// without applying it.
pub trait StoreTransaction {
    fn put(&mut self, key: &[u8], value: &[u8]);
    fn commit(self: Box<Self>) -> Result<(), StoreError>;
    fn rollback(self: Box<Self>);
}

/// The external key-value store seam.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn start_transaction(&self) -> Box<dyn StoreTransaction + '_>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn start_transaction(&self) -> Box<dyn StoreTransaction + '_> {
        (**self).start_transaction()
    }
}

/// The pipeline's view of the checkpoint store.
pub struct MetadataDb {
    storage: Box<dyn KeyValueStore>,
}

impl MetadataDb {
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn latest_block_number(&self) -> Option<u64> {
        self.read(LATEST_BLOCK_NUMBER_KEY)
            .and_then(|bytes| bytes.try_into().ok())
            .map(u64::from_be_bytes)
    }

    pub fn latest_block_hash(&self) -> Option<Vec<u8>> {
        self.read(LATEST_BLOCK_HASH_KEY)
    }

    /// Decide whether a propagated block at `(block_number, block_hash)`
    /// is news:
    ///
    /// 1. no checkpoint yet → accept;
    /// 2. higher than the checkpoint → accept;
    /// 3. same height, stored hash present and different → accept
    ///    (competing headers at one height are both newsworthy);
    /// 4. otherwise → reject (exact repeat at or below the checkpoint).
    pub fn should_publish(&self, block_number: u64, block_hash: &B256) -> bool {
        match self.latest_block_number() {
            None => true,
            Some(latest) => {
                block_number > latest
                    || (block_number == latest
                        && self
                            .latest_block_hash()
                            .map(|stored| stored != block_hash.as_slice())
                            .unwrap_or(false))
            }
        }
    }

    /// Record the checkpoint: both keys in one transaction. On failure the
    /// write rolls back and is only logged — the caller still publishes.
    pub fn record_latest(&self, block_number: u64, block_hash: &B256) {
        let mut tx = self.storage.start_transaction();
        tx.put(LATEST_BLOCK_NUMBER_KEY, &block_number.to_be_bytes());
        tx.put(LATEST_BLOCK_HASH_KEY, block_hash.as_slice());
        if let Err(e) = tx.commit() {
            error!("Cannot store checkpoint in metadata db: {e}");
        }
    }

    fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Cannot read checkpoint from metadata db: {e}");
                None
            }
        }
    }
}

// ─── In-memory store (for testing and embedded use) ───────────────────────────

/// In-memory [`KeyValueStore`] with optional forced commit failure, for
/// exercising the rollback path in tests.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    data: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
    fail_commits: std::sync::atomic::AtomicBool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent commit fail (and roll back).
    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }
}

struct MemoryTransaction<'a> {
    store: &'a MemoryKeyValueStore,
    writes: Vec<(Vec<u8>, Vec<u8>)>,
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) {
        self.writes.push((key.to_vec(), value.to_vec()));
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        if self
            .store
            .fail_commits
            .load(std::sync::atomic::Ordering::SeqCst)
        {
            return Err(StoreError::Storage("commit refused".into()));
        }
        let mut data = self.store.data.lock().unwrap();
        for (key, value) in self.writes {
            data.insert(key, value);
        }
        Ok(())
    }

    fn rollback(self: Box<Self>) {}
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    fn start_transaction(&self) -> Box<dyn StoreTransaction + '_> {
        Box::new(MemoryTransaction { store: self, writes: Vec::new() })
    }
}
