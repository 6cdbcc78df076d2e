//! # chainstream-pipeline
//!
//! The fan-in point of chainstream: the node's lifecycle notifications
//! arrive at a [`ChainEventListener`], pass dedup and log decoding, and
//! leave as envelopes dispatched fire-and-forget to the configured
//! publisher. Also home to the checkpoint metadata store and the
//! subscription lifecycle manager the orchestration layer wires up.

pub mod config;
pub mod listener;
pub mod metadata;
pub mod subscription;

pub use config::StreamConfig;
pub use listener::ChainEventListener;
pub use metadata::{KeyValueStore, MemoryKeyValueStore, MetadataDb, StoreError, StoreTransaction};
pub use subscription::SubscriptionManager;
