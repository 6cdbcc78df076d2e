//! Stream configuration.
//!
//! The typed surface an outer config/CLI layer fills in. Only the fields
//! the pipeline itself consumes live here; broker connection details stay
//! with the backend that needs them.

use std::path::PathBuf;

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use chainstream_abi::SchemaStore;
use chainstream_core::domain::DomainObjectType;

/// Pipeline configuration with the upstream defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Master switch; a disabled stream registers no subscriptions.
    #[serde(default)]
    pub enabled: bool,
    /// Topic-name prefix, e.g. `"chainstream-"` routes block events to
    /// `"chainstream-block"`.
    #[serde(default = "default_topic_prefix")]
    pub topic_prefix: String,
    /// Broker endpoint handed to the backend.
    #[serde(default = "default_broker_url")]
    pub broker_url: String,
    /// Whether propagated-block dedup uses the checkpoint store.
    #[serde(default = "bool_true")]
    pub metadata_db_enabled: bool,
    /// Kinds to stream; `None` enables all of them.
    #[serde(default)]
    pub enabled_kinds: Option<Vec<DomainObjectType>>,
    /// Contract addresses the log subscription filters on (empty = all).
    #[serde(default)]
    pub log_filter_addresses: Vec<Address>,
    /// Topic filter sets for the log subscription, positional per the
    /// node's filter semantics (empty = all).
    #[serde(default)]
    pub log_filter_topics: Vec<Vec<B256>>,
    /// Event schema definition file; absent means no log decoding.
    #[serde(default)]
    pub event_schemas_file: Option<PathBuf>,
}

fn default_topic_prefix() -> String {
    "chainstream-".to_string()
}

fn default_broker_url() -> String {
    "127.0.0.1:9092".to_string()
}

fn bool_true() -> bool {
    true
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            topic_prefix: default_topic_prefix(),
            broker_url: default_broker_url(),
            metadata_db_enabled: true,
            enabled_kinds: None,
            log_filter_addresses: Vec::new(),
            log_filter_topics: Vec::new(),
            event_schemas_file: None,
        }
    }
}

impl StreamConfig {
    /// The kinds to stream, with `None` resolved to every kind.
    pub fn enabled_kinds(&self) -> Vec<DomainObjectType> {
        self.enabled_kinds
            .clone()
            .unwrap_or_else(|| DomainObjectType::ALL.to_vec())
    }

    pub fn is_kind_enabled(&self, kind: DomainObjectType) -> bool {
        match &self.enabled_kinds {
            Some(kinds) => kinds.contains(&kind),
            None => true,
        }
    }

    /// (Re)load the event schema file into the store. Without a configured
    /// file this is a no-op; a load failure keeps the previous set (the
    /// store logs it).
    pub fn load_event_schemas(&self, store: &SchemaStore) {
        if let Some(path) = &self.event_schemas_file {
            let _ = store.reload_from(path);
        }
    }
}
