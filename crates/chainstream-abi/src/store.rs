//! Schema set loading and the hot-swappable store.
//!
//! Schema definitions are declarative YAML:
//!
//! ```yaml
//! events:
//!   - id: erc20-transfer
//!     contract: "0x1dea979ae76f26071870f824088da78979eb91c8"
//!     name: Transfer
//!     parameters:
//!       - { type: address, indexed: true }
//!       - { type: address, indexed: true }
//!       - { type: uint256 }
//!   - id: anonymous-ping          # no `name` ⇒ anonymous event
//!     contract: "0x1dea979ae76f26071870f824088da78979eb91c8"
//!     parameters:
//!       - { type: address, indexed: true }
//! ```

use std::path::Path;
use std::sync::{Arc, RwLock};

use alloy_primitives::Address;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::SchemaError;
use crate::schema::{EventParameter, EventSchema};

// ─── Raw serde types ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SchemaFileRaw {
    events: Vec<EventEntryRaw>,
}

#[derive(Debug, Deserialize)]
struct EventEntryRaw {
    id: String,
    contract: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    parameters: Vec<ParameterRaw>,
}

#[derive(Debug, Deserialize)]
struct ParameterRaw {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    indexed: bool,
}

// ─── Immutable schema set ─────────────────────────────────────────────────────

/// A loaded, immutable set of event schemas.
///
/// Reloading never mutates a set in place; a whole new `EventSchemas` is
/// built and swapped in via [`SchemaStore`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventSchemas {
    schemas: Vec<EventSchema>,
}

impl EventSchemas {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(schemas: Vec<EventSchema>) -> Self {
        Self { schemas }
    }

    /// Parse a schema definition document.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let raw: SchemaFileRaw =
            serde_yaml::from_str(yaml).map_err(|e| SchemaError::Parse(e.to_string()))?;
        let mut schemas = Vec::with_capacity(raw.events.len());
        for entry in raw.events {
            let contract_address: Address =
                entry.contract.parse().map_err(|_| SchemaError::InvalidAddress {
                    schema: entry.id.clone(),
                    value: entry.contract.clone(),
                })?;
            let parameters = entry
                .parameters
                .iter()
                .map(|p| EventParameter::parse(&entry.id, &p.ty, p.indexed))
                .collect::<Result<Vec<_>, _>>()?;
            schemas.push(EventSchema::new(entry.id, contract_address, entry.name, parameters));
        }
        Ok(Self { schemas })
    }

    /// Load a schema definition file.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn schemas(&self) -> &[EventSchema] {
        &self.schemas
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

// ─── Hot-swappable store ──────────────────────────────────────────────────────

/// Holds the active schema snapshot behind a single guarded pointer.
///
/// Decoders grab an `Arc` snapshot and keep using it for the whole decode;
/// a concurrent reload swaps the pointer and can never expose a
/// half-updated set. A failed reload keeps the previous snapshot.
pub struct SchemaStore {
    current: RwLock<Arc<EventSchemas>>,
}

impl SchemaStore {
    pub fn new(initial: EventSchemas) -> Self {
        Self { current: RwLock::new(Arc::new(initial)) }
    }

    pub fn empty() -> Self {
        Self::new(EventSchemas::empty())
    }

    /// The active snapshot.
    pub fn current(&self) -> Arc<EventSchemas> {
        Arc::clone(&self.current.read().unwrap())
    }

    /// Swap in a replacement set wholesale.
    pub fn replace(&self, schemas: EventSchemas) {
        *self.current.write().unwrap() = Arc::new(schemas);
    }

    /// Reload from a definition file. On failure the previous snapshot
    /// stays active and the error is logged (and returned for callers that
    /// care).
    pub fn reload_from(&self, path: &Path) -> Result<(), SchemaError> {
        match EventSchemas::from_path(path) {
            Ok(schemas) => {
                info!(count = schemas.len(), file = %path.display(), "Loaded event schemas");
                self.replace(schemas);
                Ok(())
            }
            Err(e) => {
                error!(file = %path.display(), "Cannot load event schemas, keeping previous set: {e}");
                Err(e)
            }
        }
    }
}
