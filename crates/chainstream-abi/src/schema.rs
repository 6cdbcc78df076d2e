//! Event schema — the declared shape of a contract-emitted log.

use alloy_core::dyn_abi::DynSolType;
use alloy_primitives::{Address, B256};

use crate::error::SchemaError;
use crate::fingerprint;

/// One declared event parameter: its solidity type and whether it is
/// emitted as an indexed topic or in the data payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EventParameter {
    canonical: String,
    ty: DynSolType,
    indexed: bool,
}

impl EventParameter {
    /// Parse a solidity type name, normalizing it to its canonical form
    /// (`"uint"` → `"uint256"` etc).
    pub fn parse(schema_id: &str, type_name: &str, indexed: bool) -> Result<Self, SchemaError> {
        let ty: DynSolType = type_name.trim().parse().map_err(|e| SchemaError::UnknownType {
            schema: schema_id.to_string(),
            ty: type_name.to_string(),
            reason: format!("{e}"),
        })?;
        let canonical = ty.sol_type_name().to_string();
        Ok(Self { canonical, ty, indexed })
    }

    pub fn ty(&self) -> &DynSolType {
        &self.ty
    }

    /// Canonical solidity type name used in the event signature.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed
    }
}

/// An expected contract-event shape, with its topic fingerprint derived
/// once at construction.
///
/// An absent event name declares the event **anonymous**: it carries no
/// signature topic on the wire (every topic is an indexed argument value)
/// and therefore no fingerprint here.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSchema {
    id: String,
    contract_address: Address,
    event_name: Option<String>,
    parameters: Vec<EventParameter>,
    topic: Option<B256>,
}

impl EventSchema {
    pub fn new(
        id: impl Into<String>,
        contract_address: Address,
        event_name: Option<String>,
        parameters: Vec<EventParameter>,
    ) -> Self {
        let topic = event_name.as_deref().map(|name| {
            let types: Vec<&str> = parameters.iter().map(EventParameter::canonical).collect();
            fingerprint::signature_topic(&fingerprint::event_signature(name, &types))
        });
        Self {
            id: id.into(),
            contract_address,
            event_name,
            parameters,
            topic,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    /// `None` for anonymous events.
    pub fn event_name(&self) -> Option<&str> {
        self.event_name.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.event_name.is_none()
    }

    /// Ordered parameter declarations; order matters for ABI decode.
    pub fn parameters(&self) -> &[EventParameter] {
        &self.parameters
    }

    /// The derived signature topic; `None` for anonymous events.
    pub fn topic(&self) -> Option<B256> {
        self.topic
    }

    /// Number of indexed parameters (the number of argument topics the
    /// matching log carries).
    pub fn indexed_count(&self) -> usize {
        self.parameters.iter().filter(|p| p.is_indexed()).count()
    }
}
