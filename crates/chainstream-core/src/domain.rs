//! Domain vocabulary — the closed set of object categories and event tags.

use serde::{Deserialize, Serialize};

/// Category of chain object an event is about.
///
/// Each category maps to its own broker destination (see
/// [`crate::publish::DomainObjectTopicResolver`]) and can be enabled or
/// disabled as a whole in the stream configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DomainObjectType {
    Block,
    Transaction,
    SmartContract,
    Node,
    Log,
}

impl DomainObjectType {
    /// Every category, in declaration order.
    pub const ALL: [DomainObjectType; 5] = [
        DomainObjectType::Block,
        DomainObjectType::Transaction,
        DomainObjectType::SmartContract,
        DomainObjectType::Node,
        DomainObjectType::Log,
    ];

    /// Canonical lowercase name, used as the topic-name suffix.
    pub fn name(&self) -> &'static str {
        match self {
            DomainObjectType::Block => "block",
            DomainObjectType::Transaction => "transaction",
            DomainObjectType::SmartContract => "smart-contract",
            DomainObjectType::Node => "node",
            DomainObjectType::Log => "log",
        }
    }
}

impl std::fmt::Display for DomainObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DomainObjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(DomainObjectType::Block),
            "transaction" => Ok(DomainObjectType::Transaction),
            "smart-contract" => Ok(DomainObjectType::SmartContract),
            "node" => Ok(DomainObjectType::Node),
            "log" => Ok(DomainObjectType::Log),
            other => Err(format!("unknown domain object type: {other}")),
        }
    }
}

/// Wire-level event type tag, carried in the envelope's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    BlockPropagated,
    BlockAdded,
    BlockReorg,
    TransactionAdded,
    TransactionDropped,
    TransactionReverted,
    SyncStatusChanged,
    LogEmitted,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::BlockPropagated => "BlockPropagated",
            EventType::BlockAdded => "BlockAdded",
            EventType::BlockReorg => "BlockReorg",
            EventType::TransactionAdded => "TransactionAdded",
            EventType::TransactionDropped => "TransactionDropped",
            EventType::TransactionReverted => "TransactionReverted",
            EventType::SyncStatusChanged => "SyncStatusChanged",
            EventType::LogEmitted => "LogEmitted",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
