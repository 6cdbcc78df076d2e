//! The broker seam: topic resolution and the pluggable publisher.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::DomainObjectType;
use crate::envelope::Envelope;

/// Destination used when a kind cannot be resolved.
pub const DEFAULT_TOPIC: &str = "default";

/// Maps an event to the named destination it should be routed to.
pub trait TopicResolver: Send + Sync {
    fn resolve(&self, kind: DomainObjectType, event: &Envelope) -> String;
}

/// Resolves each kind to `prefix + kind name`, e.g. a prefix of
/// `"mainnet-"` routes block events to `"mainnet-block"`.
///
/// The table is precomputed at construction; lookups never fail and fall
/// back to [`DEFAULT_TOPIC`].
pub struct DomainObjectTopicResolver {
    topics: HashMap<DomainObjectType, String>,
}

impl DomainObjectTopicResolver {
    pub fn new(prefix: impl AsRef<str>) -> Self {
        let prefix = prefix.as_ref();
        let topics = DomainObjectType::ALL
            .iter()
            .map(|kind| (*kind, format!("{prefix}{}", kind.name())))
            .collect();
        Self { topics }
    }
}

impl TopicResolver for DomainObjectTopicResolver {
    fn resolve(&self, kind: DomainObjectType, _event: &Envelope) -> String {
        self.topics
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| DEFAULT_TOPIC.to_string())
    }
}

/// Resolves every kind to one fixed destination, for brokers configured
/// with a single stream.
pub struct FixedTopicResolver {
    topic: String,
}

impl FixedTopicResolver {
    pub fn new(topic: impl Into<String>) -> Self {
        Self { topic: topic.into() }
    }
}

impl TopicResolver for FixedTopicResolver {
    fn resolve(&self, _kind: DomainObjectType, _event: &Envelope) -> String {
        self.topic.clone()
    }
}

/// The capability every broker backend implements.
///
/// Callers treat the publish as fire-and-forget: delivery is at-most-once
/// per local decision, and failures are the backend's to log or retry.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(
        &self,
        kind: DomainObjectType,
        topic_resolver: &dyn TopicResolver,
        event: &Envelope,
    );
}
