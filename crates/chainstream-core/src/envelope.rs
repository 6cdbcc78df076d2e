//! Event envelope — the normalized wire form of every emitted event.

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::EventType;
use crate::error::EnvelopeError;

/// An immutable event envelope.
///
/// The wire JSON is computed exactly once, at construction, and carries
/// exactly four top-level keys: `uuid`, `type`, `timestamp` (epoch
/// milliseconds at construction time, not the chain event's time), and
/// `event` (the kind-specific payload). Once built, the wire form never
/// changes, even if the value the payload was derived from does.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    uuid: String,
    event_type: EventType,
    timestamp: i64,
    payload: Value,
    wire: String,
}

impl Envelope {
    /// Build an envelope around an already-serialized payload value.
    ///
    /// Generates a fresh v4 uuid per call; collisions are negligible.
    pub fn create(event_type: EventType, payload: Value) -> Result<Self, EnvelopeError> {
        let uuid = Uuid::new_v4().to_string();
        let timestamp = Utc::now().timestamp_millis();
        let mut root = serde_json::Map::new();
        root.insert("uuid".into(), Value::String(uuid.clone()));
        root.insert("type".into(), Value::String(event_type.as_str().to_string()));
        root.insert("timestamp".into(), Value::Number(timestamp.into()));
        root.insert("event".into(), payload.clone());
        let wire = serde_json::to_string(&Value::Object(root))?;
        Ok(Self { uuid, event_type, timestamp, payload, wire })
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Epoch milliseconds captured when the envelope was constructed.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// The precomputed wire JSON.
    pub fn as_json(&self) -> &str {
        &self.wire
    }

    /// UTF-8 bytes of the wire JSON, as broker clients consume it.
    pub fn as_bytes(&self) -> &[u8] {
        self.wire.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn wire_shape_has_exactly_four_keys() {
        let envelope =
            Envelope::create(EventType::BlockAdded, serde_json::json!({"number": "0x64"}))
                .unwrap();
        let parsed: Value = serde_json::from_str(envelope.as_json()).unwrap();
        let object = parsed.as_object().unwrap();

        assert_eq!(object.len(), 4);
        assert!(object["uuid"].is_string());
        assert_eq!(object["type"], "BlockAdded");
        assert!(object["timestamp"].is_i64());
        assert_eq!(object["event"]["number"], "0x64");
    }

    #[test]
    fn wire_form_is_immutable() {
        let envelope =
            Envelope::create(EventType::LogEmitted, serde_json::json!({"a": 1})).unwrap();
        let first = envelope.as_json().to_string();
        // Re-reading must never re-serialize.
        assert_eq!(envelope.as_json(), first);
        assert_eq!(envelope.as_bytes(), first.as_bytes());
    }

    #[test]
    fn uuids_are_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let envelope =
                Envelope::create(EventType::TransactionAdded, Value::Null).unwrap();
            assert!(seen.insert(envelope.uuid().to_string()));
        }
    }

    #[test]
    fn timestamp_is_construction_time() {
        let before = Utc::now().timestamp_millis();
        let envelope = Envelope::create(EventType::BlockReorg, Value::Null).unwrap();
        let after = Utc::now().timestamp_millis();
        assert!(envelope.timestamp() >= before && envelope.timestamp() <= after);
    }
}
