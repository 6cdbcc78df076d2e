//! Log decoder — matches a raw log against the schema set and reconstructs
//! its arguments.
//!
//! Matching is two-phase: first by signature topic + emitting address, then
//! (for logs nothing claimed) by the anonymous-event fallback, where a
//! schema with no event name matches when its indexed-parameter count
//! equals the log's topic count. A log no schema matches passes through
//! undecorated; a log *two* schemas match is a configuration error and
//! fails loudly.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::B256;

use chainstream_core::types::{DecodedLog, LogRecord};

use crate::error::DecodeError;
use crate::schema::EventSchema;
use crate::store::EventSchemas;

/// Decode a log against the schema set.
///
/// Returns the log undecorated when it carries no topics (undecodable
/// without a signature) or when no schema matches. Decoding the same log
/// against the same set is deterministic.
pub fn decode(schemas: &EventSchemas, log: &LogRecord) -> Result<DecodedLog, DecodeError> {
    if log.topics.is_empty() {
        return Ok(DecodedLog::raw(log.clone()));
    }
    let signature_topic = log.topics[0];

    let mut matches: Vec<&EventSchema> = schemas
        .schemas()
        .iter()
        .filter(|schema| {
            schema.topic() == Some(signature_topic)
                && schema.contract_address() == log.address
        })
        .collect();

    if matches.is_empty() {
        // Anonymous events carry no signature topic, so every topic is an
        // indexed argument value.
        matches = schemas
            .schemas()
            .iter()
            .filter(|schema| {
                schema.is_anonymous()
                    && schema.contract_address() == log.address
                    && schema.indexed_count() == log.topics.len()
            })
            .collect();
    }

    if matches.len() > 1 {
        return Err(DecodeError::AmbiguousSchema {
            address: log.address,
            topic: Some(signature_topic),
        });
    }

    match matches.first() {
        Some(schema) => {
            let rendering = decode_arguments(schema, log)?;
            Ok(DecodedLog::decorated(log.clone(), rendering))
        }
        None => Ok(DecodedLog::raw(log.clone())),
    }
}

/// Decode all arguments of a matched log and render them as
/// `"<name>(<v1>,<v2>,…)"` (empty name for anonymous events).
fn decode_arguments(schema: &EventSchema, log: &LogRecord) -> Result<String, DecodeError> {
    // Non-indexed parameters come out of the data payload, in order.
    let data_types: Vec<DynSolType> = schema
        .parameters()
        .iter()
        .filter(|p| !p.is_indexed())
        .map(|p| p.ty().clone())
        .collect();
    let mut arguments: Vec<DynSolValue> = if data_types.is_empty() {
        Vec::new()
    } else {
        match DynSolType::Tuple(data_types).abi_decode(&log.data) {
            Ok(DynSolValue::Tuple(values)) => values,
            Ok(other) => vec![other],
            Err(e) => {
                return Err(DecodeError::AbiDecodeFailed { reason: e.to_string() });
            }
        }
    };

    // Indexed parameters come out of the topics, skipping the signature
    // topic unless the event is anonymous, and splice back into their
    // declared positions.
    let indexed_positions: Vec<usize> = schema
        .parameters()
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_indexed())
        .map(|(i, _)| i)
        .collect();
    let skip = usize::from(!schema.is_anonymous()).min(log.topics.len());
    let indexed_topics = &log.topics[skip..];
    if indexed_topics.len() != indexed_positions.len() {
        return Err(DecodeError::ArgumentCountMismatch {
            expected: schema.parameters().len(),
            actual: arguments.len() + indexed_topics.len(),
        });
    }

    let indexed_types: Vec<&DynSolType> = schema
        .parameters()
        .iter()
        .filter(|p| p.is_indexed())
        .map(|p| p.ty())
        .collect();
    for (i, topic) in indexed_topics.iter().enumerate() {
        let value = decode_topic(topic, indexed_types[i])?;
        let position = indexed_positions[i];
        if position > arguments.len() {
            return Err(DecodeError::ArgumentCountMismatch {
                expected: schema.parameters().len(),
                actual: arguments.len(),
            });
        }
        arguments.insert(position, value);
    }

    if arguments.len() != schema.parameters().len() {
        return Err(DecodeError::ArgumentCountMismatch {
            expected: schema.parameters().len(),
            actual: arguments.len(),
        });
    }

    let rendered: Vec<String> = arguments.iter().map(render_value).collect();
    Ok(format!(
        "{}({})",
        schema.event_name().unwrap_or(""),
        rendered.join(",")
    ))
}

/// Decode a single indexed topic (always one 32-byte word).
///
/// Value types are ABI-encoded in place and can be recovered. Reference
/// types (string, bytes, arrays, tuples) are stored as the keccak256 of
/// their encoding; the original value is unrecoverable, so the raw word is
/// surfaced instead.
fn decode_topic(topic: &B256, ty: &DynSolType) -> Result<DynSolValue, DecodeError> {
    match ty {
        DynSolType::String
        | DynSolType::Bytes
        | DynSolType::Array(_)
        | DynSolType::FixedArray(..)
        | DynSolType::Tuple(_) => Ok(DynSolValue::FixedBytes(*topic, 32)),
        _ => ty
            .abi_decode(topic.as_slice())
            .map_err(|e| DecodeError::AbiDecodeFailed {
                reason: format!("topic decode: {e}"),
            }),
    }
}

/// Render a decoded value for the human-readable decoration.
fn render_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::Address(a) => format!("0x{}", hex::encode(a)),
        DynSolValue::FixedBytes(word, size) => format!("0x{}", hex::encode(&word[..*size])),
        DynSolValue::Bytes(b) => format!("0x{}", hex::encode(b)),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            let rendered: Vec<String> = items.iter().map(render_value).collect();
            format!("({})", rendered.join(","))
        }
        DynSolValue::Function(f) => format!("0x{}", hex::encode(f)),
    }
}
