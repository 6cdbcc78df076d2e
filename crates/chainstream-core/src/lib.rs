//! # chainstream-core
//!
//! The envelope model, domain vocabulary, and broker seam shared by every
//! chainstream crate. A node's lifecycle notifications are normalized into
//! immutable [`Envelope`]s here and handed to a pluggable [`Publisher`]
//! through a [`TopicResolver`].

pub mod domain;
pub mod envelope;
pub mod error;
pub mod payload;
pub mod publish;
pub mod quantity;
pub mod serialize;
pub mod types;

pub use domain::{DomainObjectType, EventType};
pub use envelope::Envelope;
pub use error::EnvelopeError;
pub use payload::{BlockPayload, TransactionPayload};
pub use publish::{DomainObjectTopicResolver, FixedTopicResolver, Publisher, TopicResolver};
pub use types::{
    AddedBlockContext, BlockHeader, DecodedLog, LogRecord, PropagatedBlockContext, SyncStatus,
    Transaction, TransactionReceipt,
};
