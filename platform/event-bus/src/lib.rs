//! # Marketplace Event Bus
//!
//! Platform-level event bus for cross-service messaging in the marketplace
//! (order, payment, product, inventory, influencer, notification services).
//!
//! ## Why This Lives in the Platform Tier
//!
//! The event bus is a **shared runtime capability** every service depends on.
//! Keeping it in `platform/` allows:
//! - Services to depend on platform crates without circular dependencies
//! - Plug-and-play service development (services don't depend on each other)
//! - Config-driven swap between NATS (production) and InMemory (dev/test)
//!
//! ## Delivery semantics
//!
//! The bus is best-effort pub/sub, not a log:
//! - **at-least-once** once the broker has accepted a message — consumers must
//!   deduplicate on the envelope `eventId`
//! - **at-most-once attempt** before broker acceptance — a failed `emit` is
//!   logged and dropped, never retried by the client
//! - **no ordering guarantee** across envelopes, even from one process
//!
//! ## Usage
//!
//! ```rust,no_run
//! use event_bus::{BusConfig, ConnectionManager, EventClient, NatsConnector};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BusConfig::from_env()?;
//!
//! let manager = ConnectionManager::new(
//!     Arc::new(NatsConnector::new(config.broker_url.clone())),
//!     config.reconnect.clone(),
//! );
//! // Best-effort: a down broker logs a warning, the service still starts.
//! manager.connect().await;
//!
//! let client = EventClient::new(manager, config);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod connection;
mod envelope;
mod inmemory_bus;
mod nats_bus;

pub use client::{EmitOptions, EventClient};
pub use config::BusConfig;
pub use connection::{
    ConnectionManager, ConnectionState, Connector, NatsConnector, ReconnectPolicy,
    StaticConnector,
};
pub use envelope::{validate_envelope_fields, EventEnvelope};
pub use inmemory_bus::InMemoryBus;
pub use nats_bus::NatsBus;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// A message received from the event bus
#[derive(Debug, Clone)]
pub struct BusMessage {
    /// The subject/topic this message was published to
    pub subject: String,
    /// The message payload (raw bytes)
    pub payload: Vec<u8>,
    /// Optional headers (reserved for future use)
    pub headers: Option<std::collections::HashMap<String, String>>,
    /// Optional reply-to subject (for request-response patterns)
    pub reply_to: Option<String>,
}

impl BusMessage {
    /// Create a new bus message
    pub fn new(subject: String, payload: Vec<u8>) -> Self {
        Self {
            subject,
            payload,
            headers: None,
            reply_to: None,
        }
    }

    /// Add headers to the message
    pub fn with_headers(mut self, headers: std::collections::HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Add a reply-to subject
    pub fn with_reply_to(mut self, reply_to: String) -> Self {
        self.reply_to = Some(reply_to);
        self
    }
}

/// Errors that can occur when using the event bus
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("failed to publish message: {0}")]
    PublishError(String),

    #[error("failed to subscribe to subject: {0}")]
    SubscribeError(String),

    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error("not connected to broker")]
    NotConnected,

    #[error("request to {subject} failed: {reason}")]
    RequestError { subject: String, reason: String },

    #[error("request to {subject} timed out after {timeout:?}")]
    RequestTimeout { subject: String, timeout: Duration },

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("failed to decode response: {0}")]
    DecodeError(String),

    #[error("invalid subject pattern: {0}")]
    InvalidSubject(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl BusError {
    /// Whether this error indicates the underlying connection is unusable.
    ///
    /// The `EventClient` uses this to tell the `ConnectionManager` to begin
    /// reconnecting; serialization and contract errors never trigger that.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, BusError::ConnectionError(_) | BusError::NotConnected)
    }
}

/// Result type for event bus operations
pub type BusResult<T> = Result<T, BusError>;

/// A typed domain event payload bound to its pattern at compile time.
///
/// Every payload type in the contract registry implements this trait, so the
/// pattern/payload pairing is enforced by the type system — `emit` takes the
/// pattern from the type, never from the caller.
///
/// Pattern strings follow `{domain}.{entity}.{action}`, all lowercase,
/// dot-separated, and are stable once published: a breaking payload change
/// requires a new pattern name, never an in-place change.
pub trait DomainEvent: Serialize {
    /// The event pattern this payload is published under (also the subject).
    const PATTERN: &'static str;
}

/// Core event bus abstraction for publish-subscribe and request-reply messaging
///
/// This trait defines the interface that all transport implementations must
/// satisfy. Implementations must be safe for concurrent use: publish/request
/// calls are issued directly from many in-flight request handlers without
/// external locking.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish a message to a subject
    ///
    /// # Arguments
    /// * `subject` - The subject/topic to publish to (e.g., "order.order.created")
    /// * `payload` - The message payload as raw bytes
    ///
    /// # Returns
    /// * `Ok(())` if the message was handed to the broker
    /// * `Err(BusError)` if publishing failed
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> BusResult<()>;

    /// Send a request to a subject and await a single reply
    ///
    /// # Arguments
    /// * `subject` - The subject the responder listens on (e.g., "payout.process")
    /// * `payload` - The request payload as raw bytes
    /// * `timeout` - Hard deadline for the reply
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` with the responder's payload
    /// * `Err(BusError::RequestTimeout)` if no reply arrived in time
    /// * `Err(BusError::RequestError)` on transport or responder failure
    async fn request(&self, subject: &str, payload: Vec<u8>, timeout: Duration)
        -> BusResult<Vec<u8>>;

    /// Subscribe to messages matching a subject pattern
    ///
    /// # Arguments
    /// * `subject` - The subject pattern to subscribe to (supports wildcards: `*`, `>`)
    ///   - `*` matches a single token (e.g., `order.*.created`)
    ///   - `>` matches one or more tokens (e.g., `order.>`)
    ///
    /// # Returns
    /// * `Ok(BoxStream)` containing a stream of messages
    /// * `Err(BusError)` if subscription failed
    async fn subscribe(&self, subject: &str) -> BusResult<BoxStream<'static, BusMessage>>;
}

impl fmt::Debug for dyn EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventBus")
    }
}
