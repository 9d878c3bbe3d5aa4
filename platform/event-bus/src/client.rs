//! Publishing client: fire-and-forget `emit` and request/response `send`
//!
//! The hard design rule: anything eventually-consistent uses `emit`; anything
//! requiring an answer before the caller can proceed uses `send`. The two have
//! opposite failure contracts — `emit` swallows and logs, `send` propagates.

use crate::{BusConfig, BusError, BusResult, ConnectionManager, DomainEvent, EventEnvelope};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

/// Per-emit metadata carried from the originating request into the envelope
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    /// Tenant the originating operation is scoped to, if any
    pub tenant_id: Option<String>,
    /// Trace/correlation identifier propagated from the originating request
    pub correlation_id: Option<String>,
}

impl EmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

/// Client handle services use to publish events and make cross-service requests
///
/// Cheap to clone; all clones share the process-wide connection.
#[derive(Clone)]
pub struct EventClient {
    connection: ConnectionManager,
    config: BusConfig,
}

impl EventClient {
    pub fn new(connection: ConnectionManager, config: BusConfig) -> Self {
        Self { connection, config }
    }

    /// The `source` name stamped on every envelope this client emits
    pub fn source(&self) -> &str {
        &self.config.service_name
    }

    /// Fire-and-forget publication of a domain event.
    ///
    /// Builds the envelope (fresh `eventId`, `timestamp`, configured `source`)
    /// and makes exactly one publish attempt under the event's pattern.
    ///
    /// Callers MUST have committed their own state change first: emission is a
    /// notification of a fact, not a transaction participant. Every failure —
    /// disconnected, serialization, transport — is logged and swallowed; this
    /// method never raises into business code and never blocks beyond the
    /// transport's own bounded I/O.
    pub async fn emit<E: DomainEvent>(&self, event: E, options: EmitOptions) {
        let pattern = E::PATTERN;

        let Some(bus) = self.connection.bus().await else {
            warn!(pattern, "event dropped: not connected to broker");
            return;
        };

        let envelope = EventEnvelope::new(
            pattern.to_string(),
            self.config.service_name.clone(),
            event,
        )
        .with_tenant_id(options.tenant_id)
        .with_correlation_id(options.correlation_id);

        let bytes = match serde_json::to_vec(&envelope) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(pattern, error = %e, "event dropped: envelope serialization failed");
                return;
            }
        };

        match bus.publish(pattern, bytes).await {
            Ok(()) => {
                debug!(pattern, event_id = %envelope.event_id, "event published");
            }
            Err(e) => {
                error!(
                    pattern,
                    event_id = %envelope.event_id,
                    error = %e,
                    "event dropped: publish failed"
                );
                if e.is_connection_error() {
                    self.connection.handle_disconnect().await;
                }
            }
        }
    }

    /// Request/response call to another service over the same transport.
    ///
    /// Enforces the configured timeout. Unlike `emit`, every failure —
    /// timeout, transport error, responder error, decode error — propagates to
    /// the caller, who owns recovery (retry, fallback, user-facing error).
    pub async fn send<Req, Resp>(&self, pattern: &str, request: &Req) -> BusResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let bus = self.connection.bus().await.ok_or(BusError::NotConnected)?;

        let bytes = serde_json::to_vec(request)
            .map_err(|e| BusError::SerializationError(e.to_string()))?;

        let reply = match bus.request(pattern, bytes, self.config.request_timeout).await {
            Ok(reply) => reply,
            Err(e) => {
                if e.is_connection_error() {
                    self.connection.handle_disconnect().await;
                }
                return Err(e);
            }
        };

        serde_json::from_slice(&reply).map_err(|e| BusError::DecodeError(e.to_string()))
    }
}
