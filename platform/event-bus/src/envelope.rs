//! # Event Envelope
//!
//! Platform-wide event envelope specification for all cross-service events.
//!
//! ## Design Principles
//!
//! 1. **Single Source of Truth**: one envelope struct for the entire platform
//! 2. **Validation**: centralized envelope validation logic
//! 3. **Tracing**: built-in correlation support for causal chains
//! 4. **Multi-tenancy**: optional tenant scoping on every event
//!
//! ## Wire Format
//!
//! Envelopes cross the broker as camelCase JSON — this is the cross-service
//! contract other teams code against, including non-Rust consumers:
//!
//! ```json
//! {
//!   "eventId": "…uuid…",
//!   "pattern": "order.order.created",
//!   "timestamp": "2026-08-29T12:00:00Z",
//!   "source": "order-service",
//!   "tenantId": "…optional…",
//!   "correlationId": "…optional…",
//!   "payload": { }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Standard event envelope following the platform event contract
///
/// This envelope wraps every event published across service boundaries.
/// It provides metadata for idempotency (`event_id`), tracing
/// (`correlation_id`), and multi-tenancy (`tenant_id`).
///
/// # Type Parameter
///
/// * `T` - The pattern-specific payload type
///
/// # Examples
///
/// ```rust
/// use event_bus::EventEnvelope;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct PaymentCaptured {
///     payment_id: String,
///     amount: f64,
///     currency: String,
/// }
///
/// let envelope = EventEnvelope::new(
///     "payment.payment.captured".to_string(),
///     "payment-service".to_string(),
///     PaymentCaptured {
///         payment_id: "pay_123".to_string(),
///         amount: 10.00,
///         currency: "GBP".to_string(),
///     },
/// )
/// .with_correlation_id(Some("corr-456".to_string()))
/// .with_tenant_id(Some("tenant-123".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope<T> {
    /// Unique event identifier (consumer-side deduplication key)
    pub event_id: Uuid,

    /// Event pattern (`{domain}.{entity}.{action}`), also the publish subject
    pub pattern: String,

    /// ISO 8601 UTC timestamp of emission (producer clock, no ordering guarantee)
    pub timestamp: DateTime<Utc>,

    /// Name of the emitting service (stable per deployment, not per instance)
    pub source: String,

    /// Tenant identifier, present when the originating operation is tenant-scoped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    /// Links causally-related events and downstream operations for tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    /// Pattern-specific payload
    pub payload: T,
}

impl<T> EventEnvelope<T> {
    /// Create a new event envelope
    ///
    /// # Arguments
    ///
    /// * `pattern` - Event pattern string (must be a registered pattern)
    /// * `source` - Name of the emitting service
    /// * `payload` - Pattern-specific data
    ///
    /// # Returns
    ///
    /// A new envelope with auto-generated `event_id` and `timestamp`
    pub fn new(pattern: String, source: String, payload: T) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            pattern,
            timestamp: Utc::now(),
            source,
            tenant_id: None,
            correlation_id: None,
            payload,
        }
    }

    /// Create an envelope with explicit event_id (useful for testing)
    pub fn with_event_id(event_id: Uuid, pattern: String, source: String, payload: T) -> Self {
        Self {
            event_id,
            pattern,
            timestamp: Utc::now(),
            source,
            tenant_id: None,
            correlation_id: None,
            payload,
        }
    }

    /// Set the tenant ID
    pub fn with_tenant_id(mut self, tenant_id: Option<String>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    /// Set the correlation ID
    pub fn with_correlation_id(mut self, correlation_id: Option<String>) -> Self {
        self.correlation_id = correlation_id;
        self
    }
}

/// Validate a raw event envelope (generic payload)
///
/// Consumer-side check for envelopes arriving from the wire, before payload
/// decoding. Payload shape validation is the contract registry's concern.
///
/// # Validation Rules
///
/// - `eventId`: must be present and parse as a UUID
/// - `pattern`: must be non-empty
/// - `timestamp`: must be present
/// - `source`: must be non-empty
/// - `payload`: must be present
///
/// # Errors
///
/// Returns a descriptive error string if validation fails
pub fn validate_envelope_fields(envelope: &serde_json::Value) -> Result<(), String> {
    let event_id = envelope
        .get("eventId")
        .and_then(|v| v.as_str())
        .ok_or("Missing or invalid eventId")?;

    uuid::Uuid::parse_str(event_id).map_err(|_| "eventId is not a valid UUID".to_string())?;

    let pattern = envelope
        .get("pattern")
        .and_then(|v| v.as_str())
        .ok_or("Missing or invalid pattern")?;

    if pattern.is_empty() {
        return Err("pattern cannot be empty".to_string());
    }

    envelope
        .get("timestamp")
        .and_then(|v| v.as_str())
        .ok_or("Missing or invalid timestamp")?;

    let source = envelope
        .get("source")
        .and_then(|v| v.as_str())
        .ok_or("Missing or invalid source")?;

    if source.is_empty() {
        return Err("source cannot be empty".to_string());
    }

    if envelope.get("payload").is_none() {
        return Err("Missing payload".to_string());
    }

    // tenantId and correlationId are optional
    Ok(())
}
