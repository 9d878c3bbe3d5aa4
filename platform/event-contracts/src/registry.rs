//! Contract registry: the closed set of event patterns and payload shapes
//!
//! The registry is built once at startup and constant for the process
//! lifetime. Registration fails fast on a pattern conflict so a service
//! carrying two incompatible shapes for one pattern never starts cleanly.
//!
//! The Rust type system is the primary guard (payloads implement
//! `DomainEvent`); `validate` is the optional runtime hook for payloads
//! produced by cross-language services.

use crate::{pattern, ContractError};
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::collections::HashMap;

struct ContractEntry {
    /// Raw schema, kept for shape-equality checks on re-registration
    schema: Value,
    compiled: JSONSchema,
}

/// In-memory registry mapping each event pattern to its payload shape
pub struct ContractRegistry {
    entries: HashMap<String, ContractEntry>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a pattern with its payload shape (a JSON schema).
    ///
    /// Re-registering an identical shape is a no-op. Registering a different
    /// shape under an existing pattern is a contract violation and fails —
    /// incompatible changes require a new pattern name.
    pub fn register(&mut self, pattern: &str, schema: Value) -> Result<(), ContractError> {
        if !pattern::is_valid_event_pattern(pattern) {
            return Err(ContractError::InvalidPattern(pattern.to_string()));
        }

        if let Some(existing) = self.entries.get(pattern) {
            if existing.schema == schema {
                return Ok(());
            }
            return Err(ContractError::PatternConflict(pattern.to_string()));
        }

        let compiled = JSONSchema::compile(&schema).map_err(|e| ContractError::SchemaError {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        self.entries.insert(
            pattern.to_string(),
            ContractEntry { schema, compiled },
        );
        Ok(())
    }

    /// Whether a pattern is part of the contract
    pub fn contains(&self, pattern: &str) -> bool {
        self.entries.contains_key(pattern)
    }

    /// All registered patterns
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The registered payload shape for a pattern
    pub fn shape_of(&self, pattern: &str) -> Option<&Value> {
        self.entries.get(pattern).map(|e| &e.schema)
    }

    /// Runtime validation hook: check a payload against its pattern's shape
    pub fn validate(&self, pattern: &str, payload: &Value) -> Result<(), ContractError> {
        let entry = self
            .entries
            .get(pattern)
            .ok_or_else(|| ContractError::UnknownPattern(pattern.to_string()))?;

        if let Err(errors) = entry.compiled.validate(payload) {
            let reason: Vec<String> = errors.map(|e| e.to_string()).collect();
            return Err(ContractError::ValidationError {
                pattern: pattern.to_string(),
                reason: reason.join("; "),
            });
        }
        Ok(())
    }
}

impl Default for ContractRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn order_item_schema() -> Value {
    json!({
        "type": "object",
        "required": ["productId", "quantity", "price"],
        "properties": {
            "productId": {"type": "string"},
            "quantity": {"type": "integer", "minimum": 0},
            "price": {"type": "number", "minimum": 0}
        }
    })
}

/// Build the marketplace contract registry (the closed set)
pub fn marketplace_registry() -> Result<ContractRegistry, ContractError> {
    let mut registry = ContractRegistry::new();

    registry.register(
        "order.order.created",
        json!({
            "type": "object",
            "required": ["orderId", "orderNumber", "userId", "userEmail", "sellerId", "items", "total", "currency"],
            "properties": {
                "orderId": {"type": "string"},
                "orderNumber": {"type": "string"},
                "userId": {"type": "string"},
                "userEmail": {"type": "string"},
                "sellerId": {"type": "string"},
                "items": {"type": "array", "items": order_item_schema(), "minItems": 1},
                "total": {"type": "number", "minimum": 0},
                "currency": {"type": "string"}
            }
        }),
    )?;

    registry.register(
        "order.order.cancelled",
        json!({
            "type": "object",
            "required": ["orderId", "userId", "sellerId"],
            "properties": {
                "orderId": {"type": "string"},
                "userId": {"type": "string"},
                "sellerId": {"type": "string"},
                "reason": {"type": "string"}
            }
        }),
    )?;

    registry.register(
        "order.order.shipped",
        json!({
            "type": "object",
            "required": ["orderId", "userId", "carrier"],
            "properties": {
                "orderId": {"type": "string"},
                "userId": {"type": "string"},
                "carrier": {"type": "string"},
                "trackingNumber": {"type": "string"}
            }
        }),
    )?;

    registry.register(
        "payment.payment.captured",
        json!({
            "type": "object",
            "required": ["paymentId", "orderId", "amount", "currency", "provider"],
            "properties": {
                "paymentId": {"type": "string"},
                "orderId": {"type": "string"},
                "amount": {"type": "number", "minimum": 0},
                "currency": {"type": "string"},
                "provider": {"type": "string"}
            }
        }),
    )?;

    registry.register(
        "payment.payment.failed",
        json!({
            "type": "object",
            "required": ["paymentId", "orderId", "reason"],
            "properties": {
                "paymentId": {"type": "string"},
                "orderId": {"type": "string"},
                "reason": {"type": "string"}
            }
        }),
    )?;

    registry.register(
        "payment.refund.issued",
        json!({
            "type": "object",
            "required": ["refundId", "paymentId", "orderId", "amount", "currency"],
            "properties": {
                "refundId": {"type": "string"},
                "paymentId": {"type": "string"},
                "orderId": {"type": "string"},
                "amount": {"type": "number", "minimum": 0},
                "currency": {"type": "string"}
            }
        }),
    )?;

    registry.register(
        "product.product.published",
        json!({
            "type": "object",
            "required": ["productId", "sellerId", "title", "price", "currency"],
            "properties": {
                "productId": {"type": "string"},
                "sellerId": {"type": "string"},
                "title": {"type": "string"},
                "price": {"type": "number", "minimum": 0},
                "currency": {"type": "string"}
            }
        }),
    )?;

    registry.register(
        "product.product.archived",
        json!({
            "type": "object",
            "required": ["productId", "sellerId"],
            "properties": {
                "productId": {"type": "string"},
                "sellerId": {"type": "string"}
            }
        }),
    )?;

    registry.register(
        "product.price.changed",
        json!({
            "type": "object",
            "required": ["productId", "sellerId", "oldPrice", "newPrice", "currency"],
            "properties": {
                "productId": {"type": "string"},
                "sellerId": {"type": "string"},
                "oldPrice": {"type": "number", "minimum": 0},
                "newPrice": {"type": "number", "minimum": 0},
                "currency": {"type": "string"}
            }
        }),
    )?;

    registry.register(
        "inventory.stock.reserved",
        json!({
            "type": "object",
            "required": ["reservationId", "orderId", "items"],
            "properties": {
                "reservationId": {"type": "string"},
                "orderId": {"type": "string"},
                "items": {"type": "array", "items": order_item_schema(), "minItems": 1}
            }
        }),
    )?;

    registry.register(
        "inventory.stock.released",
        json!({
            "type": "object",
            "required": ["reservationId", "orderId"],
            "properties": {
                "reservationId": {"type": "string"},
                "orderId": {"type": "string"},
                "reason": {"type": "string"}
            }
        }),
    )?;

    registry.register(
        "inventory.stock.depleted",
        json!({
            "type": "object",
            "required": ["productId", "sellerId"],
            "properties": {
                "productId": {"type": "string"},
                "sellerId": {"type": "string"}
            }
        }),
    )?;

    registry.register(
        "influencer.commission.earned",
        json!({
            "type": "object",
            "required": ["commissionId", "influencerId", "orderId", "amount", "currency"],
            "properties": {
                "commissionId": {"type": "string"},
                "influencerId": {"type": "string"},
                "orderId": {"type": "string"},
                "amount": {"type": "number", "minimum": 0},
                "currency": {"type": "string"}
            }
        }),
    )?;

    registry.register(
        "influencer.payout.requested",
        json!({
            "type": "object",
            "required": ["payoutId", "influencerId", "amount", "currency"],
            "properties": {
                "payoutId": {"type": "string"},
                "influencerId": {"type": "string"},
                "amount": {"type": "number", "minimum": 0},
                "currency": {"type": "string"}
            }
        }),
    )?;

    Ok(registry)
}

/// Process-wide registry, built on first use.
///
/// Panicking here is the fail-fast contract: a conflicting registration means
/// the closed set itself is broken and the process must not start cleanly.
pub fn default_registry() -> &'static ContractRegistry {
    static REGISTRY: Lazy<ContractRegistry> = Lazy::new(|| {
        marketplace_registry().expect("marketplace contract registry must be internally consistent")
    });
    &REGISTRY
}
