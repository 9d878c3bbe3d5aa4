//! Order domain event contracts
//!
//! Emitted by the order service after its local transaction commits. Field
//! names cross the wire camelCase and must match the registered schema
//! exactly; do not add validations beyond what the schema declares.

use event_bus::DomainEvent;
use serde::{Deserialize, Serialize};

/// A line item within an order event payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: u32,
    /// Unit price in the order currency
    pub price: f64,
}

/// Payload for `order.order.created`
///
/// Used with `EventEnvelope<OrderCreated>`. Consumers: inventory (reserve
/// stock), notification (confirmation email), influencer (attribute
/// commission via `correlationId`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub order_id: String,
    /// Human-facing order reference (e.g. "HOS-1")
    pub order_number: String,
    pub user_id: String,
    pub user_email: String,
    pub seller_id: String,
    pub items: Vec<OrderItem>,
    /// Order total in the order currency
    pub total: f64,
    /// ISO 4217 currency code (e.g. "GBP")
    pub currency: String,
}

impl DomainEvent for OrderCreated {
    const PATTERN: &'static str = "order.order.created";
}

/// Payload for `order.order.cancelled`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCancelled {
    pub order_id: String,
    pub user_id: String,
    pub seller_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DomainEvent for OrderCancelled {
    const PATTERN: &'static str = "order.order.cancelled";
}

/// Payload for `order.order.shipped`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderShipped {
    pub order_id: String,
    pub user_id: String,
    pub carrier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

impl DomainEvent for OrderShipped {
    const PATTERN: &'static str = "order.order.shipped";
}
