//! Inventory domain event contracts
//!
//! Stock reservations react to order events; consumers must treat them as
//! unordered and deduplicate on the envelope `eventId` — a release can be
//! observed before the reservation it undoes.

use crate::order::OrderItem;
use event_bus::DomainEvent;
use serde::{Deserialize, Serialize};

/// Payload for `inventory.stock.reserved`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReserved {
    pub reservation_id: String,
    pub order_id: String,
    pub items: Vec<OrderItem>,
}

impl DomainEvent for StockReserved {
    const PATTERN: &'static str = "inventory.stock.reserved";
}

/// Payload for `inventory.stock.released`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReleased {
    pub reservation_id: String,
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DomainEvent for StockReleased {
    const PATTERN: &'static str = "inventory.stock.released";
}

/// Payload for `inventory.stock.depleted`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDepleted {
    pub product_id: String,
    pub seller_id: String,
}

impl DomainEvent for StockDepleted {
    const PATTERN: &'static str = "inventory.stock.depleted";
}
