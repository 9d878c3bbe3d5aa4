//! Product domain event contracts

use event_bus::DomainEvent;
use serde::{Deserialize, Serialize};

/// Payload for `product.product.published`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPublished {
    pub product_id: String,
    pub seller_id: String,
    pub title: String,
    pub price: f64,
    pub currency: String,
}

impl DomainEvent for ProductPublished {
    const PATTERN: &'static str = "product.product.published";
}

/// Payload for `product.product.archived`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductArchived {
    pub product_id: String,
    pub seller_id: String,
}

impl DomainEvent for ProductArchived {
    const PATTERN: &'static str = "product.product.archived";
}

/// Payload for `product.price.changed`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChanged {
    pub product_id: String,
    pub seller_id: String,
    pub old_price: f64,
    pub new_price: f64,
    pub currency: String,
}

impl DomainEvent for PriceChanged {
    const PATTERN: &'static str = "product.price.changed";
}
