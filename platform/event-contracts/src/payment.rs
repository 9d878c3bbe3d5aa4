//! Payment domain contracts: events plus the payout request/response pair
//!
//! Payments is the one domain with a synchronous cross-service need: payout
//! processing must return an answer before the caller can proceed, so it is a
//! `send` contract rather than an event.

use event_bus::DomainEvent;
use serde::{Deserialize, Serialize};

/// Payload for `payment.payment.captured`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCaptured {
    pub payment_id: String,
    pub order_id: String,
    /// Captured amount in the payment currency
    pub amount: f64,
    /// ISO 4217 currency code
    pub currency: String,
    /// Payment provider identifier (e.g. "stripe")
    pub provider: String,
}

impl DomainEvent for PaymentCaptured {
    const PATTERN: &'static str = "payment.payment.captured";
}

/// Payload for `payment.payment.failed`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFailed {
    pub payment_id: String,
    pub order_id: String,
    pub reason: String,
}

impl DomainEvent for PaymentFailed {
    const PATTERN: &'static str = "payment.payment.failed";
}

/// Payload for `payment.refund.issued`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundIssued {
    pub refund_id: String,
    pub payment_id: String,
    pub order_id: String,
    pub amount: f64,
    pub currency: String,
}

impl DomainEvent for RefundIssued {
    const PATTERN: &'static str = "payment.refund.issued";
}

/// Request pattern for synchronous payout processing (`EventClient::send`)
pub const PAYOUT_PROCESS: &str = "payout.process";

/// Request payload for [`PAYOUT_PROCESS`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPayoutRequest {
    pub payout_id: String,
}

/// Response payload for [`PAYOUT_PROCESS`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPayoutResponse {
    pub payout_id: String,
    pub status: PayoutStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Processed,
    Rejected,
    Pending,
}
