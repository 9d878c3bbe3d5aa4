//! Influencer program event contracts

use event_bus::DomainEvent;
use serde::{Deserialize, Serialize};

/// Payload for `influencer.commission.earned`
///
/// Attribution links back to the originating order through the envelope
/// `correlationId`, not a payload field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionEarned {
    pub commission_id: String,
    pub influencer_id: String,
    pub order_id: String,
    pub amount: f64,
    pub currency: String,
}

impl DomainEvent for CommissionEarned {
    const PATTERN: &'static str = "influencer.commission.earned";
}

/// Payload for `influencer.payout.requested`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRequested {
    pub payout_id: String,
    pub influencer_id: String,
    pub amount: f64,
    pub currency: String,
}

impl DomainEvent for PayoutRequested {
    const PATTERN: &'static str = "influencer.payout.requested";
}
