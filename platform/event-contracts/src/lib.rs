//! # Marketplace Event Contracts
//!
//! The closed, versioned set of event patterns and payload types every
//! marketplace service agrees on. This crate is the cross-service contract:
//! other teams (including non-Rust consumers) code against the pattern names
//! and payload shapes defined here.
//!
//! ## Contract rules
//!
//! - Patterns follow `{domain}.{entity}.{action}`, all lowercase, dot-separated
//! - A pattern is never reused for a different payload shape: a breaking
//!   payload change requires a **new** pattern name, never an in-place change
//! - Payload-pattern correspondence is enforced at compile time via the
//!   [`DomainEvent`] trait; the [`registry`] offers an optional runtime check
//!   for payloads arriving from less strictly-typed producers
//!
//! ## Adding a contract
//!
//! 1. Add the payload struct to its domain module with a `DomainEvent` impl
//! 2. Register its JSON schema in [`registry::marketplace_registry`]
//! 3. Extend the agreement test in `tests/contract_tests.rs`

pub mod influencer;
pub mod inventory;
pub mod order;
pub mod pattern;
pub mod payment;
pub mod product;
pub mod registry;

pub use registry::{default_registry, ContractRegistry};

// Envelope and event trait come from the bus crate; re-exported so services
// can depend on contracts alone for their event types.
pub use event_bus::{DomainEvent, EventEnvelope};

/// Errors raised by the contract registry
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("pattern {0:?} does not follow {{domain}}.{{entity}}.{{action}}")]
    InvalidPattern(String),

    #[error("pattern {0:?} already registered with a different payload shape")]
    PatternConflict(String),

    #[error("pattern {0:?} is not in the contract registry")]
    UnknownPattern(String),

    #[error("schema compilation failed for {pattern:?}: {reason}")]
    SchemaError { pattern: String, reason: String },

    #[error("payload for {pattern:?} does not match its registered shape: {reason}")]
    ValidationError { pattern: String, reason: String },
}
