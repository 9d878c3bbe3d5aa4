//! Pattern naming convention
//!
//! Event patterns are `{domain}.{entity}.{action}`: exactly three lowercase
//! dot-separated tokens (e.g. `order.order.created`). The pattern doubles as
//! the broker subject. Request patterns used with `send` (e.g.
//! `payout.process`) are a separate namespace and not held to this grammar.

/// Check that a pattern follows `{domain}.{entity}.{action}`
pub fn is_valid_event_pattern(pattern: &str) -> bool {
    let tokens: Vec<&str> = pattern.split('.').collect();
    tokens.len() == 3 && tokens.iter().all(|t| is_valid_token(t))
}

fn is_valid_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}
