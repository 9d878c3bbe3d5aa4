//! Bus configuration and service identity
//!
//! Resolved once at service startup from the environment. `service_name` is
//! the stable `source` stamped on every envelope — it identifies the
//! deployment, not the instance.

use crate::connection::ReconnectPolicy;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct BusConfig {
    /// Stable service name, used as the envelope `source`
    pub service_name: String,
    /// Broker connection URL (host, port, optional credential)
    pub broker_url: String,
    /// Timeout enforced on every `send` call
    pub request_timeout: Duration,
    /// Reconnection policy for the connection manager
    pub reconnect: ReconnectPolicy,
}

impl BusConfig {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        Ok(Self {
            service_name: env::var("SERVICE_NAME")?,
            broker_url: env::var("NATS_URL")
                .unwrap_or_else(|_| "nats://localhost:4222".to_string()),
            request_timeout: Duration::from_millis(
                env::var("REQUEST_TIMEOUT_MS").unwrap_or_else(|_| "5000".to_string()).parse()?,
            ),
            reconnect: ReconnectPolicy {
                max_attempts: env::var("RECONNECT_MAX_ATTEMPTS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
                delay: Duration::from_millis(
                    env::var("RECONNECT_DELAY_MS").unwrap_or_else(|_| "5000".to_string()).parse()?,
                ),
            },
        })
    }

    /// Config for tests and local tools: given identity, defaults elsewhere.
    pub fn for_service(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            broker_url: "nats://localhost:4222".to_string(),
            request_timeout: Duration::from_secs(5),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_service_defaults() {
        let config = BusConfig::for_service("order-service");
        assert_eq!(config.service_name, "order-service");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.reconnect.max_attempts, 5);
    }
}
