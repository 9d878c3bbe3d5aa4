//! Broker connection lifecycle management
//!
//! One `ConnectionManager` per service process owns the single logical broker
//! connection, independent of any emit/send call. The manager serializes
//! connect/reconnect transitions internally; publish calls go straight to the
//! transport and are never serialized here.
//!
//! Connection failures are never fatal to the owning service: a broker that is
//! down at startup logs a warning and the service keeps serving traffic with
//! degraded (best-effort) eventing.

use crate::{BusError, BusResult, EventBus};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Lifecycle state of the broker connection
///
/// `Disconnected → Connecting → Connected`, back to `Disconnected` on error.
/// Process-wide: created at service startup, torn down at shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

/// Reconnection policy: bounded attempt count with a fixed delay between
/// attempts. Exhausting the cap leaves the manager `Disconnected` until the
/// next externally-triggered `connect()`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectPolicy {
    /// Maximum number of reconnection attempts per disconnect
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(5),
        }
    }
}

/// Establishes transport connections on behalf of the `ConnectionManager`.
///
/// Production uses [`NatsConnector`]; tests inject fakes to observe connection
/// attempts without a broker.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> BusResult<Arc<dyn EventBus>>;
}

/// Connects to a NATS server at the configured URL
pub struct NatsConnector {
    url: String,
}

impl NatsConnector {
    pub fn new(url: String) -> Self {
        Self { url }
    }
}

#[async_trait]
impl Connector for NatsConnector {
    async fn connect(&self) -> BusResult<Arc<dyn EventBus>> {
        let client = async_nats::connect(&self.url)
            .await
            .map_err(|e| BusError::ConnectionError(e.to_string()))?;
        Ok(Arc::new(crate::NatsBus::new(client)))
    }
}

/// Hands out an already-built transport (in-memory dev/test swap)
///
/// Lets a service run against an [`crate::InMemoryBus`] through the same
/// manager/client wiring it uses in production.
pub struct StaticConnector {
    bus: Arc<dyn EventBus>,
}

impl StaticConnector {
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl Connector for StaticConnector {
    async fn connect(&self) -> BusResult<Arc<dyn EventBus>> {
        Ok(self.bus.clone())
    }
}

struct Inner {
    state: ConnectionState,
    bus: Option<Arc<dyn EventBus>>,
    /// True while a background reconnect loop is running
    reconnecting: bool,
}

struct Shared {
    connector: Arc<dyn Connector>,
    policy: ReconnectPolicy,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<ConnectionState>,
}

impl Shared {
    fn set_state(&self, inner: &mut Inner, state: ConnectionState) {
        if inner.state != state {
            debug!(from = %inner.state, to = %state, "connection state transition");
        }
        inner.state = state;
        let _ = self.state_tx.send_replace(state);
    }
}

/// Owns the single broker connection for the process
///
/// Cheap to clone; all clones share the same connection state. Injected into
/// the `EventClient` rather than reached through a global, so tests can swap
/// in a fake `Connector` while production keeps one-connection-per-process
/// semantics.
#[derive(Clone)]
pub struct ConnectionManager {
    shared: Arc<Shared>,
}

impl ConnectionManager {
    pub fn new(connector: Arc<dyn Connector>, policy: ReconnectPolicy) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            shared: Arc::new(Shared {
                connector,
                policy,
                inner: Mutex::new(Inner {
                    state: ConnectionState::Disconnected,
                    bus: None,
                    reconnecting: false,
                }),
                state_tx,
            }),
        }
    }

    /// Establish the broker connection.
    ///
    /// Idempotent: a no-op while already `Connected` or `Connecting`, or while
    /// a reconnect loop is in flight. A failed attempt is logged as a warning
    /// (never an error that aborts startup) and hands over to the bounded
    /// background retry loop.
    pub async fn connect(&self) {
        {
            let mut inner = self.shared.inner.lock().await;
            if inner.state != ConnectionState::Disconnected || inner.reconnecting {
                debug!(state = %inner.state, "connect() ignored: connection already in progress");
                return;
            }
            self.shared.set_state(&mut inner, ConnectionState::Connecting);
        }

        match self.shared.connector.connect().await {
            Ok(bus) => {
                let mut inner = self.shared.inner.lock().await;
                inner.bus = Some(bus);
                self.shared.set_state(&mut inner, ConnectionState::Connected);
                info!("connected to broker");
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "broker unreachable; continuing with best-effort eventing"
                );
                let spawn_retries = {
                    let mut inner = self.shared.inner.lock().await;
                    self.shared.set_state(&mut inner, ConnectionState::Disconnected);
                    if inner.reconnecting {
                        false
                    } else {
                        inner.reconnecting = true;
                        true
                    }
                };
                if spawn_retries {
                    self.spawn_reconnect_loop();
                }
            }
        }
    }

    /// Signal that the connection has been lost.
    ///
    /// Called by the client when a publish/request fails with a
    /// connection-classified error. Transitions to `Disconnected` and starts
    /// the bounded reconnect loop if one is not already running.
    pub async fn handle_disconnect(&self) {
        let spawn_retries = {
            let mut inner = self.shared.inner.lock().await;
            if inner.state == ConnectionState::Connecting {
                // A connection attempt is already underway; let it finish.
                return;
            }
            if inner.state == ConnectionState::Connected {
                warn!("broker connection lost");
            }
            inner.bus = None;
            self.shared.set_state(&mut inner, ConnectionState::Disconnected);
            if inner.reconnecting {
                false
            } else {
                inner.reconnecting = true;
                true
            }
        };
        if spawn_retries {
            self.spawn_reconnect_loop();
        }
    }

    /// Whether publish/send calls can currently be attempted
    pub async fn is_ready(&self) -> bool {
        self.shared.inner.lock().await.state == ConnectionState::Connected
    }

    /// Current connection state
    pub async fn state(&self) -> ConnectionState {
        self.shared.inner.lock().await.state
    }

    /// Watch connection state transitions (health endpoints, tests)
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state_tx.subscribe()
    }

    /// Current transport handle, if connected
    pub async fn bus(&self) -> Option<Arc<dyn EventBus>> {
        self.shared.inner.lock().await.bus.clone()
    }

    fn spawn_reconnect_loop(&self) {
        let manager = self.clone();
        tokio::spawn(async move { manager.reconnect_loop().await });
    }

    async fn reconnect_loop(self) {
        let shared = &self.shared;
        for attempt in 1..=shared.policy.max_attempts {
            sleep(shared.policy.delay).await;

            {
                let mut inner = shared.inner.lock().await;
                if inner.state == ConnectionState::Connected {
                    inner.reconnecting = false;
                    return;
                }
                shared.set_state(&mut inner, ConnectionState::Connecting);
            }

            match shared.connector.connect().await {
                Ok(bus) => {
                    let mut inner = shared.inner.lock().await;
                    inner.bus = Some(bus);
                    inner.reconnecting = false;
                    shared.set_state(&mut inner, ConnectionState::Connected);
                    info!(attempt, "reconnected to broker");
                    return;
                }
                Err(e) => {
                    let mut inner = shared.inner.lock().await;
                    shared.set_state(&mut inner, ConnectionState::Disconnected);
                    warn!(
                        attempt,
                        max_attempts = shared.policy.max_attempts,
                        error = %e,
                        "reconnection attempt failed"
                    );
                }
            }
        }

        let mut inner = shared.inner.lock().await;
        inner.reconnecting = false;
        warn!(
            attempts = shared.policy.max_attempts,
            "reconnection attempts exhausted; staying disconnected until connect() is called"
        );
    }
}
