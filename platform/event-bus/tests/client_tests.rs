//! End-to-end client behavior over the in-memory transport: fire-and-forget
//! emit semantics, request/response timeouts, and disconnect handling.

use async_trait::async_trait;
use event_bus::{
    BusConfig, BusError, BusResult, ConnectionManager, ConnectionState, Connector, DomainEvent,
    EmitOptions, EventBus, EventClient, EventEnvelope, InMemoryBus, ReconnectPolicy,
    StaticConnector,
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderItem {
    product_id: String,
    quantity: u32,
    price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderCreated {
    order_id: String,
    order_number: String,
    user_id: String,
    user_email: String,
    seller_id: String,
    items: Vec<OrderItem>,
    total: f64,
    currency: String,
}

impl DomainEvent for OrderCreated {
    const PATTERN: &'static str = "order.order.created";
}

fn sample_order() -> OrderCreated {
    OrderCreated {
        order_id: "o1".to_string(),
        order_number: "HOS-1".to_string(),
        user_id: "u1".to_string(),
        user_email: "a@b.com".to_string(),
        seller_id: "s1".to_string(),
        items: vec![OrderItem {
            product_id: "p1".to_string(),
            quantity: 2,
            price: 9.99,
        }],
        total: 19.98,
        currency: "GBP".to_string(),
    }
}

fn test_config(service: &str) -> BusConfig {
    let mut config = BusConfig::for_service(service);
    config.reconnect = ReconnectPolicy {
        max_attempts: 3,
        delay: Duration::from_millis(10),
    };
    config
}

async fn connected_client(service: &str) -> (EventClient, InMemoryBus) {
    let bus = InMemoryBus::new();
    let manager = ConnectionManager::new(
        Arc::new(StaticConnector::new(Arc::new(bus.clone()))),
        test_config(service).reconnect.clone(),
    );
    manager.connect().await;
    (EventClient::new(manager, test_config(service)), bus)
}

#[tokio::test]
async fn test_emit_publishes_envelope_with_source_and_pattern() {
    let (client, bus) = connected_client("order-service").await;
    let mut stream = bus.subscribe("order.>").await.unwrap();

    client
        .emit(
            sample_order(),
            EmitOptions::new()
                .with_tenant_id("tenant-1")
                .with_correlation_id("corr-1"),
        )
        .await;

    let msg = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("timeout")
        .expect("stream ended");

    assert_eq!(msg.subject, "order.order.created");

    let envelope: EventEnvelope<OrderCreated> = serde_json::from_slice(&msg.payload).unwrap();
    assert_eq!(envelope.pattern, "order.order.created");
    assert_eq!(envelope.source, "order-service");
    assert_eq!(envelope.tenant_id, Some("tenant-1".to_string()));
    assert_eq!(envelope.correlation_id, Some("corr-1".to_string()));
    assert_eq!(envelope.payload, sample_order());
}

#[tokio::test]
async fn test_emit_generates_fresh_event_ids() {
    let (client, bus) = connected_client("order-service").await;
    let mut stream = bus.subscribe("order.>").await.unwrap();

    client.emit(sample_order(), EmitOptions::new()).await;
    client.emit(sample_order(), EmitOptions::new()).await;

    let first = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("timeout")
        .expect("stream ended");
    let second = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("timeout")
        .expect("stream ended");

    let a: EventEnvelope<OrderCreated> = serde_json::from_slice(&first.payload).unwrap();
    let b: EventEnvelope<OrderCreated> = serde_json::from_slice(&second.payload).unwrap();
    assert_ne!(a.event_id, b.event_id);
}

#[tokio::test]
async fn test_emit_while_disconnected_returns_normally() {
    // Manager never connected: emit must neither block nor panic, and the
    // event is simply not delivered (documented best-effort behavior).
    let manager = ConnectionManager::new(
        Arc::new(StaticConnector::new(Arc::new(InMemoryBus::new()))),
        ReconnectPolicy::default(),
    );
    let client = EventClient::new(manager.clone(), test_config("order-service"));

    client
        .emit(sample_order(), EmitOptions::new().with_tenant_id("tenant-1"))
        .await;

    assert_eq!(manager.state().await, ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_send_round_trip() {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ProcessPayout {
        payout_id: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct PayoutResult {
        payout_id: String,
        status: String,
    }

    let (client, bus) = connected_client("influencer-service").await;

    // Responder service
    let responder_bus = bus.clone();
    let mut requests = bus.subscribe("payout.process").await.unwrap();
    tokio::spawn(async move {
        while let Some(msg) = requests.next().await {
            let req: serde_json::Value = serde_json::from_slice(&msg.payload).unwrap();
            let reply = serde_json::json!({
                "payoutId": req["payoutId"],
                "status": "processed",
            });
            if let Some(reply_to) = msg.reply_to {
                responder_bus
                    .publish(&reply_to, serde_json::to_vec(&reply).unwrap())
                    .await
                    .unwrap();
            }
        }
    });

    let result: PayoutResult = client
        .send(
            "payout.process",
            &ProcessPayout {
                payout_id: "pay1".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(
        result,
        PayoutResult {
            payout_id: "pay1".to_string(),
            status: "processed".to_string(),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_send_times_out_at_configured_bound() {
    // 5s configured timeout, responder never answers: the call must fail with
    // a timeout-classified error at ~5s — not immediately, not indefinitely.
    let (client, _bus) = connected_client("influencer-service").await;

    let started = tokio::time::Instant::now();
    let result: BusResult<serde_json::Value> = client
        .send("payout.process", &serde_json::json!({"payoutId": "pay1"}))
        .await;
    let elapsed = started.elapsed();

    assert!(matches!(result, Err(BusError::RequestTimeout { .. })));
    assert!(elapsed >= Duration::from_secs(4));
    assert!(elapsed < Duration::from_secs(7));
}

#[tokio::test]
async fn test_send_while_disconnected_propagates_error() {
    let manager = ConnectionManager::new(
        Arc::new(StaticConnector::new(Arc::new(InMemoryBus::new()))),
        ReconnectPolicy::default(),
    );
    let client = EventClient::new(manager, test_config("influencer-service"));

    let result: BusResult<serde_json::Value> = client
        .send("payout.process", &serde_json::json!({"payoutId": "pay1"}))
        .await;

    assert!(matches!(result, Err(BusError::NotConnected)));
}

/// Transport that forwards to an in-memory bus until its budget of successful
/// publishes runs out, then fails every call with a connection error.
struct DroppingBus {
    inner: InMemoryBus,
    remaining: AtomicI64,
}

#[async_trait]
impl EventBus for DroppingBus {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> BusResult<()> {
        if self.remaining.fetch_sub(1, Ordering::SeqCst) <= 0 {
            return Err(BusError::ConnectionError("connection reset".to_string()));
        }
        self.inner.publish(subject, payload).await
    }

    async fn request(
        &self,
        subject: &str,
        payload: Vec<u8>,
        timeout: Duration,
    ) -> BusResult<Vec<u8>> {
        if self.remaining.load(Ordering::SeqCst) <= 0 {
            return Err(BusError::ConnectionError("connection reset".to_string()));
        }
        self.inner.request(subject, payload, timeout).await
    }

    async fn subscribe(
        &self,
        subject: &str,
    ) -> BusResult<futures::stream::BoxStream<'static, event_bus::BusMessage>> {
        self.inner.subscribe(subject).await
    }
}

/// Connector whose first connection drops after a fixed number of publishes
/// and whose reconnection attempts always fail.
struct FlakyConnector {
    bus: Arc<DroppingBus>,
    handed_out: AtomicI64,
}

#[async_trait]
impl Connector for FlakyConnector {
    async fn connect(&self) -> BusResult<Arc<dyn EventBus>> {
        if self.handed_out.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(self.bus.clone())
        } else {
            Err(BusError::ConnectionError("broker still down".to_string()))
        }
    }
}

#[tokio::test]
async fn test_connection_drop_mid_stream_swallows_subsequent_emits() {
    let inner = InMemoryBus::new();
    let dropping = Arc::new(DroppingBus {
        inner: inner.clone(),
        remaining: AtomicI64::new(3),
    });
    let connector = Arc::new(FlakyConnector {
        bus: dropping,
        handed_out: AtomicI64::new(0),
    });

    let manager = ConnectionManager::new(
        connector.clone(),
        ReconnectPolicy {
            max_attempts: 2,
            delay: Duration::from_millis(10),
        },
    );
    manager.connect().await;

    let client = EventClient::new(manager.clone(), test_config("order-service"));
    let mut stream = inner.subscribe("order.>").await.unwrap();

    // Three emits succeed
    for _ in 0..3 {
        client.emit(sample_order(), EmitOptions::new()).await;
    }

    // Fourth emit hits the dead connection: swallowed, and the manager is
    // told to start reconnecting
    client.emit(sample_order(), EmitOptions::new()).await;
    assert_eq!(manager.state().await, ConnectionState::Disconnected);

    // A fifth emit issued mid-retry is also swallowed, not thrown
    client.emit(sample_order(), EmitOptions::new()).await;

    // Exactly three events made it to the wire
    for _ in 0..3 {
        tokio::time::timeout(Duration::from_millis(200), stream.next())
            .await
            .expect("timeout")
            .expect("stream ended");
    }
    let extra = tokio::time::timeout(Duration::from_millis(200), stream.next()).await;
    assert!(extra.is_err(), "dropped events must not be delivered");

    // Reconnection attempts are capped; the manager stays disconnected
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(manager.state().await, ConnectionState::Disconnected);
    assert_eq!(connector.handed_out.load(Ordering::SeqCst), 3);
}
