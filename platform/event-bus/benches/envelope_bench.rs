use criterion::{black_box, criterion_group, criterion_main, Criterion};
use event_bus::EventEnvelope;
use serde_json::json;

fn bench_envelope(c: &mut Criterion) {
    let envelope = EventEnvelope::new(
        "order.order.created".to_string(),
        "order-service".to_string(),
        json!({
            "orderId": "o1",
            "orderNumber": "HOS-1",
            "userId": "u1",
            "userEmail": "a@b.com",
            "sellerId": "s1",
            "items": [{"productId": "p1", "quantity": 2, "price": 9.99}],
            "total": 19.98,
            "currency": "GBP"
        }),
    )
    .with_tenant_id(Some("tenant-1".to_string()))
    .with_correlation_id(Some("corr-1".to_string()));

    c.bench_function("envelope_serialize", |b| {
        b.iter(|| serde_json::to_vec(black_box(&envelope)).unwrap())
    });

    let bytes = serde_json::to_vec(&envelope).unwrap();
    c.bench_function("envelope_deserialize", |b| {
        b.iter(|| {
            let decoded: EventEnvelope<serde_json::Value> =
                serde_json::from_slice(black_box(&bytes)).unwrap();
            decoded
        })
    });
}

criterion_group!(benches, bench_envelope);
criterion_main!(benches);
