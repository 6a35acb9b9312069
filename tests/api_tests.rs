mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use tower::ServiceExt;

use fheap::api::router::create_router;
use fheap::execution::LP_ADDRESSES;
use fheap::fhe::Ciphertext;

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn decrypt(value: &serde_json::Value) -> Decimal {
    let raw = value.as_str().expect("ciphertext string");
    common::test_cipher()
        .decrypt(&Ciphertext::from_raw(raw))
        .expect("decryptable")
}

#[tokio::test]
async fn test_root() {
    let (state, _store) = common::memory_state();
    let app = create_router(state);

    for uri in ["/api/", "/api"] {
        let (status, json) = get_json(app.clone(), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["message"].as_str().unwrap().contains("FHEAP"));
    }
}

#[tokio::test]
async fn test_health_check() {
    let (state, _store) = common::memory_state();
    let (status, json) = get_json(create_router(state), "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "FHEAP Backend");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_status_reports_store() {
    let (state, _store) = common::memory_state();
    let (status, json) = get_json(create_router(state), "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "running");
    assert_eq!(json["database"], "connected");
    assert_eq!(json["store"], "memory");
    assert_eq!(json["monitor"]["iterations"], 0);
    assert!(json["note"].as_str().unwrap().contains("FHEAP smart contracts"));
}

#[tokio::test]
async fn test_prices_pagination() {
    let (state, store) = common::memory_state();
    for block in 0..5 {
        common::seed_price(store.as_ref(), "pool_uni", 2_500 + block, block).await;
    }
    let app = create_router(state);

    let (status, json) = get_json(app.clone(), "/api/prices?limit=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["block_number"], 4);
    assert_eq!(decrypt(&data[0]["encrypted_price"]), Decimal::from(2_504));

    let (_, json) = get_json(app.clone(), "/api/prices?limit=3&offset=3").await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[1]["block_number"], 0);

    // Limit is clamped to at least one row
    let (_, json) = get_json(app, "/api/prices?limit=0").await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_prices_pool_filter() {
    let (state, store) = common::memory_state();
    common::seed_price(store.as_ref(), "pool_uni", 2_500, 1).await;
    common::seed_price(store.as_ref(), "pool_curve", 2_510, 1).await;

    let (_, json) = get_json(create_router(state), "/api/prices?pool_id=pool_curve").await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["pool_id"], "pool_curve");
}

#[tokio::test]
async fn test_prices_invalid_query() {
    let (state, _store) = common::memory_state();
    let resp = create_router(state)
        .oneshot(
            Request::builder()
                .uri("/api/prices?limit=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_opportunity_and_event_listings() {
    let (state, store) = common::memory_state();
    let outcome = common::seed_protected_opportunity(store.as_ref(), 50).await;
    let app = create_router(state);

    let (status, json) = get_json(app.clone(), "/api/arbitrage-opportunities?limit=20").await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["protection_triggered"], true);
    assert_eq!(decrypt(&data[0]["encrypted_spread"]), Decimal::from(50));

    let (status, json) = get_json(app.clone(), "/api/protection-events?limit=50").await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["status"], "protected");
    assert_eq!(data[0]["tx_hash"], outcome.event.tx_hash.as_str());
    assert_eq!(decrypt(&data[0]["encrypted_fee"]), Decimal::from(60));

    let (_, json) = get_json(app, "/api/lp-rewards?limit=2").await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_rewards_by_address() {
    let (state, store) = common::memory_state();
    common::seed_protected_opportunity(store.as_ref(), 50).await;
    common::seed_protected_opportunity(store.as_ref(), 30).await;
    let app = create_router(state);

    let upper = LP_ADDRESSES[0].to_uppercase().replacen("0X", "0x", 1);
    let (status, json) = get_json(app, &format!("/api/lp-rewards/{upper}")).await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["address"], LP_ADDRESSES[0]);
    assert_eq!(data["reward_count"], 2);
    assert_eq!(data["unclaimed_count"], 2);
    // 300 → 48 each, 100 → 16 each
    assert_eq!(decrypt(&data["total_rewards"]), Decimal::from(64));
}

#[tokio::test]
async fn test_rewards_unknown_address_is_empty() {
    let (state, _store) = common::memory_state();
    let (status, json) = get_json(
        create_router(state),
        "/api/lp-rewards/0x0000000000000000000000000000000000000001",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["reward_count"], 0);
    assert!(json["data"]["rewards"].as_array().unwrap().is_empty());
    assert_eq!(decrypt(&json["data"]["total_rewards"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_rewards_invalid_address() {
    let (state, _store) = common::memory_state();
    let (status, json) = get_json(create_router(state), "/api/lp-rewards/not-an-address").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_dashboard() {
    let (state, store) = common::memory_state();
    common::seed_price(store.as_ref(), "pool_uni", 2_500, 1).await;
    common::seed_price(store.as_ref(), "pool_uni", 2_501, 2).await;
    common::seed_price(store.as_ref(), "pool_sushi", 2_502, 2).await;
    common::seed_protected_opportunity(store.as_ref(), 50).await;

    let (status, json) = get_json(create_router(state), "/api/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["counts"]["price_samples"], 3);
    assert_eq!(json["counts"]["opportunities"], 1);
    assert_eq!(json["counts"]["protection_events"], 1);
    assert_eq!(json["counts"]["lp_rewards"], 5);
    assert_eq!(json["latest_prices"].as_array().unwrap().len(), 2);
    assert_eq!(json["recent_opportunities"].as_array().unwrap().len(), 1);
    assert_eq!(decrypt(&json["total_mev_protected"]), Decimal::from(300));
    assert!(json["monitor"].is_object());
}

#[tokio::test]
async fn test_statistics() {
    let (state, store) = common::memory_state();
    common::seed_protected_opportunity(store.as_ref(), 50).await;
    // 20 bps spread against a 20 bps threshold captures nothing
    common::seed_protected_opportunity(store.as_ref(), 20).await;

    let (status, json) = get_json(create_router(state), "/api/statistics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["counts"]["protection_events"], 2);
    assert_eq!(json["counts"]["protected_events"], 1);
    assert_eq!(json["skipped_events"], 1);
    assert_eq!(json["counts"]["unique_lps"], 5);
    assert_eq!(json["pools_monitored"], 3);
    assert_eq!(json["pairs"], serde_json::json!(["ETH/USDC"]));
    assert_eq!(decrypt(&json["total_mev_protected"]), Decimal::from(300));
    assert_eq!(decrypt(&json["total_protocol_fees"]), Decimal::from(60));
    assert_eq!(decrypt(&json["total_lp_rewards"]), Decimal::from(240));
}

#[tokio::test]
async fn test_cors_preflight() {
    let (state, _store) = common::memory_state();
    let resp = create_router(state)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/health")
                .header("origin", "http://localhost:3000")
                .header("access-control-request-method", "GET")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(resp.status().is_success());
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (state, _store) = common::memory_state();
    let resp = create_router(state)
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8(body.to_vec()).is_ok());
}

#[tokio::test]
async fn test_unknown_route() {
    let (state, _store) = common::memory_state();
    let (status, _) = get_json(create_router(state), "/api/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
