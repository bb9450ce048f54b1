//! Health, request ids, hardening layers, live reload and the admin API.

use std::time::Duration;

use axum::http::StatusCode;
use media_hub::admin::setup_admin_router;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn health_and_request_ids() {
    let (hub, _upstream) = common::start_default().await;

    let res = hub.client.get(hub.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let generated = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&generated).is_ok());
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    assert_eq!(res.headers()["x-frame-options"], "DENY");
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "status": "ok" }));

    let res = hub
        .client
        .get(hub.url("/health"))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me-123");
}

#[tokio::test]
async fn rate_limit_rejects_bursts() {
    let (addr, _upstream) = common::start_upstream().await;
    let mut config = common::test_config(addr);
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_second = 1;
    config.rate_limit.burst_size = 2;
    let hub = common::start_hub(config).await;

    let mut statuses = Vec::new();
    for _ in 0..3 {
        statuses.push(hub.client.get(hub.url("/health")).send().await.unwrap().status());
    }
    assert_eq!(statuses[..2], [StatusCode::OK, StatusCode::OK]);
    assert_eq!(statuses[2], StatusCode::TOO_MANY_REQUESTS);

    let res = hub.client.get(hub.url("/health")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Rate limit exceeded");
}

#[tokio::test]
async fn oversized_bodies_are_refused() {
    let (addr, _upstream) = common::start_upstream().await;
    let mut config = common::test_config(addr);
    config.security.max_body_size = 64;
    let hub = common::start_hub(config).await;

    let res = hub
        .client
        .post(hub.url("/api/movies"))
        .json(&json!({ "url": format!("https://vidu.example/{}", "x".repeat(256)) }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn reload_applies_new_keys() {
    let (addr, _upstream) = common::start_upstream().await;
    let mut config = common::test_config(addr);
    config.providers.unsplash.api_key = None;
    let hub = common::start_hub(config.clone()).await;

    let res = hub.client.get(hub.url("/api/search")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    config.providers.unsplash.api_key = Some("test-key".to_string());
    hub.updates.send(config).unwrap();

    let mut status = StatusCode::INTERNAL_SERVER_ERROR;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        status = hub.client.get(hub.url("/api/search")).send().await.unwrap().status();
        if status == StatusCode::OK {
            break;
        }
    }
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hub.state.services().generation, 1);
}

#[tokio::test]
async fn admin_requires_the_key() {
    let (addr, _upstream) = common::start_upstream().await;
    let mut config = common::test_config(addr);
    config.admin.api_key = "secret".to_string();
    config.providers.freepik.api_key = None;
    let hub = common::start_hub(config).await;
    let admin = common::serve(setup_admin_router(hub.state.clone())).await;

    let res = hub
        .client
        .get(format!("http://{}/admin/status", admin))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = hub
        .client
        .get(format!("http://{}/admin/status", admin))
        .bearer_auth("wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = hub
        .client
        .get(format!("http://{}/admin/status", admin))
        .bearer_auth("secret")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "operational");
    assert_eq!(body["config_generation"], 0);
}

#[tokio::test]
async fn admin_reports_provider_counters() {
    let (addr, _upstream) = common::start_upstream().await;
    let mut config = common::test_config(addr);
    config.admin.api_key = "secret".to_string();
    config.providers.freepik.api_key = None;
    config.providers.openverse.api_key = None;
    let hub = common::start_hub(config).await;
    let admin = common::serve(setup_admin_router(hub.state.clone())).await;

    hub.client.get(hub.url("/api/search")).send().await.unwrap();
    hub.client.get(hub.url("/api/search")).send().await.unwrap();

    let providers: Vec<Value> = hub
        .client
        .get(format!("http://{}/admin/providers", admin))
        .bearer_auth("secret")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(providers.len(), 11);

    let find = |name: &str| providers.iter().find(|p| p["provider"] == name).unwrap().clone();
    let unsplash = find("Unsplash");
    assert_eq!(unsplash["configured"], true);
    assert_eq!(unsplash["requests"], 2);
    assert_eq!(unsplash["failures"], 0);

    let freepik = find("Freepik");
    assert_eq!(freepik["configured"], false);
    assert_eq!(freepik["requests"], 0);

    let openverse = find("OpenVerse");
    assert_eq!(openverse["configured"], true);
}
