//! Integration tests for the mod-menu connect endpoint.

mod helpers;

use chrono::{Duration, Utc};
use futures::future::join_all;
use http::StatusCode;

use keygate_auth::ClientTokenDeriver;
use keygate_core::config::admission::AdmissionConfig;
use keygate_entity::key::KeyStatus;

#[tokio::test]
async fn test_connect_grants_slot_with_legacy_payload() {
    let app = helpers::TestApp::new();
    let key = app.create_key("ABC123", "MyKey", 2).await;

    let before = Utc::now().timestamp();
    let resp = app
        .form("/connect", "game=PUBG&user_key=ABC123&serial=hwA")
        .await;

    assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.body);
    assert_eq!(resp.body["status"], true);
    let data = &resp.body["data"];
    let expected = ClientTokenDeriver::new(&AdmissionConfig::default()).derive("ABC123", "hwA");
    assert_eq!(data["token"], expected.as_str());
    assert!(data["rng"].as_i64().unwrap() >= before);
    assert_eq!(data["keyName"], "MyKey");
    assert_eq!(data["keyType"], "premium");
    assert!(data["expiresAt"].is_null());
    assert_eq!(data["maxUsers"], 2);
    assert_eq!(data["currentUsers"], 1);

    let stored = app.key(key.id).await;
    assert_eq!(stored.current_users, 1);
    assert!(stored.last_used.is_some());
}

#[tokio::test]
async fn test_connect_accepts_json_on_api_alias() {
    let app = helpers::TestApp::new();
    app.create_key("JSONKEY", "json", 1).await;

    let resp = app
        .request(
            "POST",
            "/api/connect",
            Some(serde_json::json!({
                "game": "PUBG",
                "user_key": "JSONKEY",
                "serial": "hw-json",
            })),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.body);
    assert_eq!(resp.body["data"]["currentUsers"], 1);
}

#[tokio::test]
async fn test_single_slot_scenario() {
    let app = helpers::TestApp::new();
    let key = app.create_key("K", "single", 1).await;

    let resp = app.form("/connect", "user_key=K&serial=hwA").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(app.key(key.id).await.current_users, 1);

    let resp = app.form("/connect", "user_key=K&serial=hwB").await;
    assert_eq!(resp.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.body["status"], false);
    assert_eq!(resp.body["reason"], "Maximum users limit reached (1)");

    let resp = app.form("/disconnect", "user_key=K&serial=hwA").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(app.key(key.id).await.current_users, 0);

    let resp = app.form("/connect", "user_key=K&serial=hwB").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(app.key(key.id).await.current_users, 1);
}

#[tokio::test]
async fn test_reconnect_same_device_never_hits_cap() {
    let app = helpers::TestApp::new();
    let key = app.create_key("ONE", "one", 1).await;

    for _ in 0..5 {
        let resp = app.form("/connect", "user_key=ONE&serial=same").await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["data"]["currentUsers"], 1);
    }
    assert_eq!(app.session_count(key.id).await, 1);
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let app = helpers::TestApp::new();
    app.create_key("MISS", "miss", 1).await;

    let resp = app.form("/connect", "game=PUBG&serial=hwA").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["reason"], "License key required");

    let resp = app.form("/connect", "user_key=MISS&serial=").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["reason"], "Hardware ID required");

    assert_eq!(app.audit_count().await, 2);
}

#[tokio::test]
async fn test_unknown_and_suspended_keys() {
    let app = helpers::TestApp::new();
    app.create_key_with("SUSP", "susp", 3, KeyStatus::Suspended, None)
        .await;

    let resp = app.form("/connect", "user_key=NOPE&serial=hwA").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["reason"], "Invalid license key");

    let resp = app.form("/connect", "user_key=SUSP&serial=hwA").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["reason"], "License key is suspended");
}

#[tokio::test]
async fn test_lapsed_key_flips_to_expired() {
    let app = helpers::TestApp::new();
    let key = app
        .create_key_with(
            "OLD",
            "OldKey",
            1,
            KeyStatus::Active,
            Some(Utc::now() - Duration::days(1)),
        )
        .await;

    let resp = app.form("/connect", "user_key=OLD&serial=hwA").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["reason"], "License key has expired");
    assert_eq!(app.key(key.id).await.status, KeyStatus::Expired);

    let resp = app.form("/connect", "user_key=OldKey&serial=hwB").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["reason"], "License key has expired");
}

#[tokio::test]
async fn test_display_name_resolves_to_same_key() {
    let app = helpers::TestApp::new();
    let key = app.create_key("ABC123", "MyKey", 5).await;

    let by_secret = app.form("/connect", "user_key=ABC123&serial=hwA").await;
    let by_name = app.form("/connect", "user_key=MyKey&serial=hwA").await;

    assert_eq!(by_secret.status, StatusCode::OK);
    assert_eq!(by_name.status, StatusCode::OK);
    assert_eq!(by_secret.body["data"]["token"], by_name.body["data"]["token"]);
    assert_eq!(app.session_count(key.id).await, 1);
}

#[tokio::test]
async fn test_stale_session_frees_slot() {
    let app = helpers::TestApp::new();
    let key = app.create_key("STALE", "stale", 1).await;
    app.seed_session(key.id, "ghost", Utc::now() - Duration::minutes(6))
        .await;

    let resp = app.form("/connect", "user_key=STALE&serial=fresh").await;
    assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.body);
    assert_eq!(resp.body["data"]["currentUsers"], 1);
    assert_eq!(app.session_count(key.id).await, 1);
}

#[tokio::test]
async fn test_recent_session_still_counts() {
    let app = helpers::TestApp::new();
    let key = app.create_key("WARM", "warm", 1).await;
    app.seed_session(key.id, "other", Utc::now() - Duration::minutes(4))
        .await;

    let resp = app.form("/connect", "user_key=WARM&serial=newcomer").await;
    assert_eq!(resp.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_concurrent_connects_respect_cap() {
    let app = helpers::TestApp::new();
    let key = app.create_key("RACE", "race", 3).await;

    let attempts = (0..12).map(|i| {
        let app = &app;
        async move {
            app.form("/connect", &format!("user_key=RACE&serial=hw{i}"))
                .await
                .status
        }
    });
    let statuses = join_all(attempts).await;

    let granted = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let capped = statuses
        .iter()
        .filter(|s| **s == StatusCode::TOO_MANY_REQUESTS)
        .count();
    assert_eq!(granted, 3);
    assert_eq!(capped, 9);

    let stored = app.key(key.id).await;
    assert_eq!(stored.current_users, 3);
    assert_eq!(app.session_count(key.id).await, 3);
}

#[tokio::test]
async fn test_every_decision_is_audited() {
    let app = helpers::TestApp::new();
    let token = app.admin_token().await;
    app.create_key("AUD", "AuditKey", 1).await;

    app.form("/connect", "user_key=AUD&serial=hwA").await;
    app.form("/connect", "user_key=AUD&serial=hwB").await;
    app.form("/connect", "user_key=NOPE&serial=hwC").await;

    let resp = app.request("GET", "/api/logs", None, Some(&token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let logs = resp.body.as_array().expect("logs array");
    assert_eq!(logs.len(), 3);

    let responses: Vec<&str> = logs
        .iter()
        .map(|l| l["response"].as_str().unwrap())
        .collect();
    assert!(responses.contains(&"success: access granted"));
    assert!(responses.contains(&"error: max users reached"));
    assert!(responses.contains(&"error: invalid key"));

    for log in logs {
        assert_eq!(log["endpoint"], "/api/connect");
        assert_eq!(log["method"], "POST");
        assert_eq!(log["ipAddress"], "203.0.113.7");
        assert_eq!(log["userAgent"], "ModMenu/2.1");
    }
    let granted = logs
        .iter()
        .find(|l| l["response"] == "success: access granted")
        .unwrap();
    assert_eq!(granted["keyName"], "AuditKey");
    assert_eq!(granted["hwid"], "hwA");
    assert_eq!(granted["success"], true);
}

#[tokio::test]
async fn test_connect_usage_info() {
    let app = helpers::TestApp::new();

    let resp = app.request("GET", "/connect", None, None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["status"], true);
    assert_eq!(resp.body["usage"]["method"], "POST");

    let resp = app.request("GET", "/api/status", None, None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["endpoints"]["connect"]["method"], "POST");
    assert!(resp.body["timestamp"].is_string());
}
