//! Integration tests for disconnect and the read-only validate check.

mod helpers;

use chrono::{Duration, Utc};
use http::StatusCode;

use keygate_entity::key::KeyStatus;

#[tokio::test]
async fn test_disconnect_releases_slot() {
    let app = helpers::TestApp::new();
    let key = app.create_key("REL", "release", 2).await;

    app.form("/connect", "user_key=REL&serial=hwA").await;
    app.form("/connect", "user_key=REL&serial=hwB").await;
    assert_eq!(app.key(key.id).await.current_users, 2);

    let resp = app.form("/api/disconnect", "user_key=REL&serial=hwA").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, serde_json::json!({"status": true}));
    assert_eq!(app.key(key.id).await.current_users, 1);
    assert_eq!(app.session_count(key.id).await, 1);
}

#[tokio::test]
async fn test_disconnect_unknown_key_succeeds_silently() {
    let app = helpers::TestApp::new();

    let resp = app.form("/disconnect", "user_key=GHOST&serial=hwA").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["status"], true);
    assert_eq!(app.audit_count().await, 0);
}

#[tokio::test]
async fn test_disconnect_is_idempotent() {
    let app = helpers::TestApp::new();
    let key = app.create_key("IDEM", "idem", 1).await;
    app.form("/connect", "user_key=IDEM&serial=hwA").await;

    for _ in 0..3 {
        let resp = app.form("/disconnect", "user_key=idem&serial=hwA").await;
        assert_eq!(resp.status, StatusCode::OK);
    }
    assert_eq!(app.key(key.id).await.current_users, 0);
    // One connect plus three disconnects.
    assert_eq!(app.audit_count().await, 4);
}

#[tokio::test]
async fn test_disconnect_requires_both_fields() {
    let app = helpers::TestApp::new();
    app.create_key("REQ", "req", 1).await;

    for body in ["serial=hwA", "user_key=REQ", "user_key=&serial=hwA", ""] {
        let resp = app.form("/disconnect", body).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(resp.body["status"], false);
        assert_eq!(resp.body["reason"], "License key and hardware ID required");
    }
    assert_eq!(app.audit_count().await, 0);
}

#[tokio::test]
async fn test_disconnect_reclaims_stale_sessions() {
    let app = helpers::TestApp::new();
    let key = app.create_key("SWEEP", "sweep", 3).await;
    app.form("/connect", "user_key=SWEEP&serial=live").await;
    app.seed_session(key.id, "ghost", Utc::now() - Duration::minutes(10))
        .await;
    assert_eq!(app.session_count(key.id).await, 2);

    let resp = app.form("/disconnect", "user_key=SWEEP&serial=live").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(app.session_count(key.id).await, 0);
    assert_eq!(app.key(key.id).await.current_users, 0);
}

#[tokio::test]
async fn test_validate_reports_without_side_effects() {
    let app = helpers::TestApp::new();
    app.create_key("GOOD", "good", 1).await;
    let lapsed = app
        .create_key_with(
            "LAPSED",
            "lapsed",
            1,
            KeyStatus::Active,
            Some(Utc::now() - Duration::hours(1)),
        )
        .await;

    let resp = app
        .request(
            "POST",
            "/api/validate",
            Some(serde_json::json!({"key": "GOOD"})),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["valid"], true);
    assert_eq!(resp.body["keyType"], "premium");
    assert_eq!(resp.body["status"], "active");

    let resp = app.form("/api/validate", "key=LAPSED").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["valid"], false);
    assert_eq!(resp.body["status"], "active");
    assert_eq!(app.key(lapsed.id).await.status, KeyStatus::Active);

    let resp = app.form("/api/validate", "key=good").await;
    assert_eq!(
        resp.body,
        serde_json::json!({"valid": false, "message": "Invalid key"})
    );

    assert_eq!(app.audit_count().await, 0);
}
