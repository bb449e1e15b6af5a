//! Integration tests for the bearer-authenticated admin surface.

mod helpers;

use chrono::{DateTime, Duration, Utc};
use http::StatusCode;

use keygate_entity::user::UserRole;

#[tokio::test]
async fn test_register_login_me() {
    let app = helpers::TestApp::new();

    let resp = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "username": "alice",
                "email": "alice@test.com",
                "password": "secret123",
            })),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.body);
    assert_eq!(resp.body["user"]["role"], "user");
    assert!(resp.body["user"].get("passwordHash").is_none());
    assert!(resp.body["token"].is_string());

    let token = app.login("alice", "secret123").await;
    let resp = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["email"], "alice@test.com");
    assert_eq!(resp.body["isActive"], true);
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_missing_fields() {
    let app = helpers::TestApp::new();
    app.create_user("bob", "secret123", UserRole::User).await;

    let resp = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "username": "bobby",
                "email": "bob@test.com",
                "password": "secret123",
            })),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["message"], "User already exists");

    let resp = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({"email": "x@test.com", "password": "secret123"})),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["message"], "Missing required fields");
}

#[tokio::test]
async fn test_login_failures() {
    let app = helpers::TestApp::new();
    let token = app.admin_token().await;
    let carol = app.create_user("carol", "secret123", UserRole::User).await;

    let resp = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"email": "carol@test.com", "password": "wrong"})),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["message"], "Invalid credentials");

    let resp = app
        .request(
            "PUT",
            &format!("/api/users/{}", carol.id),
            Some(serde_json::json!({"isActive": false})),
            Some(&token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.body);
    assert_eq!(resp.body["isActive"], false);

    let resp = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"email": "carol@test.com", "password": "secret123"})),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["message"], "Account suspended");
}

#[tokio::test]
async fn test_bearer_guard() {
    let app = helpers::TestApp::new();
    app.create_user("dave", "secret123", UserRole::User).await;
    let token = app.login("dave", "secret123").await;

    let resp = app.request("GET", "/api/keys", None, None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["message"], "Access token required");

    let resp = app
        .request("GET", "/api/keys", None, Some("not-a-jwt"))
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(resp.body["message"], "Invalid token");

    for path in ["/api/users", "/api/stats", "/api/logs"] {
        let resp = app.request("GET", path, None, Some(&token)).await;
        assert_eq!(resp.status, StatusCode::FORBIDDEN, "{path}");
        assert_eq!(resp.body["message"], "Admin access required");
    }
}

#[tokio::test]
async fn test_key_issuance_and_scoping() {
    let app = helpers::TestApp::new();
    let admin = app.admin_token().await;
    let erin = app.create_user("erin", "secret123", UserRole::User).await;
    let token = app.login("erin", "secret123").await;

    let resp = app
        .request(
            "POST",
            "/api/keys",
            Some(serde_json::json!({"keyName": "Deneme", "keyType": "basic"})),
            Some(&token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.body);
    let key = &resp.body;
    let secret = key["key"].as_str().unwrap();
    assert_eq!(secret.len(), 32);
    assert!(secret.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    assert_eq!(key["maxUsers"], 1);
    assert_eq!(key["currentUsers"], 0);
    assert_eq!(key["status"], "active");
    assert_eq!(key["userId"], erin.id.to_string());
    let expires: DateTime<Utc> = key["expiresAt"].as_str().unwrap().parse().unwrap();
    let drift = expires - (Utc::now() + Duration::days(30));
    assert!(drift.num_seconds().abs() < 60);

    let resp = app
        .request(
            "POST",
            "/api/keys",
            Some(serde_json::json!({"keyName": "Forever", "keyType": "lifetime", "maxUsers": 4})),
            Some(&admin),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body["expiresAt"].is_null());

    let own = app.request("GET", "/api/keys", None, Some(&token)).await;
    assert_eq!(own.body.as_array().unwrap().len(), 1);
    let all = app.request("GET", "/api/keys", None, Some(&admin)).await;
    assert_eq!(all.body.as_array().unwrap().len(), 2);

    // Issued secrets work on the client surface.
    let resp = app
        .form("/connect", &format!("user_key={secret}&serial=hw1"))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_key_update_and_delete() {
    let app = helpers::TestApp::new();
    let admin = app.admin_token().await;
    app.create_user("frank", "secret123", UserRole::User).await;
    let user = app.login("frank", "secret123").await;
    let key = app.create_key("UPD", "upd", 1).await;
    let path = format!("/api/keys/{}", key.id);

    let resp = app
        .request(
            "PUT",
            &path,
            Some(serde_json::json!({"status": "suspended"})),
            Some(&user),
        )
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app
        .request(
            "PUT",
            &path,
            Some(serde_json::json!({"status": "suspended", "maxUsers": 3})),
            Some(&admin),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.body);
    assert_eq!(resp.body["status"], "suspended");
    assert_eq!(resp.body["maxUsers"], 3);
    assert_eq!(resp.body["keyName"], "upd");

    let resp = app.form("/connect", "user_key=UPD&serial=hw").await;
    assert_eq!(resp.body["reason"], "License key is suspended");
    assert_eq!(app.audit_count().await, 1);

    let resp = app.request("DELETE", &path, None, Some(&admin)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "License key deleted successfully");
    assert_eq!(app.audit_count().await, 0);

    let resp = app.request("DELETE", &path, None, Some(&admin)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_management() {
    let app = helpers::TestApp::new();
    let admin = app.admin_token().await;
    let gina = app.create_user("gina", "secret123", UserRole::User).await;

    let resp = app.request("GET", "/api/users", None, Some(&admin)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let users = resp.body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("passwordHash").is_none()));

    let resp = app
        .request(
            "PUT",
            &format!("/api/users/{}", gina.id),
            Some(serde_json::json!({"role": "admin"})),
            Some(&admin),
        )
        .await;
    assert_eq!(resp.body["role"], "admin");

    let resp = app
        .request(
            "DELETE",
            &format!("/api/users/{}", gina.id),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "User deleted successfully");

    let resp = app.request("GET", "/api/users", None, Some(&admin)).await;
    assert_eq!(resp.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stats_and_log_limit() {
    let app = helpers::TestApp::new();
    let admin = app.admin_token().await;
    app.create_key("S1", "s1", 5).await;
    app.create_key("S2", "s2", 5).await;

    app.form("/connect", "user_key=S1&serial=a").await;
    app.form("/connect", "user_key=S1&serial=b").await;
    for i in 0..55 {
        app.form("/connect", &format!("user_key=BAD{i}&serial=x"))
            .await;
    }

    let resp = app.request("GET", "/api/stats", None, Some(&admin)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.body,
        serde_json::json!({
            "totalUsers": 1,
            "activeKeys": 2,
            "apiRequests": 57,
            "activeSessions": 2,
        })
    );

    let resp = app.request("GET", "/api/logs", None, Some(&admin)).await;
    assert_eq!(resp.body.as_array().unwrap().len(), 50);
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();
    let resp = app.request("GET", "/api/health", None, None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["status"], "ok");
    assert_eq!(resp.body["store"], "memory");
}
