//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::{DateTime, Utc};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use keygate_api::{AppState, build_app};
use keygate_auth::PasswordHasher;
use keygate_core::config::AppConfig;
use keygate_core::config::store::StoreProvider;
use keygate_core::types::{KeyId, SessionId};
use keygate_database::MemoryStore;
use keygate_database::store::Stores;
use keygate_entity::key::{CreateLicenseKey, KeyStatus, KeyType, LicenseKey};
use keygate_entity::session::ActiveSession;
use keygate_entity::user::{CreateUser, User, UserRole};

/// Test application context backed by the in-memory store
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Store handles for direct inspection
    pub stores: Stores,
    /// The underlying memory store, for seeding raw records
    pub memory: Arc<MemoryStore>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application with an empty store
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.store.provider = StoreProvider::Memory;
        config.worker.enabled = false;
        config.auth.jwt_secret = "integration-test-secret".to_string();

        let memory = Arc::new(MemoryStore::new());
        let stores = Stores::from_memory(Arc::clone(&memory));
        let router = build_app(AppState::new(config.clone(), stores.clone()));

        Self {
            router,
            stores,
            memory,
            config,
        }
    }

    /// Insert an account directly
    pub async fn create_user(&self, username: &str, password: &str, role: UserRole) -> User {
        let password_hash = PasswordHasher::new()
            .hash_password(password)
            .expect("Failed to hash password");
        self.stores
            .users
            .create(CreateUser {
                username: username.to_string(),
                email: format!("{username}@test.com"),
                password_hash,
                role,
            })
            .await
            .expect("Failed to create user")
    }

    /// Log in and return the bearer token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({
                    "email": format!("{username}@test.com"),
                    "password": password,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response.body["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    /// Create an admin account and return its token
    pub async fn admin_token(&self) -> String {
        self.create_user("root", "password123", UserRole::Admin)
            .await;
        self.login("root", "password123").await
    }

    /// Insert an active key with a known secret
    pub async fn create_key(&self, secret: &str, name: &str, max_users: i32) -> LicenseKey {
        self.create_key_with(secret, name, max_users, KeyStatus::Active, None)
            .await
    }

    /// Insert a key with explicit status and expiry
    pub async fn create_key_with(
        &self,
        secret: &str,
        name: &str,
        max_users: i32,
        status: KeyStatus,
        expires_at: Option<DateTime<Utc>>,
    ) -> LicenseKey {
        self.stores
            .keys
            .create(CreateLicenseKey {
                secret: secret.to_string(),
                key_name: name.to_string(),
                key_type: KeyType::Premium,
                status,
                max_users,
                expires_at,
                owner_id: None,
            })
            .await
            .expect("Failed to create key")
    }

    /// Current state of a key
    pub async fn key(&self, id: KeyId) -> LicenseKey {
        self.stores
            .keys
            .find_by_id(id)
            .await
            .expect("Failed to load key")
            .expect("Key not found")
    }

    /// Number of occupancy records held for a key
    pub async fn session_count(&self, id: KeyId) -> usize {
        self.stores
            .sessions
            .list_for_key(id)
            .await
            .expect("Failed to list sessions")
            .len()
    }

    /// Number of audit entries recorded
    pub async fn audit_count(&self) -> i64 {
        self.stores
            .audit
            .count_all()
            .await
            .expect("Failed to count audit entries")
    }

    /// Seed an occupancy record last seen at `last_seen`
    pub async fn seed_session(&self, key_id: KeyId, hwid: &str, last_seen: DateTime<Utc>) {
        self.memory
            .put_session(ActiveSession {
                id: SessionId::new(),
                key_id,
                hwid: hwid.to_string(),
                ip_address: "10.0.0.9".to_string(),
                user_agent: String::new(),
                last_seen,
                created_at: last_seen,
            })
            .await;
    }

    /// POST a urlencoded form the way a mod menu does
    pub async fn form(&self, path: &str, body: &str) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("User-Agent", "ModMenu/2.1")
            .header("X-Forwarded-For", "203.0.113.7")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Make a JSON HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
