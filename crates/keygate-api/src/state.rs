//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use keygate_auth::{
    ClientTokenDeriver, JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator,
};
use keygate_core::config::AppConfig;
use keygate_database::Stores;
use keygate_service::{
    AdminUserService, AdmissionEngine, AuditLogger, AuthService, KeyLockRegistry, KeyService,
    SessionReclaimer, StatsService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Backing stores
    pub stores: Stores,
    /// Stale session reclaimer, shared with the worker
    pub reclaimer: SessionReclaimer,

    // ── Services ─────────────────────────────────────────────
    /// Connect/disconnect admission
    pub admission: Arc<AdmissionEngine>,
    /// Audit trail
    pub audit: AuditLogger,
    /// Account registration, login and bearer auth
    pub auth: Arc<AuthService>,
    /// License key management
    pub keys: Arc<KeyService>,
    /// Admin user management
    pub users: Arc<AdminUserService>,
    /// Dashboard statistics
    pub stats: Arc<StatsService>,
}

impl AppState {
    /// Wire every service on top of `stores`.
    pub fn new(config: AppConfig, stores: Stores) -> Self {
        let locks = KeyLockRegistry::new();
        let audit = AuditLogger::new(Arc::clone(&stores.audit));
        let reclaimer = SessionReclaimer::new(
            Arc::clone(&stores.keys),
            Arc::clone(&stores.sessions),
            locks.clone(),
            &config.admission,
        );

        let admission = Arc::new(AdmissionEngine::new(
            Arc::clone(&stores.keys),
            Arc::clone(&stores.sessions),
            audit.clone(),
            reclaimer.clone(),
            ClientTokenDeriver::new(&config.admission),
        ));
        let auth = Arc::new(AuthService::new(
            Arc::clone(&stores.users),
            PasswordHasher::new(),
            PasswordValidator::new(&config.auth),
            JwtEncoder::new(&config.auth),
            JwtDecoder::new(&config.auth),
        ));
        let keys = Arc::new(KeyService::new(Arc::clone(&stores.keys), locks));
        let users = Arc::new(AdminUserService::new(
            Arc::clone(&stores.users),
            PasswordHasher::new(),
            PasswordValidator::new(&config.auth),
        ));
        let stats = Arc::new(StatsService::new(stores.clone()));

        Self {
            config: Arc::new(config),
            stores,
            reclaimer,
            admission,
            audit,
            auth,
            keys,
            users,
            stats,
        }
    }
}
