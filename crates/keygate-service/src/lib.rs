//! # keygate-service
//!
//! Business logic for KeyGate. The admission engine decides whether a
//! `(key, hwid)` pair may occupy one of a key's concurrent slots; the other
//! services back the administrative surface.
//!
//! Services follow constructor injection: every dependency is provided at
//! construction time as an `Arc` or a cheaply cloneable handle.

pub mod admission;
pub mod audit;
pub mod auth;
pub mod context;
pub mod key;
pub mod reclaim;
pub mod stats;
pub mod user;

pub use admission::{
    AdmissionEngine, AdmissionError, ClientInfo, ConnectGrant, ConnectRequest, DisconnectRequest,
    KeyLockRegistry, KeyValidation,
};
pub use audit::AuditLogger;
pub use auth::{AuthService, AuthSession, Registration};
pub use context::RequestContext;
pub use key::{KeyChanges, KeyService, NewKey};
pub use reclaim::{SessionReclaimer, SweepReport};
pub use stats::{DashboardStats, StatsService};
pub use user::{AdminUserService, UserChanges};
