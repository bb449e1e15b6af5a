//! The connect/disconnect session-admission protocol.

pub mod engine;
pub mod error;
pub mod lock;
pub mod request;
pub mod resolver;

pub use engine::{AdmissionEngine, ConnectGrant, KeyValidation};
pub use error::{AdmissionError, ErrorCategory};
pub use lock::KeyLockRegistry;
pub use request::{ClientInfo, ConnectRequest, DisconnectRequest};
pub use resolver::resolve_credential;

/// Endpoint recorded on connect audit entries, whichever alias was called.
pub const CONNECT_ENDPOINT: &str = "/api/connect";
/// Endpoint recorded on disconnect audit entries.
pub const DISCONNECT_ENDPOINT: &str = "/api/disconnect";
/// Method recorded on every admission audit entry.
pub const ADMISSION_METHOD: &str = "POST";
