//! PostgreSQL implementations of the store traits.

pub mod audit;
pub mod key;
pub mod session;
pub mod user;

pub use audit::ApiLogRepository;
pub use key::LicenseKeyRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
