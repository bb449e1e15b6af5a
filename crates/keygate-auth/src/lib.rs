//! # keygate-auth
//!
//! Credential plumbing for KeyGate.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and minimum-length policy
//! - `jwt`: bearer token creation and validation for the admin surface
//! - `license`: license secret generation and the legacy client token

pub mod jwt;
pub mod license;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use license::{ClientTokenDeriver, generate_license_secret};
pub use password::{PasswordHasher, PasswordValidator};
