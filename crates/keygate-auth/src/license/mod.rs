//! License credential helpers.

pub mod secret;
pub mod token;

pub use secret::generate_license_secret;
pub use token::ClientTokenDeriver;
