//! Custom Axum extractors.

pub mod auth;
pub mod body;
pub mod client;

pub use auth::{AdminUser, AuthUser};
pub use body::FormOrJson;
pub use client::ClientMeta;
