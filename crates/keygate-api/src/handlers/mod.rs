//! Route handlers, grouped by surface.

pub mod auth;
pub mod client;
pub mod health;
pub mod info;
pub mod keys;
pub mod logs;
pub mod stats;
pub mod users;
