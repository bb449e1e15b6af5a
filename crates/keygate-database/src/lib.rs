//! # keygate-database
//!
//! Persistence for KeyGate: the store traits the admission engine and the
//! admin services depend on, their PostgreSQL implementations, and a
//! volatile in-memory implementation with identical semantics.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{AuditLogStore, KeyStore, SessionRegistry, Stores, UserStore};
