//! # keygate-entity
//!
//! Domain entity models for KeyGate. Every struct in this crate is either a
//! database row or the input for creating or updating one. Rows derive
//! `sqlx::FromRow` and serialize with camelCase field names, which is the
//! shape the client and admin APIs expose.

pub mod audit;
pub mod key;
pub mod session;
pub mod user;
