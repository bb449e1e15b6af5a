//! Core type definitions shared across the KeyGate workspace.

pub mod id;

pub use id::*;
