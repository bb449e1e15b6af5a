//! Admission audit trail entities.

pub mod model;

pub use model::{ApiLogEntry, ApiLogView, CreateApiLogEntry};
