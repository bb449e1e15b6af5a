//! Occupancy record entities.

pub mod model;

pub use model::{ActiveSession, UpsertSession};
