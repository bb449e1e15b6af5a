//! Scheduled background tasks for KeyGate.
//!
//! The admission path already reclaims stale occupancy on every request;
//! the scheduler here keeps `current_users` honest for keys that see no
//! traffic at all.

pub mod jobs;
pub mod scheduler;

pub use jobs::ReclaimJob;
pub use scheduler::ReclaimScheduler;
