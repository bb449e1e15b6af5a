//! Job implementations run by the scheduler.

pub mod reclaim;

pub use reclaim::ReclaimJob;
