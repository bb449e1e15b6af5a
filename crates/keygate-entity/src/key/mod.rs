//! License key entities.

pub mod kind;
pub mod model;
pub mod status;

pub use kind::KeyType;
pub use model::{CreateLicenseKey, KeyUpdate, LicenseKey};
pub use status::KeyStatus;
