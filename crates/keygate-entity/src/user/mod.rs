//! Administrative account entities.

pub mod model;
pub mod role;

pub use model::{CreateUser, User, UserUpdate};
pub use role::UserRole;
