//! Users and their identity.

pub mod user;

pub use user::*;
