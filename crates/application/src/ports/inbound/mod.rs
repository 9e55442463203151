//! These traits define what the application can do.

pub mod auth;
pub mod comment;
pub mod post;
pub mod user;

pub use auth::*;
pub use comment::*;
pub use post::*;
pub use user::*;
