//! These traits define what the application needs from the outside world.

pub mod identity;
pub mod repository;
pub mod telemetry;
pub mod transaction;

pub use identity::*;
pub use repository::*;
pub use telemetry::*;
pub use transaction::*;
