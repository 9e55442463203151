//! Use cases of snipshare: validate, authorize, then persist.
//!
//! The outside world is reached only through [`ports::outbound`]; callers
//! drive the application through [`ports::inbound`].

pub mod context;
pub mod error;
pub mod ports;
pub mod transaction;
pub mod usecases;

#[cfg(test)]
pub(crate) mod testing;
