//! Hexagonal ports of the application.

pub mod inbound;
pub mod outbound;
