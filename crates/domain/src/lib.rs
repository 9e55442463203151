//! Core entities of snipshare and the rules that guard their mutation.
//!
//! Nothing in this crate performs I/O.

pub mod content;
pub mod error;
pub mod identity;
pub mod ownership;
pub mod validation;
