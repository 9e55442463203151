//! Relational persistence adapters.

pub mod postgres;
