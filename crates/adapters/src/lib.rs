//! Adapters plugging snipshare into PostgreSQL, the identity provider and
//! the tracing pipeline.

pub mod outbound;
