//! PostgreSQL implementations of the repository and transaction ports.

mod error;
pub mod models;

mod comment_repository;
mod post_repository;
mod transaction;
mod user_repository;

pub use comment_repository::PgCommentRepository;
pub use post_repository::PgPostRepository;
pub use transaction::{PgTransaction, PgTransactionCoordinator};
pub use user_repository::PgUserRepository;
