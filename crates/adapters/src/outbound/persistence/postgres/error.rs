//! Mapping of sqlx failures onto the application error taxonomy.

use application::error::{ApplicationError, Result};
use domain::error::Entity;
use sqlx::error::ErrorKind;

/// Convert a failed statement into an [`ApplicationError`].
pub trait Classify<T> {
    /// Classify the error of a statement touching `entity`.
    fn classify(self, entity: Entity) -> Result<T>;
}

impl<T> Classify<T> for std::result::Result<T, sqlx::Error> {
    fn classify(self, entity: Entity) -> Result<T> {
        self.map_err(|err| classify(err, entity))
    }
}

pub fn classify(err: sqlx::Error, entity: Entity) -> ApplicationError {
    let constraint_error = match &err {
        sqlx::Error::Database(db) => match db.kind() {
            ErrorKind::UniqueViolation => Some(ApplicationError::Duplicate {
                entity,
                field: duplicate_field(db.constraint()),
            }),
            ErrorKind::ForeignKeyViolation => Some(ApplicationError::NotFound(
                referenced_entity(db.constraint(), entity),
            )),
            _ => None,
        },
        _ => None,
    };

    constraint_error.unwrap_or_else(|| transport(err))
}

/// Errors not tied to a statement outcome.
pub fn transport(err: sqlx::Error) -> ApplicationError {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => ApplicationError::unavailable(err),
        err => {
            tracing::error!(error = %err, "unexpected postgres error");
            ApplicationError::internal(err)
        },
    }
}

fn duplicate_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_twitter_handle_key") => "twitter handle",
        _ => "id",
    }
}

/// Entity a foreign key violation points at.
fn referenced_entity(constraint: Option<&str>, fallback: Entity) -> Entity {
    match constraint {
        Some("posts_user_id_fkey" | "comments_user_id_fkey") => Entity::User,
        Some("comments_post_id_fkey") => Entity::Post,
        _ => fallback,
    }
}
