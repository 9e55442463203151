//! Application-level errors.

use domain::error::{DomainError, Entity};

pub type Result<T> = std::result::Result<T, ApplicationError>;

/// Opaque error coming from a backing store or an external service.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur in the application layer.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0} not found")]
    NotFound(Entity),
    #[error("{entity} {field} is already used")]
    Duplicate { entity: Entity, field: &'static str },

    #[error("missing or invalid credentials")]
    Unauthorized,

    /// The user row is gone but the identity provider still knows the user.
    #[error("user {user_id} deleted locally but not from identity provider")]
    PartialFailure {
        user_id: String,
        #[source]
        source: BoxError,
    },

    #[error("operation cancelled by caller")]
    Cancelled,
    #[error("backing store unavailable")]
    StoreUnavailable(#[source] BoxError),
    #[error("transaction commit failed, rolled back")]
    CommitFailed(#[source] BoxError),

    #[error("internal server error")]
    Internal(#[source] BoxError),
}

impl ApplicationError {
    pub fn internal<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Internal(Box::new(err))
    }

    pub fn unavailable<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::StoreUnavailable(Box::new(err))
    }
}

pub trait ToInternal<T> {
    fn catch(self) -> Result<T>;
}

impl<T, E> ToInternal<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn catch(self) -> Result<T> {
        self.map_err(ApplicationError::internal)
    }
}
