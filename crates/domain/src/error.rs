//! Custom error handler for domain (core).

use std::fmt;

use crate::content::comment::CommentKind;

pub type Result<T> = std::result::Result<T, DomainError>;

/// Kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Post,
    Comment,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::User => write!(f, "user"),
            Entity::Post => write!(f, "post"),
            Entity::Comment => write!(f, "comment"),
        }
    }
}

/// Enum representing custom domain errors.
///
/// Every variant is built at the failing call site and carries the name of
/// the offending field or entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must not exceed {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must not be a negative value")]
    NegativeValue { field: &'static str },

    #[error("invalid comment type `{0}`")]
    InvalidCommentType(String),
    #[error("{field} must be empty on `{kind}` comments")]
    ForbiddenField {
        field: &'static str,
        kind: CommentKind,
    },

    #[error("you are not the owner of this {0}")]
    NotAuthorized(Entity),
    #[error("only the owner of the post can commit code to it")]
    CannotCommit,
}

impl DomainError {
    /// Name of the field that failed validation, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            DomainError::Empty { field }
            | DomainError::TooLong { field, .. }
            | DomainError::NegativeValue { field }
            | DomainError::ForbiddenField { field, .. } => Some(field),
            DomainError::InvalidCommentType(_) => Some("comment type"),
            DomainError::NotAuthorized(_) | DomainError::CannotCommit => None,
        }
    }

    /// Whether the error comes from an ownership rule rather than from the
    /// shape of the entity.
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            DomainError::NotAuthorized(_) | DomainError::CannotCommit
        )
    }
}
