//! Ownership rules for mutations on posts and comments.
//!
//! Callers must confirm the target entity exists before applying these
//! rules, so that "not found" always wins over "not yours".

use crate::content::{Comment, CommentKind};
use crate::error::{DomainError, Entity, Result};

/// Whether `actor` may mutate an entity owned by `owner`.
#[inline]
pub fn can_mutate(actor: &str, owner: &str) -> bool {
    actor == owner
}

/// Rejects the mutation of `entity` unless `actor` owns it.
pub fn ensure_owner(actor: &str, owner: &str, entity: Entity) -> Result<()> {
    if !can_mutate(actor, owner) {
        return Err(DomainError::NotAuthorized(entity));
    }
    Ok(())
}

/// Rejects a `commit` comment unless `actor` owns the post it targets.
///
/// Other comment types are accepted from anyone.
pub fn ensure_can_commit(
    comment: &Comment,
    actor: &str,
    post_owner: &str,
) -> Result<()> {
    match comment.kind {
        CommentKind::Commit if !can_mutate(actor, post_owner) => {
            Err(DomainError::CannotCommit)
        },
        CommentKind::None | CommentKind::Highlight | CommentKind::Commit => {
            Ok(())
        },
    }
}
