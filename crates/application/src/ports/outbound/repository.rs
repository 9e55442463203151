//! Relational repository ports.
//!
//! Every call takes the request [`Context`] and must give up with
//! `ApplicationError::Cancelled` once it is cancelled. Lookups by id return
//! `Ok(None)` when nothing matches; writes that miss their row fail with
//! `ApplicationError::NotFound`.

use async_trait::async_trait;
use domain::content::{Comment, Post};
use domain::identity::User;

use crate::context::Context;
use crate::error::Result;
use crate::ports::outbound::Transaction;

/// Port for user persistence operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by its identity provider subject.
    async fn find_by_id(&self, ctx: &Context, id: &str) -> Result<Option<User>>;

    /// Insert a new user.
    ///
    /// Fails with `Duplicate` on an already used id or twitter handle.
    async fn insert(&self, ctx: &Context, user: &User) -> Result<()>;

    /// Update an existing user.
    async fn update(&self, ctx: &Context, user: &User) -> Result<()>;

    /// Delete a user, inside `tx` when one is given.
    async fn delete(
        &self,
        ctx: &Context,
        id: &str,
        tx: Option<&mut dyn Transaction>,
    ) -> Result<()>;
}

/// Port for post persistence operations.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// List every post, newest first.
    async fn find_all(&self, ctx: &Context) -> Result<Vec<Post>>;

    /// Find a post by id.
    async fn find_by_id(&self, ctx: &Context, id: i64) -> Result<Option<Post>>;

    /// List posts written by `owner_id`.
    async fn find_by_owner(
        &self,
        ctx: &Context,
        owner_id: &str,
    ) -> Result<Vec<Post>>;

    /// Insert a post and return it with its store-assigned id.
    ///
    /// Any client-supplied id is ignored.
    async fn insert(&self, ctx: &Context, post: &Post) -> Result<Post>;

    /// Update an existing post.
    async fn update(&self, ctx: &Context, post: &Post) -> Result<Post>;

    /// Delete a post and, by cascade, its comments.
    async fn delete(&self, ctx: &Context, id: i64) -> Result<()>;
}

/// Port for comment persistence operations.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find a comment by id, scoped to its post.
    async fn find_by_id(
        &self,
        ctx: &Context,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Option<Comment>>;

    /// List comments attached to `post_id`, oldest first.
    async fn find_by_post(
        &self,
        ctx: &Context,
        post_id: i64,
    ) -> Result<Vec<Comment>>;

    /// List comments written by `owner_id`.
    async fn find_by_owner(
        &self,
        ctx: &Context,
        owner_id: &str,
    ) -> Result<Vec<Comment>>;

    /// Insert a comment and return it with its store-assigned id.
    ///
    /// Any client-supplied id is ignored.
    async fn insert(&self, ctx: &Context, comment: &Comment) -> Result<Comment>;

    /// Update an existing comment.
    async fn update(&self, ctx: &Context, comment: &Comment) -> Result<Comment>;

    /// Delete a comment.
    async fn delete(
        &self,
        ctx: &Context,
        post_id: i64,
        comment_id: i64,
    ) -> Result<()>;
}
