//! Comment use case port.

use async_trait::async_trait;
use domain::content::Comment;

use crate::context::{AuthenticatedUser, Context};
use crate::error::Result;

/// Inbound port for comments.
#[async_trait]
pub trait ManageComments: Send + Sync {
    /// Get a single comment of a post.
    async fn get(
        &self,
        ctx: &Context,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Comment>;

    /// List comments of a post.
    async fn list_by_post(
        &self,
        ctx: &Context,
        post_id: i64,
    ) -> Result<Vec<Comment>>;

    /// Comment on a post as the authenticated user.
    async fn create(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        comment: Comment,
    ) -> Result<Comment>;

    /// Update a comment owned by the authenticated user.
    async fn update(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        comment: Comment,
    ) -> Result<Comment>;

    /// Delete a comment owned by the authenticated user.
    async fn delete(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        post_id: i64,
        comment_id: i64,
    ) -> Result<()>;
}
