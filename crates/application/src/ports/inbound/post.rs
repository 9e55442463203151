//! Post use case port.

use async_trait::async_trait;
use domain::content::Post;

use crate::context::{AuthenticatedUser, Context};
use crate::error::Result;

/// Inbound port for posts.
#[async_trait]
pub trait ManagePosts: Send + Sync {
    /// List every post.
    async fn list(&self, ctx: &Context) -> Result<Vec<Post>>;

    /// Get a single post.
    async fn get(&self, ctx: &Context, post_id: i64) -> Result<Post>;

    /// Publish a post owned by the authenticated user.
    async fn create(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        post: Post,
    ) -> Result<Post>;

    /// Update a post owned by the authenticated user.
    async fn update(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        post: Post,
    ) -> Result<Post>;

    /// Delete a post owned by the authenticated user.
    async fn delete(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        post_id: i64,
    ) -> Result<()>;
}
