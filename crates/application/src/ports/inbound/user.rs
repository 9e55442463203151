//! User use case port.

use async_trait::async_trait;
use domain::content::{Comment, Post};
use domain::identity::User;

use crate::context::{AuthenticatedUser, Context};
use crate::error::Result;

/// Inbound port for user profiles.
#[async_trait]
pub trait ManageUsers: Send + Sync {
    /// Get a user profile, with its icon from the identity provider.
    async fn get(&self, ctx: &Context, user_id: &str) -> Result<User>;

    /// List posts written by a user.
    async fn posts(&self, ctx: &Context, user_id: &str) -> Result<Vec<Post>>;

    /// List comments written by a user.
    async fn comments(
        &self,
        ctx: &Context,
        user_id: &str,
    ) -> Result<Vec<Comment>>;

    /// Create the profile of the authenticated user.
    async fn create(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        user: User,
    ) -> Result<User>;

    /// Update the profile of the authenticated user.
    async fn update(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        user: User,
    ) -> Result<User>;

    /// Delete the authenticated user from the store and the identity
    /// provider.
    async fn delete(&self, ctx: &Context, actor: &AuthenticatedUser) -> Result<()>;
}
