//! Identity provider port.

use async_trait::async_trait;

use crate::context::Context;
use crate::error::Result;

/// Port for the external identity provider.
///
/// Errors are opaque beyond success or failure.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Verify a bearer token and return the stable user identifier.
    async fn authenticate(&self, ctx: &Context, token: &str) -> Result<String>;

    /// Fetch the display icon URL of a user. An account unknown to the
    /// provider has an empty icon.
    async fn display_icon(&self, ctx: &Context, user_id: &str) -> Result<String>;

    /// Remove the user from the identity provider.
    async fn delete_identity(&self, ctx: &Context, user_id: &str) -> Result<()>;
}
