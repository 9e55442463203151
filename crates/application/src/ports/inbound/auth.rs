//! Authentication use case port.

use async_trait::async_trait;

use crate::context::{AuthenticatedUser, Context};
use crate::error::Result;

/// Inbound port for request authentication.
#[async_trait]
pub trait Authenticate: Send + Sync {
    /// Resolve a bearer token into the user it was issued to.
    async fn authenticate(
        &self,
        ctx: &Context,
        token: &str,
    ) -> Result<AuthenticatedUser>;
}
