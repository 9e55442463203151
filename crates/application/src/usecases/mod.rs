//! Application services implementing business logic.

pub mod auth;
pub mod comment;
pub mod post;
pub mod user;

pub use auth::*;
pub use comment::*;
pub use post::*;
pub use user::*;

use domain::error::{DomainError, Entity};

use crate::context::AuthenticatedUser;
use crate::error::Result;
use crate::ports::outbound::TelemetryPort;

/// Turn a failed ownership rule into an application error. Only ownership
/// failures are recorded as denials.
fn authorize(
    telemetry: &dyn TelemetryPort,
    entity: Entity,
    actor: &AuthenticatedUser,
    rule: domain::error::Result<()>,
) -> Result<()> {
    rule.map_err(|err| {
        if err.is_authorization() {
            let reason = match err {
                DomainError::CannotCommit => "cannot_commit",
                _ => "not_owner",
            };
            telemetry.record_access_denied(entity, actor.id(), reason);
        }
        err.into()
    })
}
