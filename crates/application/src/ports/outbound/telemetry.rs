//! Interface for observability.

use domain::error::Entity;

/// Port for telemetry/observability operations.
pub trait TelemetryPort: Send + Sync {
    /// Record a failed authentication attempt.
    fn record_auth_failure(&self, reason: &str);

    /// Record a newly created entity.
    fn record_created(&self, entity: Entity, owner_id: &str);

    /// Record a mutation refused by an ownership rule.
    fn record_access_denied(&self, entity: Entity, user_id: &str, reason: &str);

    /// Record a user removed locally but still known to the identity
    /// provider.
    fn record_partial_failure(&self, user_id: &str);
}
