//! Telemetry adapters - Observability implementations.

use application::ports::outbound::TelemetryPort;
use domain::error::Entity;

/// Tracing-based telemetry adapter.
#[derive(Default)]
pub struct TracingTelemetry;

impl TracingTelemetry {
    /// Create a new [`TracingTelemetry`].
    pub fn new() -> Self {
        Self
    }
}

impl TelemetryPort for TracingTelemetry {
    fn record_auth_failure(&self, reason: &str) {
        tracing::info!(reason = reason, "authentication failed");
    }

    fn record_created(&self, entity: Entity, owner_id: &str) {
        tracing::info!(%entity, owner_id = owner_id, "content created");
    }

    fn record_access_denied(&self, entity: Entity, user_id: &str, reason: &str) {
        tracing::warn!(
            %entity,
            user_id = user_id,
            reason = reason,
            "mutation refused"
        );
    }

    fn record_partial_failure(&self, user_id: &str) {
        tracing::error!(
            user_id = user_id,
            "identity provider record survived user deletion"
        );
    }
}
