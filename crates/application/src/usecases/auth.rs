//! Authentication use case implementation.

use async_trait::async_trait;

use crate::context::{AuthenticatedUser, Context};
use crate::error::{ApplicationError, Result};
use crate::ports::inbound::Authenticate;
use crate::ports::outbound::{IdentityGateway, TelemetryPort};

/// Authentication use case service.
pub struct AuthUseCase {
    identity: Box<dyn IdentityGateway>,
    telemetry: Box<dyn TelemetryPort>,
}

impl AuthUseCase {
    pub fn new(
        identity: Box<dyn IdentityGateway>,
        telemetry: Box<dyn TelemetryPort>,
    ) -> Self {
        Self {
            identity,
            telemetry,
        }
    }
}

#[async_trait]
impl Authenticate for AuthUseCase {
    async fn authenticate(
        &self,
        ctx: &Context,
        token: &str,
    ) -> Result<AuthenticatedUser> {
        if token.trim().is_empty() {
            self.telemetry.record_auth_failure("missing_token");
            return Err(ApplicationError::Unauthorized);
        }

        match self.identity.authenticate(ctx, token).await {
            Ok(user_id) if !user_id.is_empty() => {
                Ok(AuthenticatedUser::new(user_id))
            },
            Ok(_) => {
                self.telemetry.record_auth_failure("empty_subject");
                Err(ApplicationError::Unauthorized)
            },
            Err(ApplicationError::Cancelled) => Err(ApplicationError::Cancelled),
            Err(err) => {
                // Provider details stay in the logs.
                tracing::debug!(error = %err, "identity provider rejected token");
                self.telemetry.record_auth_failure("rejected_token");
                Err(ApplicationError::Unauthorized)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeIdentity, RecordingTelemetry};

    fn usecase(telemetry: &RecordingTelemetry) -> AuthUseCase {
        AuthUseCase::new(
            Box::new(FakeIdentity::with_token("valid", "user-1")),
            Box::new(telemetry.clone()),
        )
    }

    #[tokio::test]
    async fn test_authenticate() {
        let telemetry = RecordingTelemetry::default();
        let user = usecase(&telemetry)
            .authenticate(&Context::new(), "valid")
            .await
            .unwrap();

        assert_eq!(user.id(), "user-1");
        assert!(telemetry.events().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_token_is_unauthorized() {
        let telemetry = RecordingTelemetry::default();
        let usecase = usecase(&telemetry);

        for token in ["", "   ", "forged"] {
            let result = usecase.authenticate(&Context::new(), token).await;
            assert!(matches!(result, Err(ApplicationError::Unauthorized)));
        }
        assert_eq!(
            telemetry.events(),
            vec![
                "auth_failure:missing_token",
                "auth_failure:missing_token",
                "auth_failure:rejected_token",
            ]
        );
    }

    #[tokio::test]
    async fn test_cancelled_is_not_unauthorized() {
        let telemetry = RecordingTelemetry::default();
        let ctx = Context::new();
        ctx.cancel();

        let result = usecase(&telemetry).authenticate(&ctx, "valid").await;
        assert!(matches!(result, Err(ApplicationError::Cancelled)));
        assert!(telemetry.events().is_empty());
    }
}
