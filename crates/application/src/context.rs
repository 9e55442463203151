//! Per-request values threaded through every use case call.

use std::future::Future;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{ApplicationError, Result};

/// Cancellation and deadline signal of one inbound request.
///
/// A context belongs to a single request call tree. Clones share the same
/// token, so cancelling any of them cancels the request.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// Create a new [`Context`] that is never cancelled unless asked to.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up once `deadline` is reached.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Underlying cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancel every operation running under this context.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the caller gave up or the deadline passed.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Fails with [`ApplicationError::Cancelled`] if the caller gave up.
    pub fn ensure_active(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(ApplicationError::Cancelled);
        }
        Ok(())
    }

    /// Run `operation` unless the context is already cancelled, and drop it
    /// as soon as the context is cancelled while it runs.
    pub async fn run<T, F>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.ensure_active()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(ApplicationError::Cancelled),
            () = deadline => Err(ApplicationError::Cancelled),
            result = operation => result,
        }
    }
}

/// Identity of the caller, as verified by the identity provider.
///
/// Use cases receive it explicitly; it is never read from an untyped bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    user_id: String,
}

impl AuthenticatedUser {
    /// Create a new [`AuthenticatedUser`] from a verified subject.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// Identifier issued by the identity provider.
    #[inline]
    pub fn id(&self) -> &str {
        &self.user_id
    }
}
