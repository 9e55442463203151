//! Unit of work over a relational transaction.

use std::future::Future;

use crate::context::Context;
use crate::error::{ApplicationError, Result};
use crate::ports::outbound::{Transaction, TransactionCoordinator};

/// Run `work` inside a new transaction.
///
/// `work` receives the transaction handle and hands it back along with its
/// outcome. An `Err` outcome rolls the transaction back and is returned
/// as-is; an `Ok` outcome is committed, and a failed commit is reported as
/// [`ApplicationError::CommitFailed`]. A caller that gave up before the
/// commit gets [`ApplicationError::Cancelled`] and nothing is written.
pub async fn run_in_transaction<T, F, Fut>(
    coordinator: &dyn TransactionCoordinator,
    ctx: &Context,
    work: F,
) -> Result<T>
where
    F: FnOnce(Box<dyn Transaction>) -> Fut,
    Fut: Future<Output = (Box<dyn Transaction>, Result<T>)>,
{
    let tx = coordinator.begin(ctx).await?;
    let (tx, outcome) = work(tx).await;

    let value = match outcome {
        Ok(value) => value,
        Err(err) => {
            rollback(tx).await;
            return Err(err);
        },
    };

    if ctx.is_cancelled() {
        rollback(tx).await;
        return Err(ApplicationError::Cancelled);
    }

    tx.commit().await.map_err(|err| match err {
        ApplicationError::CommitFailed(_) => err,
        other => ApplicationError::CommitFailed(Box::new(other)),
    })?;

    Ok(value)
}

async fn rollback(tx: Box<dyn Transaction>) {
    if let Err(err) = tx.rollback().await {
        // The store discards the transaction on its own once the
        // connection is released.
        tracing::warn!(error = %err, "transaction rollback failed");
    }
}
