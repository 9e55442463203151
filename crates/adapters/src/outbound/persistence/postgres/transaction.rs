//! PostgreSQL transaction coordinator.

use std::any::Any;

use application::context::Context;
use application::error::{ApplicationError, Result};
use application::ports::outbound::{Transaction, TransactionCoordinator};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres};

use super::error::transport;

/// In-flight PostgreSQL transaction.
///
/// Dropping it without commit rolls it back.
pub struct PgTransaction {
    inner: sqlx::Transaction<'static, Postgres>,
}

impl PgTransaction {
    /// Connection to run statements on.
    pub fn connection(&mut self) -> &mut sqlx::PgConnection {
        &mut self.inner
    }

    /// Recover a [`PgTransaction`] from a port handle, if it is one.
    pub fn downcast(tx: &mut dyn Transaction) -> Option<&mut PgTransaction> {
        tx.as_any().downcast_mut::<PgTransaction>()
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    fn as_any(&mut self) -> &mut (dyn Any + Send) {
        self
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        // On failure sqlx drops the connection's transaction, which rolls
        // it back.
        self.inner
            .commit()
            .await
            .map_err(|err| ApplicationError::CommitFailed(Box::new(err)))
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.inner.rollback().await.map_err(transport)
    }
}

/// Opens transactions on the shared pool.
pub struct PgTransactionCoordinator {
    pool: PgPool,
}

impl PgTransactionCoordinator {
    /// Create a new [`PgTransactionCoordinator`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionCoordinator for PgTransactionCoordinator {
    async fn begin(&self, ctx: &Context) -> Result<Box<dyn Transaction>> {
        let inner = ctx
            .run(async { self.pool.begin().await.map_err(transport) })
            .await?;

        Ok(Box::new(PgTransaction { inner }))
    }
}
