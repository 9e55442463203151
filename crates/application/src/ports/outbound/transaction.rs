//! Relational transaction port.

use std::any::Any;

use async_trait::async_trait;

use crate::context::Context;
use crate::error::Result;

/// Handle to an in-flight relational transaction.
///
/// The handle is passed explicitly to the repository calls that should join
/// it. Repositories that do not recognise the handle fall back to their
/// own connection.
#[async_trait]
pub trait Transaction: Send {
    /// Lets an adapter recover its concrete transaction type.
    fn as_any(&mut self) -> &mut (dyn Any + Send);

    /// Commit the transaction. On failure the transaction is rolled back
    /// before the error is returned.
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Abort the transaction.
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Port opening relational transactions.
#[async_trait]
pub trait TransactionCoordinator: Send + Sync {
    /// Begin a new transaction scoped to the request behind `ctx`.
    async fn begin(&self, ctx: &Context) -> Result<Box<dyn Transaction>>;
}
