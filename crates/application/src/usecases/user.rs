//! User use case implementation.
//!
//! Deleting a user spans two stores with no shared transaction manager:
//! the relational row goes first, inside a transaction, then the identity
//! provider record. A failure of the second step after the first committed
//! is reported as [`ApplicationError::PartialFailure`].

use async_trait::async_trait;
use domain::content::{Comment, Post};
use domain::error::Entity;
use domain::identity::User;

use crate::context::{AuthenticatedUser, Context};
use crate::error::{ApplicationError, Result};
use crate::ports::inbound::ManageUsers;
use crate::ports::outbound::{
    CommentRepository, IdentityGateway, PostRepository, TelemetryPort,
    TransactionCoordinator, UserRepository,
};
use crate::transaction::run_in_transaction;

/// User use case service.
pub struct UserUseCase {
    users: Box<dyn UserRepository>,
    posts: Box<dyn PostRepository>,
    comments: Box<dyn CommentRepository>,
    identity: Box<dyn IdentityGateway>,
    transactions: Box<dyn TransactionCoordinator>,
    telemetry: Box<dyn TelemetryPort>,
}

impl UserUseCase {
    pub fn new(
        users: Box<dyn UserRepository>,
        posts: Box<dyn PostRepository>,
        comments: Box<dyn CommentRepository>,
        identity: Box<dyn IdentityGateway>,
        transactions: Box<dyn TransactionCoordinator>,
        telemetry: Box<dyn TelemetryPort>,
    ) -> Self {
        Self {
            users,
            posts,
            comments,
            identity,
            transactions,
            telemetry,
        }
    }

    async fn load(&self, ctx: &Context, user_id: &str) -> Result<User> {
        self.users
            .find_by_id(ctx, user_id)
            .await?
            .ok_or(ApplicationError::NotFound(Entity::User))
    }

    /// Stamp the actor as the profile owner, then validate and normalize.
    fn prepare(actor: &AuthenticatedUser, user: User) -> Result<User> {
        let mut user = User {
            id: actor.id().to_owned(),
            icon_url: String::default(),
            ..user
        };
        user.validate()?;
        user.normalize();
        Ok(user)
    }
}

#[async_trait]
impl ManageUsers for UserUseCase {
    async fn get(&self, ctx: &Context, user_id: &str) -> Result<User> {
        let mut user = self.load(ctx, user_id).await?;

        // An account the provider does not know yields an empty icon.
        user.icon_url = self.identity.display_icon(ctx, user_id).await?;

        Ok(user)
    }

    async fn posts(&self, ctx: &Context, user_id: &str) -> Result<Vec<Post>> {
        self.posts.find_by_owner(ctx, user_id).await
    }

    async fn comments(
        &self,
        ctx: &Context,
        user_id: &str,
    ) -> Result<Vec<Comment>> {
        self.comments.find_by_owner(ctx, user_id).await
    }

    async fn create(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        user: User,
    ) -> Result<User> {
        let user = Self::prepare(actor, user)?;

        self.users.insert(ctx, &user).await?;
        self.telemetry.record_created(Entity::User, &user.id);

        Ok(user)
    }

    async fn update(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        user: User,
    ) -> Result<User> {
        let user = Self::prepare(actor, user)?;

        self.load(ctx, &user.id).await?;
        self.users.update(ctx, &user).await?;

        Ok(user)
    }

    async fn delete(&self, ctx: &Context, actor: &AuthenticatedUser) -> Result<()> {
        let user_id = actor.id();

        // Stale reads are fine here: the delete below is the source of truth.
        self.load(ctx, user_id).await?;

        run_in_transaction(self.transactions.as_ref(), ctx, |mut tx| async move {
            let outcome =
                self.users.delete(ctx, user_id, Some(tx.as_mut())).await;
            (tx, outcome)
        })
        .await?;

        if let Err(err) = self.identity.delete_identity(ctx, user_id).await {
            tracing::error!(
                error = %err,
                user_id,
                "user removed from store but not from identity provider"
            );
            self.telemetry.record_partial_failure(user_id);
            return Err(ApplicationError::PartialFailure {
                user_id: user_id.to_owned(),
                source: Box::new(err),
            });
        }

        Ok(())
    }
}
