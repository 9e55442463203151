//! Comment use case implementation.

use async_trait::async_trait;
use domain::content::{Comment, Post};
use domain::error::Entity;
use domain::ownership::{ensure_can_commit, ensure_owner};

use crate::context::{AuthenticatedUser, Context};
use crate::error::{ApplicationError, Result};
use crate::ports::inbound::ManageComments;
use crate::ports::outbound::{CommentRepository, PostRepository, TelemetryPort};
use crate::usecases::authorize;

/// Comment use case service.
pub struct CommentUseCase {
    comments: Box<dyn CommentRepository>,
    posts: Box<dyn PostRepository>,
    telemetry: Box<dyn TelemetryPort>,
}

impl CommentUseCase {
    pub fn new(
        comments: Box<dyn CommentRepository>,
        posts: Box<dyn PostRepository>,
        telemetry: Box<dyn TelemetryPort>,
    ) -> Self {
        Self {
            comments,
            posts,
            telemetry,
        }
    }

    async fn load_post(&self, ctx: &Context, post_id: i64) -> Result<Post> {
        self.posts
            .find_by_id(ctx, post_id)
            .await?
            .ok_or(ApplicationError::NotFound(Entity::Post))
    }

    async fn load(
        &self,
        ctx: &Context,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Comment> {
        self.comments
            .find_by_id(ctx, post_id, comment_id)
            .await?
            .ok_or(ApplicationError::NotFound(Entity::Comment))
    }

    fn ensure_owner(
        &self,
        actor: &AuthenticatedUser,
        comment: &Comment,
    ) -> Result<()> {
        authorize(
            self.telemetry.as_ref(),
            Entity::Comment,
            actor,
            ensure_owner(actor.id(), &comment.owner_id, Entity::Comment),
        )
    }

    fn ensure_can_commit(
        &self,
        actor: &AuthenticatedUser,
        comment: &Comment,
        post: &Post,
    ) -> Result<()> {
        authorize(
            self.telemetry.as_ref(),
            Entity::Comment,
            actor,
            ensure_can_commit(comment, actor.id(), &post.owner_id),
        )
    }
}

#[async_trait]
impl ManageComments for CommentUseCase {
    async fn get(
        &self,
        ctx: &Context,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Comment> {
        self.load(ctx, post_id, comment_id).await
    }

    async fn list_by_post(
        &self,
        ctx: &Context,
        post_id: i64,
    ) -> Result<Vec<Comment>> {
        self.load_post(ctx, post_id).await?;
        self.comments.find_by_post(ctx, post_id).await
    }

    async fn create(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        comment: Comment,
    ) -> Result<Comment> {
        let comment = Comment {
            id: 0,
            owner_id: actor.id().to_owned(),
            created_at: None,
            updated_at: None,
            ..comment
        };
        comment.validate()?;

        let post = self.load_post(ctx, comment.post_id).await?;
        self.ensure_can_commit(actor, &comment, &post)?;

        let comment = self.comments.insert(ctx, &comment).await?;
        self.telemetry.record_created(Entity::Comment, actor.id());

        Ok(comment)
    }

    async fn update(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        comment: Comment,
    ) -> Result<Comment> {
        let comment = Comment {
            owner_id: actor.id().to_owned(),
            ..comment
        };
        comment.validate()?;

        let post = self.load_post(ctx, comment.post_id).await?;
        // Both lookups run before any ownership rule.
        let existing = self.load(ctx, comment.post_id, comment.id).await?;

        self.ensure_can_commit(actor, &comment, &post)?;
        self.ensure_owner(actor, &existing)?;

        let comment = Comment {
            created_at: existing.created_at,
            ..comment
        };
        self.comments.update(ctx, &comment).await
    }

    async fn delete(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        post_id: i64,
        comment_id: i64,
    ) -> Result<()> {
        let existing = self.load(ctx, post_id, comment_id).await?;
        self.ensure_owner(actor, &existing)?;

        self.comments.delete(ctx, post_id, comment_id).await
    }
}
