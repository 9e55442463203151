//! Post use case implementation.

use async_trait::async_trait;
use domain::content::Post;
use domain::error::Entity;
use domain::ownership::ensure_owner;

use crate::context::{AuthenticatedUser, Context};
use crate::error::{ApplicationError, Result};
use crate::ports::inbound::ManagePosts;
use crate::ports::outbound::{PostRepository, TelemetryPort};
use crate::usecases::authorize;

/// Post use case service.
pub struct PostUseCase {
    posts: Box<dyn PostRepository>,
    telemetry: Box<dyn TelemetryPort>,
}

impl PostUseCase {
    pub fn new(
        posts: Box<dyn PostRepository>,
        telemetry: Box<dyn TelemetryPort>,
    ) -> Self {
        Self { posts, telemetry }
    }

    async fn load(&self, ctx: &Context, post_id: i64) -> Result<Post> {
        self.posts
            .find_by_id(ctx, post_id)
            .await?
            .ok_or(ApplicationError::NotFound(Entity::Post))
    }

    async fn load_owned(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        post_id: i64,
    ) -> Result<Post> {
        let post = self.load(ctx, post_id).await?;
        authorize(
            self.telemetry.as_ref(),
            Entity::Post,
            actor,
            ensure_owner(actor.id(), &post.owner_id, Entity::Post),
        )?;
        Ok(post)
    }
}

#[async_trait]
impl ManagePosts for PostUseCase {
    async fn list(&self, ctx: &Context) -> Result<Vec<Post>> {
        self.posts.find_all(ctx).await
    }

    async fn get(&self, ctx: &Context, post_id: i64) -> Result<Post> {
        self.load(ctx, post_id).await
    }

    async fn create(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        post: Post,
    ) -> Result<Post> {
        let post = Post {
            id: 0,
            owner_id: actor.id().to_owned(),
            created_at: None,
            updated_at: None,
            ..post
        };
        post.validate()?;

        let post = self.posts.insert(ctx, &post).await?;
        self.telemetry.record_created(Entity::Post, actor.id());

        Ok(post)
    }

    async fn update(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        post: Post,
    ) -> Result<Post> {
        let post = Post {
            owner_id: actor.id().to_owned(),
            ..post
        };
        post.validate()?;

        let existing = self.load_owned(ctx, actor, post.id).await?;

        let post = Post {
            created_at: existing.created_at,
            ..post
        };
        self.posts.update(ctx, &post).await
    }

    async fn delete(
        &self,
        ctx: &Context,
        actor: &AuthenticatedUser,
        post_id: i64,
    ) -> Result<()> {
        self.load_owned(ctx, actor, post_id).await?;
        self.posts.delete(ctx, post_id).await
    }
}

#[cfg(test)]
mod tests {
    use domain::error::DomainError;

    use super::*;
    use crate::testing::{InMemoryPosts, RecordingTelemetry};

    fn post(id: i64, owner: &str) -> Post {
        Post {
            id,
            owner_id: owner.into(),
            title: "Hello".into(),
            code: "fn main() {}".into(),
            language: "rust".into(),
            ..Default::default()
        }
    }

    fn usecase(posts: &InMemoryPosts) -> PostUseCase {
        PostUseCase::new(
            Box::new(posts.clone()),
            Box::new(RecordingTelemetry::default()),
        )
    }

    #[tokio::test]
    async fn test_create_stamps_owner_and_ignores_id() {
        let posts = InMemoryPosts::with([post(1, "user-1")]);
        let actor = AuthenticatedUser::new("user-2");

        let created = usecase(&posts)
            .create(&Context::new(), &actor, post(42, "user-1"))
            .await
            .unwrap();

        assert_eq!(created.id, 2);
        assert_eq!(created.owner_id, "user-2");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_post() {
        let posts = InMemoryPosts::default();
        let actor = AuthenticatedUser::new("user-1");

        let result = usecase(&posts)
            .create(
                &Context::new(),
                &actor,
                Post {
                    code: String::new(),
                    ..post(0, "user-1")
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::Empty {
                field: "post code"
            }))
        ));
        assert_eq!(posts.writes(), 0);
    }

    #[tokio::test]
    async fn test_update_by_owner() {
        let posts = InMemoryPosts::with([post(1, "user-1")]);
        let actor = AuthenticatedUser::new("user-1");

        let updated = usecase(&posts)
            .update(
                &Context::new(),
                &actor,
                Post {
                    title: "Renamed".into(),
                    ..post(1, "")
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(posts.rows.lock().unwrap()[&1].title, "Renamed");
    }

    #[tokio::test]
    async fn test_update_by_stranger_writes_nothing() {
        let posts = InMemoryPosts::with([post(1, "user-1")]);
        let telemetry = RecordingTelemetry::default();
        let usecase = PostUseCase::new(
            Box::new(posts.clone()),
            Box::new(telemetry.clone()),
        );
        let actor = AuthenticatedUser::new("user-2");

        let update = usecase
            .update(&Context::new(), &actor, post(1, "user-1"))
            .await;
        let delete = usecase.delete(&Context::new(), &actor, 1).await;

        for result in [update.map(|_| ()), delete] {
            assert!(matches!(
                result,
                Err(ApplicationError::Domain(DomainError::NotAuthorized(
                    Entity::Post
                )))
            ));
        }
        assert_eq!(posts.writes(), 0);
        assert_eq!(
            telemetry.events(),
            vec!["denied:post:user-2:not_owner", "denied:post:user-2:not_owner"]
        );
    }

    #[tokio::test]
    async fn test_missing_post_wins_over_ownership() {
        let posts = InMemoryPosts::with([post(1, "user-1")]);
        let actor = AuthenticatedUser::new("user-2");
        let usecase = usecase(&posts);

        let update = usecase
            .update(&Context::new(), &actor, post(7, "user-2"))
            .await;
        let delete = usecase.delete(&Context::new(), &actor, 7).await;
        let get = usecase.get(&Context::new(), 7).await;

        assert!(matches!(update, Err(ApplicationError::NotFound(Entity::Post))));
        assert!(matches!(delete, Err(ApplicationError::NotFound(Entity::Post))));
        assert!(matches!(get, Err(ApplicationError::NotFound(Entity::Post))));
    }

    #[tokio::test]
    async fn test_delete_by_owner() {
        let posts = InMemoryPosts::with([post(1, "user-1"), post(2, "user-1")]);
        let actor = AuthenticatedUser::new("user-1");
        let usecase = usecase(&posts);

        usecase.delete(&Context::new(), &actor, 1).await.unwrap();

        let remaining = usecase.list(&Context::new()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 2);
    }
}
