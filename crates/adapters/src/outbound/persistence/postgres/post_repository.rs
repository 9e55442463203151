//! PostgreSQL implementation for post repository.

use application::context::Context;
use application::error::{ApplicationError, Result};
use application::ports::outbound::PostRepository;
use async_trait::async_trait;
use domain::content::Post;
use domain::error::Entity;
use sqlx::PgPool;
use sqlx::postgres::PgQueryResult;

use super::error::Classify;
use super::models::PostRecord;

const COLUMNS: &str = "id, user_id, title, code, language, content, source, \
                       created_at, updated_at";

/// PostgreSQL post repository.
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new [`PgPostRepository`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_all(
        &self,
        ctx: &Context,
        sql: &str,
        owner_id: Option<&str>,
    ) -> Result<Vec<Post>> {
        let records = ctx
            .run(async {
                let mut query = sqlx::query_as::<_, PostRecord>(sql);
                if let Some(owner_id) = owner_id {
                    query = query.bind(owner_id);
                }
                query.fetch_all(&self.pool).await.classify(Entity::Post)
            })
            .await?;

        Ok(records.into_iter().map(Post::from).collect())
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn find_all(&self, ctx: &Context) -> Result<Vec<Post>> {
        let sql = format!("SELECT {COLUMNS} FROM posts ORDER BY id DESC");
        self.fetch_all(ctx, &sql, None).await
    }

    async fn find_by_id(&self, ctx: &Context, id: i64) -> Result<Option<Post>> {
        let sql = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");

        let record = ctx
            .run(async {
                sqlx::query_as::<_, PostRecord>(&sql)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .classify(Entity::Post)
            })
            .await?;

        Ok(record.map(Post::from))
    }

    async fn find_by_owner(
        &self,
        ctx: &Context,
        owner_id: &str,
    ) -> Result<Vec<Post>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM posts WHERE user_id = $1 ORDER BY id DESC"
        );
        self.fetch_all(ctx, &sql, Some(owner_id)).await
    }

    async fn insert(&self, ctx: &Context, post: &Post) -> Result<Post> {
        let sql = format!(
            r#"
            INSERT INTO posts (user_id, title, code, language, content, source)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        );

        let record = ctx
            .run(async {
                sqlx::query_as::<_, PostRecord>(&sql)
                    .bind(&post.owner_id)
                    .bind(&post.title)
                    .bind(&post.code)
                    .bind(&post.language)
                    .bind(&post.content)
                    .bind(&post.source)
                    .fetch_one(&self.pool)
                    .await
                    .classify(Entity::Post)
            })
            .await?;

        Ok(record.into())
    }

    async fn update(&self, ctx: &Context, post: &Post) -> Result<Post> {
        let sql = format!(
            r#"
            UPDATE posts
            SET title = $2, code = $3, language = $4, content = $5,
                source = $6, updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        let record = ctx
            .run(async {
                sqlx::query_as::<_, PostRecord>(&sql)
                    .bind(post.id)
                    .bind(&post.title)
                    .bind(&post.code)
                    .bind(&post.language)
                    .bind(&post.content)
                    .bind(&post.source)
                    .fetch_optional(&self.pool)
                    .await
                    .classify(Entity::Post)
            })
            .await?;

        record
            .map(Post::from)
            .ok_or(ApplicationError::NotFound(Entity::Post))
    }

    async fn delete(&self, ctx: &Context, id: i64) -> Result<()> {
        let result: PgQueryResult = ctx
            .run(async {
                sqlx::query("DELETE FROM posts WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .classify(Entity::Post)
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApplicationError::NotFound(Entity::Post));
        }

        Ok(())
    }
}
