//! PostgreSQL implementation for comment repository.

use application::context::Context;
use application::error::{ApplicationError, Result};
use application::ports::outbound::CommentRepository;
use async_trait::async_trait;
use domain::content::Comment;
use domain::error::Entity;
use sqlx::PgPool;
use sqlx::postgres::PgQueryResult;

use super::error::Classify;
use super::models::CommentRecord;

const COLUMNS: &str = "id, user_id, post_id, type, content, first_line, \
                       last_line, code, created_at, updated_at";

/// PostgreSQL comment repository.
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    /// Create a new [`PgCommentRepository`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_all<T>(
        &self,
        ctx: &Context,
        filter: &str,
        value: T,
    ) -> Result<Vec<Comment>>
    where
        T: for<'q> sqlx::Encode<'q, sqlx::Postgres>
            + sqlx::Type<sqlx::Postgres>
            + Send
            + 'static,
    {
        let sql =
            format!("SELECT {COLUMNS} FROM comments WHERE {filter} ORDER BY id");

        let records = ctx
            .run(async {
                sqlx::query_as::<_, CommentRecord>(&sql)
                    .bind(value)
                    .fetch_all(&self.pool)
                    .await
                    .classify(Entity::Comment)
            })
            .await?;

        records
            .into_iter()
            .map(CommentRecord::try_into_comment)
            .collect()
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn find_by_id(
        &self,
        ctx: &Context,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Option<Comment>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM comments WHERE post_id = $1 AND id = $2"
        );

        let record = ctx
            .run(async {
                sqlx::query_as::<_, CommentRecord>(&sql)
                    .bind(post_id)
                    .bind(comment_id)
                    .fetch_optional(&self.pool)
                    .await
                    .classify(Entity::Comment)
            })
            .await?;

        record.map(CommentRecord::try_into_comment).transpose()
    }

    async fn find_by_post(
        &self,
        ctx: &Context,
        post_id: i64,
    ) -> Result<Vec<Comment>> {
        self.fetch_all(ctx, "post_id = $1", post_id).await
    }

    async fn find_by_owner(
        &self,
        ctx: &Context,
        owner_id: &str,
    ) -> Result<Vec<Comment>> {
        self.fetch_all(ctx, "user_id = $1", owner_id.to_owned()).await
    }

    async fn insert(&self, ctx: &Context, comment: &Comment) -> Result<Comment> {
        let sql = format!(
            r#"
            INSERT INTO comments (
                user_id, post_id, type, content, first_line, last_line, code
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        );

        let record = ctx
            .run(async {
                sqlx::query_as::<_, CommentRecord>(&sql)
                    .bind(&comment.owner_id)
                    .bind(comment.post_id)
                    .bind(comment.kind.as_str())
                    .bind(&comment.content)
                    .bind(comment.first_line)
                    .bind(comment.last_line)
                    .bind(&comment.code)
                    .fetch_one(&self.pool)
                    .await
                    .classify(Entity::Comment)
            })
            .await?;

        record.try_into_comment()
    }

    async fn update(&self, ctx: &Context, comment: &Comment) -> Result<Comment> {
        let sql = format!(
            r#"
            UPDATE comments
            SET type = $3, content = $4, first_line = $5, last_line = $6,
                code = $7, updated_at = now()
            WHERE post_id = $1 AND id = $2
            RETURNING {COLUMNS}
            "#
        );

        let record = ctx
            .run(async {
                sqlx::query_as::<_, CommentRecord>(&sql)
                    .bind(comment.post_id)
                    .bind(comment.id)
                    .bind(comment.kind.as_str())
                    .bind(&comment.content)
                    .bind(comment.first_line)
                    .bind(comment.last_line)
                    .bind(&comment.code)
                    .fetch_optional(&self.pool)
                    .await
                    .classify(Entity::Comment)
            })
            .await?;

        record
            .ok_or(ApplicationError::NotFound(Entity::Comment))?
            .try_into_comment()
    }

    async fn delete(
        &self,
        ctx: &Context,
        post_id: i64,
        comment_id: i64,
    ) -> Result<()> {
        let result: PgQueryResult = ctx
            .run(async {
                sqlx::query("DELETE FROM comments WHERE post_id = $1 AND id = $2")
                    .bind(post_id)
                    .bind(comment_id)
                    .execute(&self.pool)
                    .await
                    .classify(Entity::Comment)
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApplicationError::NotFound(Entity::Comment));
        }

        Ok(())
    }
}
