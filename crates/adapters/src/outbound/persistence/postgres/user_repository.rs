//! PostgreSQL implementation for user repository.

use application::context::Context;
use application::error::{ApplicationError, Result};
use application::ports::outbound::{Transaction, UserRepository};
use async_trait::async_trait;
use domain::error::Entity;
use domain::identity::User;
use sqlx::PgPool;
use sqlx::postgres::PgQueryResult;

use super::error::Classify;
use super::models::UserRecord;
use super::transaction::PgTransaction;

/// PostgreSQL user repository.
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new [`PgUserRepository`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, ctx: &Context, id: &str) -> Result<Option<User>> {
        let record = ctx
            .run(async {
                sqlx::query_as::<_, UserRecord>(
                    r#"
                    SELECT id, name, profile, twitter_handle
                    FROM users
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .classify(Entity::User)
            })
            .await?;

        Ok(record.map(User::from))
    }

    async fn insert(&self, ctx: &Context, user: &User) -> Result<()> {
        let record = UserRecord::from(user);

        ctx.run(async {
            sqlx::query(
                r#"
                INSERT INTO users (id, name, profile, twitter_handle)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&record.id)
            .bind(&record.name)
            .bind(&record.profile)
            .bind(&record.twitter_handle)
            .execute(&self.pool)
            .await
            .classify(Entity::User)
        })
        .await?;

        Ok(())
    }

    async fn update(&self, ctx: &Context, user: &User) -> Result<()> {
        let record = UserRecord::from(user);

        let result: PgQueryResult = ctx
            .run(async {
                sqlx::query(
                    r#"
                    UPDATE users
                    SET name = $2, profile = $3, twitter_handle = $4
                    WHERE id = $1
                    "#,
                )
                .bind(&record.id)
                .bind(&record.name)
                .bind(&record.profile)
                .bind(&record.twitter_handle)
                .execute(&self.pool)
                .await
                .classify(Entity::User)
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApplicationError::NotFound(Entity::User));
        }

        Ok(())
    }

    async fn delete(
        &self,
        ctx: &Context,
        id: &str,
        tx: Option<&mut dyn Transaction>,
    ) -> Result<()> {
        let query = sqlx::query("DELETE FROM users WHERE id = $1").bind(id);

        let result: PgQueryResult = ctx
            .run(async {
                let result = match tx.and_then(PgTransaction::downcast) {
                    Some(tx) => query.execute(tx.connection()).await,
                    None => query.execute(&self.pool).await,
                };
                result.classify(Entity::User)
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApplicationError::NotFound(Entity::User));
        }

        Ok(())
    }
}
