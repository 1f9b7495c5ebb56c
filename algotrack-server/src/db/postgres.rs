//! PostgreSQL record store
//!
//! Uses sqlx PgPool. Each operation is a single statement, so insert,
//! update and delete are atomic without an explicit transaction.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::store::{ProblemStore, StoreError};
use crate::models::{Problem, ProblemFields, MAX_TEXT_LEN};

/// PostgreSQL-backed problem store
#[derive(Clone)]
pub struct PgProblemStore {
    pool: PgPool,
}

impl PgProblemStore {
    /// Open a pool against `database_url`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = PgProblemStore::connect("postgres://localhost/algotrack", 5).await?;
    /// ```
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProblemStore for PgProblemStore {
    async fn migrate(&self) -> Result<(), StoreError> {
        tracing::info!("Running problems migration (postgres)");

        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS problems (
                id BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                description VARCHAR({max}),
                difficulty TEXT NOT NULL,
                platform TEXT NOT NULL,
                url TEXT,
                last_reviewed DATE,
                next_review DATE,
                review_count INTEGER DEFAULT 0,
                notes VARCHAR({max})
            )
            "#,
            max = MAX_TEXT_LEN,
        );

        sqlx::query(&ddl).execute(&self.pool).await?;

        Ok(())
    }

    async fn insert(&self, fields: ProblemFields) -> Result<Problem, StoreError> {
        let review_count = fields.insert_review_count();
        let problem: Problem = sqlx::query_as(
            r#"
            INSERT INTO problems
                (title, description, difficulty, platform, url,
                 last_reviewed, next_review, review_count, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, description, difficulty, platform, url,
                      last_reviewed, next_review, review_count, notes
            "#,
        )
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.difficulty)
        .bind(fields.platform)
        .bind(fields.url)
        .bind(fields.last_reviewed)
        .bind(fields.next_review)
        .bind(review_count)
        .bind(fields.notes)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = problem.id, "inserted problem");
        Ok(problem)
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Problem>, StoreError> {
        let problem = sqlx::query_as(
            r#"
            SELECT id, title, description, difficulty, platform, url,
                   last_reviewed, next_review, review_count, notes
            FROM problems
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(problem)
    }

    async fn fetch_all(&self) -> Result<Vec<Problem>, StoreError> {
        let problems = sqlx::query_as(
            r#"
            SELECT id, title, description, difficulty, platform, url,
                   last_reviewed, next_review, review_count, notes
            FROM problems
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(problems)
    }

    async fn update(
        &self,
        id: i64,
        fields: ProblemFields,
    ) -> Result<Option<Problem>, StoreError> {
        let review_count = fields.update_review_count();
        let problem: Option<Problem> = sqlx::query_as(
            r#"
            UPDATE problems
            SET title = $2,
                description = $3,
                difficulty = $4,
                platform = $5,
                url = $6,
                last_reviewed = $7,
                next_review = $8,
                review_count = $9,
                notes = $10
            WHERE id = $1
            RETURNING id, title, description, difficulty, platform, url,
                      last_reviewed, next_review, review_count, notes
            "#,
        )
        .bind(id)
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.difficulty)
        .bind(fields.platform)
        .bind(fields.url)
        .bind(fields.last_reviewed)
        .bind(fields.next_review)
        .bind(review_count)
        .bind(fields.notes)
        .fetch_optional(&self.pool)
        .await?;

        tracing::debug!(id, found = problem.is_some(), "updated problem");
        Ok(problem)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM problems WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        tracing::debug!(id, deleted, "deleted problem");
        Ok(deleted)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
