//! Embedded SQLite record store
//!
//! File-backed by default; `sqlite::memory:` gives a throwaway database on a
//! single pooled connection.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use super::store::{ProblemStore, StoreError};
use crate::models::{Problem, ProblemFields, MAX_TEXT_LEN};

/// SQLite-backed problem store
#[derive(Clone)]
pub struct SqliteProblemStore {
    pool: SqlitePool,
}

impl SqliteProblemStore {
    /// Open (or create) the database at `database_url`.
    ///
    /// The parent directory of a file database is created if missing.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        if is_memory_url(database_url) {
            // Every connection to :memory: is a separate database, so keep
            // exactly one alive for the pool's lifetime.
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?;
            return Ok(Self::from_pool(pool));
        }

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self::from_pool(pool))
    }

    /// Fresh in-memory database (for tests and throwaway runs).
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:", 1).await
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[async_trait]
impl ProblemStore for SqliteProblemStore {
    async fn migrate(&self) -> Result<(), StoreError> {
        tracing::info!("Running problems migration (sqlite)");

        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS problems (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT CHECK (description IS NULL OR length(description) <= {max}),
                difficulty TEXT NOT NULL,
                platform TEXT NOT NULL,
                url TEXT,
                last_reviewed TEXT,
                next_review TEXT,
                review_count INTEGER DEFAULT 0,
                notes TEXT CHECK (notes IS NULL OR length(notes) <= {max})
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
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
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
            WHERE id = ?
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
            SET title = ?,
                description = ?,
                difficulty = ?,
                platform = ?,
                url = ?,
                last_reviewed = ?,
                next_review = ?,
                review_count = ?,
                notes = ?
            WHERE id = ?
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
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        tracing::debug!(id, found = problem.is_some(), "updated problem");
        Ok(problem)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM problems WHERE id = ?")
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn store() -> SqliteProblemStore {
        let store = SqliteProblemStore::in_memory().await.unwrap();
        store.migrate().await.unwrap();
        store
    }

    fn full_fields() -> ProblemFields {
        ProblemFields {
            title: Some("Merge Intervals".into()),
            description: Some("Merge all overlapping intervals.".into()),
            difficulty: Some("Medium".into()),
            platform: Some("LeetCode".into()),
            url: Some("https://leetcode.com/problems/merge-intervals/".into()),
            last_reviewed: NaiveDate::from_ymd_opt(2024, 5, 1),
            next_review: NaiveDate::from_ymd_opt(2024, 5, 8),
            review_count: Some(Some(2)),
            notes: Some("sort by start first".into()),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_copies_fields() {
        let store = store().await;

        let created = store.insert(full_fields()).await.unwrap();
        let fields = full_fields();

        assert!(created.id > 0);
        assert_eq!(Some(created.title), fields.title);
        assert_eq!(created.description, fields.description);
        assert_eq!(Some(created.difficulty), fields.difficulty);
        assert_eq!(Some(created.platform), fields.platform);
        assert_eq!(created.url, fields.url);
        assert_eq!(created.last_reviewed, fields.last_reviewed);
        assert_eq!(created.next_review, fields.next_review);
        assert_eq!(created.review_count, Some(2));
        assert_eq!(created.notes, fields.notes);
    }

    #[tokio::test]
    async fn insert_defaults_review_count_to_zero() {
        let store = store().await;

        let created = store
            .insert(ProblemFields::new("Two Sum", "Easy", "LeetCode"))
            .await
            .unwrap();

        assert_eq!(created.review_count, Some(0));
        assert_eq!(created.description, None);
        assert_eq!(created.last_reviewed, None);
    }

    #[tokio::test]
    async fn explicit_null_review_count_is_stored_as_null() {
        let store = store().await;

        let fields = ProblemFields::new("Two Sum", "Easy", "LeetCode").with_review_count(None);
        let created = store.insert(fields).await.unwrap();

        assert_eq!(created.review_count, None);
        let fetched = store.fetch_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.review_count, None);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let store = store().await;

        let a = store.insert(ProblemFields::new("A", "Easy", "X")).await.unwrap();
        let b = store.insert(ProblemFields::new("B", "Easy", "X")).await.unwrap();

        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn fetch_after_insert_is_equal() {
        let store = store().await;

        let created = store.insert(full_fields()).await.unwrap();
        let fetched = store.fetch_by_id(created.id).await.unwrap();

        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn missing_ids_are_absent() {
        let store = store().await;

        assert!(store.fetch_by_id(42).await.unwrap().is_none());
        assert!(store.update(42, full_fields()).await.unwrap().is_none());
        assert!(!store.delete_by_id(42).await.unwrap());
        // update never upserts
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_every_field() {
        let store = store().await;
        let created = store.insert(full_fields()).await.unwrap();

        let fields =
            ProblemFields::new("Merge Intervals", "Hard", "NeetCode").with_review_count(Some(5));
        let updated = store.update(created.id, fields).await.unwrap().unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.difficulty, "Hard");
        assert_eq!(updated.platform, "NeetCode");
        assert_eq!(updated.review_count, Some(5));
        // omitted optional fields are nulled, not kept
        assert_eq!(updated.description, None);
        assert_eq!(updated.url, None);
        assert_eq!(updated.last_reviewed, None);
        assert_eq!(updated.next_review, None);
        assert_eq!(updated.notes, None);

        let fetched = store.fetch_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(updated));
    }

    #[tokio::test]
    async fn update_without_review_count_stores_null() {
        let store = store().await;
        let created = store.insert(full_fields()).await.unwrap();

        let updated = store
            .update(created.id, ProblemFields::new("T", "Easy", "P"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.review_count, None);
    }

    #[tokio::test]
    async fn update_with_null_required_field_fails_and_keeps_row() {
        let store = store().await;
        let created = store.insert(full_fields()).await.unwrap();

        let mut fields = full_fields();
        fields.title = None;
        let result = store.update(created.id, fields).await;

        assert!(matches!(result, Err(StoreError::Sqlx(_))));
        let fetched = store.fetch_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn insert_without_required_field_fails() {
        let store = store().await;

        let fields = ProblemFields {
            title: Some("No platform".into()),
            difficulty: Some("Easy".into()),
            ..ProblemFields::default()
        };

        assert!(matches!(
            store.insert(fields).await,
            Err(StoreError::Sqlx(_))
        ));
    }

    #[tokio::test]
    async fn long_text_is_rejected() {
        let store = store().await;

        let mut fields = ProblemFields::new("Long", "Hard", "Codeforces");
        fields.notes = Some("x".repeat(MAX_TEXT_LEN));
        assert!(store.insert(fields.clone()).await.is_ok());

        fields.notes = Some("x".repeat(MAX_TEXT_LEN + 1));
        assert!(store.insert(fields).await.is_err());
    }

    #[tokio::test]
    async fn second_delete_is_absent() {
        let store = store().await;
        let created = store.insert(full_fields()).await.unwrap();

        assert!(store.delete_by_id(created.id).await.unwrap());
        assert!(!store.delete_by_id(created.id).await.unwrap());
        assert!(store.fetch_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fetch_all_reflects_inserts_deletes_and_updates() {
        let store = store().await;

        let mut ids = Vec::new();
        for i in 0..5 {
            let title = format!("Problem {i}");
            let created = store
                .insert(ProblemFields::new(title, "Easy", "HackerRank"))
                .await
                .unwrap();
            ids.push(created.id);
        }

        store.delete_by_id(ids[1]).await.unwrap();
        store.delete_by_id(ids[3]).await.unwrap();
        let updated = store
            .update(ids[4], ProblemFields::new("Renamed", "Hard", "HackerRank"))
            .await
            .unwrap()
            .unwrap();

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(
            all.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![ids[0], ids[2], ids[4]]
        );
        assert_eq!(all[2], updated);
    }

    #[tokio::test]
    async fn file_database_persists_and_never_reuses_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("problems.db");
        let url = format!("sqlite://{}", path.display());

        let store = SqliteProblemStore::connect(&url, 2).await.unwrap();
        store.migrate().await.unwrap();
        let first = store.insert(ProblemFields::new("A", "Easy", "X")).await.unwrap();
        assert!(store.delete_by_id(first.id).await.unwrap());
        store.close().await;

        assert!(path.exists());

        let reopened = SqliteProblemStore::connect(&url, 2).await.unwrap();
        reopened.migrate().await.unwrap();
        let second = reopened.insert(ProblemFields::new("B", "Easy", "X")).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(reopened.fetch_all().await.unwrap(), vec![second]);
        reopened.close().await;
    }

    #[test]
    fn detects_memory_urls() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://file.db?mode=memory"));
        assert!(!is_memory_url("sqlite:///tmp/problems.db"));
    }
}
