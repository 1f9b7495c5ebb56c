//! Record store contract shared by every backend

use async_trait::async_trait;

use crate::models::{Problem, ProblemFields};

/// Store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported database URL scheme '{scheme}' (expected postgres:// or sqlite:)")]
    UnsupportedScheme { scheme: String },
}

/// Persistence for [`Problem`] records keyed by their integer id.
///
/// Implementations hold a connection pool and are shared across request
/// handlers behind an `Arc`.
#[async_trait]
pub trait ProblemStore: Send + Sync + 'static {
    /// Create the `problems` table if it does not exist.
    async fn migrate(&self) -> Result<(), StoreError>;

    /// Persist a new record and return it with its assigned id.
    ///
    /// A missing review count is stored as 0.
    async fn insert(&self, fields: ProblemFields) -> Result<Problem, StoreError>;

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Problem>, StoreError>;

    /// Every stored record, ordered by id.
    async fn fetch_all(&self) -> Result<Vec<Problem>, StoreError>;

    /// Overwrite every mutable column of record `id` with `fields`.
    ///
    /// `None` values are written as NULL. Returns `None` without writing
    /// anything when the record does not exist.
    async fn update(&self, id: i64, fields: ProblemFields)
        -> Result<Option<Problem>, StoreError>;

    /// Remove record `id`. Returns `false` if there was nothing to remove.
    async fn delete_by_id(&self, id: i64) -> Result<bool, StoreError>;

    /// Close pooled connections. Called once on shutdown.
    async fn close(&self);
}
