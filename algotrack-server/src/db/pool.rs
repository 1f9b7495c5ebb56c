//! Store construction from a database URL
//!
//! The URL scheme picks the backend: `postgres://` / `postgresql://` for a
//! PostgreSQL pool, `sqlite:` for an embedded file (or in-memory) database.

use std::sync::Arc;

use super::postgres::PgProblemStore;
use super::sqlite::SqliteProblemStore;
use super::store::{ProblemStore, StoreError};

/// Default maximum connections for the pool.
/// Kept low for single-user tooling.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Open a store for `database_url` with at most `max_connections` pooled
/// connections.
///
/// # Errors
///
/// Returns [`StoreError::UnsupportedScheme`] for any other scheme, or the
/// backend's connection error.
///
/// # Example
///
/// ```ignore
/// let store = connect("sqlite://problems.db", DEFAULT_MAX_CONNECTIONS).await?;
/// store.migrate().await?;
/// ```
pub async fn connect(
    database_url: &str,
    max_connections: u32,
) -> Result<Arc<dyn ProblemStore>, StoreError> {
    match scheme(database_url) {
        "postgres" | "postgresql" => {
            tracing::info!("Connecting to PostgreSQL");
            let store = PgProblemStore::connect(database_url, max_connections).await?;
            Ok(Arc::new(store))
        }
        "sqlite" => {
            tracing::info!("Opening SQLite database");
            let store = SqliteProblemStore::connect(database_url, max_connections).await?;
            Ok(Arc::new(store))
        }
        other => Err(StoreError::UnsupportedScheme {
            scheme: other.to_owned(),
        }),
    }
}

/// Scheme part of the URL, without touching credentials after it.
fn scheme(database_url: &str) -> &str {
    database_url
        .split_once(':')
        .map(|(scheme, _)| scheme)
        .unwrap_or("")
}
