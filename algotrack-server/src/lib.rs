//! algotrack-server: HTTP server for practice problem records
//!
//! Exposes create/read/update/delete over `/api/problems`, backed by a
//! [`ProblemStore`] that is either PostgreSQL or an embedded SQLite file.

pub mod db;
pub mod http;
pub mod models;

pub use db::{connect, ProblemStore, StoreError};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use models::{Problem, ProblemFields};
