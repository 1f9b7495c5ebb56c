//! Database layer - record store trait and its backends
//!
//! # Design Principles
//!
//! - Handlers only see `dyn ProblemStore`, never a concrete pool
//! - One statement per operation; the database owns atomicity
//! - Absence is a value (`Option` / `bool`), not an error
//! - Schema constraints are the only validation

pub mod pool;
pub mod postgres;
pub mod sqlite;
pub mod store;

pub use pool::{connect, DEFAULT_MAX_CONNECTIONS};
pub use postgres::PgProblemStore;
pub use sqlite::SqliteProblemStore;
pub use store::{ProblemStore, StoreError};
