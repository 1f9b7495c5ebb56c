//! Domain models
//!
//! A single entity: the tracked practice [`Problem`]. Field contents are
//! stored verbatim; the database schema is the only validation.

pub mod problem;

pub use problem::{Problem, ProblemFields, MAX_TEXT_LEN};
