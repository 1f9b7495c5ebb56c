//! HTTP server layer
//!
//! Axum server with:
//! - CORS for a single configured client origin
//! - Request tracing
//! - Graceful shutdown
//! - Status-only error responses

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
