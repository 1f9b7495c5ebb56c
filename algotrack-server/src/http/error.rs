//! API error type with IntoResponse
//!
//! Both outcomes map to a bare status code with an empty body: clients only
//! distinguish "not found" from "server failed".

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::db::StoreError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found (404)
    NotFound { resource: &'static str, id: i64 },

    /// Store failure (500, logged)
    Store(StoreError),
}

impl ApiError {
    pub fn problem_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: "problem",
            id,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound { resource, id } => {
                tracing::debug!("{} {} not found", resource, id);
                StatusCode::NOT_FOUND.into_response()
            }
            Self::Store(e) => {
                // Log the actual error, the client only sees the status
                tracing::error!("Store error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
