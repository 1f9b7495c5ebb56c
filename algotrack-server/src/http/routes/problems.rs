//! Problem endpoints
//!
//! Each handler is one store call. Absent ids become an empty 404.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{Problem, ProblemFields};

/// POST /problems - create a problem
async fn create_problem(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<ProblemFields>,
) -> Result<(StatusCode, Json<Problem>), ApiError> {
    let problem = state.store.insert(fields).await?;
    tracing::info!(id = problem.id, "problem created");
    Ok((StatusCode::CREATED, Json(problem)))
}

/// GET /problems - list every problem
async fn list_problems(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Problem>>, ApiError> {
    let problems = state.store.fetch_all().await?;
    Ok(Json(problems))
}

/// GET /problems/{id} - get a single problem
async fn get_problem(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Problem>, ApiError> {
    let problem = state
        .store
        .fetch_by_id(id)
        .await?
        .ok_or_else(|| ApiError::problem_not_found(id))?;
    Ok(Json(problem))
}

/// PUT /problems/{id} - overwrite every field of a problem
async fn update_problem(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(fields): Json<ProblemFields>,
) -> Result<Json<Problem>, ApiError> {
    let problem = state
        .store
        .update(id, fields)
        .await?
        .ok_or_else(|| ApiError::problem_not_found(id))?;
    tracing::info!(id, "problem updated");
    Ok(Json(problem))
}

/// DELETE /problems/{id} - delete a problem
async fn delete_problem(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_by_id(id).await? {
        tracing::info!(id, "problem deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::problem_not_found(id))
    }
}

/// Problem routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/problems", get(list_problems).post(create_problem))
        .route(
            "/problems/{id}",
            get(get_problem).put(update_problem).delete(delete_problem),
        )
}
