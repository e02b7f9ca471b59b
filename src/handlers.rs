//! HTTP handlers for `/api/runs`

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::error;

use crate::error::{Error, Result};
use crate::run::Run;
use crate::server::AppState;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

fn path_id(id: std::result::Result<Path<i64>, PathRejection>) -> Result<i64> {
    id.map(|Path(id)| id)
        .map_err(|e| Error::InvalidInput(e.body_text()))
}

fn json_body(body: std::result::Result<Json<Run>, JsonRejection>) -> Result<Run> {
    body.map(|Json(run)| run)
        .map_err(|e| Error::InvalidInput(e.body_text()))
}

/// List every run
pub async fn list_runs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Run>>> {
    Ok(Json(state.runs.list_all().await?))
}

/// Get one run by id
pub async fn get_run(
    State(state): State<Arc<AppState>>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Run>> {
    let id = path_id(id)?;
    Ok(Json(state.runs.get_by_id(id).await?))
}

/// List runs at one location
pub async fn list_runs_by_location(
    State(state): State<Arc<AppState>>,
    Path(location): Path<String>,
) -> Result<Json<Vec<Run>>> {
    Ok(Json(state.runs.list_by_location(&location).await?))
}

/// Create a run. Answers 201 with a `Location` header and no body.
pub async fn create_run(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<Run>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let id = state.runs.create(json_body(body)?).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/runs/{id}"))],
    ))
}

/// Replace the run stored under the path id
pub async fn update_run(
    State(state): State<Arc<AppState>>,
    id: std::result::Result<Path<i64>, PathRejection>,
    body: std::result::Result<Json<Run>, JsonRejection>,
) -> Result<StatusCode> {
    let id = path_id(id)?;
    state.runs.update(id, json_body(body)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete the run stored under the path id
pub async fn delete_run(
    State(state): State<Arc<AppState>>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<StatusCode> {
    let id = path_id(id)?;
    state.runs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
