//! Handlers for the published version log.
//!
//! Versions are read-only once written. Every write here appends a new
//! entry: seeding, rolling back, or (from the draft side) publishing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;

use wikidraft_core::coordinator;
use wikidraft_core::types::DbId;

use super::parse_content;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /projects/{project_id}/versions
// ---------------------------------------------------------------------------

/// Version history, newest first. Unknown projects have an empty history.
pub async fn get_history(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let history = state.versions.history(project_id).await?;

    tracing::debug!(
        project_id,
        latest_version_number = ?history.latest_version_number,
        "Fetched version history"
    );

    Ok(Json(DataResponse { data: history }))
}

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/versions
// ---------------------------------------------------------------------------

/// Append a version with no origin, e.g. existing page content.
pub async fn seed_version(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let content = parse_content(&body)?;
    let history = coordinator::seed(state.versions.as_ref(), project_id, content).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: history })))
}

// ---------------------------------------------------------------------------
// GET /projects/{project_id}/versions/{version_number}
// ---------------------------------------------------------------------------

pub async fn get_version(
    State(state): State<AppState>,
    Path((project_id, version_number)): Path<(DbId, i32)>,
) -> AppResult<impl IntoResponse> {
    let version = state.versions.get_version(project_id, version_number).await?;
    Ok(Json(DataResponse {
        data: version.detail(),
    }))
}

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/versions/{version_number}/rollback
// ---------------------------------------------------------------------------

/// Republish an earlier version's content as the next version.
pub async fn rollback_version(
    State(state): State<AppState>,
    Path((project_id, version_number)): Path<(DbId, i32)>,
) -> AppResult<impl IntoResponse> {
    let history =
        coordinator::rollback(state.versions.as_ref(), project_id, version_number).await?;

    Ok(Json(DataResponse { data: history }))
}

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/versions/{version_number}/fork
// ---------------------------------------------------------------------------

/// Start a new draft from a published version's content.
pub async fn fork_version(
    State(state): State<AppState>,
    Path((project_id, version_number)): Path<(DbId, i32)>,
) -> AppResult<impl IntoResponse> {
    let draft = coordinator::fork(
        state.drafts.as_ref(),
        state.versions.as_ref(),
        project_id,
        version_number,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: draft })))
}
