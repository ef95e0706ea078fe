//! Handlers for project drafts.
//!
//! Drafts are freely editable. Updates replace all content fields and carry
//! no concurrency token, so concurrent writers race and the last write wins.

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
// GET /projects/{project_id}/drafts
// ---------------------------------------------------------------------------

/// List a project's drafts, most recently updated first.
pub async fn list_drafts(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let drafts = state.drafts.list(project_id).await?;

    tracing::debug!(count = drafts.len(), project_id, "Listed drafts for project");

    Ok(Json(DataResponse { data: drafts }))
}

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/drafts
// ---------------------------------------------------------------------------

/// Create a draft from the posted content. Missing fields start empty.
pub async fn create_draft(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let content = parse_content(&body)?;
    let draft = state.drafts.create(project_id, content, None).await?;

    tracing::info!(project_id, draft_id = draft.id, "Draft created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: draft })))
}

// ---------------------------------------------------------------------------
// GET /projects/{project_id}/drafts/{draft_id}
// ---------------------------------------------------------------------------

pub async fn get_draft(
    State(state): State<AppState>,
    Path((project_id, draft_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let draft = state.drafts.get(project_id, draft_id).await?;
    Ok(Json(DataResponse { data: draft }))
}

// ---------------------------------------------------------------------------
// PUT /projects/{project_id}/drafts/{draft_id}
// ---------------------------------------------------------------------------

/// Replace a draft's content. Fields absent from the body are cleared.
pub async fn update_draft(
    State(state): State<AppState>,
    Path((project_id, draft_id)): Path<(DbId, DbId)>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let content = parse_content(&body)?;
    let draft = state
        .drafts
        .replace_content(project_id, draft_id, content)
        .await?;

    tracing::info!(project_id, draft_id, "Draft updated");

    Ok(Json(DataResponse { data: draft }))
}

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/drafts/{draft_id}/regenerate
// ---------------------------------------------------------------------------

/// Replace a draft with content produced by the generator from the posted
/// seed. On any generator failure the draft is left unchanged.
pub async fn regenerate_draft(
    State(state): State<AppState>,
    Path((project_id, draft_id)): Path<(DbId, DbId)>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let seed = parse_content(&body)?;
    let draft = coordinator::regenerate(
        state.drafts.as_ref(),
        state.generator.as_ref(),
        project_id,
        draft_id,
        seed,
        state.config.generator.timeout(),
        &state.shutdown,
    )
    .await?;

    Ok(Json(DataResponse { data: draft }))
}

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/drafts/{draft_id}/publish
// ---------------------------------------------------------------------------

/// Publish a draft as the project's next version and return the new history.
pub async fn publish_draft(
    State(state): State<AppState>,
    Path((project_id, draft_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let history = coordinator::publish(
        state.drafts.as_ref(),
        state.versions.as_ref(),
        project_id,
        draft_id,
    )
    .await?;

    Ok(Json(DataResponse { data: history }))
}
