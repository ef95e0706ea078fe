//! Route definitions for drafts (merged into `/projects`).
//!
//! ```text
//! GET  /{project_id}/drafts                         list_drafts
//! POST /{project_id}/drafts                         create_draft
//! GET  /{project_id}/drafts/{draft_id}              get_draft
//! PUT  /{project_id}/drafts/{draft_id}              update_draft
//! POST /{project_id}/drafts/{draft_id}/regenerate   regenerate_draft
//! POST /{project_id}/drafts/{draft_id}/publish      publish_draft
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::drafts;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{project_id}/drafts",
            get(drafts::list_drafts).post(drafts::create_draft),
        )
        .route(
            "/{project_id}/drafts/{draft_id}",
            get(drafts::get_draft).put(drafts::update_draft),
        )
        .route(
            "/{project_id}/drafts/{draft_id}/regenerate",
            post(drafts::regenerate_draft),
        )
        .route(
            "/{project_id}/drafts/{draft_id}/publish",
            post(drafts::publish_draft),
        )
}
