pub mod drafts;
pub mod health;
pub mod versions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects/{project_id}/drafts                              list, create
/// /projects/{project_id}/drafts/{draft_id}                   get, update (PUT)
/// /projects/{project_id}/drafts/{draft_id}/regenerate        regenerate (POST)
/// /projects/{project_id}/drafts/{draft_id}/publish           publish (POST)
///
/// /projects/{project_id}/versions                            history, seed (POST)
/// /projects/{project_id}/versions/{version_number}           get version
/// /projects/{project_id}/versions/{version_number}/rollback  rollback (POST)
/// /projects/{project_id}/versions/{version_number}/fork      fork into draft (POST)
/// ```
///
/// No DELETE handlers are registered: drafts and versions cannot be removed
/// through the API, and the router answers `405 Method Not Allowed`.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest(
        "/projects",
        Router::new()
            .merge(drafts::router())
            .merge(versions::router()),
    )
}
