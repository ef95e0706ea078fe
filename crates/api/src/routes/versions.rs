//! Route definitions for the version log (merged into `/projects`).
//!
//! ```text
//! GET  /{project_id}/versions                             get_history
//! POST /{project_id}/versions                             seed_version
//! GET  /{project_id}/versions/{version_number}            get_version
//! POST /{project_id}/versions/{version_number}/rollback   rollback_version
//! POST /{project_id}/versions/{version_number}/fork       fork_version
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::versions;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{project_id}/versions",
            get(versions::get_history).post(versions::seed_version),
        )
        .route(
            "/{project_id}/versions/{version_number}",
            get(versions::get_version),
        )
        .route(
            "/{project_id}/versions/{version_number}/rollback",
            post(versions::rollback_version),
        )
        .route(
            "/{project_id}/versions/{version_number}/fork",
            post(versions::fork_version),
        )
}
