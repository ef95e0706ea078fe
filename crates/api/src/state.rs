use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use wikidraft_core::generator::ContentGenerator;
use wikidraft_core::store::{DraftStore, VersionLog};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub drafts: Arc<dyn DraftStore>,
    pub versions: Arc<dyn VersionLog>,
    pub generator: Arc<dyn ContentGenerator>,
    /// Database pool when running on PostgreSQL; `None` for in-memory storage.
    pub pool: Option<wikidraft_db::DbPool>,
    pub config: Arc<ServerConfig>,
    /// Cancelled on shutdown so in-flight generator calls stop promptly.
    pub shutdown: CancellationToken,
}
