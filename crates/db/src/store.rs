//! PostgreSQL-backed [`DraftStore`] and [`VersionLog`].

use async_trait::async_trait;
use sqlx::PgPool;
use wikidraft_core::content::DraftContent;
use wikidraft_core::draft::Draft;
use wikidraft_core::error::CoreError;
use wikidraft_core::store::{Appended, DraftStore, VersionLog};
use wikidraft_core::types::DbId;
use wikidraft_core::version::{PublishedVersion, VersionHistory, VersionOrigin};

use crate::models::published_version::PublishedVersionRow;
use crate::repositories::{DraftRepo, VersionRepo};

/// Log the underlying sqlx error and hand back a sanitized core error.
fn storage_error(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Database error");
    CoreError::Internal(format!("storage failure: {err}"))
}

fn into_history(
    project_id: DbId,
    rows: Vec<PublishedVersionRow>,
) -> Result<VersionHistory, CoreError> {
    let versions = rows
        .into_iter()
        .map(PublishedVersion::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(VersionHistory::from_versions(project_id, &versions))
}

/// Drafts stored in the `drafts` table.
#[derive(Clone)]
pub struct PgDraftStore {
    pool: PgPool,
}

impl PgDraftStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DraftStore for PgDraftStore {
    async fn create(
        &self,
        project_id: DbId,
        content: DraftContent,
        version_id: Option<DbId>,
    ) -> Result<Draft, CoreError> {
        let row = DraftRepo::create(&self.pool, project_id, &content, version_id)
            .await
            .map_err(storage_error)?;
        Draft::try_from(row)
    }

    async fn get(&self, project_id: DbId, draft_id: DbId) -> Result<Draft, CoreError> {
        DraftRepo::find(&self.pool, project_id, draft_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| CoreError::draft_not_found(draft_id))
            .and_then(Draft::try_from)
    }

    async fn list(&self, project_id: DbId) -> Result<Vec<Draft>, CoreError> {
        DraftRepo::list_by_project(&self.pool, project_id)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(Draft::try_from)
            .collect()
    }

    async fn replace_content(
        &self,
        project_id: DbId,
        draft_id: DbId,
        content: DraftContent,
    ) -> Result<Draft, CoreError> {
        DraftRepo::replace_content(&self.pool, project_id, draft_id, &content)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| CoreError::draft_not_found(draft_id))
            .and_then(Draft::try_from)
    }

    async fn set_version(
        &self,
        project_id: DbId,
        draft_id: DbId,
        version_id: DbId,
    ) -> Result<Draft, CoreError> {
        DraftRepo::set_version_id(&self.pool, project_id, draft_id, version_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| CoreError::draft_not_found(draft_id))
            .and_then(Draft::try_from)
    }
}

/// Version log stored in `published_versions` + `project_version_counters`.
#[derive(Clone)]
pub struct PgVersionLog {
    pool: PgPool,
}

impl PgVersionLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionLog for PgVersionLog {
    async fn append(
        &self,
        project_id: DbId,
        content: DraftContent,
        origin: Option<VersionOrigin>,
    ) -> Result<Appended, CoreError> {
        let (row, rows) = VersionRepo::append(&self.pool, project_id, &content, origin)
            .await
            .map_err(storage_error)?;

        let version = PublishedVersion::try_from(row)?;
        tracing::debug!(
            project_id,
            version_id = version.id,
            version_number = version.version_number,
            "Version appended"
        );

        Ok(Appended {
            version,
            history: into_history(project_id, rows)?,
        })
    }

    async fn history(&self, project_id: DbId) -> Result<VersionHistory, CoreError> {
        let rows = VersionRepo::list_by_project(&self.pool, project_id)
            .await
            .map_err(storage_error)?;
        into_history(project_id, rows)
    }

    async fn get_version(
        &self,
        project_id: DbId,
        version_number: i32,
    ) -> Result<PublishedVersion, CoreError> {
        VersionRepo::find_by_number(&self.pool, project_id, version_number)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| CoreError::version_not_found(version_number))
            .and_then(PublishedVersion::try_from)
    }
}
