//! Storage seams for drafts and the version log.
//!
//! The API layer holds these as trait objects so the same coordinators run
//! over the in-memory store (tests, local development) and PostgreSQL.

use async_trait::async_trait;

use crate::content::DraftContent;
use crate::draft::Draft;
use crate::error::CoreError;
use crate::types::DbId;
use crate::version::{PublishedVersion, VersionHistory, VersionOrigin};

/// Mutable draft records.
///
/// Writes are full replacements with no concurrency token: when two callers
/// replace the same draft concurrently, the write the store applies last is
/// the one that sticks, and neither caller is told about the other.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Insert a new draft. `version_id` is set when the draft is forked from a
    /// published version.
    async fn create(
        &self,
        project_id: DbId,
        content: DraftContent,
        version_id: Option<DbId>,
    ) -> Result<Draft, CoreError>;

    async fn get(&self, project_id: DbId, draft_id: DbId) -> Result<Draft, CoreError>;

    /// All drafts of a project, most recently updated first.
    async fn list(&self, project_id: DbId) -> Result<Vec<Draft>, CoreError>;

    /// Replace all content fields and advance `updated_at`.
    async fn replace_content(
        &self,
        project_id: DbId,
        draft_id: DbId,
        content: DraftContent,
    ) -> Result<Draft, CoreError>;

    /// Record the version a draft was published as. Content is untouched.
    async fn set_version(
        &self,
        project_id: DbId,
        draft_id: DbId,
        version_id: DbId,
    ) -> Result<Draft, CoreError>;
}

/// Result of a successful append: the new entry plus the history as it stood
/// right after it.
#[derive(Debug, Clone)]
pub struct Appended {
    pub version: PublishedVersion,
    pub history: VersionHistory,
}

/// Append-only, per-project ledger of published versions.
///
/// Implementations must serialize `append` per project so that no two
/// appends observe the same current maximum version number.
#[async_trait]
pub trait VersionLog: Send + Sync {
    async fn append(
        &self,
        project_id: DbId,
        content: DraftContent,
        origin: Option<VersionOrigin>,
    ) -> Result<Appended, CoreError>;

    async fn history(&self, project_id: DbId) -> Result<VersionHistory, CoreError>;

    async fn get_version(
        &self,
        project_id: DbId,
        version_number: i32,
    ) -> Result<PublishedVersion, CoreError>;
}
