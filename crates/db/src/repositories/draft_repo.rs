//! Repository for the `drafts` table.
//!
//! Updates carry no version check: concurrent replacements of the same draft
//! resolve to whichever `UPDATE` Postgres applies last.

use sqlx::PgPool;
use wikidraft_core::content::DraftContent;
use wikidraft_core::types::DbId;

use crate::models::draft::DraftRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, sections, counters, hidden_section_ids, \
    version_id, created_at, updated_at";

/// Provides create, read and full-replace operations for drafts.
pub struct DraftRepo;

impl DraftRepo {
    /// Insert a new draft. `version_id` is set when forking from a version.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        content: &DraftContent,
        version_id: Option<DbId>,
    ) -> Result<DraftRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO drafts (project_id, sections, counters, hidden_section_ids, version_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DraftRow>(&query)
            .bind(project_id)
            .bind(content.sections_value())
            .bind(content.counters_value())
            .bind(content.hidden_section_ids_vec())
            .bind(version_id)
            .fetch_one(pool)
            .await
    }

    /// Find a draft within a project.
    pub async fn find(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<DraftRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drafts WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, DraftRow>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// List all drafts of a project, most recently updated first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<DraftRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM drafts
             WHERE project_id = $1
             ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, DraftRow>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every content field of a draft.
    ///
    /// `updated_at` never moves backwards, even when a later write runs in a
    /// transaction that started earlier. Returns `None` if the draft does not
    /// exist in this project.
    pub async fn replace_content(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        content: &DraftContent,
    ) -> Result<Option<DraftRow>, sqlx::Error> {
        let query = format!(
            "UPDATE drafts SET
                sections = $3,
                counters = $4,
                hidden_section_ids = $5,
                updated_at = GREATEST(NOW(), updated_at)
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DraftRow>(&query)
            .bind(id)
            .bind(project_id)
            .bind(content.sections_value())
            .bind(content.counters_value())
            .bind(content.hidden_section_ids_vec())
            .fetch_optional(pool)
            .await
    }

    /// Record the version a draft was published as. Content is untouched.
    pub async fn set_version_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        version_id: DbId,
    ) -> Result<Option<DraftRow>, sqlx::Error> {
        let query = format!(
            "UPDATE drafts SET
                version_id = $3,
                updated_at = GREATEST(NOW(), updated_at)
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DraftRow>(&query)
            .bind(id)
            .bind(project_id)
            .bind(version_id)
            .fetch_optional(pool)
            .await
    }
}
