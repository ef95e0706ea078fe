//! Repository for the `published_versions` table.
//!
//! Version numbers come from `project_version_counters`, never from
//! `MAX(version_number)`: the counter upsert row-locks the project's sequence
//! state for the rest of the transaction, so concurrent appends for the same
//! project queue behind each other and each sees the previous one's number.

use sqlx::PgPool;
use wikidraft_core::content::DraftContent;
use wikidraft_core::types::DbId;
use wikidraft_core::version::VersionOrigin;

use crate::models::published_version::PublishedVersionRow;

/// Column list for published_versions queries.
const COLUMNS: &str = "id, project_id, version_number, sections, counters, hidden_section_ids, \
    published_from_draft_id, rolled_back_from_version_id, published_at";

/// Provides append and read operations for published versions.
pub struct VersionRepo;

impl VersionRepo {
    /// Append a version and return it together with the project's full log
    /// (newest first) as of this append.
    ///
    /// Runs in one transaction; if anything fails the counter increment rolls
    /// back with it, so numbering stays gapless.
    pub async fn append(
        pool: &PgPool,
        project_id: DbId,
        content: &DraftContent,
        origin: Option<VersionOrigin>,
    ) -> Result<(PublishedVersionRow, Vec<PublishedVersionRow>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (version_number,): (i32,) = sqlx::query_as(
            "INSERT INTO project_version_counters (project_id, last_version)
             VALUES ($1, 1)
             ON CONFLICT (project_id) DO UPDATE SET
                last_version = project_version_counters.last_version + 1,
                updated_at = NOW()
             RETURNING last_version",
        )
        .bind(project_id)
        .fetch_one(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO published_versions
                (project_id, version_number, sections, counters, hidden_section_ids,
                 published_from_draft_id, rolled_back_from_version_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let version = sqlx::query_as::<_, PublishedVersionRow>(&query)
            .bind(project_id)
            .bind(version_number)
            .bind(content.sections_value())
            .bind(content.counters_value())
            .bind(content.hidden_section_ids_vec())
            .bind(VersionOrigin::published_from_draft_id(origin))
            .bind(VersionOrigin::rolled_back_from_version_id(origin))
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM published_versions
             WHERE project_id = $1
             ORDER BY version_number DESC"
        );
        let history = sqlx::query_as::<_, PublishedVersionRow>(&query)
            .bind(project_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((version, history))
    }

    /// List all versions for a project, ordered newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<PublishedVersionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM published_versions
             WHERE project_id = $1
             ORDER BY version_number DESC"
        );
        sqlx::query_as::<_, PublishedVersionRow>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Find a specific version of a project.
    pub async fn find_by_number(
        pool: &PgPool,
        project_id: DbId,
        version_number: i32,
    ) -> Result<Option<PublishedVersionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM published_versions
             WHERE project_id = $1 AND version_number = $2"
        );
        sqlx::query_as::<_, PublishedVersionRow>(&query)
            .bind(project_id)
            .bind(version_number)
            .fetch_optional(pool)
            .await
    }

    /// Current sequence state for a project (`None` if nothing was appended).
    pub async fn last_version_number(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<i32>, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as(
            "SELECT last_version FROM project_version_counters WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|(v,)| v))
    }
}
