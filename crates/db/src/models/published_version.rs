//! Published version row model.
//!
//! Rows are immutable snapshots; a trigger rejects UPDATE and DELETE.

use serde_json::Value;
use sqlx::FromRow;
use wikidraft_core::content::DraftContent;
use wikidraft_core::error::CoreError;
use wikidraft_core::types::{DbId, Timestamp};
use wikidraft_core::version::{PublishedVersion, VersionOrigin};

/// A row from the `published_versions` table.
#[derive(Debug, Clone, FromRow)]
pub struct PublishedVersionRow {
    pub id: DbId,
    pub project_id: DbId,
    pub version_number: i32,
    pub sections: Value,
    pub counters: Value,
    pub hidden_section_ids: Vec<String>,
    pub published_from_draft_id: Option<DbId>,
    pub rolled_back_from_version_id: Option<DbId>,
    pub published_at: Timestamp,
}

impl TryFrom<PublishedVersionRow> for PublishedVersion {
    type Error = CoreError;

    fn try_from(row: PublishedVersionRow) -> Result<Self, Self::Error> {
        Ok(PublishedVersion {
            id: row.id,
            project_id: row.project_id,
            version_number: row.version_number,
            content: DraftContent::from_parts(
                &row.sections,
                &row.counters,
                row.hidden_section_ids,
            )?,
            origin: VersionOrigin::from_columns(
                row.published_from_draft_id,
                row.rolled_back_from_version_id,
            )?,
            published_at: row.published_at,
        })
    }
}
