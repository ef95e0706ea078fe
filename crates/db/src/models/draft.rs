//! Draft row model.

use serde_json::Value;
use sqlx::FromRow;
use wikidraft_core::content::DraftContent;
use wikidraft_core::draft::Draft;
use wikidraft_core::error::CoreError;
use wikidraft_core::types::{DbId, Timestamp};

/// A row from the `drafts` table.
#[derive(Debug, Clone, FromRow)]
pub struct DraftRow {
    pub id: DbId,
    pub project_id: DbId,
    pub sections: Value,
    pub counters: Value,
    pub hidden_section_ids: Vec<String>,
    pub version_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<DraftRow> for Draft {
    type Error = CoreError;

    fn try_from(row: DraftRow) -> Result<Self, Self::Error> {
        Ok(Draft {
            id: row.id,
            project_id: row.project_id,
            content: DraftContent::from_parts(
                &row.sections,
                &row.counters,
                row.hidden_section_ids,
            )?,
            version_id: row.version_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
