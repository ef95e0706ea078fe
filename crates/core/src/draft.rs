//! Draft entity: the mutable, editable side of a project page.

use serde::Serialize;

use crate::content::DraftContent;
use crate::types::{DbId, Timestamp};

/// A draft as returned by every [`DraftStore`](crate::store::DraftStore) read
/// and write.
///
/// Content fields are flattened so the wire shape is
/// `{ id, project_id, sections, counters, hidden_section_ids, version_id, ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Draft {
    pub id: DbId,
    pub project_id: DbId,
    #[serde(flatten)]
    pub content: DraftContent,
    /// The published version this draft was last published as, or was forked
    /// from. Bookkeeping only; it never constrains edits.
    pub version_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order drafts most-recently-updated first, breaking ties by id descending so
/// listings are stable.
pub fn sort_recent_first(drafts: &mut [Draft]) {
    drafts.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
