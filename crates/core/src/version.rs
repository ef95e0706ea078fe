//! Published versions, their origin, and the derived version-history view.
//!
//! A version is immutable once appended. Its content is an owned deep copy,
//! never a handle onto the draft or version it came from.

use serde::Serialize;

use crate::content::DraftContent;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Where a version's content came from.
///
/// A version carries `Some(origin)` when it was published or rolled back, and
/// `None` only for a manually seeded entry. Modelling the two shapes as one
/// enum makes "both set" unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOrigin {
    PublishedFromDraft { draft_id: DbId },
    RolledBackFromVersion { version_id: DbId },
}

impl VersionOrigin {
    pub fn published_from_draft_id(origin: Option<Self>) -> Option<DbId> {
        match origin {
            Some(Self::PublishedFromDraft { draft_id }) => Some(draft_id),
            _ => None,
        }
    }

    pub fn rolled_back_from_version_id(origin: Option<Self>) -> Option<DbId> {
        match origin {
            Some(Self::RolledBackFromVersion { version_id }) => Some(version_id),
            _ => None,
        }
    }

    /// Rebuild an origin from its two nullable storage columns.
    ///
    /// The columns are guarded by a CHECK constraint, so both being set means
    /// the row was written outside this crate.
    pub fn from_columns(
        published_from_draft_id: Option<DbId>,
        rolled_back_from_version_id: Option<DbId>,
    ) -> Result<Option<Self>, CoreError> {
        match (published_from_draft_id, rolled_back_from_version_id) {
            (None, None) => Ok(None),
            (Some(draft_id), None) => Ok(Some(Self::PublishedFromDraft { draft_id })),
            (None, Some(version_id)) => Ok(Some(Self::RolledBackFromVersion { version_id })),
            (Some(draft_id), Some(version_id)) => Err(CoreError::Internal(format!(
                "version has two origins (draft {draft_id}, version {version_id})"
            ))),
        }
    }
}

/// An immutable entry in a project's version log.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedVersion {
    pub id: DbId,
    pub project_id: DbId,
    pub version_number: i32,
    pub content: DraftContent,
    pub origin: Option<VersionOrigin>,
    pub published_at: Timestamp,
}

impl PublishedVersion {
    pub fn summary(&self) -> VersionSummary {
        VersionSummary {
            version_id: self.id,
            version_number: self.version_number,
            published_from_draft_id: VersionOrigin::published_from_draft_id(self.origin),
            rolled_back_from_version_id: VersionOrigin::rolled_back_from_version_id(self.origin),
            published_at: self.published_at,
        }
    }

    pub fn detail(&self) -> VersionDetail {
        VersionDetail {
            project_id: self.project_id,
            summary: self.summary(),
            content: self.content.clone(),
        }
    }
}

/// One line of a version history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionSummary {
    pub version_id: DbId,
    pub version_number: i32,
    pub published_from_draft_id: Option<DbId>,
    pub rolled_back_from_version_id: Option<DbId>,
    pub published_at: Timestamp,
}

/// A single version including its frozen content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionDetail {
    pub project_id: DbId,
    #[serde(flatten)]
    pub summary: VersionSummary,
    #[serde(flatten)]
    pub content: DraftContent,
}

/// Derived view over a project's version log, most recent first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionHistory {
    pub project_id: DbId,
    /// `None` iff the log is empty.
    pub latest_version_number: Option<i32>,
    pub versions: Vec<VersionSummary>,
}

impl VersionHistory {
    pub fn empty(project_id: DbId) -> Self {
        Self {
            project_id,
            latest_version_number: None,
            versions: Vec::new(),
        }
    }

    /// Build the history view from log entries in any order.
    pub fn from_versions<'a>(
        project_id: DbId,
        versions: impl IntoIterator<Item = &'a PublishedVersion>,
    ) -> Self {
        let mut versions: Vec<VersionSummary> =
            versions.into_iter().map(PublishedVersion::summary).collect();
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));

        Self {
            project_id,
            latest_version_number: versions.first().map(|v| v.version_number),
            versions,
        }
    }
}

/// Version numbers start at 1 and advance by exactly one per append.
pub fn next_version_number(last: Option<i32>) -> i32 {
    last.map_or(1, |n| n + 1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
