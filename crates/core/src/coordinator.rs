//! Operations that span the draft store and the version log.
//!
//! Publish snapshots a draft into a new version, rollback snapshots an old
//! version into a new one, fork clones a version into a new draft, and
//! regenerate replaces a draft with generator output. None of these hold a
//! lock of their own: version numbering is serialized inside
//! [`VersionLog::append`], and draft writes are last-write-wins.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::content::DraftContent;
use crate::draft::Draft;
use crate::error::CoreError;
use crate::generator::{generate_bounded, ContentGenerator, GenerationRequest};
use crate::store::{DraftStore, VersionLog};
use crate::types::DbId;
use crate::version::{VersionHistory, VersionOrigin};

/// Default bound on a single generator call.
pub const DEFAULT_GENERATOR_TIMEOUT: Duration = Duration::from_secs(20);

/// Snapshot a draft's current content as the project's next version.
///
/// The draft stays editable; only its `version_id` is updated to point at
/// the new version.
pub async fn publish(
    drafts: &dyn DraftStore,
    versions: &dyn VersionLog,
    project_id: DbId,
    draft_id: DbId,
) -> Result<VersionHistory, CoreError> {
    let draft = drafts.get(project_id, draft_id).await?;

    let appended = versions
        .append(
            project_id,
            draft.content,
            Some(VersionOrigin::PublishedFromDraft { draft_id }),
        )
        .await?;

    // The version is already in the log at this point; failing to record it
    // on the draft must not turn a successful publish into an error.
    if let Err(e) = drafts
        .set_version(project_id, draft_id, appended.version.id)
        .await
    {
        tracing::warn!(
            project_id,
            draft_id,
            version_id = appended.version.id,
            error = %e,
            "Published version not recorded on draft"
        );
    }

    tracing::info!(
        project_id,
        draft_id,
        version_id = appended.version.id,
        version_number = appended.version.version_number,
        "Draft published"
    );

    Ok(appended.history)
}

/// Republish an existing version's content as a new, higher-numbered version.
///
/// History is never rewritten: rolling back to the same target twice appends
/// two entries.
pub async fn rollback(
    versions: &dyn VersionLog,
    project_id: DbId,
    target_version_number: i32,
) -> Result<VersionHistory, CoreError> {
    let target = versions.get_version(project_id, target_version_number).await?;

    let appended = versions
        .append(
            project_id,
            target.content,
            Some(VersionOrigin::RolledBackFromVersion {
                version_id: target.id,
            }),
        )
        .await?;

    tracing::info!(
        project_id,
        target_version_number,
        target_version_id = target.id,
        version_number = appended.version.version_number,
        "Version rolled back"
    );

    Ok(appended.history)
}

/// Append a version with no origin, e.g. to import existing page content.
pub async fn seed(
    versions: &dyn VersionLog,
    project_id: DbId,
    content: DraftContent,
) -> Result<VersionHistory, CoreError> {
    let appended = versions.append(project_id, content, None).await?;

    tracing::info!(
        project_id,
        version_id = appended.version.id,
        version_number = appended.version.version_number,
        "Version seeded"
    );

    Ok(appended.history)
}

/// Start a new draft from a published version's content.
pub async fn fork(
    drafts: &dyn DraftStore,
    versions: &dyn VersionLog,
    project_id: DbId,
    version_number: i32,
) -> Result<Draft, CoreError> {
    let version = versions.get_version(project_id, version_number).await?;
    let draft = drafts
        .create(project_id, version.content, Some(version.id))
        .await?;

    tracing::info!(
        project_id,
        draft_id = draft.id,
        version_number,
        "Draft forked from version"
    );

    Ok(draft)
}

/// Replace a draft's content with generator output seeded by `seed`.
///
/// The draft is only written after the generator has returned content, so a
/// timeout, cancellation or generator failure leaves it exactly as it was.
/// Persistence then behaves like a plain update (last-write-wins).
pub async fn regenerate(
    drafts: &dyn DraftStore,
    generator: &dyn ContentGenerator,
    project_id: DbId,
    draft_id: DbId,
    seed: DraftContent,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Draft, CoreError> {
    // Surface NotFound before spending a generator call.
    drafts.get(project_id, draft_id).await?;

    let request = GenerationRequest {
        project_id,
        draft_id,
        seed,
    };

    let content = match generate_bounded(generator, &request, timeout, cancel).await {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(project_id, draft_id, error = %e, "Draft regeneration failed");
            return Err(CoreError::Generator(e));
        }
    };

    let draft = drafts.replace_content(project_id, draft_id, content).await?;
    tracing::info!(project_id, draft_id, "Draft regenerated");
    Ok(draft)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
