//! In-memory implementations of [`DraftStore`] and [`VersionLog`].
//!
//! Used when no database is configured and by the HTTP integration tests.
//! The version log keeps one sequence state per project behind its own
//! mutex; that mutex is the serialization point for version-number
//! allocation. Drafts take no per-draft lock beyond the map itself.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use crate::content::DraftContent;
use crate::draft::{sort_recent_first, Draft};
use crate::error::CoreError;
use crate::store::{Appended, DraftStore, VersionLog};
use crate::types::{DbId, Timestamp};
use crate::version::{next_version_number, PublishedVersion, VersionHistory, VersionOrigin};

/// Keep `updated_at` non-decreasing even if the wall clock steps backwards.
fn advance(previous: Timestamp) -> Timestamp {
    Utc::now().max(previous)
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

/// Drafts keyed by `(project_id, draft_id)`.
pub struct InMemoryDraftStore {
    next_id: AtomicI64,
    drafts: RwLock<HashMap<(DbId, DbId), Draft>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Start id allocation at `first_id` (handy for fixtures that expect
    /// specific draft ids).
    pub fn starting_at(first_id: DbId) -> Self {
        Self {
            next_id: AtomicI64::new(first_id),
            drafts: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryDraftStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn create(
        &self,
        project_id: DbId,
        content: DraftContent,
        version_id: Option<DbId>,
    ) -> Result<Draft, CoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let draft = Draft {
            id,
            project_id,
            content,
            version_id,
            created_at: now,
            updated_at: now,
        };

        self.drafts
            .write()
            .await
            .insert((project_id, id), draft.clone());
        Ok(draft)
    }

    async fn get(&self, project_id: DbId, draft_id: DbId) -> Result<Draft, CoreError> {
        self.drafts
            .read()
            .await
            .get(&(project_id, draft_id))
            .cloned()
            .ok_or_else(|| CoreError::draft_not_found(draft_id))
    }

    async fn list(&self, project_id: DbId) -> Result<Vec<Draft>, CoreError> {
        let mut drafts: Vec<Draft> = self
            .drafts
            .read()
            .await
            .values()
            .filter(|d| d.project_id == project_id)
            .cloned()
            .collect();
        sort_recent_first(&mut drafts);
        Ok(drafts)
    }

    async fn replace_content(
        &self,
        project_id: DbId,
        draft_id: DbId,
        content: DraftContent,
    ) -> Result<Draft, CoreError> {
        let mut drafts = self.drafts.write().await;
        let draft = drafts
            .get_mut(&(project_id, draft_id))
            .ok_or_else(|| CoreError::draft_not_found(draft_id))?;

        draft.content = content;
        draft.updated_at = advance(draft.updated_at);
        Ok(draft.clone())
    }

    async fn set_version(
        &self,
        project_id: DbId,
        draft_id: DbId,
        version_id: DbId,
    ) -> Result<Draft, CoreError> {
        let mut drafts = self.drafts.write().await;
        let draft = drafts
            .get_mut(&(project_id, draft_id))
            .ok_or_else(|| CoreError::draft_not_found(draft_id))?;

        draft.version_id = Some(version_id);
        draft.updated_at = advance(draft.updated_at);
        Ok(draft.clone())
    }
}

// ---------------------------------------------------------------------------
// Version log
// ---------------------------------------------------------------------------

/// Sequence state and entries for one project.
#[derive(Default)]
struct ProjectLog {
    last_version: Option<i32>,
    entries: Vec<PublishedVersion>,
}

/// Per-project version ledgers. Version ids are global across projects.
pub struct InMemoryVersionLog {
    next_id: AtomicI64,
    projects: RwLock<HashMap<DbId, Arc<Mutex<ProjectLog>>>>,
}

impl InMemoryVersionLog {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            projects: RwLock::new(HashMap::new()),
        }
    }

    async fn existing(&self, project_id: DbId) -> Option<Arc<Mutex<ProjectLog>>> {
        self.projects.read().await.get(&project_id).cloned()
    }

    async fn get_or_create(&self, project_id: DbId) -> Arc<Mutex<ProjectLog>> {
        if let Some(log) = self.existing(project_id).await {
            return log;
        }
        Arc::clone(self.projects.write().await.entry(project_id).or_default())
    }
}

impl Default for InMemoryVersionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VersionLog for InMemoryVersionLog {
    async fn append(
        &self,
        project_id: DbId,
        content: DraftContent,
        origin: Option<VersionOrigin>,
    ) -> Result<Appended, CoreError> {
        let log = self.get_or_create(project_id).await;
        let mut log = log.lock().await;

        let version_number = next_version_number(log.last_version);
        let version = PublishedVersion {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            project_id,
            version_number,
            content,
            origin,
            published_at: Utc::now(),
        };

        log.last_version = Some(version_number);
        log.entries.push(version.clone());
        let history = VersionHistory::from_versions(project_id, &log.entries);

        Ok(Appended { version, history })
    }

    async fn history(&self, project_id: DbId) -> Result<VersionHistory, CoreError> {
        match self.existing(project_id).await {
            Some(log) => Ok(VersionHistory::from_versions(
                project_id,
                &log.lock().await.entries,
            )),
            None => Ok(VersionHistory::empty(project_id)),
        }
    }

    async fn get_version(
        &self,
        project_id: DbId,
        version_number: i32,
    ) -> Result<PublishedVersion, CoreError> {
        let log = self
            .existing(project_id)
            .await
            .ok_or_else(|| CoreError::version_not_found(version_number))?;
        let log = log.lock().await;

        log.entries
            .iter()
            .find(|v| v.version_number == version_number)
            .cloned()
            .ok_or_else(|| CoreError::version_not_found(version_number))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn content(body: &str) -> DraftContent {
        DraftContent::from_value(&json!({"sections": [{"id": "main", "body": body}]})).unwrap()
    }

    // -- drafts --------------------------------------------------------------

    #[tokio::test]
    async fn create_then_get() {
        let store = InMemoryDraftStore::new();
        let draft = store.create(1, content("a"), None).await.unwrap();

        assert_eq!(draft.created_at, draft.updated_at);
        assert_eq!(store.get(1, draft.id).await.unwrap(), draft);
    }

    #[tokio::test]
    async fn drafts_are_scoped_to_project() {
        let store = InMemoryDraftStore::new();
        let draft = store.create(1, content("a"), None).await.unwrap();

        assert_matches!(
            store.get(2, draft.id).await,
            Err(CoreError::NotFound { entity: "Draft", .. })
        );
        assert!(store.list(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_is_full_and_advances_updated_at() {
        let store = InMemoryDraftStore::new();
        let created = store
            .create(
                1,
                DraftContent::from_value(&json!({
                    "sections": [{"id": "a"}],
                    "counters": {"n": 1},
                    "hidden_section_ids": ["a"]
                }))
                .unwrap(),
                None,
            )
            .await
            .unwrap();

        let updated = store
            .replace_content(1, created.id, content("b"))
            .await
            .unwrap();

        assert_eq!(updated.content, content("b"));
        assert!(updated.content.counters.is_empty());
        assert!(updated.content.hidden_section_ids.is_empty());
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn replace_missing_draft_is_not_found() {
        let store = InMemoryDraftStore::new();
        assert_matches!(
            store.replace_content(1, 99, content("x")).await,
            Err(CoreError::NotFound { id: 99, .. })
        );
    }

    #[tokio::test]
    async fn list_is_most_recently_updated_first() {
        let store = InMemoryDraftStore::new();
        let first = store.create(1, content("1"), None).await.unwrap();
        let second = store.create(1, content("2"), None).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store
            .replace_content(1, first.id, content("1b"))
            .await
            .unwrap();

        let ids: Vec<_> = store.list(1).await.unwrap().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn starting_at_controls_first_id() {
        let store = InMemoryDraftStore::starting_at(101);
        let draft = store.create(1, DraftContent::default(), None).await.unwrap();
        assert_eq!(draft.id, 101);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_replaces_last_write_wins() {
        let store = Arc::new(InMemoryDraftStore::new());
        let id = store.create(1, content("base"), None).await.unwrap().id;

        let a = content("A");
        let b = content("B");
        let (ra, rb) = tokio::join!(
            {
                let store = Arc::clone(&store);
                let a = a.clone();
                tokio::spawn(async move { store.replace_content(1, id, a).await })
            },
            {
                let store = Arc::clone(&store);
                let b = b.clone();
                tokio::spawn(async move { store.replace_content(1, id, b).await })
            }
        );
        ra.unwrap().unwrap();
        rb.unwrap().unwrap();

        let stored = store.get(1, id).await.unwrap().content;
        assert!(stored == a || stored == b, "stored content must be exactly one write");
    }

    // -- version log ---------------------------------------------------------

    #[tokio::test]
    async fn empty_log_history() {
        let log = InMemoryVersionLog::new();
        let history = log.history(5).await.unwrap();
        assert_eq!(history.latest_version_number, None);
        assert!(history.versions.is_empty());
    }

    #[tokio::test]
    async fn append_numbers_from_one_per_project() {
        let log = InMemoryVersionLog::new();
        let a1 = log.append(1, content("a"), None).await.unwrap();
        let b1 = log.append(2, content("b"), None).await.unwrap();
        let a2 = log.append(1, content("c"), None).await.unwrap();

        assert_eq!(a1.version.version_number, 1);
        assert_eq!(b1.version.version_number, 1);
        assert_eq!(a2.version.version_number, 2);
        assert_ne!(a1.version.id, b1.version.id);
        assert_eq!(a2.history.latest_version_number, Some(2));
        assert_eq!(a2.history.versions.len(), 2);
    }

    #[tokio::test]
    async fn get_version_returns_frozen_content() {
        let log = InMemoryVersionLog::new();
        log.append(1, content("frozen"), None).await.unwrap();

        let v = log.get_version(1, 1).await.unwrap();
        assert_eq!(v.content, content("frozen"));
        assert_matches!(
            log.get_version(1, 2).await,
            Err(CoreError::NotFound { entity: "Version", id: 2 })
        );
        assert_matches!(
            log.get_version(7, 1).await,
            Err(CoreError::NotFound { .. })
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_are_gapless_and_unique() {
        let log = Arc::new(InMemoryVersionLog::new());

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    log.append(1, content(&i.to_string()), None)
                        .await
                        .map(|a| a.version.version_number)
                })
            })
            .collect();

        let mut numbers: Vec<i32> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap().unwrap())
            .collect();
        numbers.sort_unstable();

        assert_eq!(numbers, (1..=64).collect::<Vec<_>>());
        assert_eq!(log.history(1).await.unwrap().latest_version_number, Some(64));
    }
}
