//! Integration tests for `VersionRepo` and `PgVersionLog` against a real
//! database:
//! - version numbers start at 1 and are scoped per project
//! - concurrent appends produce a gapless, unique run
//! - versions reject UPDATE / DELETE
//! - publish + rollback through the Postgres stores
//!
//! These need a running PostgreSQL reachable via `DATABASE_URL`; run them with
//! `cargo test -p wikidraft-db -- --ignored`.

use assert_matches::assert_matches;
use serde_json::json;
use sqlx::PgPool;
use wikidraft_core::content::DraftContent;
use wikidraft_core::coordinator;
use wikidraft_core::error::CoreError;
use wikidraft_core::store::{DraftStore, VersionLog};
use wikidraft_db::repositories::VersionRepo;
use wikidraft_db::store::{PgDraftStore, PgVersionLog};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn content(body: &str) -> DraftContent {
    DraftContent::from_value(&json!({
        "sections": [{"id": "main", "body": body}],
        "counters": {"words": 2},
        "hidden_section_ids": ["draft-notes"]
    }))
    .unwrap()
}

// ---------------------------------------------------------------------------
// Numbering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_numbering_is_per_project(pool: PgPool) {
    let log = PgVersionLog::new(pool.clone());

    let a1 = log.append(1, content("a"), None).await.unwrap();
    let b1 = log.append(2, content("b"), None).await.unwrap();
    let a2 = log.append(1, content("c"), None).await.unwrap();

    assert_eq!(a1.version.version_number, 1);
    assert_eq!(b1.version.version_number, 1);
    assert_eq!(a2.version.version_number, 2);
    assert_eq!(a2.history.latest_version_number, Some(2));
    assert_eq!(
        VersionRepo::last_version_number(&pool, 1).await.unwrap(),
        Some(2)
    );
    assert_eq!(VersionRepo::last_version_number(&pool, 3).await.unwrap(), None);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_empty_history(pool: PgPool) {
    let log = PgVersionLog::new(pool);
    let history = log.history(42).await.unwrap();

    assert_eq!(history.latest_version_number, None);
    assert!(history.versions.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_concurrent_appends_are_gapless(pool: PgPool) {
    let handles: Vec<_> = (0..20)
        .map(|i| {
            let log = PgVersionLog::new(pool.clone());
            tokio::spawn(async move {
                log.append(7, content(&format!("v{i}")), None)
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

    assert_eq!(numbers, (1..=20).collect::<Vec<_>>());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_versions_are_immutable(pool: PgPool) {
    let log = PgVersionLog::new(pool.clone());
    log.append(1, content("frozen"), None).await.unwrap();

    let update = sqlx::query("UPDATE published_versions SET sections = '[]'::jsonb")
        .execute(&pool)
        .await;
    assert!(update.is_err());

    let delete = sqlx::query("DELETE FROM published_versions")
        .execute(&pool)
        .await;
    assert!(delete.is_err());

    assert_eq!(log.get_version(1, 1).await.unwrap().content, content("frozen"));
}

// ---------------------------------------------------------------------------
// Drafts + coordinators
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_draft_replace_and_list(pool: PgPool) {
    let drafts = PgDraftStore::new(pool);

    let first = drafts.create(1, content("one"), None).await.unwrap();
    let second = drafts.create(1, content("two"), None).await.unwrap();
    let updated = drafts
        .replace_content(1, first.id, content("one-b"))
        .await
        .unwrap();

    assert_eq!(updated.content, content("one-b"));
    assert!(updated.updated_at >= first.updated_at);

    let listed: Vec<_> = drafts.list(1).await.unwrap().iter().map(|d| d.id).collect();
    assert_eq!(listed[0], first.id);
    assert!(listed.contains(&second.id));

    assert_matches!(
        drafts.get(2, first.id).await,
        Err(CoreError::NotFound { entity: "Draft", .. })
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_publish_and_rollback(pool: PgPool) {
    let drafts = PgDraftStore::new(pool.clone());
    let versions = PgVersionLog::new(pool);

    coordinator::seed(&versions, 1, content("seed")).await.unwrap();
    let seed_id = versions.get_version(1, 1).await.unwrap().id;

    let draft = drafts.create(1, content("draft"), None).await.unwrap();
    let history = coordinator::publish(&drafts, &versions, 1, draft.id)
        .await
        .unwrap();
    assert_eq!(history.latest_version_number, Some(2));
    assert_eq!(history.versions[0].published_from_draft_id, Some(draft.id));

    drafts
        .replace_content(1, draft.id, content("edited"))
        .await
        .unwrap();
    assert_eq!(
        versions.get_version(1, 2).await.unwrap().content,
        content("draft")
    );

    let history = coordinator::rollback(&versions, 1, 1).await.unwrap();
    assert_eq!(history.latest_version_number, Some(3));
    assert_eq!(history.versions[0].rolled_back_from_version_id, Some(seed_id));
    assert_eq!(
        versions.get_version(1, 3).await.unwrap().content,
        content("seed")
    );
}
