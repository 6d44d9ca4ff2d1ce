//! Integration tests for `SqliteStore` against an in-memory database.

use candidacy_core::{
  Error as CoreError,
  candidate::{Candidate, CandidateId, NewCandidate, ProgramInfo},
  like::Like,
  status::Status,
  store::CandidateStore,
  user::UserId,
};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn marianne() -> NewCandidate {
  let mut input = NewCandidate::new("c-1", "Marianne", "Dupont");
  input.contact.email = Some("marianne@example.fr".into());
  input.contact.phone = Some("06 12 34 56 78".into());
  input.links.wikipedia = Some("https://fr.wikipedia.org/wiki/Marianne".into());
  input.program_info = Some(ProgramInfo {
    title: Some("Programme".into()),
    body:  Some("Liberté, égalité, fraternité".into()),
  });
  input.nominator_user = Some(user());
  input
}

fn user() -> UserId { UserId::new(Uuid::new_v4()) }

async fn seeded(s: &SqliteStore) -> Candidate {
  Candidate::create(s, marianne()).await.unwrap()
}

// ─── Insert / load ───────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_load_roundtrip() {
  let s = store().await;
  let created = seeded(&s).await;
  assert_eq!(created.version, 0);

  let loaded = s.load(&created.candidate_id).await.unwrap().unwrap();
  assert_eq!(loaded, created);
  assert_eq!(loaded.status(), Status::Active);
}

#[tokio::test]
async fn load_missing_returns_none() {
  let s = store().await;
  let result = s.load(&CandidateId::new("nobody")).await.unwrap();
  assert!(result.is_none());

  let err = Candidate::load(&s, &CandidateId::new("nobody")).await.unwrap_err();
  assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_candidate_id_is_rejected() {
  let s = store().await;
  seeded(&s).await;

  let err = s.insert(marianne()).await.unwrap_err();
  assert!(matches!(err, crate::Error::CandidateExists(_)));
}

#[tokio::test]
async fn list_returns_every_candidate() {
  let s = store().await;
  seeded(&s).await;
  Candidate::create(&s, NewCandidate::new("c-2", "Jean", "Moulin"))
    .await
    .unwrap();

  let all = s.list().await.unwrap();
  assert_eq!(all.len(), 2);
}

// ─── Likes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn likes_persist_in_order() {
  let s = store().await;
  let mut c = seeded(&s).await;
  let users = [user(), user(), user()];
  for u in &users {
    c.like(&s, u).await.unwrap();
  }
  assert_eq!(c.version, 3);

  let loaded = Candidate::load(&s, &c.candidate_id).await.unwrap();
  let order: Vec<UserId> = loaded.likes.iter().map(|l| l.user).collect();
  assert_eq!(order, users);
  assert_eq!(loaded.num_likes(), 3);
}

#[tokio::test]
async fn like_then_unlike_restores_count() {
  let s = store().await;
  let mut c = seeded(&s).await;
  let u = user();

  c.like(&s, &u).await.unwrap();
  assert!(s.find_like(&c.candidate_id, u).await.unwrap().is_some());

  c.unlike(&s, &u).await.unwrap();
  assert!(s.find_like(&c.candidate_id, u).await.unwrap().is_none());

  let loaded = Candidate::load(&s, &c.candidate_id).await.unwrap();
  assert_eq!(loaded.num_likes(), 0);
  assert!(!loaded.liked_by(Some(&u)));
}

#[tokio::test]
async fn second_like_is_refused_and_not_stored() {
  let s = store().await;
  let mut c = seeded(&s).await;
  let u = user();

  c.like(&s, &u).await.unwrap();
  let err = c.like(&s, &u).await.unwrap_err();
  assert!(matches!(err, CoreError::DuplicateLike { .. }));

  let loaded = Candidate::load(&s, &c.candidate_id).await.unwrap();
  assert_eq!(loaded.likes.len(), 1);
}

#[tokio::test]
async fn unlike_only_removes_that_users_record() {
  let s = store().await;
  let mut c = seeded(&s).await;
  let (a, b) = (user(), user());
  c.like(&s, &a).await.unwrap();
  c.like(&s, &b).await.unwrap();
  let b_like = s.find_like(&c.candidate_id, b).await.unwrap().unwrap();

  c.unlike(&s, &a).await.unwrap();

  let loaded = Candidate::load(&s, &c.candidate_id).await.unwrap();
  assert_eq!(loaded.likes, vec![b_like]);
}

#[tokio::test]
async fn unique_pair_backstops_a_bypassed_duplicate() {
  let s = store().await;
  let mut c = seeded(&s).await;
  let u = user();
  c.like(&s, &u).await.unwrap();

  // Bypass the in-memory guard entirely.
  c.likes.push(Like::new(u, Utc::now()));
  let err = s.save(&c).await.unwrap_err();
  assert!(matches!(err, crate::Error::Database(_)));

  let loaded = Candidate::load(&s, &c.candidate_id).await.unwrap();
  assert_eq!(loaded.likes.len(), 1);
  assert_eq!(loaded.version, 1);
}

#[tokio::test]
async fn invalid_contact_never_reaches_the_database() {
  let s = store().await;
  let mut c = seeded(&s).await;
  c.contact.email = Some("not-an-email".into());

  let err = c.lock(&s).await.unwrap_err();
  assert!(matches!(err, CoreError::Validation(ref e) if e.contains("contact.email")));

  let loaded = Candidate::load(&s, &c.candidate_id).await.unwrap();
  assert_eq!(loaded.contact.email.as_deref(), Some("marianne@example.fr"));
  assert!(loaded.locked_at.is_none());
  assert_eq!(loaded.version, 0);
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_likes_by_same_user_store_one() {
  let s = store().await;
  let c = seeded(&s).await;
  let u = user();

  let mut a = Candidate::load(&s, &c.candidate_id).await.unwrap();
  let mut b = Candidate::load(&s, &c.candidate_id).await.unwrap();

  let (ra, rb) = tokio::join!(a.like(&s, &u), b.like(&s, &u));
  assert_eq!(ra.is_ok() as u8 + rb.is_ok() as u8, 1);
  let failed = if ra.is_err() { ra } else { rb };
  assert!(matches!(failed, Err(CoreError::Persistence(_))));

  let loaded = Candidate::load(&s, &c.candidate_id).await.unwrap();
  assert_eq!(loaded.likes.len(), 1);
  assert_eq!(loaded.version, 1);
}

#[tokio::test]
async fn stale_save_is_a_version_conflict() {
  let s = store().await;
  let c = seeded(&s).await;
  let mut fresh = c.clone();
  fresh.lock(&s).await.unwrap();

  let err = s.save(&c).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::VersionConflict { expected: 0, .. }
  ));
}

#[tokio::test]
async fn saving_an_unknown_candidate_is_not_found() {
  let s = store().await;
  let mut c = seeded(&s).await;
  c.id = Uuid::new_v4();

  let err = s.save(&c).await.unwrap_err();
  assert!(matches!(err, crate::Error::CandidateNotFound(_)));
}

// ─── Lock / hide ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn lock_unlock_persist() {
  let s = store().await;
  let mut c = seeded(&s).await;

  c.lock(&s).await.unwrap();
  let loaded = Candidate::load(&s, &c.candidate_id).await.unwrap();
  assert_eq!(loaded.locked_at, c.locked_at);
  assert_eq!(loaded.status(), Status::Locked);

  let err = c.clone().like(&s, &user()).await.unwrap_err();
  assert!(matches!(err, CoreError::Inactive { .. }));

  c.unlock(&s).await.unwrap();
  let loaded = Candidate::load(&s, &c.candidate_id).await.unwrap();
  assert!(loaded.locked_at.is_none());
  assert!(loaded.is_active());
}

#[tokio::test]
async fn scheduled_lock_survives_storage_and_stays_inert() {
  let s = store().await;
  let mut c = seeded(&s).await;
  c.locked_at = Some(Utc::now() + Duration::days(1));
  let saved = s.save(&c).await.unwrap();

  let loaded = Candidate::load(&s, &saved.candidate_id).await.unwrap();
  assert_eq!(loaded.status(), Status::Active);
  assert_eq!(loaded.status_at(Utc::now() + Duration::days(2)), Status::Locked);
}

#[tokio::test]
async fn hidden_candidate_projects_to_stub() {
  let s = store().await;
  let mut c = seeded(&s).await;
  c.like(&s, &user()).await.unwrap();
  c.like(&s, &user()).await.unwrap();
  c.hide(&s).await.unwrap();

  let loaded = Candidate::load(&s, &c.candidate_id).await.unwrap();
  assert_eq!(
    loaded.projection().to_value().unwrap(),
    json!({ "status": "hidden", "hidden": true })
  );
  assert_eq!(
    loaded.projection().to_json().unwrap(),
    r#"{"status":"hidden","hidden":true}"#
  );

  // Likes are kept underneath and come back on unhide.
  c.unhide(&s).await.unwrap();
  let loaded = Candidate::load(&s, &c.candidate_id).await.unwrap();
  assert_eq!(loaded.num_likes(), 2);
}

#[tokio::test]
async fn active_projection_has_count_only() {
  let s = store().await;
  let mut c = seeded(&s).await;
  for _ in 0..3 {
    c.like(&s, &user()).await.unwrap();
  }

  let loaded = Candidate::load(&s, &c.candidate_id).await.unwrap();
  let value = serde_json::to_value(&loaded).unwrap();
  assert_eq!(value["num_likes"], json!(3));
  assert!(value.get("likes").is_none());
  assert_eq!(value["full_name"], json!("Marianne Dupont"));
  assert_eq!(value["program_info"]["title"], json!("Programme"));
}
