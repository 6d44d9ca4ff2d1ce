//! The candidate aggregate and its operations.
//!
//! A candidate owns its likes. Status is derived from `locked_at` and
//! `hidden_at` on every read (see [`crate::status`]), and every mutating
//! operation is check, mutate, then persist through an explicitly supplied
//! [`CandidateStore`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  like::Like,
  projection::Projection,
  status::{Status, is_effective},
  store::CandidateStore,
  user::{UserId, UserRef},
  validate::{Collector, ValidationErrors},
};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Stable external identifier of a candidate, distinct from the store's own
/// primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl CandidateId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for CandidateId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for CandidateId {
  fn from(id: &str) -> Self { Self(id.to_owned()) }
}

impl From<String> for CandidateId {
  fn from(id: String) -> Self { Self(id) }
}

/// Reference to a comment held elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub Uuid);

// ─── Value blocks ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub postal: Option<String>,
  pub email:  Option<String>,
  /// French mobile format.
  pub phone:  Option<String>,
}

/// Links to external profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
  pub facebook:  Option<String>,
  pub personal:  Option<String>,
  pub twitter:   Option<String>,
  pub wikipedia: Option<String>,
}

/// Free-form program statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramInfo {
  pub title: Option<String>,
  /// HTML; cleaned of scripts and unsafe markup before every write.
  pub body:  Option<String>,
}

impl ProgramInfo {
  /// Strip scripts, event handlers and unknown tags from `body`.
  pub fn sanitize(&mut self) {
    if let Some(body) = self.body.as_mut() {
      *body = ammonia::clean(body);
    }
  }
}

/// The field checks shared by new and stored candidates.
fn check_fields(
  c: &mut Collector,
  candidate_id: &CandidateId,
  first_name: &str,
  last_name: &str,
  contact: &Contact,
  links: &Links,
) {
  c.required("candidate_id", candidate_id.as_str());
  c.required("first_name", first_name);
  c.required("last_name", last_name);
  c.email("contact.email", contact.email.as_deref());
  c.phone("contact.phone", contact.phone.as_deref());
  c.url("links.facebook", links.facebook.as_deref());
  c.url("links.personal", links.personal.as_deref());
  c.url("links.twitter", links.twitter.as_deref());
  c.url("links.wikipedia", links.wikipedia.as_deref());
}

// ─── NewCandidate ────────────────────────────────────────────────────────────

/// Input to [`Candidate::create`]. The store assigns the internal id, the
/// bookkeeping timestamps and the version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCandidate {
  pub candidate_id:           CandidateId,
  pub first_name:             String,
  pub last_name:              String,
  #[serde(default)]
  pub contact:                Contact,
  #[serde(default)]
  pub links:                  Links,
  #[serde(default)]
  pub program_info:           Option<ProgramInfo>,
  #[serde(default)]
  pub nominator_user:         Option<UserId>,
  #[serde(default)]
  pub own_user:               Option<UserId>,
  #[serde(default)]
  pub accepted_nomination_at: Option<DateTime<Utc>>,
}

impl NewCandidate {
  /// Convenience constructor with every optional block left empty.
  pub fn new(
    candidate_id: impl Into<CandidateId>,
    first_name: impl Into<String>,
    last_name: impl Into<String>,
  ) -> Self {
    Self {
      candidate_id:           candidate_id.into(),
      first_name:             first_name.into(),
      last_name:              last_name.into(),
      contact:                Contact::default(),
      links:                  Links::default(),
      program_info:           None,
      nominator_user:         None,
      own_user:               None,
      accepted_nomination_at: None,
    }
  }

  /// Check every field, reporting all failures at once.
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut c = Collector::default();
    check_fields(
      &mut c,
      &self.candidate_id,
      &self.first_name,
      &self.last_name,
      &self.contact,
      &self.links,
    );
    c.finish()
  }
}

// ─── Candidate ───────────────────────────────────────────────────────────────

/// A nominated person who can be liked by users.
///
/// `Candidate` has no derived `Serialize`: its [`Serialize`] impl goes through
/// [`Projection`], so individual likes never leave the process and a hidden
/// candidate serialises to the minimal stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
  /// Store-assigned primary key.
  pub id:                     Uuid,
  pub candidate_id:           CandidateId,
  pub first_name:             String,
  pub last_name:              String,
  pub contact:                Contact,
  pub links:                  Links,
  pub program_info:           Option<ProgramInfo>,
  pub nominator_user:         Option<UserId>,
  pub own_user:               Option<UserId>,
  pub accepted_nomination_at: Option<DateTime<Utc>>,
  pub locked_at:              Option<DateTime<Utc>>,
  pub hidden_at:              Option<DateTime<Utc>>,
  /// In like order.
  pub likes:                  Vec<Like>,
  pub comments:               Vec<CommentId>,
  pub created_at:             DateTime<Utc>,
  pub updated_at:             DateTime<Utc>,
  /// Optimistic concurrency token; bumped by the store on every save.
  pub version:                u64,
}

impl Candidate {
  // ── Loading ───────────────────────────────────────────────────────────────

  /// Validate `input` and insert it through `store`.
  #[instrument(name = "candidate.create", skip_all, fields(candidate_id = %input.candidate_id))]
  pub async fn create<S: CandidateStore>(store: &S, mut input: NewCandidate) -> Result<Self> {
    input.validate()?;
    if let Some(info) = input.program_info.as_mut() {
      info.sanitize();
    }
    let candidate = store.insert(input).await.map_err(|e| {
      warn!(error = %e, "insert failed");
      Error::persistence(e)
    })?;
    info!(id = %candidate.id, "candidate created");
    Ok(candidate)
  }

  /// Load a candidate, mapping a missing record to [`Error::NotFound`].
  pub async fn load<S: CandidateStore>(store: &S, candidate_id: &CandidateId) -> Result<Self> {
    store
      .load(candidate_id)
      .await
      .map_err(Error::persistence)?
      .ok_or_else(|| Error::NotFound(candidate_id.clone()))
  }

  /// Re-run the field checks of [`NewCandidate::validate`] on the current
  /// state. Every save goes through this.
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut c = Collector::default();
    check_fields(
      &mut c,
      &self.candidate_id,
      &self.first_name,
      &self.last_name,
      &self.contact,
      &self.links,
    );
    c.finish()
  }

  // ── Derived state ─────────────────────────────────────────────────────────

  pub fn status_at(&self, now: DateTime<Utc>) -> Status {
    Status::at(self.locked_at, self.hidden_at, now)
  }

  pub fn status(&self) -> Status { self.status_at(Utc::now()) }

  pub fn is_active(&self) -> bool { self.status().is_active() }

  pub fn is_locked(&self) -> bool { self.status().is_locked() }

  pub fn is_hidden(&self) -> bool { self.status().is_hidden() }

  /// `false` while hidden; otherwise whether `accepted_nomination_at` has
  /// been reached.
  pub fn accepted_nomination_at_time(&self, now: DateTime<Utc>) -> bool {
    !self.status_at(now).is_hidden() && is_effective(self.accepted_nomination_at, now)
  }

  pub fn accepted_nomination(&self) -> bool { self.accepted_nomination_at_time(Utc::now()) }

  /// Empty while hidden.
  pub fn full_name_at(&self, now: DateTime<Utc>) -> String {
    if self.status_at(now).is_hidden() {
      return String::new();
    }
    format!("{} {}", self.first_name, self.last_name)
  }

  pub fn full_name(&self) -> String { self.full_name_at(Utc::now()) }

  /// Zero while hidden.
  pub fn num_likes_at(&self, now: DateTime<Utc>) -> usize {
    if self.status_at(now).is_hidden() {
      return 0;
    }
    self.likes.len()
  }

  pub fn num_likes(&self) -> usize { self.num_likes_at(Utc::now()) }

  /// Whether `user` has exactly one like on this candidate. Always `false`
  /// for an absent user or a hidden candidate.
  pub fn liked_by_at<U: UserRef>(&self, user: Option<&U>, now: DateTime<Utc>) -> bool {
    let Some(user) = user else { return false };
    if self.status_at(now).is_hidden() {
      return false;
    }
    self.likes.iter().filter(|like| like.is_by(user)).count() == 1
  }

  pub fn liked_by<U: UserRef>(&self, user: Option<&U>) -> bool {
    self.liked_by_at(user, Utc::now())
  }

  /// The external view of this candidate as of `now`.
  pub fn projection_at(&self, now: DateTime<Utc>) -> Projection<'_> { Projection::of(self, now) }

  pub fn projection(&self) -> Projection<'_> { self.projection_at(Utc::now()) }

  // ── Likes ─────────────────────────────────────────────────────────────────

  /// Record a like by `user` and persist.
  #[instrument(name = "candidate.like", skip_all, fields(candidate_id = %self.candidate_id, user = %user.user_id()))]
  pub async fn like<S, U>(&mut self, store: &S, user: &U) -> Result<()>
  where
    S: CandidateStore,
    U: UserRef,
  {
    let now = Utc::now();
    self.ensure_active(now)?;
    if self.liked_by_at(Some(user), now) {
      debug!("refusing duplicate like");
      return Err(Error::DuplicateLike {
        candidate_id: self.candidate_id.clone(),
        user:         user.user_id(),
      });
    }

    self.likes.push(Like::new(user, now));
    self.persist(store).await?;
    info!(num_likes = self.likes.len(), "like recorded");
    Ok(())
  }

  /// Remove every like by `user` and persist. Removing nothing is not an
  /// error.
  #[instrument(name = "candidate.unlike", skip_all, fields(candidate_id = %self.candidate_id, user = %user.user_id()))]
  pub async fn unlike<S, U>(&mut self, store: &S, user: &U) -> Result<()>
  where
    S: CandidateStore,
    U: UserRef,
  {
    self.ensure_active(Utc::now())?;

    let before = self.likes.len();
    self.likes.retain(|like| !like.is_by(user));
    let removed = before - self.likes.len();

    self.persist(store).await?;
    info!(removed, num_likes = self.likes.len(), "likes removed");
    Ok(())
  }

  // ── Operator actions ──────────────────────────────────────────────────────

  /// Lock from now on. Re-locking refreshes the timestamp.
  #[instrument(name = "candidate.lock", skip_all, fields(candidate_id = %self.candidate_id))]
  pub async fn lock<S: CandidateStore>(&mut self, store: &S) -> Result<()> {
    self.locked_at = Some(Utc::now());
    self.persist(store).await?;
    info!("candidate locked");
    Ok(())
  }

  #[instrument(name = "candidate.unlock", skip_all, fields(candidate_id = %self.candidate_id))]
  pub async fn unlock<S: CandidateStore>(&mut self, store: &S) -> Result<()> {
    self.locked_at = None;
    self.persist(store).await?;
    info!("candidate unlocked");
    Ok(())
  }

  /// Hide from now on.
  #[instrument(name = "candidate.hide", skip_all, fields(candidate_id = %self.candidate_id))]
  pub async fn hide<S: CandidateStore>(&mut self, store: &S) -> Result<()> {
    self.hidden_at = Some(Utc::now());
    self.persist(store).await?;
    info!("candidate hidden");
    Ok(())
  }

  #[instrument(name = "candidate.unhide", skip_all, fields(candidate_id = %self.candidate_id))]
  pub async fn unhide<S: CandidateStore>(&mut self, store: &S) -> Result<()> {
    self.hidden_at = None;
    self.persist(store).await?;
    info!("candidate unhidden");
    Ok(())
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  fn ensure_active(&self, now: DateTime<Utc>) -> Result<()> {
    let status = self.status_at(now);
    if status.is_active() {
      return Ok(());
    }
    debug!(%status, "refusing operation on inactive candidate");
    Err(Error::Inactive { candidate_id: self.candidate_id.clone(), status })
  }

  /// Validate, then save through `store`. On success `self` becomes the
  /// stored record; on failure the in-memory mutation is kept and nothing
  /// reaches the store.
  async fn persist<S: CandidateStore>(&mut self, store: &S) -> Result<()> {
    if let Err(errors) = self.validate() {
      debug!(%errors, "refusing to save invalid fields");
      return Err(errors.into());
    }
    if let Some(info) = self.program_info.as_mut() {
      info.sanitize();
    }
    let saved = store.save(self).await;
    match saved {
      Ok(saved) => {
        *self = saved;
        Ok(())
      }
      Err(e) => {
        warn!(error = %e, version = self.version, "save failed");
        Err(Error::persistence(e))
      }
    }
  }
}

impl Serialize for Candidate {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    self.projection().serialize(serializer)
  }
}
