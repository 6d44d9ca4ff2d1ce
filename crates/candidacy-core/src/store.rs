//! The `CandidateStore` trait.
//!
//! Implemented by storage backends (e.g. `candidacy-store-sqlite`). Candidate
//! operations take the store as an explicit argument; nothing in this crate
//! looks one up on its own.

use std::future::Future;

use crate::{
  candidate::{Candidate, CandidateId, NewCandidate},
  like::Like,
  user::UserId,
};

/// Abstraction over a candidate store backend.
///
/// `save` is the serialisation point for concurrent writers: it must only
/// succeed when the stored record is still at `candidate.version`, and must
/// bump the version when it does. A stale save is reported as an error.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes.
pub trait CandidateStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new candidate. The store assigns the internal id, the
  /// timestamps and the initial version.
  fn insert(
    &self,
    input: NewCandidate,
  ) -> impl Future<Output = Result<Candidate, Self::Error>> + Send + '_;

  /// Retrieve a candidate with its likes in like order. Returns `None` if not
  /// found.
  fn load<'a>(
    &'a self,
    candidate_id: &'a CandidateId,
  ) -> impl Future<Output = Result<Option<Candidate>, Self::Error>> + Send + 'a;

  /// Write `candidate` back, including added and removed likes, and return
  /// the stored record with its new version and `updated_at`.
  fn save<'a>(
    &'a self,
    candidate: &'a Candidate,
  ) -> impl Future<Output = Result<Candidate, Self::Error>> + Send + 'a;

  /// The like `user` holds on a candidate, if any.
  fn find_like<'a>(
    &'a self,
    candidate_id: &'a CandidateId,
    user: UserId,
  ) -> impl Future<Output = Result<Option<Like>, Self::Error>> + Send + 'a;

  /// Every candidate, newest first.
  fn list(&self) -> impl Future<Output = Result<Vec<Candidate>, Self::Error>> + Send + '_;
}
