//! Error types for `candidacy-core`.

use thiserror::Error;

use crate::{
  candidate::CandidateId, status::Status, user::UserId, validate::ValidationErrors,
};

#[derive(Debug, Error)]
pub enum Error {
  /// The operation requires an active candidate. No state was changed.
  #[error("candidate {candidate_id} is not active (status: {status})")]
  Inactive {
    candidate_id: CandidateId,
    status:       Status,
  },

  /// The user already likes this candidate. No state was changed.
  #[error("candidate {candidate_id} is already liked by user {user}")]
  DuplicateLike {
    candidate_id: CandidateId,
    user:         UserId,
  },

  #[error("candidate not found: {0}")]
  NotFound(CandidateId),

  /// The store failed to record a mutation. The in-memory candidate is ahead
  /// of the stored one; re-load before deciding what happened.
  #[error("persistence error: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error(transparent)]
  Validation(#[from] ValidationErrors),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  pub(crate) fn persistence<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Persistence(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
