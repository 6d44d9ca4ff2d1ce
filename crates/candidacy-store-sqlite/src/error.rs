//! Error type for `candidacy-store-sqlite`.

use candidacy_core::candidate::CandidateId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("candidate already exists: {0}")]
  CandidateExists(CandidateId),

  #[error("candidate not found: {0}")]
  CandidateNotFound(CandidateId),

  /// The stored record moved past the version the caller loaded.
  #[error("candidate {candidate_id} was modified concurrently (expected version {expected})")]
  VersionConflict {
    candidate_id: CandidateId,
    expected:     u64,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
