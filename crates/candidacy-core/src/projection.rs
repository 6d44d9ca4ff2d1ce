//! The external view of a candidate.
//!
//! Anything that leaves the process goes through [`Projection`]. A hidden
//! candidate collapses to `{"status":"hidden","hidden":true}`; any other
//! candidate is shown in full with computed fields resolved, but only the
//! like count is exposed, never the individual likes.
//!
//! [`Projection::to_value`] and [`Projection::to_json`] both serialise the same
//! value, so the structured and textual forms cannot drift apart.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  Result,
  candidate::{Candidate, CandidateId, CommentId, Contact, Links, ProgramInfo},
  status::Status,
  user::UserId,
};

/// A candidate as it may be shown to a client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Projection<'a> {
  Hidden(HiddenStub),
  Visible(Box<PublicCandidate<'a>>),
}

/// The only fields a hidden candidate exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HiddenStub {
  pub status: Status,
  pub hidden: bool,
}

impl HiddenStub {
  const HIDDEN: Self = Self { status: Status::Hidden, hidden: true };
}

/// Every field of a visible candidate except its likes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicCandidate<'a> {
  pub id:                     Uuid,
  pub candidate_id:           &'a CandidateId,
  pub first_name:             &'a str,
  pub last_name:              &'a str,
  pub full_name:              String,
  pub contact:                &'a Contact,
  pub links:                  &'a Links,
  pub program_info:           Option<&'a ProgramInfo>,
  pub nominator_user:         Option<UserId>,
  pub own_user:               Option<UserId>,
  pub accepted_nomination_at: Option<DateTime<Utc>>,
  pub accepted_nomination:    bool,
  pub locked_at:              Option<DateTime<Utc>>,
  pub hidden_at:              Option<DateTime<Utc>>,
  pub status:                 Status,
  pub active:                 bool,
  pub locked:                 bool,
  pub hidden:                 bool,
  pub num_likes:              usize,
  pub comments:               &'a [CommentId],
  pub created_at:             DateTime<Utc>,
  pub updated_at:             DateTime<Utc>,
}

impl<'a> Projection<'a> {
  /// Apply the visibility rules to `candidate` as of `now`.
  pub fn of(candidate: &'a Candidate, now: DateTime<Utc>) -> Self {
    let status = candidate.status_at(now);
    if status.is_hidden() {
      return Self::Hidden(HiddenStub::HIDDEN);
    }

    Self::Visible(Box::new(PublicCandidate {
      id: candidate.id,
      candidate_id: &candidate.candidate_id,
      first_name: &candidate.first_name,
      last_name: &candidate.last_name,
      full_name: candidate.full_name_at(now),
      contact: &candidate.contact,
      links: &candidate.links,
      program_info: candidate.program_info.as_ref(),
      nominator_user: candidate.nominator_user,
      own_user: candidate.own_user,
      accepted_nomination_at: candidate.accepted_nomination_at,
      accepted_nomination: candidate.accepted_nomination_at_time(now),
      locked_at: candidate.locked_at,
      hidden_at: candidate.hidden_at,
      status,
      active: status.is_active(),
      locked: status.is_locked(),
      hidden: status.is_hidden(),
      num_likes: candidate.num_likes_at(now),
      comments: &candidate.comments,
      created_at: candidate.created_at,
      updated_at: candidate.updated_at,
    }))
  }

  pub fn status(&self) -> Status {
    match self {
      Self::Hidden(stub) => stub.status,
      Self::Visible(public) => public.status,
    }
  }

  /// Structured form.
  pub fn to_value(&self) -> Result<serde_json::Value> { Ok(serde_json::to_value(self)?) }

  /// Serialised form.
  pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }

  pub fn to_json_pretty(&self) -> Result<String> { Ok(serde_json::to_string_pretty(self)?) }
}
