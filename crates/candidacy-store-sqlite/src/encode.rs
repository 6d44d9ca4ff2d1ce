//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, and the contact/link/program blocks as compact JSON.

use candidacy_core::{
  candidate::{Candidate, CandidateId, CommentId},
  like::Like,
  user::UserId,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_user(id: UserId) -> String { encode_uuid(id.0) }

fn decode_user(s: &str) -> Result<UserId> { decode_uuid(s).map(UserId::new) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── Version ──────────────────────────────────────────────────────────────────

// SQLite integers are signed; versions never get near the sign bit.
fn encode_version(v: u64) -> i64 { v as i64 }

fn decode_version(v: i64) -> u64 { v.max(0) as u64 }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw column values of a `candidates` row.
#[derive(Debug, Clone)]
pub struct RawCandidate {
  pub id:                     String,
  pub candidate_id:           String,
  pub first_name:             String,
  pub last_name:              String,
  pub contact:                String,
  pub links:                  String,
  pub program_info:           Option<String>,
  pub nominator_user:         Option<String>,
  pub own_user:               Option<String>,
  pub accepted_nomination_at: Option<String>,
  pub locked_at:              Option<String>,
  pub hidden_at:              Option<String>,
  pub comments:               String,
  pub created_at:             String,
  pub updated_at:             String,
  pub version:                i64,
}

/// Column list matching [`RawCandidate::from_row`].
pub const CANDIDATE_COLUMNS: &str = "id, candidate_id, first_name, last_name, contact, links,
  program_info, nominator_user, own_user, accepted_nomination_at, locked_at,
  hidden_at, comments, created_at, updated_at, version";

impl RawCandidate {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                     row.get(0)?,
      candidate_id:           row.get(1)?,
      first_name:             row.get(2)?,
      last_name:              row.get(3)?,
      contact:                row.get(4)?,
      links:                  row.get(5)?,
      program_info:           row.get(6)?,
      nominator_user:         row.get(7)?,
      own_user:               row.get(8)?,
      accepted_nomination_at: row.get(9)?,
      locked_at:              row.get(10)?,
      hidden_at:              row.get(11)?,
      comments:               row.get(12)?,
      created_at:             row.get(13)?,
      updated_at:             row.get(14)?,
      version:                row.get(15)?,
    })
  }

  /// Encode every column of `c`.
  pub fn encode(c: &Candidate) -> Result<Self> {
    Ok(Self {
      id:                     encode_uuid(c.id),
      candidate_id:           c.candidate_id.as_str().to_owned(),
      first_name:             c.first_name.clone(),
      last_name:              c.last_name.clone(),
      contact:                serde_json::to_string(&c.contact)?,
      links:                  serde_json::to_string(&c.links)?,
      program_info:           c
        .program_info
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?,
      nominator_user:         c.nominator_user.map(encode_user),
      own_user:               c.own_user.map(encode_user),
      accepted_nomination_at: c.accepted_nomination_at.map(encode_dt),
      locked_at:              c.locked_at.map(encode_dt),
      hidden_at:              c.hidden_at.map(encode_dt),
      comments:               serde_json::to_string(&c.comments)?,
      created_at:             encode_dt(c.created_at),
      updated_at:             encode_dt(c.updated_at),
      version:                encode_version(c.version),
    })
  }

  pub fn into_candidate(self, likes: Vec<RawLike>) -> Result<Candidate> {
    let comments: Vec<CommentId> = serde_json::from_str(&self.comments)?;
    Ok(Candidate {
      id: decode_uuid(&self.id)?,
      candidate_id: CandidateId::new(self.candidate_id),
      first_name: self.first_name,
      last_name: self.last_name,
      contact: serde_json::from_str(&self.contact)?,
      links: serde_json::from_str(&self.links)?,
      program_info: self
        .program_info
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?,
      nominator_user: self.nominator_user.as_deref().map(decode_user).transpose()?,
      own_user: self.own_user.as_deref().map(decode_user).transpose()?,
      accepted_nomination_at: decode_opt_dt(self.accepted_nomination_at)?,
      locked_at: decode_opt_dt(self.locked_at)?,
      hidden_at: decode_opt_dt(self.hidden_at)?,
      likes: likes
        .into_iter()
        .map(RawLike::into_like)
        .collect::<Result<_>>()?,
      comments,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      version: decode_version(self.version),
    })
  }
}

/// Raw column values of a `likes` row.
#[derive(Debug, Clone)]
pub struct RawLike {
  pub like_id:    String,
  pub user_id:    String,
  pub created_at: String,
  pub updated_at: String,
}

pub const LIKE_COLUMNS: &str = "like_id, user_id, created_at, updated_at";

impl RawLike {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      like_id:    row.get(0)?,
      user_id:    row.get(1)?,
      created_at: row.get(2)?,
      updated_at: row.get(3)?,
    })
  }

  pub fn encode(like: &Like) -> Self {
    Self {
      like_id:    encode_uuid(like.like_id),
      user_id:    encode_user(like.user),
      created_at: encode_dt(like.created_at),
      updated_at: encode_dt(like.updated_at),
    }
  }

  pub fn into_like(self) -> Result<Like> {
    Ok(Like {
      like_id:    decode_uuid(&self.like_id)?,
      user:       decode_user(&self.user_id)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
