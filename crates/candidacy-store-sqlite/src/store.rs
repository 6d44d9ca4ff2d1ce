//! [`SqliteStore`] — the SQLite implementation of [`CandidateStore`].

use std::{collections::HashSet, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::{debug, warn};
use uuid::Uuid;

use candidacy_core::{
  candidate::{Candidate, CandidateId, NewCandidate},
  like::Like,
  store::CandidateStore,
  user::UserId,
};

use crate::{
  Error, Result,
  encode::{
    CANDIDATE_COLUMNS, LIKE_COLUMNS, RawCandidate, RawLike, encode_dt, encode_user,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A candidate store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// What a guarded `UPDATE` found.
enum SaveOutcome {
  Saved,
  Conflict,
  Missing,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// All likes of the candidate with primary key `candidate`, in like order.
fn fetch_likes(
  conn: &rusqlite::Connection,
  candidate: &str,
) -> rusqlite::Result<Vec<RawLike>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {LIKE_COLUMNS} FROM likes WHERE candidate = ?1 ORDER BY position"
  ))?;
  stmt
    .query_map(rusqlite::params![candidate], RawLike::from_row)?
    .collect()
}

// ─── CandidateStore impl ─────────────────────────────────────────────────────

impl CandidateStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, input: NewCandidate) -> Result<Candidate> {
    let now = Utc::now();
    let candidate = Candidate {
      id:                     Uuid::new_v4(),
      candidate_id:           input.candidate_id,
      first_name:             input.first_name,
      last_name:              input.last_name,
      contact:                input.contact,
      links:                  input.links,
      program_info:           input.program_info,
      nominator_user:         input.nominator_user,
      own_user:               input.own_user,
      accepted_nomination_at: input.accepted_nomination_at,
      locked_at:              None,
      hidden_at:              None,
      likes:                  Vec::new(),
      comments:               Vec::new(),
      created_at:             now,
      updated_at:             now,
      version:                0,
    };

    let raw = RawCandidate::encode(&candidate)?;

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let taken = conn
          .query_row(
            "SELECT 1 FROM candidates WHERE candidate_id = ?1",
            rusqlite::params![raw.candidate_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(false);
        }

        conn.execute(
          &format!(
            "INSERT INTO candidates ({CANDIDATE_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
          ),
          rusqlite::params![
            raw.id,
            raw.candidate_id,
            raw.first_name,
            raw.last_name,
            raw.contact,
            raw.links,
            raw.program_info,
            raw.nominator_user,
            raw.own_user,
            raw.accepted_nomination_at,
            raw.locked_at,
            raw.hidden_at,
            raw.comments,
            raw.created_at,
            raw.updated_at,
            raw.version,
          ],
        )?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::CandidateExists(candidate.candidate_id));
    }
    Ok(candidate)
  }

  async fn load(&self, candidate_id: &CandidateId) -> Result<Option<Candidate>> {
    let id_str = candidate_id.as_str().to_owned();

    let raw: Option<(RawCandidate, Vec<RawLike>)> = self
      .conn
      .call(move |conn| {
        let Some(row) = conn
          .query_row(
            &format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE candidate_id = ?1"),
            rusqlite::params![id_str],
            RawCandidate::from_row,
          )
          .optional()?
        else {
          return Ok(None);
        };
        let likes = fetch_likes(conn, &row.id)?;
        Ok(Some((row, likes)))
      })
      .await?;

    raw.map(|(row, likes)| row.into_candidate(likes)).transpose()
  }

  async fn save(&self, candidate: &Candidate) -> Result<Candidate> {
    let mut raw = RawCandidate::encode(candidate)?;
    let likes: Vec<RawLike> = candidate.likes.iter().map(RawLike::encode).collect();
    let now = Utc::now();
    raw.updated_at = encode_dt(now);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let changed = tx.execute(
          "UPDATE candidates SET
             first_name = ?1, last_name = ?2, contact = ?3, links = ?4,
             program_info = ?5, nominator_user = ?6, own_user = ?7,
             accepted_nomination_at = ?8, locked_at = ?9, hidden_at = ?10,
             comments = ?11, updated_at = ?12, version = version + 1
           WHERE id = ?13 AND version = ?14",
          rusqlite::params![
            raw.first_name,
            raw.last_name,
            raw.contact,
            raw.links,
            raw.program_info,
            raw.nominator_user,
            raw.own_user,
            raw.accepted_nomination_at,
            raw.locked_at,
            raw.hidden_at,
            raw.comments,
            raw.updated_at,
            raw.id,
            raw.version,
          ],
        )?;

        if changed == 0 {
          let exists = tx
            .query_row(
              "SELECT 1 FROM candidates WHERE id = ?1",
              rusqlite::params![raw.id],
              |_| Ok(()),
            )
            .optional()?
            .is_some();
          return Ok(if exists { SaveOutcome::Conflict } else { SaveOutcome::Missing });
        }

        // Drop likes that are gone, then write the rest in order. Deleting
        // first keeps an unlike-then-like by one user clear of the UNIQUE pair.
        let keep: HashSet<&str> = likes.iter().map(|l| l.like_id.as_str()).collect();
        let stored: Vec<String> = {
          let mut stmt = tx.prepare("SELECT like_id FROM likes WHERE candidate = ?1")?;
          stmt
            .query_map(rusqlite::params![raw.id], |r| r.get(0))?
            .collect::<rusqlite::Result<_>>()?
        };
        for like_id in stored.iter().filter(|id| !keep.contains(id.as_str())) {
          tx.execute("DELETE FROM likes WHERE like_id = ?1", rusqlite::params![like_id])?;
        }

        for (position, like) in likes.iter().enumerate() {
          tx.execute(
            "INSERT INTO likes (like_id, candidate, user_id, position, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (like_id) DO UPDATE SET
               position   = excluded.position,
               updated_at = excluded.updated_at",
            rusqlite::params![
              like.like_id,
              raw.id,
              like.user_id,
              position as i64,
              like.created_at,
              like.updated_at,
            ],
          )?;
        }

        tx.commit()?;
        Ok(SaveOutcome::Saved)
      })
      .await?;

    match outcome {
      SaveOutcome::Saved => {
        let mut saved = candidate.clone();
        saved.version = candidate.version + 1;
        saved.updated_at = now;
        debug!(candidate_id = %saved.candidate_id, version = saved.version, "candidate saved");
        Ok(saved)
      }
      SaveOutcome::Conflict => {
        warn!(candidate_id = %candidate.candidate_id, expected = candidate.version, "version conflict");
        Err(Error::VersionConflict {
          candidate_id: candidate.candidate_id.clone(),
          expected:     candidate.version,
        })
      }
      SaveOutcome::Missing => Err(Error::CandidateNotFound(candidate.candidate_id.clone())),
    }
  }

  async fn find_like(&self, candidate_id: &CandidateId, user: UserId) -> Result<Option<Like>> {
    let id_str   = candidate_id.as_str().to_owned();
    let user_str = encode_user(user);

    let raw: Option<RawLike> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT l.like_id, l.user_id, l.created_at, l.updated_at
               FROM likes l
               JOIN candidates c ON c.id = l.candidate
               WHERE c.candidate_id = ?1 AND l.user_id = ?2
               LIMIT 1",
              rusqlite::params![id_str, user_str],
              RawLike::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawLike::into_like).transpose()
  }

  async fn list(&self) -> Result<Vec<Candidate>> {
    let raws: Vec<(RawCandidate, Vec<RawLike>)> = self
      .conn
      .call(|conn| {
        let rows: Vec<RawCandidate> = {
          let mut stmt = conn.prepare(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates ORDER BY created_at DESC"
          ))?;
          stmt
            .query_map([], RawCandidate::from_row)?
            .collect::<rusqlite::Result<_>>()?
        };

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
          let likes = fetch_likes(conn, &row.id)?;
          out.push((row, likes));
        }
        Ok(out)
      })
      .await?;

    raws
      .into_iter()
      .map(|(row, likes)| row.into_candidate(likes))
      .collect()
  }
}
