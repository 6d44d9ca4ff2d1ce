//! SQL schema for the Candidacy SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS candidates (
    id                     TEXT PRIMARY KEY,
    candidate_id           TEXT NOT NULL UNIQUE,
    first_name             TEXT NOT NULL,
    last_name              TEXT NOT NULL,
    contact                TEXT NOT NULL DEFAULT '{}',   -- JSON Contact
    links                  TEXT NOT NULL DEFAULT '{}',   -- JSON Links
    program_info           TEXT,                         -- JSON ProgramInfo or NULL
    nominator_user         TEXT,
    own_user               TEXT,
    accepted_nomination_at TEXT,
    locked_at              TEXT,
    hidden_at              TEXT,
    comments               TEXT NOT NULL DEFAULT '[]',   -- JSON array of ids
    created_at             TEXT NOT NULL,
    updated_at             TEXT NOT NULL,
    version                INTEGER NOT NULL DEFAULT 0
);

-- One row per like. `position` preserves like order; the UNIQUE pair is the
-- backstop for the one-like-per-user rule.
CREATE TABLE IF NOT EXISTS likes (
    like_id    TEXT PRIMARY KEY,
    candidate  TEXT NOT NULL REFERENCES candidates(id) ON DELETE CASCADE,
    user_id    TEXT NOT NULL,
    position   INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (candidate, user_id)
);

CREATE INDEX IF NOT EXISTS candidates_created_idx ON candidates(created_at DESC);
CREATE INDEX IF NOT EXISTS candidates_locked_idx  ON candidates(locked_at DESC);
CREATE INDEX IF NOT EXISTS candidates_hidden_idx  ON candidates(hidden_at DESC);
CREATE INDEX IF NOT EXISTS candidates_name_idx    ON candidates(last_name, first_name);
CREATE INDEX IF NOT EXISTS likes_candidate_idx    ON likes(candidate, position);

PRAGMA user_version = 1;
";
