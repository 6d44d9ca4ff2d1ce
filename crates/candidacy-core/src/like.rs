//! Like records — one user's support for one candidate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::{UserId, UserRef};

/// A timestamped association between a user and the candidate that owns it.
///
/// Each record carries its own `like_id`, so removal targets the record rather
/// than the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
  pub like_id:    Uuid,
  pub user:       UserId,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Like {
  /// A fresh like by `user`, stamped at `now`.
  pub fn new(user: impl UserRef, now: DateTime<Utc>) -> Self {
    Self {
      like_id:    Uuid::new_v4(),
      user:       user.user_id(),
      created_at: now,
      updated_at: now,
    }
  }

  pub fn is_by(&self, user: &impl UserRef) -> bool { self.user == user.user_id() }
}
