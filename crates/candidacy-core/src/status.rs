//! Candidate status, computed from timestamps at read time.
//!
//! Status is never stored. A candidate's `locked_at` and `hidden_at` instants
//! take effect only once they are no longer in the future, so an operator can
//! schedule a lock or hide ahead of time.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The visibility and eligibility state of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
  Active,
  Locked,
  Hidden,
}

impl Status {
  /// Evaluate the status at `now`. An effective `hidden_at` wins over an
  /// effective `locked_at`.
  pub fn at(
    locked_at: Option<DateTime<Utc>>,
    hidden_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
  ) -> Self {
    if is_effective(hidden_at, now) {
      Self::Hidden
    } else if is_effective(locked_at, now) {
      Self::Locked
    } else {
      Self::Active
    }
  }

  pub fn is_active(&self) -> bool { matches!(self, Self::Active) }

  pub fn is_locked(&self) -> bool { matches!(self, Self::Locked) }

  pub fn is_hidden(&self) -> bool { matches!(self, Self::Hidden) }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Active => "active",
      Self::Locked => "locked",
      Self::Hidden => "hidden",
    }
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Whether an optional instant has been reached by `now`.
pub fn is_effective(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
  at.is_some_and(|at| at <= now)
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone, Utc};

  use super::*;

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() }

  #[test]
  fn no_timestamps_is_active() {
    assert_eq!(Status::at(None, None, now()), Status::Active);
  }

  #[test]
  fn past_lock_is_locked() {
    let yesterday = now() - Duration::days(1);
    let status = Status::at(Some(yesterday), None, now());
    assert_eq!(status, Status::Locked);
    assert!(!status.is_active());
    assert!(!status.is_hidden());
  }

  #[test]
  fn hidden_dominates_locked() {
    let earlier = now() - Duration::hours(2);
    let later = now() - Duration::hours(1);
    assert_eq!(Status::at(Some(earlier), Some(later), now()), Status::Hidden);
    assert_eq!(Status::at(Some(later), Some(earlier), now()), Status::Hidden);
  }

  #[test]
  fn instant_equal_to_now_is_effective() {
    assert_eq!(Status::at(Some(now()), None, now()), Status::Locked);
    assert_eq!(Status::at(None, Some(now()), now()), Status::Hidden);
  }

  // Future-dated timestamps are treated as scheduled, not yet in effect.
  #[test]
  fn future_timestamps_are_inert() {
    let tomorrow = now() + Duration::days(1);
    assert_eq!(Status::at(Some(tomorrow), None, now()), Status::Active);
    assert_eq!(Status::at(None, Some(tomorrow), now()), Status::Active);

    let yesterday = now() - Duration::days(1);
    assert_eq!(
      Status::at(Some(yesterday), Some(tomorrow), now()),
      Status::Locked
    );
  }

  #[test]
  fn exactly_one_predicate_holds_for_every_combination() {
    let past = Some(now() - Duration::minutes(5));
    let future = Some(now() + Duration::minutes(5));
    let options = [None, past, future];

    for locked in options {
      for hidden in options {
        let status = Status::at(locked, hidden, now());
        let flags = [status.is_active(), status.is_locked(), status.is_hidden()];
        assert_eq!(flags.iter().filter(|f| **f).count(), 1);
        if hidden == past {
          assert_eq!(status, Status::Hidden);
        }
      }
    }
  }

  #[test]
  fn serialises_lowercase() {
    assert_eq!(serde_json::to_string(&Status::Locked).unwrap(), "\"locked\"");
  }
}
