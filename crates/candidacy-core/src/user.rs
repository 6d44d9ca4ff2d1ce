//! User references.
//!
//! Users live outside this crate; a candidate only ever stores a [`UserId`].
//! Callers may hold either the bare id or a resolved [`User`], so every
//! comparison goes through [`UserRef`] to reach the canonical id first.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical identifier of a user account.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
  pub fn new(id: Uuid) -> Self { Self(id) }

  pub fn as_uuid(&self) -> &Uuid { &self.0 }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.0, f)
  }
}

impl FromStr for UserId {
  type Err = uuid::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Self(s.parse()?)) }
}

impl From<Uuid> for UserId {
  fn from(id: Uuid) -> Self { Self(id) }
}

/// A user account as resolved by the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:      UserId,
  pub display_name: String,
}

/// Anything that can name a user: the raw id, or an object exposing one.
pub trait UserRef {
  fn user_id(&self) -> UserId;
}

impl UserRef for UserId {
  fn user_id(&self) -> UserId { *self }
}

impl UserRef for User {
  fn user_id(&self) -> UserId { self.user_id }
}

impl<T: UserRef + ?Sized> UserRef for &T {
  fn user_id(&self) -> UserId { (**self).user_id() }
}
