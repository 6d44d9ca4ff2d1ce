//! Field validation for candidate contact and link data.
//!
//! Every field is checked independently and all failures are reported
//! together. Empty strings count as absent.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::Serialize;
use url::Url;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
  )
  .expect("email pattern compiles")
});

// French mobile numbers: 06/07, or the +33/0033 country prefix without the
// trunk zero.
static FR_MOBILE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(?:\+?33|0033|0)[67]\d{8}$").expect("phone pattern compiles")
});

// ─── Errors ──────────────────────────────────────────────────────────────────

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  /// Dotted path of the field, e.g. `contact.email`.
  pub field:   &'static str,
  pub message: String,
}

/// Every field that failed validation in a single write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
  pub errors: Vec<FieldError>,
}

impl ValidationErrors {
  pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.errors.iter().map(|e| e.field)
  }

  pub fn contains(&self, field: &str) -> bool { self.fields().any(|f| f == field) }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("validation failed")?;
    for (i, err) in self.errors.iter().enumerate() {
      let sep = if i == 0 { ": " } else { "; " };
      write!(f, "{sep}{} {}", err.field, err.message)?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

// ─── Predicates ──────────────────────────────────────────────────────────────

pub fn is_email(value: &str) -> bool { value.len() <= 254 && EMAIL.is_match(value) }

/// Accepts spaces, dots and dashes between digit groups.
pub fn is_fr_mobile_phone(value: &str) -> bool {
  let compact: String = value
    .chars()
    .filter(|c| !matches!(c, ' ' | '.' | '-'))
    .collect();
  FR_MOBILE.is_match(&compact)
}

/// An `http`/`https` URL with a dotted host name or an IP address. A missing
/// scheme is read as `http://`.
pub fn is_url(value: &str) -> bool {
  if value.chars().any(char::is_whitespace) {
    return false;
  }
  let parsed = match Url::parse(value) {
    Ok(url) => url,
    Err(url::ParseError::RelativeUrlWithoutBase) => {
      match Url::parse(&format!("http://{value}")) {
        Ok(url) => url,
        Err(_) => return false,
      }
    }
    Err(_) => return false,
  };
  if !matches!(parsed.scheme(), "http" | "https") {
    return false;
  }
  match parsed.host() {
    Some(url::Host::Domain(domain)) => {
      domain.split('.').filter(|label| !label.is_empty()).count() >= 2
    }
    Some(url::Host::Ipv4(_) | url::Host::Ipv6(_)) => true,
    None => false,
  }
}

// ─── Collector ───────────────────────────────────────────────────────────────

/// Accumulates field errors across a whole document.
#[derive(Debug, Default)]
pub(crate) struct Collector {
  errors: Vec<FieldError>,
}

impl Collector {
  pub fn required(&mut self, field: &'static str, value: &str) {
    if value.trim().is_empty() {
      self.reject(field, "is required");
    }
  }

  pub fn email(&mut self, field: &'static str, value: Option<&str>) {
    if let Some(v) = present(value)
      && !is_email(v)
    {
      self.reject(field, "is not a valid email address");
    }
  }

  pub fn phone(&mut self, field: &'static str, value: Option<&str>) {
    if let Some(v) = present(value)
      && !is_fr_mobile_phone(v)
    {
      self.reject(field, "is not a valid mobile phone number");
    }
  }

  pub fn url(&mut self, field: &'static str, value: Option<&str>) {
    if let Some(v) = present(value)
      && !is_url(v)
    {
      self.reject(field, "is not a valid URL");
    }
  }

  pub fn finish(self) -> Result<(), ValidationErrors> {
    if self.errors.is_empty() {
      Ok(())
    } else {
      Err(ValidationErrors { errors: self.errors })
    }
  }

  fn reject(&mut self, field: &'static str, message: &str) {
    self.errors.push(FieldError { field, message: message.to_owned() });
  }
}

fn present(value: Option<&str>) -> Option<&str> { value.filter(|v| !v.is_empty()) }
