//! Configuration for the `candidacy` binary.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Settings read from `candidacy.toml`, overridable with `CANDIDACY_*`
/// environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
  /// SQLite database file; `~` is expanded.
  pub store_path: PathBuf,
}

impl CliConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", "candidacy.db")?
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("CANDIDACY"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise CliConfig")
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
