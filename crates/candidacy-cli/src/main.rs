//! `candidacy` — operator tool for the Candidacy store.
//!
//! Reads `candidacy.toml` (or the path given with `--config`), opens the
//! SQLite store and runs a single command. Anything printed is the public
//! projection of a candidate, never the raw record.
//!
//! # Usage
//!
//! ```text
//! candidacy create marianne.json
//! candidacy like c-1 6f1c1a52-5b0e-4a4e-9a43-0f4b8f0f2a11
//! candidacy --store /tmp/candidacy.db hide c-1
//! ```

mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use candidacy_store_sqlite::SqliteStore;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use commands::Command;

#[derive(Parser)]
#[command(author, version, about = "Operator tool for the Candidacy store")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "candidacy.toml")]
  config: PathBuf,

  /// SQLite file to use; overrides `store_path` from the config file.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so stdout stays parseable JSON.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = settings::CliConfig::load(&cli.config)?;
  let store_path = settings::expand_tilde(cli.store.as_deref().unwrap_or(cfg.store_path.as_path()));

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::debug!(?store_path, "store opened");

  commands::run(&store, cli.command).await
}
