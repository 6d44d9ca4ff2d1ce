//! Subcommands and their dispatch.

use std::path::PathBuf;

use anyhow::Context as _;
use candidacy_core::{
  candidate::{Candidate, CandidateId, NewCandidate},
  store::CandidateStore,
  user::UserId,
};
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Create a candidate from a JSON document.
  Create {
    /// File holding a `NewCandidate` JSON object.
    file: PathBuf,
  },
  /// Print a candidate.
  Show { candidate_id: String },
  /// Print every candidate, newest first.
  List,
  /// Record a like by a user.
  Like { candidate_id: String, user: UserId },
  /// Remove a user's like.
  Unlike { candidate_id: String, user: UserId },
  /// Lock a candidate from now on.
  Lock { candidate_id: String },
  Unlock { candidate_id: String },
  /// Hide a candidate from now on.
  Hide { candidate_id: String },
  Unhide { candidate_id: String },
}

pub async fn run<S: CandidateStore>(store: &S, command: Command) -> anyhow::Result<()> {
  match command {
    Command::Create { file } => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
      let input: NewCandidate =
        serde_json::from_str(&raw).context("parsing candidate document")?;
      let candidate = Candidate::create(store, input).await?;
      print(&candidate)
    }
    Command::Show { candidate_id } => {
      let candidate = load(store, candidate_id).await?;
      print(&candidate)
    }
    Command::List => {
      let candidates = store
        .list()
        .await
        .context("listing candidates")?;
      // `Candidate` serialises through its projection.
      println!("{}", serde_json::to_string_pretty(&candidates)?);
      Ok(())
    }
    Command::Like { candidate_id, user } => {
      let mut candidate = load(store, candidate_id).await?;
      candidate.like(store, &user).await?;
      print(&candidate)
    }
    Command::Unlike { candidate_id, user } => {
      let mut candidate = load(store, candidate_id).await?;
      candidate.unlike(store, &user).await?;
      print(&candidate)
    }
    Command::Lock { candidate_id } => {
      let mut candidate = load(store, candidate_id).await?;
      candidate.lock(store).await?;
      print(&candidate)
    }
    Command::Unlock { candidate_id } => {
      let mut candidate = load(store, candidate_id).await?;
      candidate.unlock(store).await?;
      print(&candidate)
    }
    Command::Hide { candidate_id } => {
      let mut candidate = load(store, candidate_id).await?;
      candidate.hide(store).await?;
      print(&candidate)
    }
    Command::Unhide { candidate_id } => {
      let mut candidate = load(store, candidate_id).await?;
      candidate.unhide(store).await?;
      print(&candidate)
    }
  }
}

async fn load<S: CandidateStore>(store: &S, candidate_id: String) -> anyhow::Result<Candidate> {
  Ok(Candidate::load(store, &CandidateId::new(candidate_id)).await?)
}

fn print(candidate: &Candidate) -> anyhow::Result<()> {
  println!("{}", candidate.projection().to_json_pretty()?);
  Ok(())
}
