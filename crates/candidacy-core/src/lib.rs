//! Core types and operations for the Candidacy nomination store.
//!
//! This crate is deliberately free of database and CLI dependencies. Storage
//! backends implement [`store::CandidateStore`]; everything else depends on
//! that abstraction.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod candidate;
pub mod error;
pub mod like;
pub mod projection;
pub mod status;
pub mod store;
pub mod user;
pub mod validate;

pub use error::{Error, Result};
