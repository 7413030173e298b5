//! docship-core: core logic library for docship.
//!
//! Two independent pipelines live here:
//!
//! - [`extract`]: page-by-page PDF text extraction into a plain text report.
//! - [`publish`]: create a GitHub repository, push the local tree to it and
//!   scrub the token from the remote afterwards.
//!
//! The seams both pipelines depend on are traits in [`contract`]; the
//! binary crate wires in the real [`github::GitHubClient`], [`git::GitCli`]
//! and [`token::StdinPrompt`].

pub mod config;
pub mod contract;
pub mod error;
pub mod extract;
pub mod git;
pub mod github;
pub mod publish;
pub mod token;
