//! # contract: seams between the pipelines and the outside world
//!
//! The extractor reads pages through [`PageSource`]; the publisher talks to
//! the hosting service through [`HostingApi`], to git through
//! [`VersionControl`], and to the operator through [`TokenPrompt`].
//! Real implementations live in `extract`, `github`, `git` and `token`.
//!
//! All traits are annotated for `mockall`, so tests can drive each stage of
//! the publish pipeline deterministically.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ExtractError, GitError};

/// An ordered, read-only sequence of pages that can each be rendered to text.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Plain text of the page at `index` (0-based).
    fn page_text(&self, index: usize) -> Result<String, ExtractError>;
}

/// Request body for repository creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRepository {
    pub name: String,
    pub description: String,
    pub private: bool,
    pub auto_init: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// The subset of a created repository we care about.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Repository {
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub owner: Option<Owner>,
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub login: String,
}

/// How the hosting service answered a creation request.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// 201: a new repository exists now.
    Created(Repository),
    /// 422 that the service identified as a name collision.
    AlreadyExists,
    /// 422 we could not attribute to a name collision.
    Unknown { status: u16, body: String },
    /// Any other status.
    Rejected { status: u16, body: String },
}

#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Ask the service to create a repository owned by the caller.
    async fn create_repository(&self, req: &NewRepository) -> Result<CreateOutcome, ApiError>;

    /// Identity of the token's owner.
    async fn current_user(&self) -> Result<User, ApiError>;
}

/// Result of a git invocation that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// The handful of git operations the publisher needs, scoped to one working tree.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait VersionControl: Send + Sync {
    fn remove_remote(&self, name: &str) -> Result<CommandOutput, GitError>;

    fn add_remote(&self, name: &str, url: &str) -> Result<CommandOutput, GitError>;

    fn set_remote_url(&self, name: &str, url: &str) -> Result<CommandOutput, GitError>;

    /// Currently configured URL of `name`, if the remote exists.
    fn remote_url(&self, name: &str) -> Result<Option<String>, GitError>;

    /// `git push -u <remote> <refspec>`
    fn push(&self, remote: &str, refspec: &str) -> Result<CommandOutput, GitError>;

    /// Short name of the checked-out branch, `None` on a detached HEAD.
    fn current_branch(&self) -> Result<Option<String>, GitError>;
}

/// Asks a human for the token when no other source provides one.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait TokenPrompt {
    fn prompt_token(&self, message: &str) -> std::io::Result<String>;
}
