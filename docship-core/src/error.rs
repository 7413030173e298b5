//! Error types for the extraction and publishing pipelines.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning a PDF into a text report.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("input PDF not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a readable PDF ({}): {reason}", path.display())]
    InvalidPdf { path: PathBuf, reason: String },

    #[error("failed to extract text from page {page}: {message}")]
    Page { page: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors talking to the hosting API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("could not decode API response: {0}")]
    Decode(String),

    #[error("token contains characters that cannot be sent in an HTTP header")]
    InvalidToken,
}

/// Errors running the git binary. A command that runs and exits non-zero is
/// not an error at this level; callers inspect [`crate::contract::CommandOutput`].
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to launch `git {command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("cannot build remote URL: {0}")]
    Url(String),

    #[error("token is still stored in git remote `{remote}`; run `git remote remove {remote}`")]
    CredentialsRetained { remote: String },
}
