//! Token resolution: environment first, then the CLI argument, then a prompt.

use std::fmt;
use std::io::{self, BufRead, Write};

use tracing::{debug, info, warn};

use crate::contract::TokenPrompt;

pub const PROMPT_MESSAGE: &str = "Enter GitHub personal access token: ";

/// An opaque bearer token. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Where a token came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Env(String),
    Argument,
    Prompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub credential: Credential,
    pub source: TokenSource,
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Resolves a token from `env_vars` (looked up in order through `lookup`),
/// then `argument`, then a single call to `prompt`. Blank values count as
/// missing. `Ok(None)` means every source came up empty.
pub fn resolve_token<F>(
    env_vars: &[String],
    lookup: F,
    argument: Option<&str>,
    prompt: &dyn TokenPrompt,
) -> io::Result<Option<ResolvedToken>>
where
    F: Fn(&str) -> Option<String>,
{
    for name in env_vars {
        if let Some(token) = lookup(name).as_deref().and_then(non_empty) {
            info!(source = %name, "Token taken from environment");
            return Ok(Some(ResolvedToken {
                credential: Credential::new(token),
                source: TokenSource::Env(name.clone()),
            }));
        }
        debug!(var = %name, "Token variable not set");
    }

    if let Some(token) = argument.and_then(non_empty) {
        info!("Token taken from command-line argument");
        return Ok(Some(ResolvedToken {
            credential: Credential::new(token),
            source: TokenSource::Argument,
        }));
    }

    let entered = prompt.prompt_token(PROMPT_MESSAGE)?;
    match non_empty(&entered) {
        Some(token) => {
            info!("Token entered interactively");
            Ok(Some(ResolvedToken {
                credential: Credential::new(token),
                source: TokenSource::Prompt,
            }))
        }
        None => {
            warn!("No token from environment, argument or prompt");
            Ok(None)
        }
    }
}

/// Reads one line from stdin after printing the message to stdout.
pub struct StdinPrompt;

impl TokenPrompt for StdinPrompt {
    fn prompt_token(&self, message: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        stdout.write_all(message.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}
