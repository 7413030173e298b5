use std::path::{Path, PathBuf};
use std::process::Command;

use crate::contract::{CommandOutput, VersionControl};
use crate::error::GitError;

/// Runs the `git` binary against one working tree (`git -C <workdir> ...`).
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new<P: AsRef<Path>>(workdir: P) -> Self {
        Self {
            workdir: workdir.as_ref().to_path_buf(),
        }
    }

    /// `describe` is what gets logged in place of the raw arguments, which may hold a credential.
    fn run(&self, args: &[&str], describe: &str) -> Result<CommandOutput, GitError> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.workdir)
            .args(args)
            .output()
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    command = describe,
                    workdir = %self.workdir.display(),
                    "Failed to launch git process"
                );
                GitError::Spawn {
                    command: describe.to_string(),
                    source: e,
                }
            })?;

        let result = CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if result.success {
            tracing::debug!(command = describe, "git command succeeded");
        } else {
            tracing::debug!(
                command = describe,
                status = ?output.status,
                "git exited with non-zero code"
            );
        }
        Ok(result)
    }
}

impl VersionControl for GitCli {
    fn remove_remote(&self, name: &str) -> Result<CommandOutput, GitError> {
        self.run(&["remote", "remove", name], &format!("remote remove {name}"))
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<CommandOutput, GitError> {
        self.run(&["remote", "add", name, url], &format!("remote add {name}"))
    }

    fn set_remote_url(&self, name: &str, url: &str) -> Result<CommandOutput, GitError> {
        self.run(
            &["remote", "set-url", name, url],
            &format!("remote set-url {name}"),
        )
    }

    fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        let out = self.run(&["remote", "get-url", name], &format!("remote get-url {name}"))?;
        Ok(out
            .success
            .then(|| out.stdout.trim().to_string())
            .filter(|url| !url.is_empty()))
    }

    fn push(&self, remote: &str, refspec: &str) -> Result<CommandOutput, GitError> {
        let describe = format!("push -u {remote} {refspec}");
        let out = self.run(&["push", "-u", remote, refspec], &describe)?;
        if out.success {
            tracing::info!(remote, refspec, "Pushed to remote");
        } else {
            tracing::warn!(remote, refspec, "Push rejected");
        }
        Ok(out)
    }

    fn current_branch(&self) -> Result<Option<String>, GitError> {
        let out = self.run(&["symbolic-ref", "--short", "HEAD"], "symbolic-ref --short HEAD")?;
        Ok(out
            .success
            .then(|| out.stdout.trim().to_string())
            .filter(|branch| !branch.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_workdir_fails_without_spawn_error() {
        // git itself launches and reports the bad -C path, so this is an unsuccessful output
        let git = GitCli::new("/definitely/not/a/real/dir");
        match git.remove_remote("origin") {
            Ok(out) => assert!(!out.success),
            Err(GitError::Spawn { .. }) => {} // no git on this machine
        }
    }
}
