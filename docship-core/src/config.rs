use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ConfigError;

pub const DEFAULT_INPUT: &str = "~/Downloads/Guide to the Bloomberg Terminal.pdf";
pub const DEFAULT_OUTPUT: &str = "bloomberg_guide_extracted.txt";
pub const DEFAULT_REPO_NAME: &str = "omar-terminal";
pub const DEFAULT_DESCRIPTION: &str =
    "Bloomberg-style live crypto trading terminal powered by Hyperliquid API";
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_WEB_BASE_URL: &str = "https://github.com";

/// Where the PDF extractor reads from and writes to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input: expand_home(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl ExtractConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.as_os_str().is_empty() {
            return Err(ConfigError::invalid("extract.input", "must not be empty"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::invalid("extract.output", "must not be empty"));
        }
        if self.input == self.output {
            return Err(ConfigError::invalid(
                "extract.output",
                "must differ from the input path",
            ));
        }
        Ok(())
    }

    pub fn trace_loaded(&self) {
        info!(
            input = %self.input.display(),
            output = %self.output.display(),
            "Loaded extract config"
        );
    }
}

/// Everything the publisher needs to create a repository and push to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub repo_name: String,
    pub description: String,
    pub private: bool,
    pub api_base_url: String,
    pub web_base_url: String,
    pub remote_name: String,
    /// Local branch to push. `None` pushes whatever HEAD points at.
    pub branch: Option<String>,
    pub fallback_remote_branch: String,
    pub workdir: PathBuf,
    /// Environment variables consulted for the token, in priority order.
    pub token_env_vars: Vec<String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            repo_name: DEFAULT_REPO_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            private: false,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            web_base_url: DEFAULT_WEB_BASE_URL.to_string(),
            remote_name: "origin".to_string(),
            branch: None,
            fallback_remote_branch: "main".to_string(),
            workdir: PathBuf::from("."),
            token_env_vars: vec!["GITHUB_TOKEN".to_string(), "GH_TOKEN".to_string()],
        }
    }
}

impl PublishConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repo_name.is_empty() {
            return Err(ConfigError::invalid("publish.repo_name", "must not be empty"));
        }
        if let Some(bad) = self
            .repo_name
            .chars()
            .find(|&c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
        {
            return Err(ConfigError::invalid(
                "publish.repo_name",
                format!("contains unsupported character {bad:?}"),
            ));
        }
        validate_http_url("publish.api_base_url", &self.api_base_url)?;
        validate_http_url("publish.web_base_url", &self.web_base_url)?;
        if self.remote_name.trim().is_empty() {
            return Err(ConfigError::invalid("publish.remote_name", "must not be empty"));
        }
        if matches!(self.branch.as_deref(), Some(b) if b.trim().is_empty()) {
            return Err(ConfigError::invalid(
                "publish.branch",
                "must be omitted or non-empty",
            ));
        }
        if self.fallback_remote_branch.trim().is_empty() {
            return Err(ConfigError::invalid(
                "publish.fallback_remote_branch",
                "must not be empty",
            ));
        }
        if self.token_env_vars.is_empty() {
            return Err(ConfigError::invalid(
                "publish.token_env_vars",
                "at least one variable name is required",
            ));
        }
        Ok(())
    }

    pub fn trace_loaded(&self) {
        info!(
            repo_name = %self.repo_name,
            private = self.private,
            api_base_url = %self.api_base_url,
            workdir = %self.workdir.display(),
            "Loaded publish config"
        );
        debug!(?self, "Publish config loaded (full debug)");
    }
}

fn validate_http_url(field: &'static str, raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|e| ConfigError::invalid(field, e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        other => Err(ConfigError::invalid(
            field,
            format!("expected an http(s) URL with a host, got scheme {other:?}"),
        )),
    }
}

/// Expands a leading `~/` against the user's home directory.
pub fn expand_home<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ExtractConfig::default().validate().expect("extract defaults");
        PublishConfig::default().validate().expect("publish defaults");
    }

    #[test]
    fn default_input_lives_under_downloads() {
        let input = ExtractConfig::default().input;
        assert!(input.ends_with("Downloads/Guide to the Bloomberg Terminal.pdf"));
        if dirs::home_dir().is_some() {
            assert!(!input.starts_with("~"));
        }
    }

    #[test]
    fn expand_home_leaves_other_paths_alone() {
        assert_eq!(expand_home("relative/file.pdf"), PathBuf::from("relative/file.pdf"));
        assert_eq!(expand_home("/abs/file.pdf"), PathBuf::from("/abs/file.pdf"));
        assert_eq!(expand_home("~user/file.pdf"), PathBuf::from("~user/file.pdf"));
    }

    #[test]
    fn rejects_output_equal_to_input() {
        let config = ExtractConfig {
            input: PathBuf::from("same.pdf"),
            output: PathBuf::from("same.pdf"),
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "extract.output", .. }));
    }

    #[test]
    fn rejects_bad_publish_fields() {
        let cases: Vec<(&str, PublishConfig)> = vec![
            (
                "publish.repo_name",
                PublishConfig { repo_name: String::new(), ..Default::default() },
            ),
            (
                "publish.repo_name",
                PublishConfig { repo_name: "has space".into(), ..Default::default() },
            ),
            (
                "publish.api_base_url",
                PublishConfig { api_base_url: "ftp://example.com".into(), ..Default::default() },
            ),
            (
                "publish.web_base_url",
                PublishConfig { web_base_url: "not a url".into(), ..Default::default() },
            ),
            (
                "publish.branch",
                PublishConfig { branch: Some(" ".into()), ..Default::default() },
            ),
            (
                "publish.token_env_vars",
                PublishConfig { token_env_vars: vec![], ..Default::default() },
            ),
        ];

        for (expected_field, config) in cases {
            match config.validate() {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected_field),
                Ok(()) => panic!("expected {expected_field} to be rejected"),
            }
        }
    }
}
