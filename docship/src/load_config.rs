/// `load_config` module: reads the optional YAML config file and layers environment overrides on top.
///
/// Every key in the file is optional; anything missing keeps the defaults from
/// [`docship_core::config`]. Environment overrides are applied after the file:
///
/// - `GITHUB_API_URL` replaces `publish.api_base_url`
///
/// Validation is left to the subcommand, after CLI flags have been applied.
use anyhow::Result;
use docship_core::config::{expand_home, ExtractConfig, PublishConfig};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub const API_URL_ENV: &str = "GITHUB_API_URL";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub extract: ExtractConfig,
    pub publish: PublishConfig,
}

/// Loads `path` if given, otherwise starts from defaults, then applies env
/// overrides read through `env_lookup`.
pub fn load_config<F>(path: Option<&Path>, env_lookup: F) -> Result<CliConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => {
            info!("No config file given, using defaults");
            CliConfig::default()
        }
    };

    config.extract.input = expand_home(&config.extract.input);
    config.publish.workdir = expand_home(&config.publish.workdir);

    if let Some(api_url) = env_lookup(API_URL_ENV) {
        if !api_url.trim().is_empty() {
            info!(api_url = %api_url, "GITHUB_API_URL found in env, overriding API base URL");
            config.publish.api_base_url = api_url.trim().to_string();
        }
    }

    Ok(config)
}

fn read_file(path: &Path) -> Result<CliConfig> {
    info!(config_path = ?path, "Loading configuration from file");

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path,
                e
            ));
        }
    };

    if content.trim().is_empty() {
        return Ok(CliConfig::default());
    }

    match serde_yaml::from_str::<CliConfig>(&content) {
        Ok(conf) => {
            info!(config_path = ?path, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}
