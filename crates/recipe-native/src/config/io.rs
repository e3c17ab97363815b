//! Loading the client configuration
//!
//! File first, then environment overrides, then validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::paths::get_config_path;
use super::schema::ClientConfig;

pub const ENV_API_BASE_URL: &str = "RECIPE_API_BASE_URL";
pub const ENV_APP_BASE_URL: &str = "RECIPE_APP_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "RECIPE_REQUEST_TIMEOUT_SECS";

/// Load the configuration from the default location
pub fn load_default_config() -> Result<ClientConfig> {
    load_config(&get_config_path()?)
}

/// Load configuration from `path`, applying `RECIPE_*` environment overrides.
pub fn load_config(path: &Path) -> Result<ClientConfig> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an explicit environment lookup
pub fn load_config_with<F>(path: &Path, env: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    let content =
        fs::read_to_string(path).context(format!("Failed to read config: {}", path.display()))?;

    let mut config: ClientConfig =
        toml::from_str(&content).context(format!("Failed to parse config: {}", path.display()))?;

    apply_env_overrides(&mut config, env)?;

    if let Err(errors) = config.validate() {
        anyhow::bail!(
            "Config validation failed in {}:\n  {}",
            path.display(),
            errors.join("\n  ")
        );
    }

    tracing::debug!(path = %path.display(), "Loaded client config");
    Ok(config)
}

/// Override file values with any `RECIPE_*` variables that are set
pub fn apply_env_overrides<F>(config: &mut ClientConfig, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = env(ENV_API_BASE_URL) {
        config.api_base_url = value;
    }
    if let Some(value) = env(ENV_APP_BASE_URL) {
        config.app_base_url = value;
    }
    if let Some(value) = env(ENV_REQUEST_TIMEOUT_SECS) {
        config.request_timeout_secs = value
            .trim()
            .parse()
            .with_context(|| {
                format!("{ENV_REQUEST_TIMEOUT_SECS} must be a whole number of seconds, got '{value}'")
            })?;
    }
    Ok(())
}
