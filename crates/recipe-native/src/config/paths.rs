//! Directory paths for the recipe client

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Base directory (~/.config/recipe-client/)
pub fn get_client_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Failed to get config directory")?
        .join("recipe-client"))
}

/// Default config file (~/.config/recipe-client/config.toml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_client_dir()?.join("config.toml"))
}

/// Default token slot file for a cookie name
pub fn default_token_path(name: &str) -> Result<PathBuf> {
    Ok(get_client_dir()?.join(format!("{name}.json")))
}
