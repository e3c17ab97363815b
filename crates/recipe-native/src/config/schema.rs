//! Configuration schema for the recipe client

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use recipe_core::payment::Currency;
use serde::{Deserialize, Serialize};
use url::Url;

use super::paths::default_token_path;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TOKEN_COOKIE_NAME: &str = "auth-token";

/// Client configuration
///
/// Only the two base URLs are required; everything else has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend proxy that forwards to the payment provider
    pub api_base_url: String,

    /// Public application URL, used for callback and return URLs
    pub app_base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_token_cookie_name")]
    pub token_cookie_name: String,

    /// Explicit file for the persisted token slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,

    #[serde(default)]
    pub default_currency: Currency,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_token_cookie_name() -> String {
    DEFAULT_TOKEN_COOKIE_NAME.to_string()
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>, app_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            app_base_url: app_base_url.into(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_cookie_name: default_token_cookie_name(),
            token_path: None,
            default_currency: Currency::default(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Where the token slot is persisted: `token_path`, or a file named after
    /// the cookie under the user's config directory.
    pub fn resolved_token_path(&self) -> Result<PathBuf> {
        match &self.token_path {
            Some(path) => Ok(path.clone()),
            None => default_token_path(&self.token_cookie_name),
        }
    }

    /// Validate the configuration for common errors
    ///
    /// Returns Ok(()) if valid, or Err with a list of error messages
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("api_base_url", &self.api_base_url),
            ("app_base_url", &self.app_base_url),
        ] {
            if let Err(e) = validate_base_url(value) {
                errors.push(format!("{field}: {e}"));
            }
        }

        if self.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be greater than 0".to_string());
        }

        let name = self.token_cookie_name.as_str();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            errors.push(format!(
                "token_cookie_name '{name}' must be non-empty and contain only alphanumeric characters, hyphens, or underscores"
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_base_url(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| format!("'{value}' is not a valid URL ({e})"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("'{value}' must use http or https, not {other}")),
    }
}
