//! Front-end configuration resolved from environment variables.

use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_RECAPTCHA_SITE_KEY: &str = "6LfkFpsrAAAAAF7pPzh0bVUYGJ4B8YSDLOgOXHh-";

pub const API_BASE_URL_ENV: &str = "REGISTRY_API_BASE_URL";
pub const RECAPTCHA_SITE_KEY_ENV: &str = "REGISTRY_RECAPTCHA_SITE_KEY";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Backend origin without a trailing slash.
    pub api_base_url: String,
    /// Site key for the public result lookup's bot check.
    pub recaptcha_site_key: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            recaptcha_site_key: DEFAULT_RECAPTCHA_SITE_KEY.to_owned(),
        }
    }
}

impl RegistryConfig {
    /// Build a config for `api_base_url` with the default site key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] unless the URL is absolute http(s).
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self { api_base_url: normalize_base_url(api_base_url)?, ..Self::default() })
    }

    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `REGISTRY_API_BASE_URL`: default `http://localhost:8080`
    /// - `REGISTRY_RECAPTCHA_SITE_KEY`: default public site key
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the base URL is not a valid http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the base URL is not a valid http(s) URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = non_empty(lookup(API_BASE_URL_ENV)).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let recaptcha_site_key =
            non_empty(lookup(RECAPTCHA_SITE_KEY_ENV)).unwrap_or_else(|| DEFAULT_RECAPTCHA_SITE_KEY.to_owned());
        Ok(Self { api_base_url: normalize_base_url(&api_base_url)?, recaptcha_site_key })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ConfigError::InvalidBaseUrl { url: raw.to_owned(), reason };
    let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
