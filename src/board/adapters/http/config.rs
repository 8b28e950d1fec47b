//! Connection settings for the HTTP board store.
//!
//! Settings come from an optional TOML document and are then overridden by
//! `BOARDSYNC_*` environment variables.

use serde::Deserialize;
use std::{fs, path::Path, time::Duration};
use thiserror::Error;

/// Environment variable overriding [`HttpStoreConfig::base_url`].
pub const API_URL_VAR: &str = "BOARDSYNC_API_URL";
/// Environment variable overriding [`HttpStoreConfig::auth_token`].
pub const API_TOKEN_VAR: &str = "BOARDSYNC_API_TOKEN";
/// Environment variable overriding [`HttpStoreConfig::request_timeout_secs`].
pub const TIMEOUT_VAR: &str = "BOARDSYNC_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors raised while loading store settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings document is not valid TOML for these settings.
    #[error("invalid settings document: {0}")]
    Parse(#[from] toml::de::Error),

    /// An override variable holds an unusable value.
    #[error("invalid value {value:?} for {variable}")]
    InvalidOverride {
        /// Variable name.
        variable: &'static str,
        /// Offending value.
        value: String,
    },

    /// The base URL is blank.
    #[error("the store base URL must not be empty")]
    MissingBaseUrl,
}

/// Settings for [`super::HttpBoardStore`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpStoreConfig {
    /// API root, for example `https://board.example.com/api`.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub auth_token: Option<String>,
    /// Per-request timeout in seconds; zero disables the timeout.
    pub request_timeout_secs: u64,
}

impl Default for HttpStoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            auth_token: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HttpStoreConfig {
    /// Creates settings for `base_url` with default timeout and no token.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Parses settings from a TOML document. Missing keys keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed documents or unknown keys.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Loads settings from `path` when it exists, then applies environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or an
    /// override is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let base = if path.exists() {
            let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
            Self::from_toml_str(&raw)?
        } else {
            Self::default()
        };
        base.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Builds settings from defaults and environment overrides only.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an override is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides read through `lookup` and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] for a non-numeric timeout and
    /// [`ConfigError::MissingBaseUrl`] when the final base URL is blank.
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(API_URL_VAR) {
            self.base_url = url;
        }
        if let Some(token) = lookup(API_TOKEN_VAR) {
            self.auth_token = Some(token).filter(|value| !value.trim().is_empty());
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            self.request_timeout_secs =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidOverride {
                        variable: TIMEOUT_VAR,
                        value: raw.clone(),
                    })?;
        }
        self.validate()
    }

    fn validate(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        self.base_url = trimmed.to_owned();
        Ok(self)
    }

    /// Returns the request timeout, if one is configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }
}
