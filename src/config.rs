//! Credential loading.
//!
//! A Workiz account is addressed by an API token (embedded in every URL)
//! and an auth secret (embedded in every POST body). Both can come from a
//! JSON file or from the environment.

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, WorkizError};

/// Shortest token or secret considered real.
pub const MIN_CREDENTIAL_LEN: usize = 20;

/// Workiz credentials.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// API token, part of every request URL.
    #[serde(alias = "Token")]
    pub token: String,

    /// Auth secret, sent in POST bodies.
    #[serde(alias = "Secret")]
    pub secret: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("valid", &self.is_valid())
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load credentials from a JSON file with `token` and `secret` keys.
    ///
    /// # Errors
    ///
    /// Returns a config error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            WorkizError::ConfigMissing(format!("cannot read {}: {e}", path.display()))
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            WorkizError::ConfigMissing(format!("cannot parse {}: {e}", path.display()))
        })
    }

    /// Load credentials from `WORKIZ_API_TOKEN` and `WORKIZ_API_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns a config error if either variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            token: required_env("WORKIZ_API_TOKEN")?,
            secret: required_env("WORKIZ_API_SECRET")?,
        })
    }

    /// Both credentials meet the minimum length.
    pub fn is_valid(&self) -> bool {
        self.token.len() >= MIN_CREDENTIAL_LEN && self.secret.len() >= MIN_CREDENTIAL_LEN
    }
}

fn required_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(WorkizError::ConfigMissing(format!(
            "{name} environment variable not set"
        ))),
    }
}
