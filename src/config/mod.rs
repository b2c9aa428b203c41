//! TOML-based engine configuration.
//!
//! Supports a config file (vantage.toml) with environment variable
//! expansion.
//!
//! Example configuration:
//! ```toml
//! [query]
//! fetch_limit = 10000
//!
//! [audit]
//! enabled = true
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Ad-hoc query behavior.
    #[serde(default)]
    pub query: QuerySettings,

    /// Execution audit behavior.
    #[serde(default)]
    pub audit: AuditSettings,
}

/// Ad-hoc query settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Cap on rows fetched per run. Unset means no cap; the exact match
    /// count is reported either way.
    pub fetch_limit: Option<u64>,
}

/// Audit settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuditSettings {
    /// Write an execution audit row and touch `last_run_at` per
    /// successful run.
    pub enabled: bool,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    /// Parse settings from TOML text, expanding `${ENV_VAR}` references.
    pub fn from_toml(raw: &str) -> Result<Self, SettingsError> {
        let expanded = expand_env_vars(raw)?;
        Ok(toml::from_str(&expanded)?)
    }
}

/// Expand `${VAR}` and `$VAR` references from the environment.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            while let Some(ch) = chars.next() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' {
                    var_name.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
        }
        if var_name.is_empty() {
            // A lone '$', keep it.
            result.push('$');
        } else {
            let value =
                env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
            result.push_str(&value);
        }
    }

    Ok(result)
}
