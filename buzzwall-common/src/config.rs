//! Configuration loading
//!
//! Compiled defaults per deployment profile, optionally overridden by a
//! TOML config file. A missing config file is not an error: the service
//! logs a warning and starts with profile defaults.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::warn;

use crate::{Error, Result};

/// Deployment profile selecting compiled defaults
///
/// The demo profile carries a higher rate limit because many phones at a
/// venue often share one network address (corporate NAT, venue wifi).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentProfile {
    Production,
    #[default]
    Demo,
}

impl FromStr for DeploymentProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(DeploymentProfile::Production),
            "demo" | "dev" | "development" => Ok(DeploymentProfile::Demo),
            other => Err(Error::Config(format!("Unknown profile: {}", other))),
        }
    }
}

/// Word Board service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Capacity bound on the live word set; the oldest word is evicted
    /// when an insertion would exceed it
    pub max_words: usize,

    /// Word time-to-live in seconds
    pub word_ttl_secs: u64,

    /// Maximum word length in characters (after trimming)
    pub max_word_len: usize,

    /// Batch submissions are truncated to this many entries
    pub max_batch_size: usize,

    /// Rate limit window in seconds
    pub rate_limit_window_secs: u64,

    /// Requests allowed per client per window (profile-dependent default)
    pub rate_limit_max_requests: u32,

    /// Bearer token required for session reset; None leaves the reset
    /// route open (demo mode)
    pub admin_token: Option<String>,
}

/// TOML file schema: every field optional, merged over profile defaults
#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    max_words: Option<usize>,
    word_ttl_secs: Option<u64>,
    max_word_len: Option<usize>,
    max_batch_size: Option<usize>,
    rate_limit_window_secs: Option<u64>,
    rate_limit_max_requests: Option<u32>,
    admin_token: Option<String>,
}

impl Config {
    /// Compiled defaults for a deployment profile
    pub fn defaults_for(profile: DeploymentProfile) -> Self {
        Self {
            max_words: 200,
            word_ttl_secs: 30 * 60,
            max_word_len: 50,
            max_batch_size: 80,
            rate_limit_window_secs: 60,
            rate_limit_max_requests: match profile {
                DeploymentProfile::Production => 300,
                DeploymentProfile::Demo => 500,
            },
            admin_token: None,
        }
    }

    /// Load configuration: profile defaults, then TOML file overrides
    ///
    /// A `path` that does not exist logs a warning and falls back to
    /// defaults; a file that exists but fails to parse is an error.
    pub fn load(path: Option<&Path>, profile: DeploymentProfile) -> Result<Self> {
        let mut config = Self::defaults_for(profile);

        if let Some(path) = path {
            if path.exists() {
                let text = std::fs::read_to_string(path)?;
                let overrides: TomlConfig = toml::from_str(&text).map_err(|e| {
                    Error::Config(format!("Failed to parse {}: {}", path.display(), e))
                })?;
                config.apply(overrides);
            } else {
                warn!(
                    "Config file {} not found, using {:?} profile defaults",
                    path.display(),
                    profile
                );
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, overrides: TomlConfig) {
        if let Some(v) = overrides.max_words {
            self.max_words = v;
        }
        if let Some(v) = overrides.word_ttl_secs {
            self.word_ttl_secs = v;
        }
        if let Some(v) = overrides.max_word_len {
            self.max_word_len = v;
        }
        if let Some(v) = overrides.max_batch_size {
            self.max_batch_size = v;
        }
        if let Some(v) = overrides.rate_limit_window_secs {
            self.rate_limit_window_secs = v;
        }
        if let Some(v) = overrides.rate_limit_max_requests {
            self.rate_limit_max_requests = v;
        }
        if overrides.admin_token.is_some() {
            self.admin_token = overrides.admin_token;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.max_words == 0 {
            return Err(Error::Config("max_words must be at least 1".to_string()));
        }
        if self.max_word_len == 0 {
            return Err(Error::Config("max_word_len must be at least 1".to_string()));
        }
        if self.max_batch_size == 0 {
            return Err(Error::Config("max_batch_size must be at least 1".to_string()));
        }
        if self.rate_limit_max_requests == 0 {
            return Err(Error::Config(
                "rate_limit_max_requests must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
