//! Runtime configuration for the curation core.
//!
//! Values come from environment variables. Every field has a default suitable
//! for local development, and the combined result is range-checked with
//! `validator` before use.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default lock time-to-live in seconds (10 minutes).
pub const DEFAULT_LOCK_TTL_SECS: i64 = 600;

/// Minimum allowed lock TTL in seconds.
pub const MIN_LOCK_TTL_SECS: i64 = 1;

/// Maximum allowed lock TTL in seconds (24 hours).
pub const MAX_LOCK_TTL_SECS: i64 = 86_400;

pub const ENV_ANONYMOUS_ACCESS: &str = "CAN_ANONYMOUS_ACCESS_SHARED_RESOURCES";
pub const ENV_LOCK_TTL_SECS: &str = "LOCK_TTL_SECS";
pub const ENV_FAMILY_WRITE_MODE: &str = "VERSION_FAMILY_WRITE_MODE";

// ---------------------------------------------------------------------------
// Write mode
// ---------------------------------------------------------------------------

/// How the version-family manager persists read-modify-write sequences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyWriteMode {
    /// Unconditional saves. Concurrent writers on the same family may lose
    /// each other's updates.
    #[default]
    LastWriteWins,
    /// Revision-stamped saves. A writer holding a stale snapshot fails with
    /// a conflict instead of overwriting.
    CompareAndSwap,
}

impl FromStr for FamilyWriteMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "last_write_wins" => Ok(FamilyWriteMode::LastWriteWins),
            "compare_and_swap" => Ok(FamilyWriteMode::CompareAndSwap),
            other => Err(ConfigError::InvalidValue {
                var: ENV_FAMILY_WRITE_MODE,
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Curation core configuration.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct CurationConfig {
    /// Whether anonymous users may read global (unowned) resources.
    pub can_anonymous_access_shared_resources: bool,
    /// Age after which an unreleased object lock is considered abandoned.
    #[validate(range(min = 1, max = 86400))]
    pub lock_ttl_secs: i64,
    /// Persistence discipline for version-family writes.
    pub family_write_mode: FamilyWriteMode,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            can_anonymous_access_shared_resources: false,
            lock_ttl_secs: DEFAULT_LOCK_TTL_SECS,
            family_write_mode: FamilyWriteMode::default(),
        }
    }
}

impl CurationConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                                 | Default           |
    /// |-----------------------------------------|-------------------|
    /// | `CAN_ANONYMOUS_ACCESS_SHARED_RESOURCES` | `false`           |
    /// | `LOCK_TTL_SECS`                         | `600`             |
    /// | `VERSION_FAMILY_WRITE_MODE`             | `last_write_wins` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let can_anonymous_access_shared_resources = match lookup(ENV_ANONYMOUS_ACCESS) {
            Some(raw) => parse_bool(ENV_ANONYMOUS_ACCESS, &raw)?,
            None => defaults.can_anonymous_access_shared_resources,
        };

        let lock_ttl_secs = match lookup(ENV_LOCK_TTL_SECS) {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: ENV_LOCK_TTL_SECS,
                    value: raw.clone(),
                })?,
            None => defaults.lock_ttl_secs,
        };

        let family_write_mode = match lookup(ENV_FAMILY_WRITE_MODE) {
            Some(raw) => raw.parse()?,
            None => defaults.family_write_mode,
        };

        let config = Self {
            can_anonymous_access_shared_resources,
            lock_ttl_secs,
            family_write_mode,
        };
        config.validate()?;
        Ok(config)
    }

    /// The lock TTL as a duration.
    pub fn lock_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.lock_ttl_secs)
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
