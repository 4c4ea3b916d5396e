//! Configuration management and environment variable loading

use crate::{Result, UnitError};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable holding the personality snapshot path
pub const ENV_SNAPSHOT_PATH: &str = "NEURAL_UNIT_SNAPSHOT_PATH";
/// Environment variable holding the default recall limit
pub const ENV_RECALL_LIMIT: &str = "NEURAL_UNIT_RECALL_LIMIT";
/// Environment variable toggling the host mirror
pub const ENV_MIRROR: &str = "NEURAL_UNIT_MIRROR";
/// Environment variable holding the log filter
pub const ENV_LOG_LEVEL: &str = "NEURAL_UNIT_LOG_LEVEL";

/// Default location of the personality snapshot file
pub const DEFAULT_SNAPSHOT_PATH: &str = "config/personality_snapshot.json";
/// Number of episodic records requested when no limit is given
pub const DEFAULT_RECALL_LIMIT: u16 = 16;

/// Host-side settings for talking to a neural unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitConfig {
    /// Where personality snapshots are saved and loaded
    pub snapshot_path: PathBuf,

    /// Record count sent with `RECALL` when the caller does not pick one
    pub recall_limit: u16,

    /// Whether domain components record successful round trips in a host mirror
    pub mirror_enabled: bool,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            recall_limit: DEFAULT_RECALL_LIMIT,
            mirror_enabled: true,
        }
    }
}

impl UnitConfig {
    /// Build a configuration from the process environment, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let recall_limit = match env::var(ENV_RECALL_LIMIT) {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| {
                UnitError::config(format!(
                    "{} must be an integer in 0..=65535, got '{}'",
                    ENV_RECALL_LIMIT, raw
                ))
            })?,
            Err(_) => DEFAULT_RECALL_LIMIT,
        };

        Ok(Self {
            snapshot_path: PathBuf::from(get_env_or(ENV_SNAPSHOT_PATH, DEFAULT_SNAPSHOT_PATH)),
            recall_limit,
            mirror_enabled: get_env_bool(ENV_MIRROR, true),
        })
    }
}

/// Merge the nearest `.env` file into the process environment
///
/// Variables already set in the environment win. Returns the file used, or
/// `None` when there is no `.env` to read.
pub fn load_env() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "merged .env");
            Ok(Some(path))
        }
        Err(dotenvy::Error::Io(_)) => Ok(None),
        Err(e) => Err(UnitError::config(format!(".env is malformed: {}", e))),
    }
}

/// Merge the env file at `path` into the process environment; the file must exist
pub fn load_env_from_path(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    dotenvy::from_path(path)
        .map_err(|e| UnitError::config(format!("cannot load {}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), "merged env file");
    Ok(())
}

/// Get optional environment variable with default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as boolean
pub fn get_env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| match v.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}
