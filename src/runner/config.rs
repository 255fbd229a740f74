//! Runner configuration.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default number of transitions kept in a runner's history.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Tunables for a [`Runner`](super::Runner).
///
/// Missing fields fall back to their defaults when deserializing.
///
/// # Example
///
/// ```rust
/// use linkstate::runner::RunnerConfig;
///
/// let config = RunnerConfig::from_json(r#"{ "debug_states": true }"#).unwrap();
/// assert!(config.debug_states);
/// assert_eq!(config.history_limit, Some(256));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Maximum retained history records; `None` keeps everything.
    pub history_limit: Option<usize>,

    /// Debug flag given to newly inserted states.
    pub debug_states: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            debug_states: false,
        }
    }
}

impl RunnerConfig {
    /// Parse a configuration from JSON; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
