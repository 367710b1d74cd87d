//! # Engine Configuration

use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_PAIRWISE_TEMPLATE;

/// Comparison engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Comparison location template used when the project manifest does
    /// not carry its own; `%A`/`%B` are replaced by treatment file keys.
    pub pairwise_url_template: String,

    /// Per-candidate fetch timeout in seconds. A candidate that times
    /// out is treated as absent.
    pub fetch_timeout_secs: u64,

    /// Suffix appended to the project identity to form the persistent
    /// storage key of the saved-transcript set.
    pub storage_key_suffix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pairwise_url_template: DEFAULT_PAIRWISE_TEMPLATE.to_string(),
            fetch_timeout_secs: 30,
            storage_key_suffix: "-watched".to_string(),
        }
    }
}

impl EngineConfig {
    /// Create a config for testing (short timeout).
    pub fn for_testing() -> Self {
        Self {
            fetch_timeout_secs: 2,
            ..Self::default()
        }
    }
}
