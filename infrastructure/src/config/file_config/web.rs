//! Web lookup configuration from TOML (`[web]` section)

use serde::{Deserialize, Serialize};

/// Raw web configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWebConfig {
    /// Consult the web when the knowledge store misses
    pub enabled: bool,
    pub user_agent: String,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FileWebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            user_agent: concat!("TravelConcierge/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}
