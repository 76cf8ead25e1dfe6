//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving evaluation events; disabled when unset
    pub evaluation_log: Option<String>,
    /// Diagnostic log file; stderr only when unset
    pub file: Option<String>,
}
