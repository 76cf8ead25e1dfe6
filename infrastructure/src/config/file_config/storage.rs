//! Storage configuration from TOML (`[storage]` section)

use concierge_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where sessions, bookings and notifications are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process memory; nothing survives a restart
    Memory,
    /// One JSON file per record under `data_dir`
    Json,
}

/// Raw storage configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// `memory` or `json`
    pub backend: String,
    /// Root directory for the `json` backend
    pub data_dir: Option<String>,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            data_dir: None,
        }
    }
}

impl FileStorageConfig {
    pub fn parse_backend(&self) -> (StorageBackend, Vec<ConfigIssue>) {
        match self.backend.trim().to_lowercase().as_str() {
            "memory" | "in-memory" => (StorageBackend::Memory, Vec::new()),
            "json" | "file" | "files" => (StorageBackend::Json, Vec::new()),
            other => (
                StorageBackend::Memory,
                vec![ConfigIssue::warning(
                    ConfigIssueCode::UnknownValue,
                    format!(
                        "storage.backend: unknown value '{}' (expected memory or json), using memory",
                        other
                    ),
                )],
            ),
        }
    }

    /// Data directory, defaulting to the platform data dir.
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("travel-concierge"),
        }
    }
}
