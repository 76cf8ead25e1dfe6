//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section has working defaults; values that cannot be used are
//! reported by [`FileConfig::validate`] and replaced by their defaults.

mod catalog;
mod chat;
mod logging;
mod notification;
mod retrieval;
mod storage;
mod web;

pub use catalog::FileCatalogConfig;
pub use chat::{FileChatConfig, FileItineraryConfig};
pub use logging::FileLoggingConfig;
pub use notification::{ChannelKind, FileNotificationConfig};
pub use retrieval::FileRetrievalConfig;
pub use storage::{FileStorageConfig, StorageBackend};
pub use web::FileWebConfig;

use concierge_application::ConciergeParams;
use concierge_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Inventory source
    pub catalog: FileCatalogConfig,
    /// Knowledge-store and web retrieval settings
    pub retrieval: FileRetrievalConfig,
    /// Itinerary pricing settings
    pub itinerary: FileItineraryConfig,
    /// Chat limits
    pub chat: FileChatConfig,
    /// Session, booking and notification storage
    pub storage: FileStorageConfig,
    /// Admin notification delivery
    pub notification: FileNotificationConfig,
    /// Evaluation and diagnostic log files
    pub logging: FileLoggingConfig,
    /// Web lookups
    pub web: FileWebConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.retrieval.to_params().1);
        issues.extend(self.itinerary.parse_default_nights().1);
        issues.extend(self.chat.to_params().1);
        issues.extend(self.storage.parse_backend().1);
        issues.extend(self.notification.parse_channel().1);
        issues.extend(self.notification.to_params().1);
        issues
    }

    /// Application parameters with invalid values replaced by defaults.
    pub fn to_params(&self) -> ConciergeParams {
        ConciergeParams::default()
            .with_retrieval(self.retrieval.to_params().0)
            .with_chat(self.chat.to_params().0)
            .with_notification(self.notification.to_params().0)
            .with_default_nights(self.itinerary.parse_default_nights().0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[retrieval]
similarity_threshold = 0.4
top_k = 3
timeout_secs = 2

[itinerary]
default_nights = 2

[chat]
max_message_length = 500

[storage]
backend = "json"
data_dir = "/var/lib/concierge"

[notification]
channel = "webhook"
webhook_url = "https://hooks.example.com/bookings"
max_attempts = 5

[logging]
evaluation_log = "eval.jsonl"

[web]
enabled = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_empty());

        let params = config.to_params();
        assert_eq!(params.retrieval.similarity_threshold, 0.4);
        assert_eq!(params.retrieval.top_k, 3);
        assert_eq!(params.retrieval.source_timeout, Duration::from_secs(2));
        assert_eq!(params.default_nights, 2);
        assert_eq!(params.chat.max_message_length, 500);
        assert_eq!(params.notification.max_attempts, 5);
        assert_eq!(config.storage.parse_backend().0, StorageBackend::Json);
        assert_eq!(config.logging.evaluation_log.as_deref(), Some("eval.jsonl"));
        assert!(!config.web.enabled);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[chat]
history_window = 4
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.chat.history_window, 4);
        // Defaults should apply
        assert_eq!(config.chat.max_message_length, 2000);
        assert_eq!(config.storage.backend, "memory");
        assert!(config.web.enabled);
    }

    #[test]
    fn test_invalid_values_warn_and_fall_back() {
        let toml_str = r#"
[itinerary]
default_nights = 0

[storage]
backend = "redis"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(!ConfigIssue::has_errors(&issues));
        assert_eq!(config.to_params().default_nights, 1);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.to_params(), ConciergeParams::default());
    }
}
