//! Chat and itinerary configuration from TOML (`[chat]`, `[itinerary]` sections)

use concierge_application::ChatParams;
use concierge_domain::{ConfigIssue, ConfigIssueCode, DEFAULT_NIGHTS};
use serde::{Deserialize, Serialize};

/// Raw chat configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Longest accepted customer message, in characters
    pub max_message_length: usize,
    /// Messages quoted when summarising a conversation for an admin
    pub history_window: usize,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        let defaults = ChatParams::default();
        Self {
            max_message_length: defaults.max_message_length,
            history_window: defaults.history_window,
        }
    }
}

impl FileChatConfig {
    pub fn to_params(&self) -> (ChatParams, Vec<ConfigIssue>) {
        let mut params = ChatParams::default();
        let mut issues = Vec::new();
        if self.max_message_length > 0 {
            params.max_message_length = self.max_message_length;
        } else {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange,
                format!(
                    "chat.max_message_length must be at least 1, using {}",
                    params.max_message_length
                ),
            ));
        }
        if self.history_window > 0 {
            params.history_window = self.history_window;
        } else {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange,
                format!(
                    "chat.history_window must be at least 1, using {}",
                    params.history_window
                ),
            ));
        }
        (params, issues)
    }
}

/// Raw itinerary configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileItineraryConfig {
    /// Hotel nights charged when trip dates are unknown
    pub default_nights: u32,
}

impl Default for FileItineraryConfig {
    fn default() -> Self {
        Self {
            default_nights: DEFAULT_NIGHTS,
        }
    }
}

impl FileItineraryConfig {
    pub fn parse_default_nights(&self) -> (u32, Vec<ConfigIssue>) {
        if self.default_nights == 0 {
            let issue = ConfigIssue::warning(
                ConfigIssueCode::OutOfRange,
                format!(
                    "itinerary.default_nights must be at least 1, using {}",
                    DEFAULT_NIGHTS
                ),
            );
            return (DEFAULT_NIGHTS, vec![issue]);
        }
        (self.default_nights, Vec::new())
    }
}
