//! Notification configuration from TOML (`[notification]` section)

use concierge_application::NotificationParams;
use concierge_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on `max_attempts`
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;
/// Upper bound on `retry_backoff_ms`
pub const MAX_RETRY_BACKOFF_MS: u64 = 30_000;

/// Delivery channel for admin notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelKind {
    /// Write notifications to the diagnostic log
    Log,
    /// POST notifications as JSON to a URL
    Webhook(String),
}

/// Raw notification configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNotificationConfig {
    /// `log` or `webhook`
    pub channel: String,
    /// Target URL for the `webhook` channel
    pub webhook_url: Option<String>,
    /// Delivery attempts per dispatch
    pub max_attempts: u32,
    /// Base delay between attempts, in milliseconds
    pub retry_backoff_ms: u64,
}

impl Default for FileNotificationConfig {
    fn default() -> Self {
        let defaults = NotificationParams::default();
        Self {
            channel: "log".to_string(),
            webhook_url: None,
            max_attempts: defaults.max_attempts,
            retry_backoff_ms: defaults.retry_backoff.as_millis() as u64,
        }
    }
}

impl FileNotificationConfig {
    pub fn parse_channel(&self) -> (ChannelKind, Vec<ConfigIssue>) {
        match self.channel.trim().to_lowercase().as_str() {
            "log" => (ChannelKind::Log, Vec::new()),
            "webhook" => match self.webhook_url.as_deref().map(str::trim) {
                Some(url) if !url.is_empty() => (ChannelKind::Webhook(url.to_string()), Vec::new()),
                _ => (
                    ChannelKind::Log,
                    vec![ConfigIssue::warning(
                        ConfigIssueCode::MissingValue,
                        "notification.webhook_url is required for the webhook channel, using log",
                    )],
                ),
            },
            other => (
                ChannelKind::Log,
                vec![ConfigIssue::warning(
                    ConfigIssueCode::UnknownValue,
                    format!(
                        "notification.channel: unknown value '{}' (expected log or webhook), using log",
                        other
                    ),
                )],
            ),
        }
    }

    pub fn to_params(&self) -> (NotificationParams, Vec<ConfigIssue>) {
        let mut params = NotificationParams::default();
        let mut issues = Vec::new();
        if (1..=MAX_ATTEMPTS_LIMIT).contains(&self.max_attempts) {
            params.max_attempts = self.max_attempts;
        } else {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange,
                format!(
                    "notification.max_attempts must be between 1 and {}, using {}",
                    MAX_ATTEMPTS_LIMIT, params.max_attempts
                ),
            ));
        }
        if self.retry_backoff_ms <= MAX_RETRY_BACKOFF_MS {
            params.retry_backoff = Duration::from_millis(self.retry_backoff_ms);
        } else {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange,
                format!(
                    "notification.retry_backoff_ms must be at most {}, using {}",
                    MAX_RETRY_BACKOFF_MS,
                    params.retry_backoff.as_millis()
                ),
            ));
        }
        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_requires_url() {
        let mut config = FileNotificationConfig {
            channel: "webhook".to_string(),
            ..Default::default()
        };
        let (kind, issues) = config.parse_channel();
        assert_eq!(kind, ChannelKind::Log);
        assert_eq!(issues[0].code, ConfigIssueCode::MissingValue);

        config.webhook_url = Some("https://hooks.example.com/admin".to_string());
        let (kind, issues) = config.parse_channel();
        assert_eq!(
            kind,
            ChannelKind::Webhook("https://hooks.example.com/admin".to_string())
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_out_of_range_retry_settings_fall_back() {
        let defaults = NotificationParams::default();
        let config = FileNotificationConfig {
            max_attempts: 1_000,
            retry_backoff_ms: u64::MAX,
            ..Default::default()
        };
        let (params, issues) = config.to_params();
        assert_eq!(params.max_attempts, defaults.max_attempts);
        assert_eq!(params.retry_backoff, defaults.retry_backoff);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.code == ConfigIssueCode::OutOfRange));

        let config = FileNotificationConfig {
            max_attempts: 5,
            retry_backoff_ms: MAX_RETRY_BACKOFF_MS,
            ..Default::default()
        };
        let (params, issues) = config.to_params();
        assert_eq!(params.max_attempts, 5);
        assert_eq!(params.retry_backoff, Duration::from_millis(MAX_RETRY_BACKOFF_MS));
        assert!(issues.is_empty());
    }

    #[test]
    fn test_unknown_channel() {
        let config = FileNotificationConfig {
            channel: "pager".to_string(),
            ..Default::default()
        };
        let (kind, issues) = config.parse_channel();
        assert_eq!(kind, ChannelKind::Log);
        assert_eq!(issues[0].code, ConfigIssueCode::UnknownValue);
    }
}
