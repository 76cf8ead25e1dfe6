//! Concierge parameters: tuning knobs for the orchestration use cases.
//!
//! These are application-layer concerns filled from the configuration file
//! by the infrastructure layer; every field has a working default.

use concierge_domain::DEFAULT_NIGHTS;
use std::time::Duration;

/// Retrieval Router tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalParams {
    /// Minimum similarity score for a knowledge-store hit.
    pub similarity_threshold: f32,
    /// Documents requested from the knowledge store.
    pub top_k: usize,
    /// Per-source time budget; a slow source counts as a miss.
    pub source_timeout: Duration,
    /// Snippets requested from the web.
    pub web_max_results: usize,
}

impl Default for RetrievalParams {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.25,
            top_k: 5,
            source_timeout: Duration::from_secs(8),
            web_max_results: 5,
        }
    }
}

/// Chat input limits and history windows.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatParams {
    /// Longest accepted message, in characters.
    pub max_message_length: usize,
    /// Messages shown when summarising a conversation.
    pub history_window: usize,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            max_message_length: 2000,
            history_window: 10,
        }
    }
}

/// Notification delivery retries.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationParams {
    /// Delivery attempts per dispatch before the entry is left pending.
    pub max_attempts: u32,
    /// Base delay between attempts; grows linearly with the attempt number.
    pub retry_backoff: Duration,
}

impl Default for NotificationParams {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

/// All concierge parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ConciergeParams {
    pub retrieval: RetrievalParams,
    pub chat: ChatParams,
    pub notification: NotificationParams,
    /// Hotel nights charged when trip dates are unknown.
    pub default_nights: u32,
}

impl Default for ConciergeParams {
    fn default() -> Self {
        Self {
            retrieval: RetrievalParams::default(),
            chat: ChatParams::default(),
            notification: NotificationParams::default(),
            default_nights: DEFAULT_NIGHTS,
        }
    }
}

impl ConciergeParams {
    // ==================== Builder Methods ====================

    pub fn with_retrieval(mut self, retrieval: RetrievalParams) -> Self {
        self.retrieval = retrieval;
        self
    }

    pub fn with_chat(mut self, chat: ChatParams) -> Self {
        self.chat = chat;
        self
    }

    pub fn with_notification(mut self, notification: NotificationParams) -> Self {
        self.notification = notification;
        self
    }

    pub fn with_default_nights(mut self, nights: u32) -> Self {
        self.default_nights = nights.max(1);
        self
    }
}
