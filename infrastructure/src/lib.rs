//! Infrastructure layer for the travel concierge
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod catalog;
pub mod config;
pub mod knowledge;
pub mod logging;
pub mod notification;
pub mod storage;
pub mod web;

// Re-export commonly used types
pub use catalog::{CatalogData, CatalogLoadError};
pub use config::{
    ChannelKind, ConfigLoader, FileCatalogConfig, FileChatConfig, FileConfig,
    FileItineraryConfig, FileLoggingConfig, FileNotificationConfig, FileRetrievalConfig,
    FileStorageConfig, FileWebConfig, StorageBackend,
};
pub use knowledge::InMemoryKnowledgeStore;
pub use logging::JsonlEvaluationLogger;
pub use notification::LogNotificationChannel;
#[cfg(feature = "web-tools")]
pub use notification::WebhookNotificationChannel;
pub use storage::{
    InMemoryBookingRepository, InMemoryOutbox, InMemorySessionRepository, JsonBookingRepository,
    JsonOutbox, JsonSessionRepository,
};
#[cfg(feature = "web-tools")]
pub use web::DuckDuckGoFetcher;
