//! Configuration file loading for travel-concierge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables prefixed `CONCIERGE_` (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./concierge.toml` or `./.concierge.toml`
//! 4. Global: `~/.config/travel-concierge/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ChannelKind, FileCatalogConfig, FileChatConfig, FileConfig, FileItineraryConfig, FileLoggingConfig,
    FileNotificationConfig, FileRetrievalConfig, FileStorageConfig, FileWebConfig,
    StorageBackend,
};
pub use loader::ConfigLoader;
