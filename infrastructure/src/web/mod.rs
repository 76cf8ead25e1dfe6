//! **Web lookups**: the external knowledge fetcher
//!
//! Gated behind the `web-tools` Cargo feature flag:
//!
//! ```toml
//! # infrastructure/Cargo.toml
//! [features]
//! web-tools = ["dep:reqwest", "dep:scraper"]
//! ```
//!
//! Without the feature the binary wires
//! [`NoExternalFetcher`](concierge_application::NoExternalFetcher), which
//! always misses.

#[cfg(feature = "web-tools")]
mod duckduckgo;

#[cfg(feature = "web-tools")]
pub use duckduckgo::DuckDuckGoFetcher;
