//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.
//! Session and booking repositories are domain traits and live in
//! `concierge-domain`.

pub mod evaluation_logger;
pub mod external_fetcher;
pub mod knowledge_store;
pub mod notification;
