//! Knowledge store port
//!
//! Read-only similarity search over indexed travel facts. The orchestrator
//! never writes to the store; adapters load their documents at startup.

use async_trait::async_trait;
use concierge_domain::{ScoredDocument, TravelGuide};
use thiserror::Error;

/// Errors that can occur when querying the knowledge store
#[derive(Error, Debug, Clone)]
pub enum KnowledgeError {
    #[error("Knowledge store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Similarity-searchable store of travel documents
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Up to `top_k` documents, best first, each scored in `[0, 1]`
    async fn search(&self, query: &str, top_k: usize)
    -> Result<Vec<ScoredDocument>, KnowledgeError>;

    /// Destination guide for a city, if one is indexed
    async fn guide_for(&self, city: &str) -> Result<Option<TravelGuide>, KnowledgeError>;
}
