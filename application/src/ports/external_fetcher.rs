//! External knowledge fetcher port
//!
//! Consulted only after the knowledge store has missed.

use async_trait::async_trait;
use concierge_domain::WebSnippet;
use thiserror::Error;

/// Errors that can occur when fetching from the web
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Unexpected response: {0}")]
    Parse(String),
}

/// Open-web search source
#[async_trait]
pub trait ExternalFetcher: Send + Sync {
    /// Short source name for logs
    fn name(&self) -> &'static str;

    /// At most `max_results` snippets. An empty list is a miss, not an error.
    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<WebSnippet>, FetchError>;
}

/// Fetcher that never finds anything, used when web lookups are off
pub struct NoExternalFetcher;

#[async_trait]
impl ExternalFetcher for NoExternalFetcher {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn fetch(&self, _query: &str, _max_results: usize) -> Result<Vec<WebSnippet>, FetchError> {
        Ok(Vec::new())
    }
}
