//! Retrieval Router: internal knowledge first, the open web second.
//!
//! The router walks an ordered list of [`RetrievalSource`]s and returns the
//! first hit. Order is fixed at construction; a source is only consulted
//! after every source before it has missed, failed or timed out. When all
//! sources come up empty the result is [`RetrievalOutcome::NotFound`], a
//! value rather than an error, so callers can still compose a reply.

use crate::config::RetrievalParams;
use crate::ports::external_fetcher::{ExternalFetcher, FetchError};
use crate::ports::knowledge_store::{KnowledgeError, KnowledgeStore};
use async_trait::async_trait;
use concierge_domain::{ScoredDocument, WebSnippet};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Where a hit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalOrigin {
    KnowledgeStore,
    Web,
}

impl RetrievalOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalOrigin::KnowledgeStore => "knowledge_store",
            RetrievalOrigin::Web => "web",
        }
    }
}

/// Result of one retrieval
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalOutcome {
    /// Confident matches from the knowledge store, best first
    Internal(Vec<ScoredDocument>),
    /// Snippets from the web
    External(Vec<WebSnippet>),
    /// Nothing found anywhere
    NotFound,
}

impl RetrievalOutcome {
    pub fn origin(&self) -> Option<RetrievalOrigin> {
        match self {
            RetrievalOutcome::Internal(_) => Some(RetrievalOrigin::KnowledgeStore),
            RetrievalOutcome::External(_) => Some(RetrievalOrigin::Web),
            RetrievalOutcome::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, RetrievalOutcome::NotFound)
    }

    /// Label for logs and evaluation records.
    pub fn label(&self) -> &'static str {
        self.origin().map_or("not_found", |o| o.as_str())
    }
}

/// Failure of a single source. The router logs these and moves on.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// One step of the retrieval fallback chain
#[async_trait]
pub trait RetrievalSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` is a miss; the router then tries the next source.
    async fn lookup(&self, query: &str) -> Result<Option<RetrievalOutcome>, SourceError>;
}

/// Knowledge store lookup with a confidence threshold
pub struct KnowledgeStoreSource {
    store: Arc<dyn KnowledgeStore>,
    threshold: f32,
    top_k: usize,
}

impl KnowledgeStoreSource {
    pub fn new(store: Arc<dyn KnowledgeStore>, threshold: f32, top_k: usize) -> Self {
        Self {
            store,
            threshold,
            top_k,
        }
    }
}

#[async_trait]
impl RetrievalSource for KnowledgeStoreSource {
    fn name(&self) -> &'static str {
        "knowledge_store"
    }

    async fn lookup(&self, query: &str) -> Result<Option<RetrievalOutcome>, SourceError> {
        let confident: Vec<ScoredDocument> = self
            .store
            .search(query, self.top_k)
            .await?
            .into_iter()
            .filter(|d| d.score >= self.threshold)
            .collect();
        Ok((!confident.is_empty()).then_some(RetrievalOutcome::Internal(confident)))
    }
}

/// Web lookup through an [`ExternalFetcher`]
pub struct WebSource {
    fetcher: Arc<dyn ExternalFetcher>,
    max_results: usize,
}

impl WebSource {
    pub fn new(fetcher: Arc<dyn ExternalFetcher>, max_results: usize) -> Self {
        Self {
            fetcher,
            max_results,
        }
    }
}

#[async_trait]
impl RetrievalSource for WebSource {
    fn name(&self) -> &'static str {
        "web"
    }

    async fn lookup(&self, query: &str) -> Result<Option<RetrievalOutcome>, SourceError> {
        let snippets = self.fetcher.fetch(query, self.max_results).await?;
        Ok((!snippets.is_empty()).then_some(RetrievalOutcome::External(snippets)))
    }
}

/// Ordered fallback over retrieval sources
pub struct RetrievalRouter {
    sources: Vec<Arc<dyn RetrievalSource>>,
    source_timeout: Duration,
}

impl RetrievalRouter {
    pub fn new(source_timeout: Duration) -> Self {
        Self {
            sources: Vec::new(),
            source_timeout,
        }
    }

    /// Knowledge store, then web.
    pub fn standard(
        store: Arc<dyn KnowledgeStore>,
        fetcher: Arc<dyn ExternalFetcher>,
        params: &RetrievalParams,
    ) -> Self {
        Self::new(params.source_timeout)
            .with_source(Arc::new(KnowledgeStoreSource::new(
                store,
                params.similarity_threshold,
                params.top_k,
            )))
            .with_source(Arc::new(WebSource::new(fetcher, params.web_max_results)))
    }

    /// Append a source after the existing ones.
    pub fn with_source(mut self, source: Arc<dyn RetrievalSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Try each source in order and return the first hit.
    pub async fn retrieve(&self, query: &str) -> RetrievalOutcome {
        for source in &self.sources {
            match tokio::time::timeout(self.source_timeout, source.lookup(query)).await {
                Ok(Ok(Some(outcome))) => {
                    info!(source = source.name(), "Retrieval hit");
                    return outcome;
                }
                Ok(Ok(None)) => debug!(source = source.name(), "Retrieval miss"),
                Ok(Err(e)) => warn!(source = source.name(), error = %e, "Retrieval source failed"),
                Err(_) => warn!(
                    source = source.name(),
                    timeout_ms = self.source_timeout.as_millis() as u64,
                    "Retrieval source timed out"
                ),
            }
        }
        info!("No information found for query");
        RetrievalOutcome::NotFound
    }
}
