//! In-memory similarity index over catalog descriptions and city guides.
//!
//! Documents and queries are turned into term-frequency vectors (lower-cased
//! alphanumeric tokens, stop words dropped, a trailing plural `s` folded) and
//! compared by cosine similarity. Term frequencies are non-negative, so every
//! score lies in `[0, 1]`.

use async_trait::async_trait;
use concierge_application::{KnowledgeError, KnowledgeStore};
use concierge_domain::{
    Catalog, CatalogItem, KnowledgeDocument, ScoredDocument, TravelGuide,
};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("token regex"));

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "of", "to", "in", "on", "at", "for", "with", "is", "are",
    "be", "it", "its", "by", "from", "as", "what", "when", "where", "how", "which", "who", "do",
    "does", "i", "me", "my", "we", "our", "you", "your", "this", "that", "there", "any", "some",
    "can", "should", "would", "about", "tell", "please", "want", "like",
];

fn term_vector(text: &str) -> HashMap<String, f32> {
    let lower = text.to_lowercase();
    let mut terms: HashMap<String, f32> = HashMap::new();
    for token in TOKEN_RE.find_iter(&lower).map(|m| m.as_str()) {
        if STOP_WORDS.contains(&token) {
            continue;
        }
        let term = match token.strip_suffix('s') {
            Some(stem) if stem.len() >= 3 && !stem.ends_with('s') => stem,
            _ => token,
        };
        *terms.entry(term.to_string()).or_default() += 1.0;
    }
    terms
}

fn norm(vector: &HashMap<String, f32>) -> f32 {
    vector.values().map(|v| v * v).sum::<f32>().sqrt()
}

struct IndexedDocument {
    document: KnowledgeDocument,
    terms: HashMap<String, f32>,
    norm: f32,
}

/// Read-only knowledge store held in process memory
#[derive(Default)]
pub struct InMemoryKnowledgeStore {
    entries: Vec<IndexedDocument>,
    guides: Vec<TravelGuide>,
}

impl InMemoryKnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every catalog item and guide.
    pub fn from_catalog(catalog: &Catalog, guides: Vec<TravelGuide>) -> Self {
        let items = catalog
            .flights()
            .cloned()
            .map(CatalogItem::from)
            .chain(catalog.hotels().cloned().map(CatalogItem::from))
            .chain(catalog.activities().cloned().map(CatalogItem::from));

        let mut store = Self::new();
        for item in items {
            store.index(KnowledgeDocument::from_catalog_item(&item));
        }
        for guide in guides {
            store = store.with_guide(guide);
        }
        debug!(documents = store.len(), "Knowledge store indexed");
        store
    }

    pub fn with_guide(mut self, guide: TravelGuide) -> Self {
        self.index(guide.to_document());
        self.guides.push(guide);
        self
    }

    pub fn with_document(mut self, document: KnowledgeDocument) -> Self {
        self.index(document);
        self
    }

    fn index(&mut self, document: KnowledgeDocument) {
        let terms = term_vector(&document.content);
        let norm = norm(&terms);
        self.entries.push(IndexedDocument {
            document,
            terms,
            norm,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, KnowledgeError> {
        let query_terms = term_vector(query);
        let query_norm = norm(&query_terms);
        if query_norm == 0.0 {
            return Err(KnowledgeError::InvalidQuery(format!(
                "'{}' has no searchable terms",
                query
            )));
        }

        let mut scored: Vec<ScoredDocument> = self
            .entries
            .iter()
            .filter(|e| e.norm > 0.0)
            .filter_map(|entry| {
                let dot: f32 = query_terms
                    .iter()
                    .filter_map(|(term, weight)| entry.terms.get(term).map(|w| w * weight))
                    .sum();
                (dot > 0.0).then(|| ScoredDocument {
                    document: entry.document.clone(),
                    score: (dot / (query_norm * entry.norm)).min(1.0),
                })
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        debug!(query, hits = scored.len(), "Knowledge search");
        Ok(scored)
    }

    async fn guide_for(&self, city: &str) -> Result<Option<TravelGuide>, KnowledgeError> {
        let needle = city.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }
        Ok(self
            .guides
            .iter()
            .find(|g| g.city.to_lowercase().contains(&needle))
            .cloned())
    }
}
