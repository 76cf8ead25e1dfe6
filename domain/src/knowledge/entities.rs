//! Knowledge documents, travel guides and web snippets.

use crate::catalog::entities::CatalogItem;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// What a knowledge document describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Flight,
    Hotel,
    Activity,
    Guide,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Flight => "flight",
            DocumentKind::Hotel => "hotel",
            DocumentKind::Activity => "activity",
            DocumentKind::Guide => "guide",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Indexed travel fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub id: String,
    pub kind: DocumentKind,
    pub city: Option<String>,
    pub content: String,
}

impl KnowledgeDocument {
    /// Describe a catalog item in prose.
    pub fn from_catalog_item(item: &CatalogItem) -> Self {
        let (kind, content) = match item {
            CatalogItem::Flight(f) => (
                DocumentKind::Flight,
                format!(
                    "Flight from {} to {} on {}. Departure: {}, Arrival: {}. Price: ${} {} class.",
                    f.from, f.to, f.airline, f.departure, f.arrival, f.price, f.class
                ),
            ),
            CatalogItem::Hotel(h) => (
                DocumentKind::Hotel,
                format!(
                    "{} hotel in {}. Rating: {} stars. ${} per night. Amenities: {}. {}",
                    h.name,
                    h.city,
                    h.rating,
                    h.price_per_night,
                    h.amenities.join(", "),
                    h.description
                ),
            ),
            CatalogItem::Activity(a) => (
                DocumentKind::Activity,
                format!(
                    "{} in {}. Duration: {}, Price: ${}. {}",
                    a.name, a.city, a.duration, a.price, a.description
                ),
            ),
        };
        Self {
            id: format!("{}_{}", kind, item.id()),
            kind,
            city: Some(item.city().to_string()),
            content,
        }
    }
}

/// Document with its similarity to a query, in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: KnowledgeDocument,
    pub score: f32,
}

/// Destination guide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelGuide {
    pub city: String,
    pub best_time: String,
    pub currency: String,
    pub language: String,
    pub tips: Vec<String>,
    pub must_see: Vec<String>,
}

impl TravelGuide {
    pub fn to_document(&self) -> KnowledgeDocument {
        KnowledgeDocument {
            id: format!("guide_{}", self.city.to_lowercase().replace(' ', "_")),
            kind: DocumentKind::Guide,
            city: Some(self.city.clone()),
            content: format!(
                "Travel guide for {}. Best time to visit: {}. Currency: {}. Language: {}. Must see: {}. Tips: {}",
                self.city,
                self.best_time,
                self.currency,
                self.language,
                self.must_see.join(", "),
                self.tips.join(" ")
            ),
        }
    }

    /// Markdown rendering used in customer replies.
    pub fn render(&self) -> String {
        let mut out = format!("**Travel Guide: {}**\n\n", self.city);
        let _ = writeln!(out, "**Best Time to Visit:** {}", self.best_time);
        let _ = writeln!(out, "**Currency:** {}", self.currency);
        let _ = write!(out, "**Language:** {}\n\n", self.language);
        out.push_str("**Must-See Attractions:**\n");
        for place in &self.must_see {
            let _ = writeln!(out, "- {}", place);
        }
        out.push_str("\n**Travel Tips:**\n");
        for tip in &self.tips {
            let _ = writeln!(out, "- {}", tip);
        }
        out
    }
}

/// One web search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSnippet {
    pub title: String,
    pub url: String,
    pub snippet: String,
}
