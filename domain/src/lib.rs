//! Domain layer for the travel concierge
//!
//! This crate contains the planning core: entities, value objects and the
//! pure engines that operate on them. It performs no I/O; persistence is
//! expressed as repository traits implemented by the infrastructure layer.
//!
//! # Core Concepts
//!
//! - **Session**: one customer's conversation, the aggregate root that owns
//!   preferences, itinerary and chat history
//! - **Itinerary**: catalog selections resolved against the [`Catalog`] on
//!   every read; frozen once confirmed
//! - **Booking**: snapshot of a confirmed session with an admin-managed status
//! - **Intent**: the structured reading of one customer utterance

pub mod booking;
pub mod catalog;
pub mod config;
pub mod core;
pub mod intent;
pub mod knowledge;
pub mod session;
pub mod trip;
pub mod util;

// Re-export commonly used types
pub use booking::{
    entities::{Booking, BookingId, BookingStatus},
    notification::{Delivery, Notification},
    repository::BookingRepository,
};
pub use catalog::{
    entities::{Activity, CatalogItem, Flight, Hotel},
    inventory::Catalog,
    item_id::{ITEM_ID_PATTERN_VERSION, ItemId, ItemKind, extract_item_ids},
};
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::error::DomainError;
pub use intent::{
    entities::{ExtractedIntent, Intent},
    extractor::IntentExtractor,
};
pub use knowledge::entities::{
    DocumentKind, KnowledgeDocument, ScoredDocument, TravelGuide, WebSnippet,
};
pub use session::{
    entities::{ChatEntry, CustomerInfo, Role, Session, SessionId, SessionSummary},
    repository::{RepositoryError, SessionRepository},
};
pub use trip::{
    engine::{DEFAULT_NIGHTS, ItineraryEngine},
    itinerary::{Itinerary, ItinerarySelection},
    preferences::{PreferenceUpdate, Preferences, TravelStyle},
    view::ItineraryView,
};
