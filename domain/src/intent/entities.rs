//! Intent tags and extraction results.

use crate::catalog::item_id::{ItemId, ItemKind};
use crate::trip::preferences::PreferenceUpdate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a customer turn is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    SearchFlights,
    SearchHotels,
    SearchActivities,
    RefinePreferences,
    AddItem,
    ConfirmBooking,
    AdminQuery,
    Smalltalk,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::SearchFlights => "search_flights",
            Intent::SearchHotels => "search_hotels",
            Intent::SearchActivities => "search_activities",
            Intent::RefinePreferences => "refine_preferences",
            Intent::AddItem => "add_item",
            Intent::ConfirmBooking => "confirm_booking",
            Intent::AdminQuery => "admin_query",
            Intent::Smalltalk => "smalltalk",
        }
    }

    pub fn is_search(&self) -> bool {
        self.search_kind().is_some()
    }

    /// Catalog kind a search intent lists.
    pub fn search_kind(&self) -> Option<ItemKind> {
        match self {
            Intent::SearchFlights => Some(ItemKind::Flight),
            Intent::SearchHotels => Some(ItemKind::Hotel),
            Intent::SearchActivities => Some(ItemKind::Activity),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured reading of one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedIntent {
    pub intent: Intent,
    /// Preference fields that differ from the current preferences
    pub updates: PreferenceUpdate,
    /// Catalog ids mentioned in the text, first-seen order
    pub item_ids: Vec<ItemId>,
    /// Topic the customer wants information about (e.g. `"visa"`)
    pub information_need: Option<String>,
    pub raw_text: String,
}

impl ExtractedIntent {
    /// Whether the turn may consult the knowledge store and the web.
    pub fn is_informational(&self) -> bool {
        self.intent.is_search()
            || (self.intent == Intent::Smalltalk && self.information_need.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(intent: Intent, need: Option<&str>) -> ExtractedIntent {
        ExtractedIntent {
            intent,
            updates: PreferenceUpdate::default(),
            item_ids: Vec::new(),
            information_need: need.map(str::to_string),
            raw_text: String::new(),
        }
    }

    #[test]
    fn test_informational_turns() {
        assert!(extracted(Intent::SearchHotels, None).is_informational());
        assert!(extracted(Intent::Smalltalk, Some("visa")).is_informational());
        assert!(!extracted(Intent::Smalltalk, None).is_informational());
        assert!(!extracted(Intent::AddItem, Some("tips")).is_informational());
        assert!(!extracted(Intent::RefinePreferences, Some("tips")).is_informational());
        assert!(!extracted(Intent::ConfirmBooking, None).is_informational());
    }

    #[test]
    fn test_intent_serde_tags() {
        assert_eq!(
            serde_json::to_string(&Intent::ConfirmBooking).unwrap(),
            "\"confirm_booking\""
        );
        assert_eq!(Intent::SearchFlights.search_kind(), Some(ItemKind::Flight));
        assert_eq!(Intent::AdminQuery.search_kind(), None);
    }
}
