//! Catalog item identifiers and the free-text id pattern.
//!
//! An item id is a two-letter kind prefix (`FL`, `HT`, `AC`) followed by
//! exactly three digits. Input is case-insensitive; ids are stored upper-case.
//!
//! [`extract_item_ids`] is the only place free text is scanned for ids. It is
//! kept separate from intent classification so its behavior can be pinned by
//! [`ITEM_ID_PATTERN_VERSION`].

use crate::core::error::DomainError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Version of the id pattern recognised by [`extract_item_ids`].
///
/// Version 1: `(FL|HT|AC)` + 3 digits, word-bounded, case-insensitive.
pub const ITEM_ID_PATTERN_VERSION: u32 = 1;

/// Number of digits after the kind prefix.
pub const ITEM_ID_DIGITS: usize = 3;

static ITEM_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(FL|HT|AC)(\d{3})\b").expect("item id regex"));

/// Kind of bookable catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Flight,
    Hotel,
    Activity,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Flight, ItemKind::Hotel, ItemKind::Activity];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Flight => "flight",
            ItemKind::Hotel => "hotel",
            ItemKind::Activity => "activity",
        }
    }

    /// Two-letter id prefix for this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            ItemKind::Flight => "FL",
            ItemKind::Hotel => "HT",
            ItemKind::Activity => "AC",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix.to_ascii_uppercase().as_str() {
            "FL" => Some(ItemKind::Flight),
            "HT" => Some(ItemKind::Hotel),
            "AC" => Some(ItemKind::Activity),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flight" | "flights" => Ok(ItemKind::Flight),
            "hotel" | "hotels" => Ok(ItemKind::Hotel),
            "activity" | "activities" => Ok(ItemKind::Activity),
            other => Err(DomainError::InvalidKind(other.to_string())),
        }
    }
}

/// Normalised catalog item id (e.g. `FL001`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Parse and normalise an id. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let valid = trimmed.len() == 2 + ITEM_ID_DIGITS
            && trimmed.is_ascii()
            && ItemKind::from_prefix(&trimmed[..2]).is_some()
            && trimmed[2..].chars().all(|c| c.is_ascii_digit());
        if !valid {
            return Err(DomainError::InvalidItemId(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Parse an id and check it belongs to `kind`.
    pub fn parse_for(kind: ItemKind, raw: &str) -> Result<Self, DomainError> {
        let id = Self::parse(raw)?;
        if id.kind() != kind {
            return Err(DomainError::not_found(kind_entity(kind), id.0));
        }
        Ok(id)
    }

    pub fn kind(&self) -> ItemKind {
        // The constructor guarantees a known prefix.
        ItemKind::from_prefix(&self.0[..2]).unwrap_or(ItemKind::Activity)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

/// Entity name used in `NotFound` errors for a kind.
pub fn kind_entity(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Flight => "Flight",
        ItemKind::Hotel => "Hotel",
        ItemKind::Activity => "Activity",
    }
}

/// Extract every catalog id mentioned in `text`.
///
/// Matching is case-insensitive; results are upper-cased and deduplicated,
/// keeping the order in which ids first appear.
pub fn extract_item_ids(text: &str) -> Vec<ItemId> {
    let mut ids: Vec<ItemId> = Vec::new();
    for caps in ITEM_ID_RE.captures_iter(text) {
        let raw = format!("{}{}", &caps[1], &caps[2]);
        if let Ok(id) = ItemId::parse(&raw)
            && !ids.contains(&id)
        {
            ids.push(id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalises_case() {
        let id = ItemId::parse("fl001").unwrap();
        assert_eq!(id.as_str(), "FL001");
        assert_eq!(id.kind(), ItemKind::Flight);
        assert_eq!(ItemId::parse(" Ht005 ").unwrap().as_str(), "HT005");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(ItemId::parse("FL01").is_err());
        assert!(ItemId::parse("FL0001").is_err());
        assert!(ItemId::parse("XX001").is_err());
        assert!(ItemId::parse("FLabc").is_err());
        assert!(ItemId::parse("").is_err());
        assert!(ItemId::parse("ＦＬ001").is_err());
    }

    #[test]
    fn test_parse_for_checks_kind() {
        assert!(ItemId::parse_for(ItemKind::Hotel, "ht002").is_ok());
        let err = ItemId::parse_for(ItemKind::Hotel, "FL002").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_extract_dedupes_in_first_seen_order() {
        let ids = extract_item_ids("Book ac002, then FL001 and AC002 again plus ht003.");
        let ids: Vec<&str> = ids.iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["AC002", "FL001", "HT003"]);
    }

    #[test]
    fn test_extract_ignores_embedded_and_wrong_width() {
        assert!(extract_item_ids("FL0012 xFL001 FL01").is_empty());
        assert!(extract_item_ids("no ids here").is_empty());
        assert_eq!(extract_item_ids("(FL001)").len(), 1);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Flights".parse::<ItemKind>().unwrap(), ItemKind::Flight);
        assert_eq!("hotel".parse::<ItemKind>().unwrap(), ItemKind::Hotel);
        assert!("car".parse::<ItemKind>().is_err());
    }

    #[test]
    fn test_item_id_serde_roundtrip_normalises() {
        let id: ItemId = serde_json::from_str("\"ac004\"").unwrap();
        assert_eq!(id.as_str(), "AC004");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"AC004\"");
        assert!(serde_json::from_str::<ItemId>("\"bogus\"").is_err());
    }
}
