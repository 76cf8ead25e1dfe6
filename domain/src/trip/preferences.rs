//! Travel preferences and per-field preference updates.

use crate::core::error::DomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Travel style, used to cap hotel prices in searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelStyle {
    Budget,
    Moderate,
    Luxury,
}

impl TravelStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelStyle::Budget => "budget",
            TravelStyle::Moderate => "moderate",
            TravelStyle::Luxury => "luxury",
        }
    }

    /// Nightly hotel price cap applied when searching hotels.
    pub fn hotel_price_cap(&self) -> Option<f64> {
        match self {
            TravelStyle::Budget => Some(150.0),
            TravelStyle::Moderate => Some(250.0),
            TravelStyle::Luxury => None,
        }
    }
}

impl fmt::Display for TravelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TravelStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "budget" | "cheap" | "backpacker" | "economy" => Ok(TravelStyle::Budget),
            "moderate" | "mid-range" | "midrange" | "standard" => Ok(TravelStyle::Moderate),
            "luxury" | "premium" | "upscale" => Ok(TravelStyle::Luxury),
            other => Err(DomainError::InvalidInput(format!(
                "unknown travel style '{}'",
                other
            ))),
        }
    }
}

/// Trip preferences gathered over the conversation.
///
/// Every field is optional and overwritten independently: applying an update
/// replaces only the fields the update carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub destination: Option<String>,
    pub origin: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub travel_style: Option<TravelStyle>,
}

impl Preferences {
    /// Apply an update, last write wins per field.
    pub fn apply(&mut self, update: &PreferenceUpdate) {
        if let Some(ref destination) = update.destination {
            self.destination = Some(destination.clone());
        }
        if let Some(ref origin) = update.origin {
            self.origin = Some(origin.clone());
        }
        if let Some(start) = update.start_date {
            self.start_date = Some(start);
        }
        if let Some(end) = update.end_date {
            self.end_date = Some(end);
        }
        if let Some(budget) = update.budget {
            self.budget = Some(budget);
        }
        if let Some(style) = update.travel_style {
            self.travel_style = Some(style);
        }
    }

    /// Nights between start and end date, if both are known and ordered.
    pub fn nights(&self) -> Option<u32> {
        let (start, end) = (self.start_date?, self.end_date?);
        let days = (end - start).num_days();
        if days > 0 { u32::try_from(days).ok() } else { None }
    }

    pub fn is_empty(&self) -> bool {
        *self == Preferences::default()
    }
}

/// Preference fields extracted from a single utterance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceUpdate {
    pub destination: Option<String>,
    pub origin: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub travel_style: Option<TravelStyle>,
}

impl PreferenceUpdate {
    pub fn is_empty(&self) -> bool {
        *self == PreferenceUpdate::default()
    }

    /// Names of the fields this update sets, for logging.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.destination.is_some() {
            names.push("destination");
        }
        if self.origin.is_some() {
            names.push("origin");
        }
        if self.start_date.is_some() {
            names.push("start_date");
        }
        if self.end_date.is_some() {
            names.push("end_date");
        }
        if self.budget.is_some() {
            names.push("budget");
        }
        if self.travel_style.is_some() {
            names.push("travel_style");
        }
        names
    }
}
