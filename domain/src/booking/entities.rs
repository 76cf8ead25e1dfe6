//! Booking entities: the confirmation snapshot and its lifecycle status.

use crate::core::error::DomainError;
use crate::session::entities::{CustomerInfo, SessionId};
use crate::trip::preferences::Preferences;
use crate::trip::view::ItineraryView;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Booking reference, `TRV-` followed by six upper-case alphanumerics
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookingId(String);

impl BookingId {
    pub const PREFIX: &'static str = "TRV-";
    pub const SUFFIX_LEN: usize = 6;

    /// Parse a booking reference; input is upper-cased first.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_ascii_uppercase();
        let valid = normalized
            .strip_prefix(Self::PREFIX)
            .is_some_and(|suffix| {
                suffix.len() == Self::SUFFIX_LEN
                    && suffix.chars().all(|c| c.is_ascii_alphanumeric())
            });
        if !valid {
            return Err(DomainError::InvalidInput(format!(
                "'{}' is not a booking reference",
                raw
            )));
        }
        Ok(Self(normalized))
    }

    /// Build a reference from its six-character suffix.
    pub fn from_suffix(suffix: &str) -> Result<Self, DomainError> {
        Self::parse(&format!("{}{}", Self::PREFIX, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookingId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BookingId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BookingId> for String {
    fn from(id: BookingId) -> Self {
        id.0
    }
}

/// Admin-managed lifecycle status of a booking
///
/// ```text
/// confirmed ──► completed ──► cancelled
///     └─────────────────────────▲
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled)
    }

    /// Whether moving from `self` to `next` is allowed.
    ///
    /// Re-applying the current status is always allowed.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Confirmed, Confirmed)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
                | (Completed, Completed)
                | (Completed, Cancelled)
                | (Cancelled, Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}

/// Snapshot of a session taken at confirmation (Entity)
///
/// Everything except `status` and `updated_at` is fixed at creation. Later
/// activity on the session never reaches the booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub session_id: SessionId,
    pub customer: CustomerInfo,
    pub preferences: Preferences,
    pub itinerary: ItineraryView,
    pub chat_summary: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn total_cost(&self) -> f64 {
        self.itinerary.total_cost
    }

    /// Move to `next`. Returns `true` if the status changed.
    pub fn update_status(
        &mut self,
        next: BookingStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidStatus(format!(
                "cannot move booking {} from {} to {}",
                self.id, self.status, next
            )));
        }
        if self.status == next {
            return Ok(false);
        }
        self.status = next;
        self.updated_at = at;
        Ok(true)
    }
}
