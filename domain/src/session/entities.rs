//! Session domain entities

use crate::booking::entities::BookingId;
use crate::core::error::DomainError;
use crate::trip::itinerary::Itinerary;
use crate::trip::preferences::{PreferenceUpdate, Preferences};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Author of a chat entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One entry of the append-only chat history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Contact details collected before confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl CustomerInfo {
    /// Build customer info, trimming fields and rejecting a malformed email.
    pub fn new(
        email: &str,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Self, DomainError> {
        let email = email.trim();
        let well_formed = email
            .split_once('@')
            .is_some_and(|(local, host)| !local.is_empty() && host.contains('.'));
        if !well_formed {
            return Err(DomainError::InvalidInput(format!(
                "'{}' is not a valid email address",
                email
            )));
        }
        let clean = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Ok(Self {
            email: email.to_string(),
            name: clean(name),
            phone: clean(phone),
        })
    }
}

/// One customer's planning conversation (aggregate root)
///
/// Owns its preferences, itinerary and chat history exclusively. The
/// confirmed flag is the itinerary's; once set, the itinerary is frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    created_at: DateTime<Utc>,
    preferences: Preferences,
    itinerary: Itinerary,
    history: Vec<ChatEntry>,
    customer: Option<CustomerInfo>,
    booking_id: Option<BookingId>,
}

impl Session {
    pub fn new(id: SessionId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            preferences: Preferences::default(),
            itinerary: Itinerary::new(),
            history: Vec::new(),
            customer: None,
            booking_id: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn itinerary(&self) -> &Itinerary {
        &self.itinerary
    }

    pub fn history(&self) -> &[ChatEntry] {
        &self.history
    }

    pub fn customer(&self) -> Option<&CustomerInfo> {
        self.customer.as_ref()
    }

    pub fn booking_id(&self) -> Option<&BookingId> {
        self.booking_id.as_ref()
    }

    pub fn is_confirmed(&self) -> bool {
        self.itinerary.is_confirmed()
    }

    pub fn message_count(&self) -> usize {
        self.history.len()
    }

    /// Append to the chat history. History is never reordered or trimmed.
    pub fn append_message(&mut self, role: Role, content: impl Into<String>, at: DateTime<Utc>) {
        self.history.push(ChatEntry {
            role,
            content: content.into(),
            timestamp: at,
        });
    }

    /// Merge a preference update. Ignored once the itinerary is confirmed,
    /// since hotel nights are priced from the trip dates.
    pub fn apply_preferences(&mut self, update: &PreferenceUpdate) -> bool {
        if self.is_confirmed() {
            return false;
        }
        self.preferences.apply(update);
        true
    }

    pub fn set_customer(&mut self, customer: CustomerInfo) {
        self.customer = Some(customer);
    }

    /// The last `n` history entries, oldest first.
    pub fn recent_history(&self, n: usize) -> &[ChatEntry] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// One-line digest stored on the booking snapshot.
    pub fn chat_summary(&self) -> String {
        let destination = self
            .preferences
            .destination
            .as_deref()
            .unwrap_or("not specified");
        format!(
            "Customer had {} messages; destination {}",
            self.history.len(),
            destination
        )
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            created_at: self.created_at,
            destination: self.preferences.destination.clone(),
            confirmed: self.is_confirmed(),
            message_count: self.history.len(),
        }
    }

    pub(crate) fn itinerary_mut(&mut self) -> &mut Itinerary {
        &mut self.itinerary
    }

    pub(crate) fn record_booking(&mut self, booking_id: BookingId) {
        self.booking_id = Some(booking_id);
    }
}

/// Row of the session list read model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub destination: Option<String>,
    pub confirmed: bool,
    pub message_count: usize,
}
