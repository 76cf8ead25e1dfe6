//! Admin notification raised when a booking is confirmed.

use super::entities::{Booking, BookingId};
use crate::session::entities::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery state of a notification in the outbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Delivery {
    Pending {
        attempts: u32,
        last_error: Option<String>,
    },
    Delivered {
        attempts: u32,
        at: DateTime<Utc>,
    },
}

/// Booking confirmation notice for the admin team
///
/// Carries the booking fields an admin needs without loading the booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub booking_id: BookingId,
    pub session_id: SessionId,
    pub customer_email: String,
    pub customer_name: Option<String>,
    pub destination: Option<String>,
    pub total_cost: f64,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub delivery: Delivery,
}

impl Notification {
    pub fn for_booking(id: impl Into<String>, booking: &Booking, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            booking_id: booking.id.clone(),
            session_id: booking.session_id.clone(),
            customer_email: booking.customer.email.clone(),
            customer_name: booking.customer.name.clone(),
            destination: booking.preferences.destination.clone(),
            total_cost: booking.total_cost(),
            created_at: at,
            read: false,
            delivery: Delivery::Pending {
                attempts: 0,
                last_error: None,
            },
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.delivery, Delivery::Pending { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self.delivery {
            Delivery::Pending { attempts, .. } | Delivery::Delivered { attempts, .. } => attempts,
        }
    }

    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.delivery = Delivery::Pending {
            attempts: self.attempts() + 1,
            last_error: Some(error.into()),
        };
    }

    pub fn record_delivery(&mut self, at: DateTime<Utc>) {
        self.delivery = Delivery::Delivered {
            attempts: self.attempts() + 1,
            at,
        };
    }

    /// Short human-readable line for channels and feeds.
    pub fn headline(&self) -> String {
        format!(
            "New booking {} from {} to {} (${:.2})",
            self.booking_id,
            self.customer_name.as_deref().unwrap_or(&self.customer_email),
            self.destination.as_deref().unwrap_or("an unspecified destination"),
            self.total_cost
        )
    }
}
