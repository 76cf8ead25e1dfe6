//! Booking repository trait

use super::entities::{Booking, BookingId};
use crate::session::repository::RepositoryError;
use async_trait::async_trait;

/// Keyed store of bookings
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn load(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError>;

    /// Insert or replace a booking
    async fn save(&self, booking: &Booking) -> Result<(), RepositoryError>;

    /// Delete a booking; unknown ids are ignored
    async fn delete(&self, id: &BookingId) -> Result<(), RepositoryError>;

    /// All bookings, in no particular order
    async fn list(&self) -> Result<Vec<Booking>, RepositoryError>;
}
