//! In-memory adapters

use async_trait::async_trait;
use concierge_application::NotificationOutbox;
use concierge_domain::{
    Booking, BookingId, BookingRepository, Notification, RepositoryError, Session, SessionId,
    SessionRepository,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<(), RepositoryError> {
        self.sessions
            .write()
            .await
            .insert(session.id().clone(), session.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Session>, RepositoryError> {
        let mut sessions: Vec<Session> = self.sessions.read().await.values().cloned().collect();
        sessions.sort_by(|a, b| a.created_at().cmp(&b.created_at()));
        Ok(sessions)
    }
}

#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<HashMap<BookingId, Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn load(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        Ok(self.bookings.read().await.get(id).cloned())
    }

    async fn save(&self, booking: &Booking) -> Result<(), RepositoryError> {
        self.bookings
            .write()
            .await
            .insert(booking.id.clone(), booking.clone());
        Ok(())
    }

    async fn delete(&self, id: &BookingId) -> Result<(), RepositoryError> {
        self.bookings.write().await.remove(id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Booking>, RepositoryError> {
        Ok(self.bookings.read().await.values().cloned().collect())
    }
}

#[derive(Default)]
pub struct InMemoryOutbox {
    entries: RwLock<HashMap<String, Notification>>,
}

impl InMemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationOutbox for InMemoryOutbox {
    async fn enqueue(&self, notification: &Notification) -> Result<(), RepositoryError> {
        self.entries
            .write()
            .await
            .insert(notification.id.clone(), notification.clone());
        Ok(())
    }

    async fn update(&self, notification: &Notification) -> Result<(), RepositoryError> {
        self.enqueue(notification).await
    }

    async fn get(&self, id: &str) -> Result<Option<Notification>, RepositoryError> {
        Ok(self.entries.read().await.get(id).cloned())
    }

    async fn remove(&self, id: &str) -> Result<(), RepositoryError> {
        self.entries.write().await.remove(id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Notification>, RepositoryError> {
        Ok(self.entries.read().await.values().cloned().collect())
    }
}
