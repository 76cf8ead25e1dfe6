//! Notification ports: the durable outbox and the delivery channel.
//!
//! A confirmation first lands in the [`NotificationOutbox`]; delivery through
//! a [`NotificationChannel`] happens afterwards and may be retried. A failed
//! delivery never undoes the confirmation.

use async_trait::async_trait;
use concierge_domain::{Notification, RepositoryError};
use thiserror::Error;

/// Errors raised by a delivery channel
#[derive(Error, Debug, Clone)]
pub enum NotificationError {
    #[error("Channel unavailable: {0}")]
    Unavailable(String),

    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// Where admin notifications are sent
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn deliver(&self, notification: &Notification) -> Result<(), NotificationError>;
}

/// Channel that accepts everything and does nothing
pub struct NoNotificationChannel;

#[async_trait]
impl NotificationChannel for NoNotificationChannel {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn deliver(&self, _notification: &Notification) -> Result<(), NotificationError> {
        Ok(())
    }
}

/// Durable store of notifications and their delivery state
#[async_trait]
pub trait NotificationOutbox: Send + Sync {
    /// Store a new notification
    async fn enqueue(&self, notification: &Notification) -> Result<(), RepositoryError>;

    /// Replace a stored notification (delivery state, read flag)
    async fn update(&self, notification: &Notification) -> Result<(), RepositoryError>;

    async fn get(&self, id: &str) -> Result<Option<Notification>, RepositoryError>;

    /// Delete a notification; unknown ids are ignored
    async fn remove(&self, id: &str) -> Result<(), RepositoryError>;

    /// All notifications, in no particular order
    async fn list(&self) -> Result<Vec<Notification>, RepositoryError>;
}
