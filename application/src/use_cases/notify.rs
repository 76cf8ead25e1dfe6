//! Notification workflow: durable enqueue, then bounded delivery attempts.

use crate::config::NotificationParams;
use crate::error::ConciergeError;
use crate::ports::notification::{NotificationChannel, NotificationOutbox};
use chrono::Utc;
use concierge_domain::{Booking, DomainError, Notification};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Dispatches booking notifications at least once
///
/// The outbox write is the durability point. Delivery failures only leave
/// the entry pending for [`retry_pending`](Self::retry_pending).
pub struct NotificationWorkflow {
    outbox: Arc<dyn NotificationOutbox>,
    channel: Arc<dyn NotificationChannel>,
    params: NotificationParams,
}

impl NotificationWorkflow {
    pub fn new(
        outbox: Arc<dyn NotificationOutbox>,
        channel: Arc<dyn NotificationChannel>,
        params: NotificationParams,
    ) -> Self {
        Self {
            outbox,
            channel,
            params,
        }
    }

    /// Enqueue a notification for `booking` and try to deliver it.
    pub async fn dispatch(&self, booking: &Booking) -> Result<Notification, ConciergeError> {
        let notification = self.enqueue(booking).await?;
        self.deliver_queued(notification).await
    }

    /// Store a pending notification for `booking` in the outbox.
    pub async fn enqueue(&self, booking: &Booking) -> Result<Notification, ConciergeError> {
        let notification =
            Notification::for_booking(Uuid::new_v4().to_string(), booking, Utc::now());
        self.outbox.enqueue(&notification).await?;
        info!(
            booking_id = %booking.id,
            notification_id = %notification.id,
            "Notification queued"
        );
        Ok(notification)
    }

    /// Try to deliver an already queued notification.
    pub async fn deliver_queued(
        &self,
        mut notification: Notification,
    ) -> Result<Notification, ConciergeError> {
        self.deliver(&mut notification).await?;
        Ok(notification)
    }

    /// Remove a queued notification whose booking was rolled back.
    pub async fn discard(&self, id: &str) -> Result<(), ConciergeError> {
        self.outbox.remove(id).await?;
        info!(notification_id = %id, "Notification discarded");
        Ok(())
    }

    /// Attempt delivery up to `max_attempts` times and store the result.
    async fn deliver(&self, notification: &mut Notification) -> Result<bool, ConciergeError> {
        let attempts = self.params.max_attempts.max(1);
        let mut delivered = false;
        for attempt in 1..=attempts {
            match self.channel.deliver(notification).await {
                Ok(()) => {
                    notification.record_delivery(Utc::now());
                    info!(
                        notification_id = %notification.id,
                        channel = self.channel.name(),
                        attempt,
                        "Notification delivered"
                    );
                    delivered = true;
                    break;
                }
                Err(e) => {
                    notification.record_failure(e.to_string());
                    warn!(
                        notification_id = %notification.id,
                        channel = self.channel.name(),
                        attempt,
                        error = %e,
                        "Notification delivery failed"
                    );
                    if attempt < attempts {
                        tokio::time::sleep(self.backoff_for(attempt)).await;
                    }
                }
            }
        }
        self.outbox.update(notification).await?;
        Ok(delivered)
    }

    /// Delay after failed attempt `attempt`, saturating at `Duration::MAX`.
    fn backoff_for(&self, attempt: u32) -> Duration {
        self.params.retry_backoff.saturating_mul(attempt)
    }

    /// Retry every pending notification. Returns how many were delivered.
    pub async fn retry_pending(&self) -> Result<usize, ConciergeError> {
        let mut delivered = 0;
        for mut notification in self.outbox.list().await? {
            if notification.is_pending() && self.deliver(&mut notification).await? {
                delivered += 1;
            }
        }
        Ok(delivered)
    }

    /// All notifications, newest first.
    pub async fn list(&self) -> Result<Vec<Notification>, ConciergeError> {
        let mut all = self.outbox.list().await?;
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    pub async fn mark_read(&self, id: &str) -> Result<Notification, ConciergeError> {
        let mut notification = self
            .outbox
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Notification", id))?;
        if !notification.read {
            notification.read = true;
            self.outbox.update(&notification).await?;
        }
        Ok(notification)
    }
}
