use async_trait::async_trait;
use concierge_application::{NotificationChannel, NotificationError};
use concierge_domain::Notification;
use tracing::info;

/// Channel that records each notification as a structured log event.
pub struct LogNotificationChannel;

#[async_trait]
impl NotificationChannel for LogNotificationChannel {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), NotificationError> {
        info!(
            target: "concierge::admin",
            notification_id = %notification.id,
            booking_id = %notification.booking_id,
            session_id = %notification.session_id,
            customer_email = %notification.customer_email,
            destination = notification.destination.as_deref().unwrap_or("-"),
            total_cost = notification.total_cost,
            "New booking confirmed"
        );
        Ok(())
    }
}
