use async_trait::async_trait;
use concierge_application::{NotificationChannel, NotificationError};
use concierge_domain::Notification;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Body posted to the webhook
#[derive(Serialize)]
struct WebhookPayload<'a> {
    event: &'static str,
    notification_id: &'a str,
    booking_id: &'a str,
    session_id: &'a str,
    customer_email: &'a str,
    customer_name: Option<&'a str>,
    destination: Option<&'a str>,
    total_cost: f64,
    created_at: String,
}

impl<'a> From<&'a Notification> for WebhookPayload<'a> {
    fn from(n: &'a Notification) -> Self {
        Self {
            event: "booking_confirmed",
            notification_id: &n.id,
            booking_id: n.booking_id.as_str(),
            session_id: n.session_id.as_str(),
            customer_email: &n.customer_email,
            customer_name: n.customer_name.as_deref(),
            destination: n.destination.as_deref(),
            total_cost: n.total_cost,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// Channel that POSTs each notification as JSON.
///
/// 5xx and transport errors are reported as unavailable (retryable by the
/// workflow); other non-success statuses as rejected.
pub struct WebhookNotificationChannel {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotificationChannel {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotificationError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl NotificationChannel for WebhookNotificationChannel {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload::from(notification))
            .send()
            .await
            .map_err(|e| NotificationError::Unavailable(e.to_string()))?;

        let status = response.status();
        debug!(url = %self.url, status = status.as_u16(), "Webhook response");
        if status.is_success() {
            Ok(())
        } else if status.is_server_error() {
            Err(NotificationError::Unavailable(format!("HTTP {}", status.as_u16())))
        } else {
            Err(NotificationError::Rejected(format!("HTTP {}", status.as_u16())))
        }
    }
}
