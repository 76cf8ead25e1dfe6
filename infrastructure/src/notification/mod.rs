//! Admin notification channels
//!
//! - [`LogNotificationChannel`]: writes the notification to the operation log
//! - [`WebhookNotificationChannel`]: POSTs it as JSON (`web-tools` feature)

mod log_channel;
#[cfg(feature = "web-tools")]
mod webhook;

pub use log_channel::LogNotificationChannel;
#[cfg(feature = "web-tools")]
pub use webhook::WebhookNotificationChannel;
