//! Application-level configuration.
//!
//! - [`ConciergeParams`]: tuning for retrieval, chat limits, notification
//!   retries and the default stay length

pub mod concierge_params;

pub use concierge_params::{ChatParams, ConciergeParams, NotificationParams, RetrievalParams};
