//! Port for structured evaluation logging.
//!
//! Defines the [`EvaluationLogger`] trait for recording per-turn quality and
//! booking success metrics (intent, retrieval source, latency, confirmations)
//! to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures machine-readable
//! records for offline evaluation (JSONL).

use serde_json::Value;

/// A structured evaluation event.
///
/// Each event has a type string and a JSON payload; adapters add the
/// timestamp when the record is written.
pub struct EvaluationEvent {
    /// Event type identifier (e.g., "turn_completed", "booking_confirmed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl EvaluationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging evaluation events.
///
/// The `log` method is synchronous and non-fallible: a logging failure must
/// not affect the turn being evaluated.
pub trait EvaluationLogger: Send + Sync {
    fn log(&self, event: EvaluationEvent);
}

/// No-op implementation for tests and when evaluation logging is disabled.
pub struct NoEvaluationLogger;

impl EvaluationLogger for NoEvaluationLogger {
    fn log(&self, _event: EvaluationEvent) {}
}
