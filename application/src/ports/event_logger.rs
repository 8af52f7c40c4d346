//! Port for structured request event logging.
//!
//! Records what happened during a request (thoughts generated, consensus
//! outcome, optimization result, degraded answers) as machine-readable
//! events. Diagnostic messages go through `tracing` instead.

use serde_json::Value;

/// A structured request event.
pub struct RequestEvent {
    /// Event type identifier (e.g., "thoughts_generated", "consensus").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl RequestEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging request events.
///
/// `log` is synchronous and infallible; adapters swallow their own I/O
/// failures so the request keeps going.
pub trait RequestEventLogger: Send + Sync {
    fn log(&self, event: RequestEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoEventLogger;

impl RequestEventLogger for NoEventLogger {
    fn log(&self, _event: RequestEvent) {}
}
