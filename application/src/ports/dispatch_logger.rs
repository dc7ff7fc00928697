//! Port for the structured dispatch audit log.
//!
//! Defines the [`DispatchLogger`] trait for recording one machine-readable
//! record per dispatch and per remediation batch.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures an audit
//! trail in a machine-readable format (JSONL). Records never carry
//! parameter values or secrets; the credential is identified by its
//! fingerprint only.

use serde_json::Value;

/// A structured audit event.
pub struct DispatchEvent {
    /// Event type identifier (e.g., "dispatch", "remediation").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl DispatchEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging audit events.
///
/// The `log` method is synchronous and infallible so that a broken audit
/// sink never changes the outcome of a dispatch.
pub trait DispatchLogger: Send + Sync {
    fn log(&self, event: DispatchEvent);
}

/// No-op implementation for tests and when the audit log is disabled.
pub struct NoDispatchLogger;

impl DispatchLogger for NoDispatchLogger {
    fn log(&self, _event: DispatchEvent) {}
}
