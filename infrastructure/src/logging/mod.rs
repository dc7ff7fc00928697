//! Logging infrastructure: the structured dispatch audit log.
//!
//! Provides [`JsonlDispatchLogger`], a JSONL file writer that implements
//! the [`DispatchLogger`](cloudops_application::DispatchLogger) port.

mod audit_log;

pub use audit_log::JsonlDispatchLogger;
