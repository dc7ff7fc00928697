//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod client_resolver;
pub mod credentials;
pub mod dispatch_logger;
pub mod inventory;
pub mod scan_progress;
pub mod tool_schema;
