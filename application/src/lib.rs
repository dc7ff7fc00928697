//! Application layer for cloudops
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ComplianceParams;
pub use ports::{
    client_resolver::{ClientFactory, ClientResolverPort},
    credentials::{CredentialError, CredentialResolver, RequestContext},
    dispatch_logger::{DispatchEvent, DispatchLogger, NoDispatchLogger},
    inventory::{BatchOperation, ListOperation},
    scan_progress::{NoScanProgress, ScanProgressNotifier},
    tool_schema::ToolSchemaPort,
};
pub use use_cases::compliance::{ComplianceEngine, ComplianceError, ScanPass};
pub use use_cases::dispatch::{Dispatcher, REGION_PARAM};
pub use use_cases::scan_inventory::InventoryScanner;
pub use use_cases::tool_operations::{ToolBatchOperation, ToolListOperation};
