//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod compliance;
pub mod dispatch;
pub mod scan_inventory;
pub mod tool_operations;
