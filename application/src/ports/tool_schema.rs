//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain) from "how to serialize them for a
//! tool protocol" (infrastructure). The domain layer defines
//! [`ToolDefinition`] and [`ToolRegistry`]; this port handles the JSON Schema
//! conversion an automated caller needs to discover the catalog.

use cloudops_domain::{ToolDefinition, ToolRegistry};

/// Port for converting tool definitions to JSON Schema.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to provider-neutral JSON Schema.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools to a JSON Schema array (sorted by name).
    fn all_tools_schema(&self, registry: &ToolRegistry) -> Vec<serde_json::Value>;

    /// Convert read-only tools only (sorted by name).
    fn read_only_tools_schema(&self, registry: &ToolRegistry) -> Vec<serde_json::Value>;
}
