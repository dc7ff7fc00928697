//! Tool domain entities

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::mapping::ParameterMapping;
use super::operation::RemoteOperation;
use super::schema::ParameterSchema;
use super::validation::UnknownFieldPolicy;

/// Risk level of a tool operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Low risk - read-only operations (e.g., list, describe)
    Low,
    /// High risk - operations that modify remote state (e.g., terminate, create)
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::High => "high",
        }
    }

    pub fn is_mutating(&self) -> bool {
        matches!(self, RiskLevel::High)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declarative description of a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Globally unique name of the tool (e.g., "ec2_list_instances")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Family of remote operations sharing a client type (e.g., "compute")
    pub domain: String,
    /// Risk level of this tool
    pub risk_level: RiskLevel,
    /// Accepted inputs
    pub schema: ParameterSchema,
    /// Normalization from generic names to the adapter's shape
    #[serde(default)]
    pub mapping: ParameterMapping,
    /// Reject parameters the schema does not declare
    #[serde(default)]
    pub strict: bool,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        domain: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            domain: domain.into(),
            risk_level,
            schema: ParameterSchema::new(),
            mapping: ParameterMapping::new(),
            strict: false,
        }
    }

    pub fn with_schema(mut self, schema: ParameterSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_mapping(mut self, mapping: ParameterMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn unknown_field_policy(&self) -> UnknownFieldPolicy {
        if self.strict {
            UnknownFieldPolicy::Reject
        } else {
            UnknownFieldPolicy::PassThrough
        }
    }

    pub fn is_mutating(&self) -> bool {
        self.risk_level.is_mutating()
    }
}

/// A [`ToolDefinition`] bound to the adapter that performs it.
#[derive(Clone)]
pub struct ToolDescriptor {
    definition: ToolDefinition,
    operation: Arc<dyn RemoteOperation>,
}

impl ToolDescriptor {
    pub fn new(definition: ToolDefinition, operation: Arc<dyn RemoteOperation>) -> Self {
        Self {
            definition,
            operation,
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn domain(&self) -> &str {
        &self.definition.domain
    }

    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    pub fn schema(&self) -> &ParameterSchema {
        &self.definition.schema
    }

    pub fn operation(&self) -> &Arc<dyn RemoteOperation> {
        &self.operation
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.definition.name)
            .field("domain", &self.definition.domain)
            .field("operation", &self.operation.operation_name())
            .finish()
    }
}

/// A call to a tool with arguments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: Map::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Merge every field of a JSON object into the arguments
    pub fn with_args(mut self, args: Map<String, Value>) -> Self {
        self.arguments.extend(args);
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::schema::FieldSpec;
    use serde_json::json;

    #[test]
    fn test_risk_level() {
        assert!(!RiskLevel::Low.is_mutating());
        assert!(RiskLevel::High.is_mutating());
        assert_eq!(RiskLevel::High.to_string(), "high");
    }

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new(
            "dynamodb_describe_table",
            "Describe a table",
            "database",
            RiskLevel::Low,
        )
        .with_schema(ParameterSchema::new().field(FieldSpec::string("table_name", "Table").required()));

        assert_eq!(tool.name, "dynamodb_describe_table");
        assert_eq!(tool.domain, "database");
        assert!(!tool.is_mutating());
        assert_eq!(tool.schema.len(), 1);
        assert_eq!(tool.unknown_field_policy(), UnknownFieldPolicy::PassThrough);
        assert_eq!(tool.strict().unknown_field_policy(), UnknownFieldPolicy::Reject);
    }

    #[test]
    fn test_tool_call() {
        let call = ToolCall::new("ec2_describe_instance").with_arg("instance_id", "i-123");

        assert_eq!(call.tool_name, "ec2_describe_instance");
        assert_eq!(call.get_string("instance_id"), Some("i-123"));
        assert_eq!(call.get_string("missing"), None);
    }

    #[test]
    fn test_tool_call_with_args_merges() {
        let mut extra = Map::new();
        extra.insert("limit".to_string(), json!(5));
        let call = ToolCall::new("dynamodb_list_tables")
            .with_arg("limit", 1)
            .with_args(extra);

        assert_eq!(call.arguments["limit"], json!(5));
    }
}
