//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] that produces provider-neutral
//! JSON Schema for automated callers discovering the catalog.

use cloudops_application::ports::tool_schema::ToolSchemaPort;
use cloudops_domain::{FieldKind, FieldSpec, ParameterSchema, ToolDefinition, ToolRegistry};
use serde_json::{Map, Value, json};

/// Default implementation producing provider-neutral JSON Schema.
///
/// Kind → JSON Schema mapping:
/// - `string`, `integer`, `number`, `boolean`, `object`, `array` → same `type`
/// - `enum` → `"string"` with an `enum` list
/// - nested schema on `object` → `properties` / `required`
/// - nested schema on `array` → `items` as an object schema
/// - element kind on `array` → `items` with that `type`
pub struct JsonSchemaConverter;

impl JsonSchemaConverter {
    fn object_schema(schema: &ParameterSchema, strict: bool) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in schema.fields() {
            properties.insert(field.name.clone(), Self::field_schema(field));
            if field.required {
                required.push(json!(field.name));
            }
        }

        let mut object = json!({
            "type": "object",
            "properties": properties,
            "required": required,
        });
        if strict && let Value::Object(map) = &mut object {
            map.insert("additionalProperties".to_string(), json!(false));
        }
        object
    }

    fn field_schema(field: &FieldSpec) -> Value {
        let mut prop = Map::new();
        prop.insert("type".to_string(), json!(field.kind.json_type()));
        prop.insert("description".to_string(), json!(field.description));

        if let Some(values) = &field.allowed_values {
            prop.insert("enum".to_string(), json!(values));
        }
        if let Some(default) = &field.default {
            prop.insert("default".to_string(), default.clone());
        }
        if let Some(nested) = &field.nested {
            match field.kind {
                FieldKind::Object => {
                    if let Value::Object(object) = Self::object_schema(nested, false) {
                        prop.extend(object);
                    }
                }
                FieldKind::Array => {
                    prop.insert("items".to_string(), Self::object_schema(nested, false));
                }
                _ => {}
            }
        }
        if let Some(items) = field.items {
            prop.insert("items".to_string(), json!({"type": items.json_type()}));
        }

        Value::Object(prop)
    }
}

impl ToolSchemaPort for JsonSchemaConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": Self::object_schema(&tool.schema, tool.strict),
        })
    }

    fn all_tools_schema(&self, registry: &ToolRegistry) -> Vec<Value> {
        let mut tools: Vec<&ToolDefinition> = registry.all().map(|d| d.definition()).collect();
        tools.sort_by_key(|t| &t.name);
        tools.into_iter().map(|t| self.tool_to_schema(t)).collect()
    }

    fn read_only_tools_schema(&self, registry: &ToolRegistry) -> Vec<Value> {
        let mut tools: Vec<&ToolDefinition> = registry
            .all()
            .map(|d| d.definition())
            .filter(|t| !t.is_mutating())
            .collect();
        tools.sort_by_key(|t| &t.name);
        tools.into_iter().map(|t| self.tool_to_schema(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cloudops_domain::{ClientHandle, RemoteError, RemoteOperation, RiskLevel, ToolDescriptor};
    use std::sync::Arc;

    struct Noop;

    #[async_trait]
    impl RemoteOperation for Noop {
        fn operation_name(&self) -> &str {
            "Noop"
        }

        async fn invoke(
            &self,
            _params: &Map<String, Value>,
            _client: &ClientHandle,
        ) -> Result<Value, RemoteError> {
            Ok(Value::Null)
        }
    }

    fn create_table() -> ToolDefinition {
        ToolDefinition::new("create_table", "Create a table", "database", RiskLevel::High)
            .with_schema(
                ParameterSchema::new()
                    .field(FieldSpec::string("table_name", "Table name").required())
                    .field(
                        FieldSpec::array("key_schema", "Keys").required().with_nested(
                            ParameterSchema::new()
                                .field(FieldSpec::string("attribute_name", "Name").required())
                                .field(
                                    FieldSpec::enumeration("key_type", "Type", ["HASH", "RANGE"])
                                        .required(),
                                ),
                        ),
                    )
                    .field(
                        FieldSpec::enumeration("billing_mode", "Mode", ["PAY_PER_REQUEST", "PROVISIONED"])
                            .with_default("PAY_PER_REQUEST"),
                    )
                    .field(FieldSpec::integer("read_capacity_units", "RCU")),
            )
    }

    #[test]
    fn test_tool_to_schema() {
        let schema = JsonSchemaConverter.tool_to_schema(&create_table());

        assert_eq!(schema["name"], "create_table");
        assert_eq!(schema["input_schema"]["type"], "object");
        assert!(schema["input_schema"].get("additionalProperties").is_none());

        let props = &schema["input_schema"]["properties"];
        assert_eq!(props["read_capacity_units"]["type"], "integer");
        assert_eq!(props["billing_mode"]["type"], "string");
        assert_eq!(props["billing_mode"]["enum"], json!(["PAY_PER_REQUEST", "PROVISIONED"]));
        assert_eq!(props["billing_mode"]["default"], "PAY_PER_REQUEST");

        let items = &props["key_schema"]["items"];
        assert_eq!(items["type"], "object");
        assert_eq!(items["properties"]["key_type"]["enum"], json!(["HASH", "RANGE"]));
        assert_eq!(items["required"], json!(["attribute_name", "key_type"]));

        assert_eq!(
            schema["input_schema"]["required"],
            json!(["table_name", "key_schema"])
        );
    }

    #[test]
    fn test_nested_object_and_strict() {
        let tool = ToolDefinition::new("put", "Put", "database", RiskLevel::High)
            .with_schema(ParameterSchema::new().field(
                FieldSpec::object("item", "Item").with_nested(
                    ParameterSchema::new().field(FieldSpec::string("id", "Id").required()),
                ),
            ))
            .strict();

        let schema = JsonSchemaConverter.tool_to_schema(&tool);

        assert_eq!(schema["input_schema"]["additionalProperties"], false);
        let item = &schema["input_schema"]["properties"]["item"];
        assert_eq!(item["type"], "object");
        assert_eq!(item["description"], "Item");
        assert_eq!(item["required"], json!(["id"]));
    }

    #[test]
    fn test_scalar_array_declares_item_type() {
        let tool = ToolDefinition::new("terminate", "Terminate", "compute", RiskLevel::High)
            .with_schema(
                ParameterSchema::new()
                    .field(FieldSpec::string_array("instance_ids", "Ids").required()),
            );

        let schema = JsonSchemaConverter.tool_to_schema(&tool);

        let ids = &schema["input_schema"]["properties"]["instance_ids"];
        assert_eq!(ids["type"], "array");
        assert_eq!(ids["items"], json!({"type": "string"}));
    }

    #[test]
    fn test_all_and_read_only_schemas_are_sorted() {
        let registry = ToolRegistry::builder()
            .register_all([
                ToolDescriptor::new(create_table(), Arc::new(Noop)),
                ToolDescriptor::new(
                    ToolDefinition::new("list_tables", "List", "database", RiskLevel::Low),
                    Arc::new(Noop),
                ),
                ToolDescriptor::new(
                    ToolDefinition::new("describe_table", "Describe", "database", RiskLevel::Low),
                    Arc::new(Noop),
                ),
            ])
            .unwrap()
            .build();

        let all = JsonSchemaConverter.all_tools_schema(&registry);
        let names: Vec<&str> = all.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["create_table", "describe_table", "list_tables"]);

        let read_only = JsonSchemaConverter.read_only_tools_schema(&registry);
        assert_eq!(read_only.len(), 2);
        assert!(read_only.iter().all(|t| t["name"] != "create_table"));
    }
}
