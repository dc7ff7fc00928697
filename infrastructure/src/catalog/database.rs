//! `database` domain: DynamoDB tables.

use cloudops_domain::{
    FieldSpec, Gate, ParameterMapping, ParameterSchema, RiskLevel, ToolDefinition,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{region_field, reshape};

pub const DOMAIN: &str = "database";

pub const LIST_TABLES: &str = "dynamodb_list_tables";
pub const DESCRIBE_TABLE: &str = "dynamodb_describe_table";
pub const CREATE_TABLE: &str = "dynamodb_create_table";
pub const DELETE_TABLE: &str = "dynamodb_delete_table";

/// Cursor parameter of [`LIST_TABLES`]
pub const EXCLUSIVE_START: &str = "exclusive_start_table_name";

pub const DEFAULT_LIST_LIMIT: i64 = 100;

pub const PAY_PER_REQUEST: &str = "PAY_PER_REQUEST";
pub const PROVISIONED: &str = "PROVISIONED";

/// Target of the gated capacity group
pub const PROVISIONED_THROUGHPUT: &str = "provisioned_throughput";
/// Target of the stream settings group
pub const STREAM_SPECIFICATION: &str = "stream_specification";

// ==================== Definitions ====================

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        list_tables(),
        table_by_name(DESCRIBE_TABLE, "Describe one table", RiskLevel::Low),
        create_table(),
        table_by_name(DELETE_TABLE, "Delete a table and all its items", RiskLevel::High),
    ]
}

fn list_tables() -> ToolDefinition {
    ToolDefinition::new(LIST_TABLES, "List table names", DOMAIN, RiskLevel::Low).with_schema(
        ParameterSchema::new()
            .field(FieldSpec::integer("limit", "Page size (1-100)").with_default(DEFAULT_LIST_LIMIT))
            .field(FieldSpec::string(EXCLUSIVE_START, "Cursor from a previous page"))
            .field(region_field()),
    )
}

fn table_by_name(name: &str, description: &str, risk: RiskLevel) -> ToolDefinition {
    ToolDefinition::new(name, description, DOMAIN, risk).with_schema(
        ParameterSchema::new()
            .field(FieldSpec::string("table_name", "Table name").required())
            .field(region_field()),
    )
}

fn create_table() -> ToolDefinition {
    let key_element = ParameterSchema::new()
        .field(FieldSpec::string("attribute_name", "Key attribute").required())
        .field(FieldSpec::enumeration("key_type", "Partition or sort key", ["HASH", "RANGE"]).required());
    let attribute = ParameterSchema::new()
        .field(FieldSpec::string("attribute_name", "Attribute name").required())
        .field(
            FieldSpec::enumeration("attribute_type", "String, number or binary", ["S", "N", "B"])
                .required(),
        );

    ToolDefinition::new(CREATE_TABLE, "Create a table", DOMAIN, RiskLevel::High)
        .with_schema(
            ParameterSchema::new()
                .field(FieldSpec::string("table_name", "Table name").required())
                .field(
                    FieldSpec::array("key_schema", "Partition key, then optional sort key")
                        .required()
                        .with_nested(key_element),
                )
                .field(
                    FieldSpec::array("attribute_definitions", "Types of the key attributes")
                        .required()
                        .with_nested(attribute),
                )
                .field(
                    FieldSpec::enumeration("billing_mode", "Capacity mode", [PAY_PER_REQUEST, PROVISIONED])
                        .with_default(PAY_PER_REQUEST),
                )
                .field(FieldSpec::integer(
                    "read_capacity_units",
                    "Read capacity (PROVISIONED only)",
                ))
                .field(FieldSpec::integer(
                    "write_capacity_units",
                    "Write capacity (PROVISIONED only)",
                ))
                .field(FieldSpec::enumeration(
                    "stream_view_type",
                    "Enable a change stream with this view",
                    ["KEYS_ONLY", "NEW_IMAGE", "OLD_IMAGE", "NEW_AND_OLD_IMAGES"],
                ))
                .field(region_field()),
        )
        .with_mapping(
            ParameterMapping::new()
                .group(
                    PROVISIONED_THROUGHPUT,
                    Some(Gate::new("billing_mode", PROVISIONED)),
                    [
                        ("read_capacity_units", "read_capacity_units"),
                        ("write_capacity_units", "write_capacity_units"),
                    ],
                )
                .group(STREAM_SPECIFICATION, None, [("stream_view_type", "view_type")]),
        )
}

// ==================== Raw records ====================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTableNames {
    #[serde(default)]
    pub table_names: Vec<String>,
    #[serde(default)]
    pub last_evaluated_table_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawKeyElement {
    pub attribute_name: String,
    pub key_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTable {
    pub table_name: String,
    #[serde(default)]
    pub table_status: Option<String>,
    #[serde(default)]
    pub item_count: Option<i64>,
    #[serde(default)]
    pub table_size_bytes: Option<i64>,
    #[serde(default)]
    pub creation_date_time: Option<String>,
    #[serde(default)]
    pub billing_mode: Option<String>,
    #[serde(default)]
    pub key_schema: Vec<RawKeyElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTableResult {
    #[serde(default)]
    pub table: Option<RawTable>,
}

// ==================== Presenters ====================

/// `{items: [{id}], count, next_cursor?}`
pub fn present_table_names(raw: Value) -> Value {
    reshape(raw, |page: RawTableNames| {
        let items: Vec<Value> = page
            .table_names
            .iter()
            .map(|name| json!({ "id": name }))
            .collect();
        let mut data = json!({ "count": items.len(), "items": items });
        if let (Some(cursor), Value::Object(map)) = (page.last_evaluated_table_name, &mut data)
            && !cursor.is_empty()
        {
            map.insert("next_cursor".to_string(), Value::String(cursor));
        }
        data
    })
}

/// `{table: {name, status, item_count, size_bytes, created_at, billing_mode, key_schema}}`
pub fn present_table(raw: Value) -> Value {
    reshape(raw, |result: RawTableResult| {
        let table = result.table.map(|t| {
            json!({
                "name": t.table_name,
                "status": t.table_status,
                "item_count": t.item_count,
                "size_bytes": t.table_size_bytes,
                "created_at": t.creation_date_time,
                "billing_mode": t.billing_mode,
                "key_schema": t.key_schema.iter().map(|k| json!({
                    "attribute_name": k.attribute_name,
                    "key_type": k.key_type,
                })).collect::<Vec<_>>(),
            })
        });
        json!({ "table": table })
    })
}
