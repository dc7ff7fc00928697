//! DynamoDB operations for the `database` catalog.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ProvisionedThroughput,
    ScalarAttributeType, StreamSpecification, StreamViewType, TableDescription,
};
use aws_smithy_types::date_time::Format;
use cloudops_domain::{ClientHandle, RemoteError, RemoteOperation, ToolDescriptor};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::error::{build_error, sdk_error};
use crate::catalog::database::{
    self as catalog, CREATE_TABLE, DELETE_TABLE, DESCRIBE_TABLE, EXCLUSIVE_START, LIST_TABLES,
    PROVISIONED_THROUGHPUT, RawKeyElement, RawTable, RawTableNames, RawTableResult,
    STREAM_SPECIFICATION,
};
use crate::catalog::{object_list, optional_i32, optional_i64, optional_string, string_param, to_raw};

pub(super) fn descriptors() -> Vec<ToolDescriptor> {
    catalog::definitions()
        .into_iter()
        .filter_map(|def| {
            let operation: Arc<dyn RemoteOperation> = match def.name.as_str() {
                LIST_TABLES => Arc::new(ListTables),
                DESCRIBE_TABLE => Arc::new(DescribeTable),
                CREATE_TABLE => Arc::new(CreateTable),
                DELETE_TABLE => Arc::new(DeleteTable),
                _ => return None,
            };
            Some(ToolDescriptor::new(def, operation))
        })
        .collect()
}

fn raw_table(table: &TableDescription) -> Option<RawTable> {
    Some(RawTable {
        table_name: table.table_name()?.to_string(),
        table_status: table.table_status().map(|s| s.as_str().to_string()),
        item_count: table.item_count(),
        table_size_bytes: table.table_size_bytes(),
        creation_date_time: table
            .creation_date_time()
            .and_then(|t| t.fmt(Format::DateTime).ok()),
        billing_mode: table
            .billing_mode_summary()
            .and_then(|b| b.billing_mode())
            .map(|m| m.as_str().to_string()),
        key_schema: table
            .key_schema()
            .iter()
            .map(|k| RawKeyElement {
                attribute_name: k.attribute_name().to_string(),
                key_type: k.key_type().as_str().to_string(),
            })
            .collect(),
    })
}

fn table_result(operation: &str, table: Option<&TableDescription>) -> Result<Value, RemoteError> {
    to_raw(
        operation,
        &RawTableResult {
            table: table.and_then(raw_table),
        },
    )
}

/// `dynamodb_list_tables`
struct ListTables;

#[async_trait]
impl RemoteOperation for ListTables {
    fn operation_name(&self) -> &str {
        "ListTables"
    }

    async fn invoke(
        &self,
        params: &Map<String, Value>,
        client: &ClientHandle,
    ) -> Result<Value, RemoteError> {
        let dynamodb = client.downcast::<Client>()?;

        let output = dynamodb
            .list_tables()
            .set_limit(optional_i32(self.operation_name(), params, "limit")?)
            .set_exclusive_start_table_name(
                optional_string(params, EXCLUSIVE_START).map(str::to_string),
            )
            .send()
            .await
            .map_err(|e| sdk_error(self.operation_name(), e))?;

        to_raw(
            self.operation_name(),
            &RawTableNames {
                table_names: output.table_names().to_vec(),
                last_evaluated_table_name: output.last_evaluated_table_name().map(str::to_string),
            },
        )
    }

    fn present(&self, raw: Value) -> Value {
        catalog::present_table_names(raw)
    }
}

/// `dynamodb_describe_table`
struct DescribeTable;

#[async_trait]
impl RemoteOperation for DescribeTable {
    fn operation_name(&self) -> &str {
        "DescribeTable"
    }

    async fn invoke(
        &self,
        params: &Map<String, Value>,
        client: &ClientHandle,
    ) -> Result<Value, RemoteError> {
        let dynamodb = client.downcast::<Client>()?;
        let table_name = string_param(self.operation_name(), params, "table_name")?;

        let output = dynamodb
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| sdk_error(self.operation_name(), e))?;

        table_result(self.operation_name(), output.table())
    }

    fn present(&self, raw: Value) -> Value {
        catalog::present_table(raw)
    }
}

/// `dynamodb_create_table`
struct CreateTable;

impl CreateTable {
    fn key_schema(&self, params: &Map<String, Value>) -> Result<Vec<KeySchemaElement>, RemoteError> {
        let operation = self.operation_name();
        object_list(operation, params, "key_schema")?
            .into_iter()
            .map(|element| {
                KeySchemaElement::builder()
                    .attribute_name(string_param(operation, element, "attribute_name")?)
                    .key_type(KeyType::from(string_param(operation, element, "key_type")?))
                    .build()
                    .map_err(|e| build_error(operation, e))
            })
            .collect()
    }

    fn attribute_definitions(
        &self,
        params: &Map<String, Value>,
    ) -> Result<Vec<AttributeDefinition>, RemoteError> {
        let operation = self.operation_name();
        object_list(operation, params, "attribute_definitions")?
            .into_iter()
            .map(|attribute| {
                AttributeDefinition::builder()
                    .attribute_name(string_param(operation, attribute, "attribute_name")?)
                    .attribute_type(ScalarAttributeType::from(string_param(
                        operation,
                        attribute,
                        "attribute_type",
                    )?))
                    .build()
                    .map_err(|e| build_error(operation, e))
            })
            .collect()
    }

    /// Present only when the mapping's billing-mode gate opened
    fn throughput(
        &self,
        params: &Map<String, Value>,
    ) -> Result<Option<ProvisionedThroughput>, RemoteError> {
        let Some(group) = params.get(PROVISIONED_THROUGHPUT).and_then(Value::as_object) else {
            return Ok(None);
        };
        ProvisionedThroughput::builder()
            .set_read_capacity_units(optional_i64(group, "read_capacity_units"))
            .set_write_capacity_units(optional_i64(group, "write_capacity_units"))
            .build()
            .map(Some)
            .map_err(|e| build_error(self.operation_name(), e))
    }

    fn stream(&self, params: &Map<String, Value>) -> Result<Option<StreamSpecification>, RemoteError> {
        let Some(view_type) = params
            .get(STREAM_SPECIFICATION)
            .and_then(Value::as_object)
            .and_then(|group| optional_string(group, "view_type"))
        else {
            return Ok(None);
        };
        StreamSpecification::builder()
            .stream_enabled(true)
            .stream_view_type(StreamViewType::from(view_type))
            .build()
            .map(Some)
            .map_err(|e| build_error(self.operation_name(), e))
    }
}

#[async_trait]
impl RemoteOperation for CreateTable {
    fn operation_name(&self) -> &str {
        "CreateTable"
    }

    async fn invoke(
        &self,
        params: &Map<String, Value>,
        client: &ClientHandle,
    ) -> Result<Value, RemoteError> {
        let dynamodb = client.downcast::<Client>()?;
        let operation = self.operation_name();

        let output = dynamodb
            .create_table()
            .table_name(string_param(operation, params, "table_name")?)
            .set_key_schema(Some(self.key_schema(params)?))
            .set_attribute_definitions(Some(self.attribute_definitions(params)?))
            .set_billing_mode(optional_string(params, "billing_mode").map(BillingMode::from))
            .set_provisioned_throughput(self.throughput(params)?)
            .set_stream_specification(self.stream(params)?)
            .send()
            .await
            .map_err(|e| sdk_error(operation, e))?;

        table_result(operation, output.table_description())
    }

    fn present(&self, raw: Value) -> Value {
        catalog::present_table(raw)
    }
}

/// `dynamodb_delete_table`
struct DeleteTable;

#[async_trait]
impl RemoteOperation for DeleteTable {
    fn operation_name(&self) -> &str {
        "DeleteTable"
    }

    async fn invoke(
        &self,
        params: &Map<String, Value>,
        client: &ClientHandle,
    ) -> Result<Value, RemoteError> {
        let dynamodb = client.downcast::<Client>()?;
        let table_name = string_param(self.operation_name(), params, "table_name")?;

        let output = dynamodb
            .delete_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| sdk_error(self.operation_name(), e))?;

        table_result(self.operation_name(), output.table_description())
    }

    fn present(&self, raw: Value) -> Value {
        catalog::present_table(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_every_database_definition_has_an_operation() {
        assert_eq!(descriptors().len(), catalog::definitions().len());
    }

    #[test]
    fn test_key_schema_and_attributes_build() {
        let p = params(json!({
            "key_schema": [
                {"attribute_name": "pk", "key_type": "HASH"},
                {"attribute_name": "sk", "key_type": "RANGE"}
            ],
            "attribute_definitions": [
                {"attribute_name": "pk", "attribute_type": "S"},
                {"attribute_name": "sk", "attribute_type": "N"}
            ]
        }));

        let keys = CreateTable.key_schema(&p).unwrap();
        let attributes = CreateTable.attribute_definitions(&p).unwrap();

        assert_eq!(keys[1].key_type(), &KeyType::Range);
        assert_eq!(attributes[1].attribute_type(), &ScalarAttributeType::N);
    }

    #[test]
    fn test_throughput_only_when_grouped() {
        let without = params(json!({"billing_mode": "PAY_PER_REQUEST"}));
        assert!(CreateTable.throughput(&without).unwrap().is_none());

        let with = params(json!({
            "provisioned_throughput": {"read_capacity_units": 5, "write_capacity_units": 10}
        }));
        assert!(CreateTable.throughput(&with).unwrap().is_some());

        let incomplete = params(json!({"provisioned_throughput": {"read_capacity_units": 5}}));
        assert!(CreateTable.throughput(&incomplete).is_err());
    }

    #[test]
    fn test_stream_specification() {
        let p = params(json!({"stream_specification": {"view_type": "NEW_IMAGE"}}));
        let stream = CreateTable.stream(&p).unwrap().unwrap();
        assert!(stream.stream_enabled());
        assert_eq!(stream.stream_view_type(), Some(&StreamViewType::NewImage));

        assert!(CreateTable.stream(&Map::new()).unwrap().is_none());
    }

    #[test]
    fn test_raw_table_from_sdk_shape() {
        let table = TableDescription::builder()
            .table_name("orders")
            .item_count(3)
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name("pk")
                    .key_type(KeyType::Hash)
                    .build()
                    .unwrap(),
            )
            .build();

        let raw = raw_table(&table).unwrap();

        assert_eq!(raw.table_name, "orders");
        assert_eq!(raw.item_count, Some(3));
        assert_eq!(raw.key_schema[0].key_type, "HASH");
    }
}
