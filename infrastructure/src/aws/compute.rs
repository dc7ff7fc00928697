//! EC2 operations for the `compute` catalog.

use async_trait::async_trait;
use aws_sdk_ec2::Client;
use aws_sdk_ec2::types::{Filter, Instance, InstanceState, InstanceStateChange, Tag};
use aws_smithy_types::date_time::Format;
use cloudops_domain::{ClientHandle, RemoteError, RemoteOperation, ToolDescriptor};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::error::sdk_error;
use crate::catalog::compute::{
    self as catalog, CREATE_TAGS, DESCRIBE_INSTANCE, LIST_INSTANCES, NEXT_TOKEN, RawInstance,
    RawInstancePage, RawStateChange, RawStateChanges, RawTag, RawTagging, START_INSTANCES,
    STOP_INSTANCES, TERMINATE_INSTANCES,
};
use crate::catalog::{object_list, optional_i32, optional_string, string_list, string_param, to_raw};

pub(super) fn descriptors() -> Vec<ToolDescriptor> {
    catalog::definitions()
        .into_iter()
        .filter_map(|def| {
            let operation: Arc<dyn RemoteOperation> = match def.name.as_str() {
                LIST_INSTANCES => Arc::new(DescribeInstances),
                DESCRIBE_INSTANCE => Arc::new(DescribeInstance),
                START_INSTANCES => Arc::new(ChangeState(StateAction::Start)),
                STOP_INSTANCES => Arc::new(ChangeState(StateAction::Stop)),
                TERMINATE_INSTANCES => Arc::new(ChangeState(StateAction::Terminate)),
                CREATE_TAGS => Arc::new(CreateTags),
                _ => return None,
            };
            Some(ToolDescriptor::new(def, operation))
        })
        .collect()
}

// ==================== Conversions ====================

fn state_name(state: Option<&InstanceState>) -> Option<String> {
    state
        .and_then(|s| s.name())
        .map(|name| name.as_str().to_string())
}

fn raw_tags(tags: &[Tag]) -> Vec<RawTag> {
    tags.iter()
        .filter_map(|t| {
            Some(RawTag {
                key: t.key()?.to_string(),
                value: t.value().unwrap_or_default().to_string(),
            })
        })
        .collect()
}

fn raw_instance(instance: &Instance) -> Option<RawInstance> {
    Some(RawInstance {
        instance_id: instance.instance_id()?.to_string(),
        state: state_name(instance.state()),
        instance_type: instance.instance_type().map(|t| t.as_str().to_string()),
        private_ip_address: instance.private_ip_address().map(str::to_string),
        public_ip_address: instance.public_ip_address().map(str::to_string),
        launch_time: instance
            .launch_time()
            .and_then(|t| t.fmt(Format::DateTime).ok()),
        tags: raw_tags(instance.tags()),
    })
}

fn raw_state_change(change: &InstanceStateChange) -> Option<RawStateChange> {
    Some(RawStateChange {
        instance_id: change.instance_id()?.to_string(),
        previous_state: state_name(change.previous_state()),
        current_state: state_name(change.current_state()),
    })
}

// ==================== Operations ====================

/// `ec2_list_instances`
struct DescribeInstances;

#[async_trait]
impl RemoteOperation for DescribeInstances {
    fn operation_name(&self) -> &str {
        "DescribeInstances"
    }

    async fn invoke(
        &self,
        params: &Map<String, Value>,
        client: &ClientHandle,
    ) -> Result<Value, RemoteError> {
        let ec2 = client.downcast::<Client>()?;
        let mut request = ec2
            .describe_instances()
            .set_max_results(optional_i32(self.operation_name(), params, "max_results")?)
            .set_next_token(optional_string(params, NEXT_TOKEN).map(str::to_string));

        if let Some(filters) = params.get("filters").and_then(Value::as_object) {
            for (name, value) in filters {
                if let Some(value) = value.as_str() {
                    request = request.filters(Filter::builder().name(name).values(value).build());
                }
            }
        }

        let output = request
            .send()
            .await
            .map_err(|e| sdk_error(self.operation_name(), e))?;

        let page = RawInstancePage {
            instances: output
                .reservations()
                .iter()
                .flat_map(|r| r.instances())
                .filter_map(raw_instance)
                .collect(),
            next_token: output.next_token().map(str::to_string),
        };
        to_raw(self.operation_name(), &page)
    }

    fn present(&self, raw: Value) -> Value {
        catalog::present_instance_page(raw)
    }
}

/// `ec2_describe_instance`
struct DescribeInstance;

#[async_trait]
impl RemoteOperation for DescribeInstance {
    fn operation_name(&self) -> &str {
        "DescribeInstances"
    }

    async fn invoke(
        &self,
        params: &Map<String, Value>,
        client: &ClientHandle,
    ) -> Result<Value, RemoteError> {
        let ec2 = client.downcast::<Client>()?;
        let instance_id = string_param(self.operation_name(), params, "instance_id")?;

        let output = ec2
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| sdk_error(self.operation_name(), e))?;

        let page = RawInstancePage {
            instances: output
                .reservations()
                .iter()
                .flat_map(|r| r.instances())
                .filter_map(raw_instance)
                .collect(),
            next_token: None,
        };
        to_raw(self.operation_name(), &page)
    }

    fn present(&self, raw: Value) -> Value {
        catalog::present_instance(raw)
    }
}

#[derive(Debug, Clone, Copy)]
enum StateAction {
    Start,
    Stop,
    Terminate,
}

/// `ec2_start_instances`, `ec2_stop_instances`, `ec2_terminate_instances`
struct ChangeState(StateAction);

#[async_trait]
impl RemoteOperation for ChangeState {
    fn operation_name(&self) -> &str {
        match self.0 {
            StateAction::Start => "StartInstances",
            StateAction::Stop => "StopInstances",
            StateAction::Terminate => "TerminateInstances",
        }
    }

    async fn invoke(
        &self,
        params: &Map<String, Value>,
        client: &ClientHandle,
    ) -> Result<Value, RemoteError> {
        let ec2 = client.downcast::<Client>()?;
        let operation = self.operation_name();
        let ids = Some(string_list(operation, params, "instance_ids")?);

        let changes: Vec<InstanceStateChange> = match self.0 {
            StateAction::Start => ec2
                .start_instances()
                .set_instance_ids(ids)
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?
                .starting_instances()
                .to_vec(),
            StateAction::Stop => ec2
                .stop_instances()
                .set_instance_ids(ids)
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?
                .stopping_instances()
                .to_vec(),
            StateAction::Terminate => ec2
                .terminate_instances()
                .set_instance_ids(ids)
                .send()
                .await
                .map_err(|e| sdk_error(operation, e))?
                .terminating_instances()
                .to_vec(),
        };

        let record = RawStateChanges {
            state_changes: changes.iter().filter_map(raw_state_change).collect(),
        };
        to_raw(operation, &record)
    }

    fn present(&self, raw: Value) -> Value {
        catalog::present_state_changes(raw)
    }
}

/// `ec2_create_tags`
struct CreateTags;

#[async_trait]
impl RemoteOperation for CreateTags {
    fn operation_name(&self) -> &str {
        "CreateTags"
    }

    async fn invoke(
        &self,
        params: &Map<String, Value>,
        client: &ClientHandle,
    ) -> Result<Value, RemoteError> {
        let ec2 = client.downcast::<Client>()?;
        let operation = self.operation_name();
        let resources = string_list(operation, params, "resource_ids")?;
        let tags = object_list(operation, params, "tags")?
            .into_iter()
            .map(|tag| {
                Ok(RawTag {
                    key: string_param(operation, tag, "key")?.to_string(),
                    value: string_param(operation, tag, "value")?.to_string(),
                })
            })
            .collect::<Result<Vec<_>, RemoteError>>()?;

        ec2.create_tags()
            .set_resources(Some(resources.clone()))
            .set_tags(Some(
                tags.iter()
                    .map(|t| Tag::builder().key(&t.key).value(&t.value).build())
                    .collect(),
            ))
            .send()
            .await
            .map_err(|e| sdk_error(operation, e))?;

        to_raw(operation, &RawTagging { resources, tags })
    }

    fn present(&self, raw: Value) -> Value {
        catalog::present_tagging(raw)
    }
}
