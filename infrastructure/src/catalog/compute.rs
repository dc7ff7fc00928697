//! `compute` domain: EC2 instances.

use cloudops_domain::{FieldSpec, ParameterMapping, ParameterSchema, RiskLevel, ToolDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

use super::{region_field, reshape};

pub const DOMAIN: &str = "compute";

pub const LIST_INSTANCES: &str = "ec2_list_instances";
pub const DESCRIBE_INSTANCE: &str = "ec2_describe_instance";
pub const START_INSTANCES: &str = "ec2_start_instances";
pub const STOP_INSTANCES: &str = "ec2_stop_instances";
pub const TERMINATE_INSTANCES: &str = "ec2_terminate_instances";
pub const CREATE_TAGS: &str = "ec2_create_tags";

/// Cursor parameter of [`LIST_INSTANCES`]
pub const NEXT_TOKEN: &str = "next_token";

pub const INSTANCE_STATES: [&str; 6] = [
    "pending",
    "running",
    "stopping",
    "stopped",
    "shutting-down",
    "terminated",
];

/// Provider filter names the list tool's `filters` group is keyed by.
pub const STATE_FILTER: &str = "instance-state-name";
pub const TAG_KEY_FILTER: &str = "tag-key";

// ==================== Definitions ====================

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        list_instances(),
        describe_instance(),
        state_change(START_INSTANCES, "Start stopped instances"),
        state_change(STOP_INSTANCES, "Stop running instances"),
        state_change(TERMINATE_INSTANCES, "Terminate instances (irreversible)"),
        create_tags(),
    ]
}

fn list_instances() -> ToolDefinition {
    ToolDefinition::new(
        LIST_INSTANCES,
        "List instances, optionally filtered by state or tag key",
        DOMAIN,
        RiskLevel::Low,
    )
    .with_schema(
        ParameterSchema::new()
            .field(FieldSpec::enumeration(
                "state",
                "Only instances in this state",
                INSTANCE_STATES,
            ))
            .field(FieldSpec::string("tag_key", "Only instances carrying this tag key"))
            .field(FieldSpec::integer("max_results", "Page size (5-1000)"))
            .field(FieldSpec::string(NEXT_TOKEN, "Cursor from a previous page"))
            .field(region_field()),
    )
    .with_mapping(ParameterMapping::new().group(
        "filters",
        None,
        [("state", STATE_FILTER), ("tag_key", TAG_KEY_FILTER)],
    ))
}

fn describe_instance() -> ToolDefinition {
    ToolDefinition::new(
        DESCRIBE_INSTANCE,
        "Describe one instance",
        DOMAIN,
        RiskLevel::Low,
    )
    .with_schema(
        ParameterSchema::new()
            .field(FieldSpec::string("instance_id", "Instance id (i-...)").required())
            .field(region_field()),
    )
}

fn state_change(name: &str, description: &str) -> ToolDefinition {
    ToolDefinition::new(name, description, DOMAIN, RiskLevel::High).with_schema(
        ParameterSchema::new()
            .field(FieldSpec::string_array("instance_ids", "Instance ids").required())
            .field(region_field()),
    )
}

fn create_tags() -> ToolDefinition {
    let tag = ParameterSchema::new()
        .field(FieldSpec::string("key", "Tag key").required())
        .field(FieldSpec::string("value", "Tag value").required());

    ToolDefinition::new(
        CREATE_TAGS,
        "Add or overwrite tags on resources",
        DOMAIN,
        RiskLevel::High,
    )
    .with_schema(
        ParameterSchema::new()
            .field(FieldSpec::string_array("resource_ids", "Resource ids").required())
            .field(
                FieldSpec::array("tags", "Tags to set")
                    .required()
                    .with_nested(tag),
            )
            .field(region_field()),
    )
}

// ==================== Raw records ====================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTag {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawInstance {
    pub instance_id: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub instance_type: Option<String>,
    #[serde(default)]
    pub private_ip_address: Option<String>,
    #[serde(default)]
    pub public_ip_address: Option<String>,
    #[serde(default)]
    pub launch_time: Option<String>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawInstancePage {
    #[serde(default)]
    pub instances: Vec<RawInstance>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawStateChange {
    pub instance_id: String,
    #[serde(default)]
    pub previous_state: Option<String>,
    #[serde(default)]
    pub current_state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawStateChanges {
    #[serde(default)]
    pub state_changes: Vec<RawStateChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTagging {
    pub resources: Vec<String>,
    pub tags: Vec<RawTag>,
}

// ==================== Presenters ====================

fn tag_map(tags: &[RawTag]) -> BTreeMap<String, String> {
    tags.iter()
        .map(|t| (t.key.clone(), t.value.clone()))
        .collect()
}

fn present_one(instance: &RawInstance) -> Value {
    json!({
        "id": instance.instance_id,
        "state": instance.state,
        "instance_type": instance.instance_type,
        "private_ip": instance.private_ip_address,
        "public_ip": instance.public_ip_address,
        "launch_time": instance.launch_time,
        "tags": tag_map(&instance.tags),
    })
}

/// `{items: [{id, state, instance_type, ...}], count, next_cursor?}`
///
/// Each item is a superset of a [`cloudops_domain::ListedResource`], so the
/// page parses with [`cloudops_domain::ListPage::from_presented`].
pub fn present_instance_page(raw: Value) -> Value {
    reshape(raw, |page: RawInstancePage| {
        let items: Vec<Value> = page.instances.iter().map(present_one).collect();
        let mut data = json!({ "count": items.len(), "items": items });
        if let (Some(cursor), Value::Object(map)) = (page.next_token, &mut data)
            && !cursor.is_empty()
        {
            map.insert("next_cursor".to_string(), Value::String(cursor));
        }
        data
    })
}

/// `{instance: {...}}`, or `{instance: null}` when the id matched nothing.
pub fn present_instance(raw: Value) -> Value {
    reshape(raw, |page: RawInstancePage| {
        json!({ "instance": page.instances.first().map(present_one) })
    })
}

/// `{items: [{id, previous_state, current_state}], count}`
pub fn present_state_changes(raw: Value) -> Value {
    reshape(raw, |changes: RawStateChanges| {
        let items: Vec<Value> = changes
            .state_changes
            .iter()
            .map(|c| {
                json!({
                    "id": c.instance_id,
                    "previous_state": c.previous_state,
                    "current_state": c.current_state,
                })
            })
            .collect();
        json!({ "count": items.len(), "items": items })
    })
}

/// `{items: [{id}], count, tags: {key: value}}`
pub fn present_tagging(raw: Value) -> Value {
    reshape(raw, |tagging: RawTagging| {
        let items: Vec<Value> = tagging
            .resources
            .iter()
            .map(|id| json!({ "id": id }))
            .collect();
        json!({
            "count": items.len(),
            "items": items,
            "tags": tag_map(&tagging.tags),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::to_raw;
    use cloudops_domain::{
        ListPage, ListedResource, ParameterValidator, SchemaValidator, apply_defaults,
    };
    use serde_json::Map;

    fn listed(instance: &RawInstance) -> ListedResource {
        let mut resource = ListedResource::new(&instance.instance_id);
        if let Some(state) = &instance.state {
            resource = resource.with_state(state);
        }
        for tag in &instance.tags {
            resource = resource.with_tag(&tag.key, &tag.value);
        }
        resource
    }

    fn instance(id: &str, state: &str, tags: &[(&str, &str)]) -> RawInstance {
        RawInstance {
            instance_id: id.to_string(),
            state: Some(state.to_string()),
            instance_type: Some("t3.micro".to_string()),
            private_ip_address: Some("10.0.0.5".to_string()),
            launch_time: Some("2024-03-01T12:00:00Z".to_string()),
            tags: tags
                .iter()
                .map(|(k, v)| RawTag {
                    key: k.to_string(),
                    value: v.to_string(),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_present_instance_page_is_a_list_page() {
        let raw = to_raw(
            "DescribeInstances",
            &RawInstancePage {
                instances: vec![
                    instance("i-1", "running", &[("Environment", "prod")]),
                    instance("i-2", "stopped", &[]),
                ],
                next_token: Some("tok".to_string()),
            },
        )
        .unwrap();

        let presented = present_instance_page(raw);

        assert_eq!(presented["count"], 2);
        assert_eq!(presented["items"][0]["id"], "i-1");
        assert_eq!(presented["items"][0]["private_ip"], "10.0.0.5");
        assert_eq!(presented["items"][0]["tags"]["Environment"], "prod");
        assert_eq!(presented["next_cursor"], "tok");

        let page = ListPage::from_presented(&presented).unwrap();
        assert_eq!(page.items[0], listed(&instance("i-1", "running", &[("Environment", "prod")])));
        assert_eq!(page.next_cursor.as_deref(), Some("tok"));
    }

    #[test]
    fn test_empty_page_has_no_cursor() {
        let raw = to_raw("DescribeInstances", &RawInstancePage::default()).unwrap();

        let presented = present_instance_page(raw);

        assert_eq!(presented, json!({"items": [], "count": 0}));
    }

    #[test]
    fn test_present_state_changes() {
        let raw = to_raw(
            "TerminateInstances",
            &RawStateChanges {
                state_changes: vec![RawStateChange {
                    instance_id: "i-1".to_string(),
                    previous_state: Some("running".to_string()),
                    current_state: Some("shutting-down".to_string()),
                }],
            },
        )
        .unwrap();

        let presented = present_state_changes(raw);

        assert_eq!(presented["count"], 1);
        assert_eq!(presented["items"][0]["previous_state"], "running");
        assert_eq!(presented["items"][0]["current_state"], "shutting-down");
    }

    #[test]
    fn test_present_missing_instance() {
        let raw = to_raw("DescribeInstances", &RawInstancePage::default()).unwrap();
        assert_eq!(present_instance(raw), json!({"instance": null}));
    }

    #[test]
    fn test_list_filters_are_grouped() {
        let def = list_instances();
        let mut params = Map::new();
        params.insert("state".to_string(), json!("running"));
        params.insert("max_results".to_string(), json!("50"));

        let mut normalized = SchemaValidator
            .validate(&params, &def.schema, def.unknown_field_policy())
            .unwrap();
        apply_defaults(&mut normalized, &def.schema);
        let mapped = def.mapping.apply(normalized);

        assert_eq!(mapped["filters"], json!({"instance-state-name": "running"}));
        assert_eq!(mapped["max_results"], 50);
        assert!(!mapped.contains_key("state"));
    }

    #[test]
    fn test_list_without_filters_sends_no_group() {
        let def = list_instances();
        let mapped = def.mapping.apply(Map::new());
        assert!(!mapped.contains_key("filters"));
    }

    #[test]
    fn test_create_tags_requires_key_and_value() {
        let def = create_tags();
        let mut params = Map::new();
        params.insert("resource_ids".to_string(), json!(["i-1"]));
        params.insert("tags".to_string(), json!([{"key": "Environment"}]));

        let err = SchemaValidator
            .validate(&params, &def.schema, def.unknown_field_policy())
            .unwrap_err();

        assert!(err.to_string().contains("value"));
    }

    #[test]
    fn test_id_arrays_accept_only_strings() {
        for def in definitions() {
            let Some(field) = ["instance_ids", "resource_ids"]
                .into_iter()
                .find(|name| def.schema.declares(name))
            else {
                continue;
            };
            let mut params = Map::new();
            params.insert(field.to_string(), json!(["i-1", 1, {"x": true}, null]));
            params.insert("tags".to_string(), json!([{"key": "k", "value": "v"}]));

            let err = SchemaValidator
                .validate(&params, &def.schema, def.unknown_field_policy())
                .unwrap_err();

            assert_eq!(err.field, format!("{}[1]", field), "{}", def.name);
        }
    }
}
