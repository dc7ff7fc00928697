//! Dispatch use case
//!
//! This module provides the [`Dispatcher`], the single entry point through
//! which every tool call reaches a remote control plane.
//!
//! # Pipeline
//!
//! ```text
//! name, params, scope
//!   │
//!   ├─ lookup        ── miss ──────────────▶ Failure{ToolNotFound}
//!   ├─ validate      ── violation ─────────▶ Failure{ValidationError}
//!   ├─ defaults, region, mapping
//!   ├─ resolve client ── error ────────────▶ Failure{RemoteCallError}
//!   ├─ invoke        ── error ─────────────▶ Failure{RemoteCallError}
//!   └─ present ────────────────────────────▶ Success{data}
//! ```
//!
//! Lookup and validation failures are decided before any client is built or
//! any remote call is made. Every path ends in a [`ResponseEnvelope`]; no
//! error escapes [`Dispatcher::dispatch`].

use crate::ports::client_resolver::ClientResolverPort;
use crate::ports::dispatch_logger::{DispatchEvent, DispatchLogger, NoDispatchLogger};
use cloudops_domain::{
    CredentialScope, ParameterValidator, ResponseEnvelope, SchemaValidator, ToolCall,
    ToolDefinition, ToolDescriptor, ToolRegistry, apply_defaults,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Parameter that selects the client region instead of reaching the adapter
pub const REGION_PARAM: &str = "region";

/// Routes tool calls through validation, normalization and the client cache.
///
/// The dispatcher holds no per-call state; it can be shared behind an `Arc`
/// and called concurrently.
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    clients: Arc<dyn ClientResolverPort>,
    validator: SchemaValidator,
    logger: Arc<dyn DispatchLogger>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, clients: Arc<dyn ClientResolverPort>) -> Self {
        Self {
            registry,
            clients,
            validator: SchemaValidator,
            logger: Arc::new(NoDispatchLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn DispatchLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Dispatch one call by tool name.
    pub async fn dispatch(
        &self,
        name: &str,
        params: Map<String, Value>,
        scope: &CredentialScope,
    ) -> ResponseEnvelope {
        let started = Instant::now();

        let Some(descriptor) = self.registry.lookup(name) else {
            warn!("Tool not found: {}", name);
            let envelope = ResponseEnvelope::tool_not_found(name);
            self.audit(name, None, &envelope, started, scope);
            return envelope;
        };

        let envelope = self.dispatch_to(descriptor, params, scope).await;
        self.audit(name, Some(descriptor.domain()), &envelope, started, scope);
        envelope
    }

    /// Dispatch a [`ToolCall`]
    pub async fn dispatch_call(&self, call: &ToolCall, scope: &CredentialScope) -> ResponseEnvelope {
        self.dispatch(&call.tool_name, call.arguments.clone(), scope)
            .await
    }

    async fn dispatch_to(
        &self,
        descriptor: &ToolDescriptor,
        params: Map<String, Value>,
        scope: &CredentialScope,
    ) -> ResponseEnvelope {
        let definition = descriptor.definition();

        // Validating
        debug!("[{}] validating parameters", definition.name);
        let mut params = match self.validator.validate(
            &params,
            &definition.schema,
            definition.unknown_field_policy(),
        ) {
            Ok(params) => params,
            Err(e) => {
                debug!("[{}] rejected: {}", definition.name, e);
                return ResponseEnvelope::validation(&e);
            }
        };
        apply_defaults(&mut params, &definition.schema);
        let region = take_region(&mut params, definition).unwrap_or_else(|| scope.region.clone());
        let params = definition.mapping.apply(params);

        // Resolving client
        debug!(
            "[{}] resolving {} client in {} for {}",
            definition.name,
            definition.domain,
            region,
            scope.fingerprint()
        );
        let client = match self
            .clients
            .resolve(&definition.domain, &region, scope)
            .await
        {
            Ok(client) => client,
            Err(e) => {
                warn!("[{}] client unavailable: {}", definition.name, e);
                return ResponseEnvelope::remote(&e);
            }
        };

        // Calling remote
        let operation = descriptor.operation();
        debug!(
            "[{}] calling {} on {}",
            definition.name,
            operation.operation_name(),
            client.key()
        );
        match operation.invoke(&params, &client).await {
            Ok(raw) => {
                debug!("[{}] done", definition.name);
                ResponseEnvelope::success(operation.present(raw))
            }
            Err(e) => {
                warn!("[{}] remote call failed: {}", definition.name, e);
                ResponseEnvelope::remote(&e)
            }
        }
    }

    fn audit(
        &self,
        tool: &str,
        domain: Option<&str>,
        envelope: &ResponseEnvelope,
        started: Instant,
        scope: &CredentialScope,
    ) {
        self.logger.log(DispatchEvent::new(
            "dispatch",
            serde_json::json!({
                "tool": tool,
                "domain": domain,
                "outcome": if envelope.is_success() { "success" } else { "failure" },
                "error_kind": envelope.error_kind().map(|k| k.as_str().to_string()),
                "duration_ms": started.elapsed().as_millis() as u64,
                "fingerprint": scope.fingerprint().as_str(),
            }),
        ));
    }
}

/// Remove the region parameter, returning it when the tool declares one and
/// it was supplied as a non-empty string.
fn take_region(params: &mut Map<String, Value>, definition: &ToolDefinition) -> Option<String> {
    if !definition.schema.declares(REGION_PARAM) {
        return None;
    }
    match params.remove(REGION_PARAM) {
        Some(Value::String(region)) if !region.is_empty() => Some(region),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cloudops_domain::{
        ClientHandle, ClientKey, ErrorKind, FieldSpec, Gate, ListPage, ListedResource,
        ParameterMapping, ParameterSchema, RemoteError, RemoteOperation, RiskLevel,
    };
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==================== Test Mocks ====================

    #[derive(Default)]
    struct MockResolver {
        keys: Mutex<Vec<ClientKey>>,
        fail: bool,
    }

    #[async_trait]
    impl ClientResolverPort for MockResolver {
        async fn resolve(
            &self,
            domain: &str,
            region: &str,
            scope: &CredentialScope,
        ) -> Result<ClientHandle, RemoteError> {
            if self.fail {
                return Err(RemoteError::ClientUnavailable("no constructor".to_string()));
            }
            let key = ClientKey::new(domain, region, scope.fingerprint());
            self.keys.lock().unwrap().push(key.clone());
            Ok(ClientHandle::new(key, ()))
        }
    }

    struct MockOperation {
        calls: AtomicUsize,
        last_params: Mutex<Option<Map<String, Value>>>,
        result: Result<Value, RemoteError>,
    }

    impl MockOperation {
        fn returning(result: Result<Value, RemoteError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_params: Mutex::new(None),
                result,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_params(&self) -> Map<String, Value> {
            self.last_params.lock().unwrap().clone().unwrap_or_default()
        }
    }

    #[async_trait]
    impl RemoteOperation for MockOperation {
        fn operation_name(&self) -> &str {
            "MockOperation"
        }

        async fn invoke(
            &self,
            params: &Map<String, Value>,
            _client: &ClientHandle,
        ) -> Result<Value, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_params.lock().unwrap() = Some(params.clone());
            self.result.clone()
        }

        fn present(&self, raw: Value) -> Value {
            match raw.get("ids").and_then(Value::as_array) {
                Some(ids) => {
                    let items = ids
                        .iter()
                        .filter_map(Value::as_str)
                        .map(ListedResource::new)
                        .collect();
                    ListPage::new(items, None).to_presented()
                }
                None => raw,
            }
        }
    }

    #[derive(Default)]
    struct CapturingLogger {
        events: Mutex<Vec<Value>>,
    }

    impl DispatchLogger for CapturingLogger {
        fn log(&self, event: DispatchEvent) {
            self.events.lock().unwrap().push(event.payload);
        }
    }

    fn scope() -> CredentialScope {
        CredentialScope::new("AKIAEXAMPLE", "secret", "us-east-1")
    }

    fn table_tool(operation: Arc<MockOperation>) -> ToolDescriptor {
        let schema = ParameterSchema::new()
            .field(FieldSpec::string("table_name", "Table name").required())
            .field(
                FieldSpec::enumeration(
                    "billing_mode",
                    "Billing mode",
                    ["PAY_PER_REQUEST", "PROVISIONED"],
                )
                .with_default(json!("PAY_PER_REQUEST")),
            )
            .field(FieldSpec::integer("read_capacity_units", "RCU"))
            .field(FieldSpec::integer("write_capacity_units", "WCU"))
            .field(FieldSpec::string("region", "Region override"));
        let mapping = ParameterMapping::new().group(
            "provisioned_throughput",
            Some(Gate::new("billing_mode", "PROVISIONED")),
            [
                ("read_capacity_units", "ReadCapacityUnits"),
                ("write_capacity_units", "WriteCapacityUnits"),
            ],
        );
        ToolDescriptor::new(
            ToolDefinition::new("create_table", "Create a table", "database", RiskLevel::High)
                .with_schema(schema)
                .with_mapping(mapping),
            operation,
        )
    }

    fn terminate_tool(operation: Arc<MockOperation>) -> ToolDescriptor {
        ToolDescriptor::new(
            ToolDefinition::new("terminate_x", "Terminate things", "compute", RiskLevel::High)
                .with_schema(
                    ParameterSchema::new()
                        .field(FieldSpec::string_array("instance_ids", "Ids").required()),
                ),
            operation,
        )
    }

    fn list_tool(operation: Arc<MockOperation>) -> ToolDescriptor {
        ToolDescriptor::new(
            ToolDefinition::new("list_x", "List things", "compute", RiskLevel::Low),
            operation,
        )
    }

    fn dispatcher(
        tools: Vec<ToolDescriptor>,
        resolver: Arc<MockResolver>,
    ) -> Dispatcher {
        let registry = ToolRegistry::builder().register_all(tools).unwrap().build();
        Dispatcher::new(Arc::new(registry), resolver)
    }

    fn bag(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_unknown_tool_is_not_found_without_client() {
        let resolver = Arc::new(MockResolver::default());
        let dispatcher = dispatcher(vec![], resolver.clone());

        let envelope = dispatcher.dispatch("nope", Map::new(), &scope()).await;

        assert_eq!(envelope.error_kind(), Some(ErrorKind::ToolNotFound));
        assert_eq!(envelope.message(), Some("Tool not found: nope"));
        assert!(resolver.keys.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_required_field_never_calls_remote() {
        let operation = MockOperation::returning(Ok(json!({})));
        let resolver = Arc::new(MockResolver::default());
        let dispatcher = dispatcher(vec![table_tool(operation.clone())], resolver.clone());

        let envelope = dispatcher
            .dispatch("create_table", bag(json!({"billing_mode": "PROVISIONED"})), &scope())
            .await;

        assert_eq!(envelope.error_kind(), Some(ErrorKind::ValidationError));
        assert!(envelope.message().unwrap().contains("table_name"));
        assert_eq!(operation.calls(), 0);
        assert!(resolver.keys.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enum_outside_allowed_values_is_rejected() {
        let operation = MockOperation::returning(Ok(json!({})));
        let dispatcher = dispatcher(
            vec![table_tool(operation.clone())],
            Arc::new(MockResolver::default()),
        );

        let envelope = dispatcher
            .dispatch(
                "create_table",
                bag(json!({"table_name": "t", "billing_mode": "ON_DEMAND"})),
                &scope(),
            )
            .await;

        assert_eq!(envelope.error_kind(), Some(ErrorKind::ValidationError));
        assert!(envelope.message().unwrap().contains("ON_DEMAND"));
        assert_eq!(operation.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_string_id_is_rejected_before_client_resolution() {
        let operation = MockOperation::returning(Ok(json!({})));
        let resolver = Arc::new(MockResolver::default());
        let dispatcher = dispatcher(vec![terminate_tool(operation.clone())], resolver.clone());

        for ids in [json!([1]), json!(["i-1", {"x": true}, null])] {
            let envelope = dispatcher
                .dispatch("terminate_x", bag(json!({"instance_ids": ids})), &scope())
                .await;

            assert_eq!(envelope.error_kind(), Some(ErrorKind::ValidationError));
            assert!(envelope.message().unwrap().contains("instance_ids["));
        }
        assert_eq!(operation.calls(), 0);
        assert!(resolver.keys.lock().unwrap().is_empty());

        let envelope = dispatcher
            .dispatch("terminate_x", bag(json!({"instance_ids": ["i-1"]})), &scope())
            .await;
        assert!(envelope.is_success());
        assert_eq!(operation.last_params()["instance_ids"], json!(["i-1"]));
    }

    #[tokio::test]
    async fn test_defaults_and_mapping_reach_the_adapter() {
        let operation = MockOperation::returning(Ok(json!({"TableDescription": {}})));
        let dispatcher = dispatcher(
            vec![table_tool(operation.clone())],
            Arc::new(MockResolver::default()),
        );

        // On-demand: capacity fields are dropped, not sent as null
        let envelope = dispatcher
            .dispatch(
                "create_table",
                bag(json!({"table_name": "t", "read_capacity_units": 5})),
                &scope(),
            )
            .await;
        assert!(envelope.is_success());
        let sent = operation.last_params();
        assert_eq!(sent["billing_mode"], "PAY_PER_REQUEST");
        assert!(!sent.contains_key("provisioned_throughput"));
        assert!(!sent.contains_key("read_capacity_units"));

        // Provisioned: coerced and grouped
        dispatcher
            .dispatch(
                "create_table",
                bag(json!({
                    "table_name": "t",
                    "billing_mode": "PROVISIONED",
                    "read_capacity_units": "5",
                    "write_capacity_units": 5.0
                })),
                &scope(),
            )
            .await;
        let sent = operation.last_params();
        assert_eq!(
            sent["provisioned_throughput"],
            json!({"ReadCapacityUnits": 5, "WriteCapacityUnits": 5})
        );
    }

    #[tokio::test]
    async fn test_region_param_selects_client_and_is_not_forwarded() {
        let operation = MockOperation::returning(Ok(json!({})));
        let resolver = Arc::new(MockResolver::default());
        let dispatcher = dispatcher(vec![table_tool(operation.clone())], resolver.clone());

        dispatcher
            .dispatch(
                "create_table",
                bag(json!({"table_name": "t", "region": "eu-west-1"})),
                &scope(),
            )
            .await;
        dispatcher
            .dispatch("create_table", bag(json!({"table_name": "t"})), &scope())
            .await;

        let keys = resolver.keys.lock().unwrap();
        assert_eq!(keys[0].region, "eu-west-1");
        assert_eq!(keys[0].domain, "database");
        assert_eq!(keys[1].region, "us-east-1");
        assert!(!operation.last_params().contains_key("region"));
    }

    #[tokio::test]
    async fn test_remote_error_becomes_failure_envelope() {
        let operation = MockOperation::returning(Err(RemoteError::provider(
            "CreateTable",
            "Table already exists: t",
        )
        .with_code("ResourceInUseException")));
        let dispatcher = dispatcher(
            vec![table_tool(operation.clone())],
            Arc::new(MockResolver::default()),
        );

        let envelope = dispatcher
            .dispatch("create_table", bag(json!({"table_name": "t"})), &scope())
            .await;

        assert_eq!(envelope.error_kind(), Some(ErrorKind::RemoteCallError));
        let info = envelope.error_info().unwrap();
        assert_eq!(info.code.as_deref(), Some("ResourceInUseException"));
        assert_eq!(operation.calls(), 1);
    }

    #[tokio::test]
    async fn test_client_failure_becomes_failure_envelope() {
        let operation = MockOperation::returning(Ok(json!({})));
        let resolver = Arc::new(MockResolver {
            fail: true,
            ..Default::default()
        });
        let dispatcher = dispatcher(vec![list_tool(operation.clone())], resolver);

        let envelope = dispatcher.dispatch("list_x", Map::new(), &scope()).await;

        assert_eq!(envelope.error_kind(), Some(ErrorKind::RemoteCallError));
        assert_eq!(operation.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_inventory_is_success_with_zero_count() {
        let operation = MockOperation::returning(Ok(json!({"ids": []})));
        let dispatcher = dispatcher(
            vec![list_tool(operation)],
            Arc::new(MockResolver::default()),
        );

        let envelope = dispatcher.dispatch("list_x", Map::new(), &scope()).await;

        assert_eq!(envelope, ResponseEnvelope::success(json!({"items": [], "count": 0})));
    }

    #[tokio::test]
    async fn test_read_only_dispatch_is_idempotent() {
        let operation = MockOperation::returning(Ok(json!({"ids": ["i-1", "i-2"]})));
        let dispatcher = dispatcher(
            vec![list_tool(operation.clone())],
            Arc::new(MockResolver::default()),
        );
        let call = ToolCall::new("list_x").with_arg("max_results", 10);

        let first = dispatcher.dispatch_call(&call, &scope()).await;
        let second = dispatcher.dispatch_call(&call, &scope()).await;

        assert!(first.is_success());
        assert_eq!(first.data(), second.data());
        assert_eq!(operation.calls(), 2);
    }

    #[tokio::test]
    async fn test_audit_record_per_dispatch_without_params() {
        let operation = MockOperation::returning(Ok(json!({"ids": []})));
        let logger = Arc::new(CapturingLogger::default());
        let dispatcher = dispatcher(
            vec![list_tool(operation)],
            Arc::new(MockResolver::default()),
        )
        .with_logger(logger.clone());

        dispatcher
            .dispatch("list_x", bag(json!({"password": "hunter2"})), &scope())
            .await;
        dispatcher.dispatch("missing", Map::new(), &scope()).await;

        let events = logger.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["tool"], "list_x");
        assert_eq!(events[0]["domain"], "compute");
        assert_eq!(events[0]["outcome"], "success");
        assert_eq!(events[1]["error_kind"], "ToolNotFound");
        assert_eq!(events[0]["fingerprint"], scope().fingerprint().as_str());
        assert!(!events[0].to_string().contains("hunter2"));
        assert!(!events[0].to_string().contains("secret"));
    }
}
