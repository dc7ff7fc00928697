//! Tool-backed list and batch operations.
//!
//! Adapters that let the compliance use case drive catalog tools through
//! the [`Dispatcher`], so every scan page and every remediation chunk gets
//! the same validation, client resolution and audit trail as a direct call.

use crate::ports::inventory::{BatchOperation, ListOperation};
use crate::use_cases::dispatch::Dispatcher;
use async_trait::async_trait;
use cloudops_domain::{
    CredentialScope, ErrorInfo, ErrorKind, ListPage, RemoteError, ResponseEnvelope,
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A list tool seen through the [`ListOperation`] paging contract.
pub struct ToolListOperation {
    dispatcher: Arc<Dispatcher>,
    tool: String,
    label: String,
    base_params: Map<String, Value>,
    cursor_param: String,
    scope: CredentialScope,
}

impl ToolListOperation {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        tool: impl Into<String>,
        cursor_param: impl Into<String>,
        scope: CredentialScope,
    ) -> Self {
        let tool = tool.into();
        Self {
            dispatcher,
            label: tool.clone(),
            tool,
            base_params: Map::new(),
            cursor_param: cursor_param.into(),
            scope,
        }
    }

    /// Parameters sent with every page (filters, page size)
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base_params.insert(key.into(), value.into());
        self
    }

    /// Name shown in progress output (defaults to the tool name)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

#[async_trait]
impl ListOperation for ToolListOperation {
    fn label(&self) -> &str {
        &self.label
    }

    async fn list_page(&self, cursor: Option<&str>) -> Result<ListPage, RemoteError> {
        let mut params = self.base_params.clone();
        if let Some(cursor) = cursor {
            params.insert(self.cursor_param.clone(), Value::String(cursor.to_string()));
        }

        match self.dispatcher.dispatch(&self.tool, params, &self.scope).await {
            ResponseEnvelope::Success { data } => ListPage::from_presented(&data),
            failure => Err(envelope_to_remote(&self.tool, &failure)),
        }
    }
}

/// A mutating tool applied to one chunk of ids per call.
pub struct ToolBatchOperation {
    dispatcher: Arc<Dispatcher>,
    tool: String,
    base_params: Map<String, Value>,
    ids_param: String,
    scope: CredentialScope,
}

impl ToolBatchOperation {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        tool: impl Into<String>,
        ids_param: impl Into<String>,
        scope: CredentialScope,
    ) -> Self {
        Self {
            dispatcher,
            tool: tool.into(),
            base_params: Map::new(),
            ids_param: ids_param.into(),
            scope,
        }
    }

    /// Parameters sent with every chunk (e.g. the tags to apply)
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base_params.insert(key.into(), value.into());
        self
    }
}

#[async_trait]
impl BatchOperation for ToolBatchOperation {
    fn label(&self) -> &str {
        &self.tool
    }

    async fn apply(&self, ids: &[String]) -> Result<(), ErrorInfo> {
        let mut params = self.base_params.clone();
        params.insert(
            self.ids_param.clone(),
            Value::Array(ids.iter().cloned().map(Value::String).collect()),
        );

        let envelope = self.dispatcher.dispatch(&self.tool, params, &self.scope).await;
        match envelope.error_info() {
            None => Ok(()),
            Some(info) => Err(info),
        }
    }
}

fn envelope_to_remote(tool: &str, envelope: &ResponseEnvelope) -> RemoteError {
    match envelope.error_info() {
        Some(info) if info.kind == ErrorKind::RemoteCallError => {
            let err = RemoteError::provider(tool, info.message);
            match info.code {
                Some(code) => err.with_code(code),
                None => err,
            }
        }
        Some(info) => RemoteError::UnexpectedResponse(info.to_string()),
        None => RemoteError::UnexpectedResponse(format!("{} returned no data", tool)),
    }
}
