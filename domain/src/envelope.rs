//! Response envelopes: the uniform result of every dispatch.
//!
//! A dispatch never returns a raw error. Whatever happened (unknown tool,
//! schema violation, provider rejection), the caller gets a
//! [`ResponseEnvelope`] it can display directly or branch on by
//! [`ErrorKind`].
//!
//! | Kind | Caller error? | Network cost |
//! |------|---------------|--------------|
//! | `ToolNotFound` | Yes | None |
//! | `ValidationError` | Yes | None |
//! | `RemoteCallError` | No | One call |
//! | `PartialBatchFailure` | No | One call per chunk |

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::remote::RemoteError;
use crate::tool::validation::ValidationError;
use crate::util::truncate_str;

/// Provider messages longer than this are cut before they reach an envelope
pub const MAX_MESSAGE_BYTES: usize = 2048;

fn bounded_message(err: &RemoteError) -> String {
    truncate_str(&err.to_string(), MAX_MESSAGE_BYTES).to_string()
}

/// Classification of a failed envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ToolNotFound,
    ValidationError,
    RemoteCallError,
    PartialBatchFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::ToolNotFound => "ToolNotFound",
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::RemoteCallError => "RemoteCallError",
            ErrorKind::PartialBatchFailure => "PartialBatchFailure",
        }
    }

    /// Whether the failure was decided before any remote call was made
    pub fn is_caller_error(&self) -> bool {
        matches!(self, ErrorKind::ToolNotFound | ErrorKind::ValidationError)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified error message, detached from any envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    /// Provider error code, when the remote side reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorInfo {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
        }
    }
}

impl From<&RemoteError> for ErrorInfo {
    fn from(err: &RemoteError) -> Self {
        Self {
            kind: ErrorKind::RemoteCallError,
            message: bounded_message(err),
            code: err.code().map(str::to_string),
        }
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(code) = &self.code {
            write!(f, " ({})", code)?;
        }
        Ok(())
    }
}

/// Outcome for one item of a multi-item call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub id: String,
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseEnvelope {
    Success {
        data: Value,
    },
    Failure {
        error_kind: ErrorKind,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        partial: Option<Vec<ItemOutcome>>,
    },
}

impl ResponseEnvelope {
    pub fn success(data: Value) -> Self {
        ResponseEnvelope::Success { data }
    }

    pub fn failure(error_kind: ErrorKind, message: impl Into<String>) -> Self {
        ResponseEnvelope::Failure {
            error_kind,
            message: message.into(),
            code: None,
            partial: None,
        }
    }

    pub fn tool_not_found(name: &str) -> Self {
        Self::failure(ErrorKind::ToolNotFound, format!("Tool not found: {}", name))
    }

    pub fn validation(err: &ValidationError) -> Self {
        Self::failure(ErrorKind::ValidationError, err.to_string())
    }

    pub fn remote(err: &RemoteError) -> Self {
        ResponseEnvelope::Failure {
            error_kind: ErrorKind::RemoteCallError,
            message: bounded_message(err),
            code: err.code().map(str::to_string),
            partial: None,
        }
    }

    /// Attach per-item outcomes to a failure (no-op on success)
    pub fn with_partial(mut self, outcomes: Vec<ItemOutcome>) -> Self {
        if let ResponseEnvelope::Failure { partial, .. } = &mut self {
            *partial = Some(outcomes);
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseEnvelope::Success { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            ResponseEnvelope::Success { data } => Some(data),
            ResponseEnvelope::Failure { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            ResponseEnvelope::Success { .. } => None,
            ResponseEnvelope::Failure { error_kind, .. } => Some(*error_kind),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ResponseEnvelope::Success { .. } => None,
            ResponseEnvelope::Failure { message, .. } => Some(message),
        }
    }

    /// The failure as an [`ErrorInfo`], if this is a failure
    pub fn error_info(&self) -> Option<ErrorInfo> {
        match self {
            ResponseEnvelope::Success { .. } => None,
            ResponseEnvelope::Failure {
                error_kind,
                message,
                code,
                ..
            } => Some(ErrorInfo {
                kind: *error_kind,
                message: message.clone(),
                code: code.clone(),
            }),
        }
    }
}
