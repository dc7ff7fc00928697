//! Remote call errors.

use thiserror::Error;

/// A remote control-plane call failed.
///
/// The core does not try to tell transient failures (throttling) from terminal
/// ones (not found, conflict). The provider's error code is kept when the
/// transport exposes one so callers can branch on it themselves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The provider rejected the request.
    #[error("{operation} failed: {message}")]
    Provider {
        operation: String,
        code: Option<String>,
        message: String,
    },

    /// The request never produced a provider response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// No client could be built for the requested key.
    #[error("Client unavailable: {0}")]
    ClientUnavailable(String),

    /// The raw result did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl RemoteError {
    pub fn provider(operation: impl Into<String>, message: impl Into<String>) -> Self {
        RemoteError::Provider {
            operation: operation.into(),
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(self, code: impl Into<String>) -> Self {
        match self {
            RemoteError::Provider {
                operation, message, ..
            } => RemoteError::Provider {
                operation,
                code: Some(code.into()),
                message,
            },
            other => other,
        }
    }

    /// Provider error code, if the transport reported one
    pub fn code(&self) -> Option<&str> {
        match self {
            RemoteError::Provider { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_with_code() {
        let err = RemoteError::provider("TerminateInstances", "instance not found")
            .with_code("InvalidInstanceID.NotFound");

        assert_eq!(err.code(), Some("InvalidInstanceID.NotFound"));
        assert_eq!(
            err.to_string(),
            "TerminateInstances failed: instance not found"
        );
    }

    #[test]
    fn test_code_only_on_provider_errors() {
        let err = RemoteError::Transport("connection reset".to_string()).with_code("X");
        assert_eq!(err.code(), None);
    }
}
