//! Credential resolution port
//!
//! Credential acquisition (environment, session values, profiles) is an
//! external concern. The core only consumes the resolved [`CredentialScope`].

use cloudops_domain::CredentialScope;
use thiserror::Error;

/// Errors raised while resolving credentials.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// A mandatory credential field has no value at any precedence level.
    #[error("Missing credential: {0}")]
    Missing(&'static str),

    #[error("Invalid credential: {0}")]
    Invalid(String),
}

/// Request- or session-scoped credential overrides.
///
/// Every field is optional; a resolver merges the present ones over its
/// process-wide defaults, field by field.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub access_id: Option<String>,
    pub secret: Option<String>,
    pub session_token: Option<String>,
    pub region: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(mut self, access_id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.access_id = Some(access_id.into());
        self.secret = Some(secret.into());
        self
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("access_id", &self.access_id)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .field("region", &self.region)
            .finish()
    }
}

/// Port for turning a request context into a credential scope.
pub trait CredentialResolver: Send + Sync {
    /// Resolve credentials; request values override process-wide defaults.
    fn resolve(&self, context: &RequestContext) -> Result<CredentialScope, CredentialError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_context_debug_redacts_secrets() {
        let context = RequestContext::new()
            .with_keys("AKIAEXAMPLE", "super-secret")
            .with_session_token("token-value")
            .with_region("eu-west-1");
        let debug = format!("{:?}", context);
        assert!(debug.contains("AKIAEXAMPLE"));
        assert!(debug.contains("eu-west-1"));
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("token-value"));
    }

    #[test]
    fn test_missing_display() {
        assert_eq!(
            CredentialError::Missing("secret").to_string(),
            "Missing credential: secret"
        );
    }
}
