//! Environment-backed credential resolution.
//!
//! Process-wide values are read once, when the resolver is built, so a
//! resolver never observes environment changes made mid-run. Request values
//! override them field by field; the configured default region is the last
//! fallback for the region.

use cloudops_application::ports::credentials::{
    CredentialError, CredentialResolver, RequestContext,
};
use cloudops_domain::CredentialScope;
use tracing::debug;

pub const ACCESS_KEY_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";
pub const REGION_VAR: &str = "AWS_DEFAULT_REGION";

/// [`CredentialResolver`] over the standard AWS environment variables.
#[derive(Clone)]
pub struct EnvCredentialResolver {
    defaults: RequestContext,
    default_region: String,
}

impl EnvCredentialResolver {
    /// Capture the current process environment.
    pub fn from_env(default_region: impl Into<String>) -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self::with_defaults(
            RequestContext {
                access_id: var(ACCESS_KEY_VAR),
                secret: var(SECRET_KEY_VAR),
                session_token: var(SESSION_TOKEN_VAR),
                region: var(REGION_VAR),
            },
            default_region,
        )
    }

    /// Resolver with explicit process-wide defaults instead of the environment.
    pub fn with_defaults(defaults: RequestContext, default_region: impl Into<String>) -> Self {
        Self {
            defaults,
            default_region: default_region.into(),
        }
    }
}

fn pick<'a>(request: &'a Option<String>, fallback: &'a Option<String>) -> Option<&'a str> {
    request
        .as_deref()
        .filter(|v| !v.is_empty())
        .or_else(|| fallback.as_deref().filter(|v| !v.is_empty()))
}

impl CredentialResolver for EnvCredentialResolver {
    fn resolve(&self, context: &RequestContext) -> Result<CredentialScope, CredentialError> {
        let access_id = pick(&context.access_id, &self.defaults.access_id)
            .ok_or(CredentialError::Missing("access key id"))?;
        let secret = pick(&context.secret, &self.defaults.secret)
            .ok_or(CredentialError::Missing("secret access key"))?;
        let region = pick(&context.region, &self.defaults.region).unwrap_or(&self.default_region);

        if region.trim().is_empty() {
            return Err(CredentialError::Invalid("region is empty".to_string()));
        }

        let mut scope = CredentialScope::new(access_id, secret, region);
        if let Some(token) = pick(&context.session_token, &self.defaults.session_token) {
            scope = scope.with_session_token(token);
        }

        debug!("Resolved credentials {} in {}", scope.masked_access_id(), scope.region);
        Ok(scope)
    }
}

impl std::fmt::Debug for EnvCredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvCredentialResolver")
            .field("defaults", &self.defaults)
            .field("default_region", &self.default_region)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process_defaults() -> RequestContext {
        RequestContext::new()
            .with_keys("AKIAPROCESS", "process-secret")
            .with_region("eu-central-1")
    }

    #[test]
    fn test_process_defaults_are_used() {
        let resolver = EnvCredentialResolver::with_defaults(process_defaults(), "us-east-1");

        let scope = resolver.resolve(&RequestContext::new()).unwrap();

        assert_eq!(scope.access_id, "AKIAPROCESS");
        assert_eq!(scope.region, "eu-central-1");
        assert_eq!(scope.session_token, None);
    }

    #[test]
    fn test_request_overrides_field_by_field() {
        let resolver = EnvCredentialResolver::with_defaults(process_defaults(), "us-east-1");

        let scope = resolver
            .resolve(&RequestContext::new().with_region("ap-southeast-2"))
            .unwrap();

        assert_eq!(scope.access_id, "AKIAPROCESS");
        assert_eq!(scope.secret, "process-secret");
        assert_eq!(scope.region, "ap-southeast-2");
    }

    #[test]
    fn test_request_keys_win() {
        let resolver = EnvCredentialResolver::with_defaults(process_defaults(), "us-east-1");

        let scope = resolver
            .resolve(
                &RequestContext::new()
                    .with_keys("AKIAREQUEST", "request-secret")
                    .with_session_token("tok"),
            )
            .unwrap();

        assert_eq!(scope.access_id, "AKIAREQUEST");
        assert_eq!(scope.session_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_configured_region_is_last_fallback() {
        let defaults = RequestContext::new().with_keys("AKIAPROCESS", "process-secret");
        let resolver = EnvCredentialResolver::with_defaults(defaults, "us-west-2");

        let scope = resolver.resolve(&RequestContext::new()).unwrap();

        assert_eq!(scope.region, "us-west-2");
    }

    #[test]
    fn test_missing_secret_is_reported() {
        let defaults = RequestContext {
            access_id: Some("AKIAPROCESS".to_string()),
            ..Default::default()
        };
        let resolver = EnvCredentialResolver::with_defaults(defaults, "us-east-1");

        let err = resolver.resolve(&RequestContext::new()).unwrap_err();

        assert_eq!(err, CredentialError::Missing("secret access key"));
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let resolver = EnvCredentialResolver::with_defaults(RequestContext::new(), "us-east-1");

        let err = resolver
            .resolve(&RequestContext::new().with_keys("", "secret"))
            .unwrap_err();

        assert_eq!(err, CredentialError::Missing("access key id"));
    }

    #[test]
    fn test_empty_session_token_is_not_attached() {
        let resolver = EnvCredentialResolver::with_defaults(process_defaults(), "us-east-1");

        let scope = resolver
            .resolve(&RequestContext::new().with_session_token(""))
            .unwrap();

        assert_eq!(scope.session_token, None);
    }
}
