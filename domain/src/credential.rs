//! Credential scopes and their fingerprints.
//!
//! A [`CredentialScope`] is produced by an external resolver (environment,
//! session values) and is opaque to the core except in two places: it is
//! handed to the client factory, and its [`fingerprint`](CredentialScope::fingerprint)
//! is part of the client cache key. Secrets never appear in `Debug` output.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::util::mask_middle;

/// Credentials plus the region they are used in.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialScope {
    pub access_id: String,
    pub secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    pub region: String,
}

impl CredentialScope {
    pub fn new(
        access_id: impl Into<String>,
        secret: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            access_id: access_id.into(),
            secret: secret.into(),
            session_token: None,
            region: region.into(),
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.session_token = if token.is_empty() { None } else { Some(token) };
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Stable, non-reversible identifier of the credential material.
    ///
    /// The region is deliberately left out; it is a separate part of the
    /// client cache key.
    pub fn fingerprint(&self) -> CredentialFingerprint {
        let mut hasher = Sha256::new();
        hasher.update(self.access_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.secret.as_bytes());
        hasher.update([0u8]);
        if let Some(token) = &self.session_token {
            hasher.update(token.as_bytes());
        }
        let digest = hasher.finalize();
        CredentialFingerprint(digest.iter().take(8).map(|b| format!("{:02x}", b)).collect())
    }

    /// Access id with its middle masked, for display
    pub fn masked_access_id(&self) -> String {
        mask_middle(&self.access_id, 4)
    }
}

impl std::fmt::Debug for CredentialScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialScope")
            .field("access_id", &self.masked_access_id())
            .field("secret", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .field("region", &self.region)
            .finish()
    }
}

/// Short hex digest identifying one set of credentials.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CredentialFingerprint(String);

impl CredentialFingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CredentialFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> CredentialScope {
        CredentialScope::new("AKIAEXAMPLE1234", "s3cr3t-value", "us-east-1")
    }

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        let a = scope().fingerprint();
        let b = scope().fingerprint();
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 16);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_changes_with_credentials_not_region() {
        let base = scope().fingerprint();
        assert_ne!(base, scope().with_session_token("tok").fingerprint());
        assert_ne!(
            base,
            CredentialScope::new("AKIAEXAMPLE1234", "other", "us-east-1").fingerprint()
        );
        assert_eq!(base, scope().with_region("eu-west-1").fingerprint());
    }

    #[test]
    fn test_empty_session_token_is_dropped() {
        assert_eq!(scope().with_session_token("").session_token, None);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", scope().with_session_token("session-abc"));
        assert!(!rendered.contains("s3cr3t-value"));
        assert!(!rendered.contains("session-abc"));
        assert!(!rendered.contains("AKIAEXAMPLE1234"));
        assert!(rendered.contains("AKIA"));
        assert!(rendered.contains("us-east-1"));
    }
}
