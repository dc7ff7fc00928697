//! Client resolution ports
//!
//! The [`Dispatcher`](crate::use_cases::dispatch::Dispatcher) never builds an
//! SDK client itself. It asks a [`ClientResolverPort`] for the handle of a
//! `(domain, region, credential fingerprint)` key; the resolver memoizes
//! handles and delegates construction of new ones to a [`ClientFactory`].

use async_trait::async_trait;
use cloudops_domain::{ClientHandle, ClientKey, CredentialScope, RemoteError};

/// Port for obtaining a ready client handle.
///
/// Implementations must construct at most one handle per key, even when
/// called concurrently, and must not serialize unrelated keys behind one
/// construction.
#[async_trait]
pub trait ClientResolverPort: Send + Sync {
    /// Get the cached handle for this key, building it on first use
    async fn resolve(
        &self,
        domain: &str,
        region: &str,
        scope: &CredentialScope,
    ) -> Result<ClientHandle, RemoteError>;
}

/// Port for constructing one client.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Build a client for `key.domain` in `key.region` with the given credentials.
    ///
    /// An unknown domain is reported as [`RemoteError::ClientUnavailable`].
    async fn create(
        &self,
        key: &ClientKey,
        scope: &CredentialScope,
    ) -> Result<ClientHandle, RemoteError>;
}
