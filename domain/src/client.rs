//! Remote client handles and their cache keys.
//!
//! The core never names a concrete SDK client type. A [`ClientHandle`] wraps
//! whatever the client factory built for a domain, and each adapter
//! downcasts it back to the type it expects.

use std::any::Any;
use std::sync::Arc;

use crate::core::remote::RemoteError;
use crate::credential::CredentialFingerprint;

/// Identity of one cached client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey {
    pub domain: String,
    pub region: String,
    pub fingerprint: CredentialFingerprint,
}

impl ClientKey {
    pub fn new(
        domain: impl Into<String>,
        region: impl Into<String>,
        fingerprint: CredentialFingerprint,
    ) -> Self {
        Self {
            domain: domain.into(),
            region: region.into(),
            fingerprint,
        }
    }
}

impl std::fmt::Display for ClientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}#{}", self.domain, self.region, self.fingerprint)
    }
}

/// Shared, type-erased client.
#[derive(Clone)]
pub struct ClientHandle {
    key: ClientKey,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ClientHandle {
    pub fn new<T: Any + Send + Sync>(key: ClientKey, client: T) -> Self {
        Self {
            key,
            inner: Arc::new(client),
        }
    }

    pub fn key(&self) -> &ClientKey {
        &self.key
    }

    /// Borrow the client as `T`.
    ///
    /// A mismatch means the catalog wired an adapter to the wrong domain; it
    /// is reported as a remote error rather than a panic.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Result<&T, RemoteError> {
        self.inner.downcast_ref::<T>().ok_or_else(|| {
            RemoteError::ClientUnavailable(format!(
                "client for {} is not a {}",
                self.key,
                std::any::type_name::<T>()
            ))
        })
    }

    /// Whether both handles share the same underlying client
    pub fn same_client(&self, other: &ClientHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
