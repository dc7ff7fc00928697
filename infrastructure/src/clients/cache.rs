//! Per-key lazy client cache.
//!
//! Each [`ClientKey`] owns a `tokio::sync::OnceCell`. The map lock is held
//! only long enough to find or insert the cell; construction itself happens
//! outside the lock, inside `get_or_try_init`, so concurrent first callers
//! for the same key wait on one construction while other keys proceed.
//!
//! A failed construction leaves its cell empty: the next call for that key
//! builds again.

use async_trait::async_trait;
use cloudops_application::ports::client_resolver::{ClientFactory, ClientResolverPort};
use cloudops_domain::{ClientHandle, ClientKey, CredentialScope, RemoteError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::{debug, info};

type Cell = Arc<OnceCell<ClientHandle>>;

/// Client resolver that builds each client at most once per key.
pub struct RemoteClientCache {
    factory: Arc<dyn ClientFactory>,
    cells: Mutex<HashMap<ClientKey, Cell>>,
}

impl RemoteClientCache {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            factory,
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Number of keys seen so far (including ones whose build failed).
    pub fn len(&self) -> usize {
        self.cells.lock().map(|cells| cells.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell_for(&self, key: &ClientKey) -> Result<Cell, RemoteError> {
        let mut cells = self
            .cells
            .lock()
            .map_err(|_| RemoteError::ClientUnavailable("client cache lock poisoned".to_string()))?;
        Ok(cells.entry(key.clone()).or_default().clone())
    }
}

#[async_trait]
impl ClientResolverPort for RemoteClientCache {
    async fn resolve(
        &self,
        domain: &str,
        region: &str,
        scope: &CredentialScope,
    ) -> Result<ClientHandle, RemoteError> {
        let key = ClientKey::new(domain, region, scope.fingerprint());
        let cell = self.cell_for(&key)?;

        if let Some(handle) = cell.get() {
            debug!("Client cache hit for {}", key);
            return Ok(handle.clone());
        }

        let handle = cell
            .get_or_try_init(|| async {
                info!("Building {} client for region {}", domain, region);
                self.factory.create(&key, scope).await
            })
            .await?;
        Ok(handle.clone())
    }
}
