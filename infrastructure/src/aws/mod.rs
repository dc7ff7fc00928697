//! AWS adapters (feature `aws`).
//!
//! One [`RemoteOperation`](cloudops_domain::RemoteOperation) per catalog
//! tool, plus the [`AwsClientFactory`] that builds the typed SDK clients
//! they downcast their handle to.
//!
//! Adapters only translate: normalized parameters in, raw provider-named
//! records out. Presentation is delegated to the pure presenters in
//! [`crate::catalog`].

mod compute;
mod database;
mod error;
mod factory;

pub use error::sdk_error;
pub use factory::AwsClientFactory;

use cloudops_domain::{DomainError, ToolRegistry};

/// The full AWS-backed catalog.
///
/// # Errors
///
/// Fails if two domains declare the same tool name.
pub fn default_registry() -> Result<ToolRegistry, DomainError> {
    Ok(ToolRegistry::builder()
        .register_all(compute::descriptors())?
        .register_all(database::descriptors())?
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_default_registry_binds_every_definition() {
        let registry = default_registry().unwrap();
        let definitions = catalog::definitions();

        assert_eq!(registry.len(), definitions.len());
        for def in &definitions {
            let descriptor = registry.lookup(&def.name).unwrap();
            assert_eq!(descriptor.domain(), def.domain);
        }
    }
}
