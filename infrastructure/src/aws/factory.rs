//! Typed SDK client construction.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ec2::config::Credentials;
use cloudops_application::ports::client_resolver::ClientFactory;
use cloudops_domain::{ClientHandle, ClientKey, CredentialScope, RemoteError};
use tracing::debug;

use crate::catalog::{compute, database};

const PROVIDER_NAME: &str = "cloudops";

/// Builds `aws_sdk_ec2::Client` for `compute` and `aws_sdk_dynamodb::Client`
/// for `database`, from static credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsClientFactory;

impl AwsClientFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn supports(domain: &str) -> bool {
        matches!(domain, compute::DOMAIN | database::DOMAIN)
    }
}

#[async_trait]
impl ClientFactory for AwsClientFactory {
    async fn create(
        &self,
        key: &ClientKey,
        scope: &CredentialScope,
    ) -> Result<ClientHandle, RemoteError> {
        if !Self::supports(&key.domain) {
            return Err(RemoteError::ClientUnavailable(format!(
                "no client constructor for domain '{}'",
                key.domain
            )));
        }

        let credentials = Credentials::new(
            scope.access_id.clone(),
            scope.secret.clone(),
            scope.session_token.clone(),
            None,
            PROVIDER_NAME,
        );
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(key.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;
        debug!("Loaded SDK config for {}", key);

        let handle = match key.domain.as_str() {
            compute::DOMAIN => ClientHandle::new(key.clone(), aws_sdk_ec2::Client::new(&config)),
            _ => ClientHandle::new(key.clone(), aws_sdk_dynamodb::Client::new(&config)),
        };
        Ok(handle)
    }
}
