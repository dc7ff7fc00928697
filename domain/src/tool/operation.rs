//! Remote operation abstraction
//!
//! This module defines the [`RemoteOperation`] trait, the seam between the
//! provider-agnostic dispatch layer and one concrete control-plane call.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Dispatcher                             │
//! │   (lookup → validate → defaults → normalize → client)       │
//! └─────────────────────────────────────────────────────────────┘
//!           │              │              │              │
//!           ▼              ▼              ▼              ▼
//!    ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐
//!    │ ec2 list │   │ ec2 term │   │ ddb list │   │ ddb ...  │
//!    │ adapter  │   │ adapter  │   │ adapter  │   │ adapter  │
//!    └──────────┘   └──────────┘   └──────────┘   └──────────┘
//! ```
//!
//! An adapter receives the already validated and normalized parameter bag
//! plus a [`ClientHandle`] for its domain. It returns the raw provider result
//! as JSON, and separately declares how that raw result is presented to
//! callers ([`RemoteOperation::present`]).

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::client::ClientHandle;
use crate::core::remote::RemoteError;

/// One remote control-plane call.
#[async_trait]
pub trait RemoteOperation: Send + Sync {
    /// Provider-side operation name (e.g. "DescribeInstances")
    fn operation_name(&self) -> &str;

    /// Perform the call
    async fn invoke(
        &self,
        params: &Map<String, Value>,
        client: &ClientHandle,
    ) -> Result<Value, RemoteError>;

    /// Reshape the raw result for callers.
    ///
    /// Output renaming belongs to the adapter, not the dispatcher. The default
    /// presents the raw result unchanged.
    fn present(&self, raw: Value) -> Value {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientKey;
    use crate::credential::CredentialScope;
    use serde_json::json;

    /// A mock operation for testing
    struct EchoOperation;

    #[async_trait]
    impl RemoteOperation for EchoOperation {
        fn operation_name(&self) -> &str {
            "Echo"
        }

        async fn invoke(
            &self,
            params: &Map<String, Value>,
            client: &ClientHandle,
        ) -> Result<Value, RemoteError> {
            let region = client.downcast::<String>()?;
            Ok(json!({"Params": params, "Region": region}))
        }
    }

    fn handle() -> ClientHandle {
        let key = ClientKey::new(
            "test",
            "eu-west-1",
            CredentialScope::new("a", "b", "eu-west-1").fingerprint(),
        );
        ClientHandle::new(key, "eu-west-1".to_string())
    }

    #[tokio::test]
    async fn test_operation_invoke_and_default_present() {
        let mut params = Map::new();
        params.insert("name".to_string(), json!("x"));

        let raw = EchoOperation.invoke(&params, &handle()).await.unwrap();
        let presented = EchoOperation.present(raw.clone());

        assert_eq!(presented, raw);
        assert_eq!(presented["Region"], "eu-west-1");
        assert_eq!(presented["Params"]["name"], "x");
    }
}
