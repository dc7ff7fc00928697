//! Remote client construction and caching.
//!
//! - [`RemoteClientCache`]: lazily builds one client per
//!   `(domain, region, credential fingerprint)` and shares it afterwards
//! - `AwsClientFactory` (feature `aws`): builds typed SDK clients

mod cache;

pub use cache::RemoteClientCache;
