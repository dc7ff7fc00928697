//! Infrastructure layer for cloudops
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the client cache, credential resolution, the tool
//! catalog and its AWS adapters, configuration file loading and the audit
//! log.

#[cfg(feature = "aws")]
pub mod aws;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod credentials;
pub mod logging;
pub mod tools;

// Re-export commonly used types
#[cfg(feature = "aws")]
pub use aws::{AwsClientFactory, default_registry};
pub use clients::RemoteClientCache;
pub use config::{
    ConfigLoader, ConfigValidationError, DEFAULT_REGION, FileAwsConfig, FileComplianceConfig,
    FileConfig, FileDispatchConfig, FileOutputConfig,
};
pub use credentials::EnvCredentialResolver;
pub use logging::JsonlDispatchLogger;
pub use tools::JsonSchemaConverter;
