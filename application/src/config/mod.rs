//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`ComplianceParams`]: scan caps, chunk size and remediation concurrency

pub mod compliance_params;

pub use compliance_params::ComplianceParams;
