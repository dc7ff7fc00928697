//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: catalog construction and batching errors
//! - [`remote::RemoteError`]: failures reported by a remote control-plane call

pub mod error;
pub mod remote;
