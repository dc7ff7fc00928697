//! Domain layer for cloudops
//!
//! This crate contains the core types of the control-plane gateway: the tool
//! catalog, parameter validation, response envelopes, credential scopes and
//! the inventory and compliance model. It has no dependencies on
//! infrastructure or presentation concerns, and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! A tool is a named remote operation with a parameter schema. Tools are
//! grouped by domain (`compute`, `database`, ...) and assembled into one
//! immutable [`ToolRegistry`] whose names are unique across domains.
//!
//! ## Envelopes
//!
//! Every dispatch produces a [`ResponseEnvelope`]: either `success` with the
//! presented data, or `failure` with an [`ErrorKind`] and message.
//!
//! ## Compliance
//!
//! Two drained [`InventorySnapshot`]s diff into a [`ComplianceResult`]; a
//! remediation over the difference runs in chunks and yields a
//! [`BatchResult`].

pub mod client;
pub mod compliance;
pub mod config;
pub mod core;
pub mod credential;
pub mod envelope;
pub mod inventory;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use client::{ClientHandle, ClientKey};
pub use compliance::{BatchResult, ChunkOutcome, ComplianceResult, DEFAULT_CHUNK_SIZE, chunk_ids};
pub use config::OutputFormat;
pub use core::{error::DomainError, remote::RemoteError};
pub use credential::{CredentialFingerprint, CredentialScope};
pub use envelope::{ErrorInfo, ErrorKind, ItemOutcome, ResponseEnvelope};
pub use inventory::{InsertOutcome, InventorySnapshot, ListPage, ListedResource, ResourcePredicate};
pub use tool::{
    FieldKind, FieldSpec, Gate, MappingRule, ParameterMapping, ParameterSchema, ParameterValidator,
    RegistryStats, RemoteOperation, RiskLevel, SchemaValidator, ToolCall, ToolDefinition,
    ToolDescriptor, ToolRegistry, ToolRegistryBuilder, UnknownFieldPolicy, ValidationError,
    ValidationIssue, apply_defaults,
};
