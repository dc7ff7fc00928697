//! Tool domain module
//!
//! This module defines the core abstractions of the **tool catalog**: how a
//! caller (a person through a form, or an automated agent through the tool
//! protocol) reaches a remote control-plane operation by name, with its
//! inputs checked before anything leaves the process.
//!
//! # Overview
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolRegistry │───▶│ ToolCall     │───▶│ Envelope     │
//! │ (catalog)    │    │ (invocation) │    │ (output)     │
//! └──────┬───────┘    └──────────────┘    └──────────────┘
//!        │
//!        └─ "ec2_list_instances" → ToolDescriptor
//!                                    ├─ ToolDefinition (schema, mapping)
//!                                    └─ RemoteOperation (adapter)
//! ```
//!
//! # Key Types
//!
//! - [`ParameterSchema`] / [`FieldSpec`]: what a tool accepts
//! - [`ParameterMapping`]: declarative renaming and grouping of inputs
//! - [`ToolDefinition`]: name, domain, risk level, schema, mapping
//! - [`ToolDescriptor`]: a definition bound to its [`RemoteOperation`]
//! - [`ToolRegistry`]: immutable catalog, unique names across domains
//! - [`ParameterValidator`]: pure validation with a narrow coercion table
//!
//! # Architecture
//!
//! - **Domain** (this module): pure definitions and validation, no I/O
//! - **Application** (`Dispatcher`): the dispatch pipeline
//! - **Infrastructure** (adapters): concrete SDK calls per domain

pub mod entities;
pub mod mapping;
pub mod operation;
pub mod registry;
pub mod schema;
pub mod validation;

pub use entities::{RiskLevel, ToolCall, ToolDefinition, ToolDescriptor};
pub use mapping::{Gate, MappingRule, ParameterMapping};
pub use operation::RemoteOperation;
pub use registry::{RegistryStats, ToolRegistry, ToolRegistryBuilder};
pub use schema::{FieldKind, FieldSpec, ParameterSchema};
pub use validation::{
    ParameterValidator, SchemaValidator, UnknownFieldPolicy, ValidationError, ValidationIssue,
    apply_defaults,
};
