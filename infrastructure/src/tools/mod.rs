//! Tool protocol export
//!
//! Renders catalog definitions as JSON Schema so an automated caller can
//! discover every tool and its inputs.

mod schema;

pub use schema::JsonSchemaConverter;
