//! Parameter schemas: what a tool accepts.
//!
//! A [`ParameterSchema`] is an ordered list of [`FieldSpec`]s. Schemas are
//! plain data: the validator in [`super::validation`] interprets them, the
//! JSON Schema converter in the infrastructure layer renders them for the
//! tool protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::core::error::DomainError;

/// Kind of a single parameter field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Integer,
    Boolean,
    Number,
    Object,
    Array,
    /// A string restricted to [`FieldSpec::allowed_values`]
    Enum,
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Number => "number",
            FieldKind::Object => "object",
            FieldKind::Array => "array",
            FieldKind::Enum => "enum",
        }
    }

    /// JSON Schema `type` keyword for this kind
    pub fn json_type(&self) -> &str {
        match self {
            FieldKind::Enum => "string",
            other => other.as_str(),
        }
    }

    /// Whether a nested schema is meaningful for this kind
    pub fn supports_nested(&self) -> bool {
        matches!(self, FieldKind::Object | FieldKind::Array)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            FieldKind::String | FieldKind::Integer | FieldKind::Boolean | FieldKind::Number
        )
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Specification of one accepted input field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub description: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Value applied when an optional field is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Members of an [`FieldKind::Enum`] field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
    /// Shape of an object, or of each element of an array of objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<Box<ParameterSchema>>,
    /// Kind of every element of an array of scalars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<FieldKind>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
            default: None,
            allowed_values: None,
            nested: None,
            items: None,
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, FieldKind::String)
    }

    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, FieldKind::Integer)
    }

    pub fn number(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, FieldKind::Number)
    }

    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, FieldKind::Boolean)
    }

    pub fn object(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, FieldKind::Object)
    }

    pub fn array(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, FieldKind::Array)
    }

    /// An array whose elements must all be strings (ids, names)
    pub fn string_array(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::array(name, description).with_items(FieldKind::String)
    }

    pub fn enumeration<I, S>(
        name: impl Into<String>,
        description: impl Into<String>,
        values: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = Self::new(name, description, FieldKind::Enum);
        spec.allowed_values = Some(values.into_iter().map(Into::into).collect());
        spec
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_nested(mut self, schema: ParameterSchema) -> Self {
        self.nested = Some(Box::new(schema));
        self
    }

    pub fn with_items(mut self, kind: FieldKind) -> Self {
        self.items = Some(kind);
        self
    }

    /// Whether `value` is a member of this enum field's allowed set
    pub fn allows(&self, value: &str) -> bool {
        self.allowed_values
            .as_ref()
            .is_some_and(|values| values.iter().any(|v| v == value))
    }
}

/// Ordered set of field specs accepted by one tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    fields: Vec<FieldSpec>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check the schema's own invariants.
    ///
    /// Field names are unique, required fields carry no default, enum fields
    /// list their members (and a default, if any, is one of them), only
    /// object or array fields carry a nested shape, and an element kind is a
    /// scalar declared on an array without a nested shape.
    pub fn check(&self, tool: &str) -> Result<(), DomainError> {
        let invalid = |reason: String| DomainError::InvalidSchema {
            tool: tool.to_string(),
            reason,
        };

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(invalid(format!("field '{}' declared twice", field.name)));
            }
            if field.required && field.default.is_some() {
                return Err(invalid(format!(
                    "required field '{}' must not have a default",
                    field.name
                )));
            }
            if field.kind == FieldKind::Enum {
                match &field.allowed_values {
                    Some(values) if !values.is_empty() => {}
                    _ => {
                        return Err(invalid(format!(
                            "enum field '{}' has no allowed values",
                            field.name
                        )));
                    }
                }
                if let Some(default) = &field.default
                    && !default.as_str().is_some_and(|d| field.allows(d))
                {
                    return Err(invalid(format!(
                        "default of enum field '{}' is not an allowed value",
                        field.name
                    )));
                }
            }
            if let Some(nested) = &field.nested {
                if !field.kind.supports_nested() {
                    return Err(invalid(format!(
                        "{} field '{}' cannot carry a nested shape",
                        field.kind, field.name
                    )));
                }
                nested.check(&format!("{}.{}", tool, field.name))?;
            }
            if let Some(items) = field.items {
                if field.kind != FieldKind::Array || field.nested.is_some() {
                    return Err(invalid(format!(
                        "field '{}' declares an element kind but is not a plain array",
                        field.name
                    )));
                }
                if !items.is_scalar() {
                    return Err(invalid(format!(
                        "array field '{}' has non-scalar element kind {}",
                        field.name, items
                    )));
                }
            }
        }
        Ok(())
    }
}
