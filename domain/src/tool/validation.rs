//! Parameter validation against a [`ParameterSchema`].
//!
//! Pure domain logic, no I/O. The validator checks presence, kind and enum
//! membership, applies the narrow coercion table below, and returns the
//! coerced parameter bag. Defaults are a separate step ([`apply_defaults`])
//! so callers can tell "what the caller sent" from "what will be sent".
//!
//! | Declared kind | Coerced from |
//! |---------------|--------------|
//! | `integer` | numeric string, float with zero fraction |
//! | `number`  | numeric string |
//! | `boolean` | `"true"` / `"false"` (any case) |
//!
//! Nothing else is converted. Elements of an array with a declared element
//! kind go through the same table, with `[i]` paths.

use serde_json::{Map, Value};

use super::schema::{FieldKind, FieldSpec, ParameterSchema};

/// What to do with fields the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFieldPolicy {
    /// Forward them untouched
    #[default]
    PassThrough,
    /// Reject the call
    Reject,
}

/// Why a field failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    Missing,
    WrongKind {
        expected: FieldKind,
        found: &'static str,
    },
    NotAllowed {
        value: String,
        allowed: Vec<String>,
    },
    UnknownField,
}

/// A field-level validation failure.
///
/// `field` is a dotted path into the parameter bag, with `[i]` for array
/// elements, e.g. `key_schema[1].key_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub issue: ValidationIssue,
}

impl ValidationError {
    fn new(field: impl Into<String>, issue: ValidationIssue) -> Self {
        Self {
            field: field.into(),
            issue,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.issue {
            ValidationIssue::Missing => write!(f, "Missing required parameter '{}'", self.field),
            ValidationIssue::WrongKind { expected, found } => write!(
                f,
                "Parameter '{}' must be {} (got {})",
                self.field, expected, found
            ),
            ValidationIssue::NotAllowed { value, allowed } => write!(
                f,
                "Parameter '{}' has value '{}', expected one of: {}",
                self.field,
                value,
                allowed.join(", ")
            ),
            ValidationIssue::UnknownField => write!(f, "Unknown parameter '{}'", self.field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validator for tool parameters
///
/// This is a pure domain trait that checks a parameter bag against a
/// schema without any I/O operations.
pub trait ParameterValidator: Send + Sync {
    /// Validate `params`, returning the coerced bag on success
    fn validate(
        &self,
        params: &Map<String, Value>,
        schema: &ParameterSchema,
        unknown: UnknownFieldPolicy,
    ) -> Result<Map<String, Value>, ValidationError>;
}

/// Default implementation of [`ParameterValidator`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl ParameterValidator for SchemaValidator {
    fn validate(
        &self,
        params: &Map<String, Value>,
        schema: &ParameterSchema,
        unknown: UnknownFieldPolicy,
    ) -> Result<Map<String, Value>, ValidationError> {
        validate_object(params, schema, unknown, "")
    }
}

/// Fill absent optional fields with their declared defaults.
///
/// Recurses into nested objects (and arrays of objects) that are present.
pub fn apply_defaults(params: &mut Map<String, Value>, schema: &ParameterSchema) {
    for field in schema.fields() {
        match params.get_mut(&field.name) {
            None => {
                if let Some(default) = &field.default {
                    params.insert(field.name.clone(), default.clone());
                }
            }
            Some(value) => {
                let Some(nested) = field.nested.as_deref() else {
                    continue;
                };
                match value {
                    Value::Object(inner) => apply_defaults(inner, nested),
                    Value::Array(items) => {
                        for item in items.iter_mut() {
                            if let Value::Object(inner) = item {
                                apply_defaults(inner, nested);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn validate_object(
    params: &Map<String, Value>,
    schema: &ParameterSchema,
    unknown: UnknownFieldPolicy,
    prefix: &str,
) -> Result<Map<String, Value>, ValidationError> {
    let mut out = Map::new();

    for field in schema.fields() {
        let path = join_path(prefix, &field.name);
        match params.get(&field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    return Err(ValidationError::new(path, ValidationIssue::Missing));
                }
            }
            Some(value) => {
                out.insert(field.name.clone(), coerce(value, field, &path)?);
            }
        }
    }

    for (name, value) in params {
        if schema.declares(name) {
            continue;
        }
        match unknown {
            UnknownFieldPolicy::Reject => {
                return Err(ValidationError::new(
                    join_path(prefix, name),
                    ValidationIssue::UnknownField,
                ));
            }
            UnknownFieldPolicy::PassThrough => {
                out.insert(name.clone(), value.clone());
            }
        }
    }

    Ok(out)
}

fn coerce(value: &Value, field: &FieldSpec, path: &str) -> Result<Value, ValidationError> {
    let wrong_kind = || {
        ValidationError::new(
            path,
            ValidationIssue::WrongKind {
                expected: field.kind,
                found: json_kind(value),
            },
        )
    };

    match field.kind {
        FieldKind::String => match value {
            Value::String(_) => Ok(value.clone()),
            _ => Err(wrong_kind()),
        },
        FieldKind::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            Value::Number(n) => n
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| Value::from(f as i64))
                .ok_or_else(wrong_kind),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| wrong_kind()),
            _ => Err(wrong_kind()),
        },
        FieldKind::Number => match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(wrong_kind),
            _ => Err(wrong_kind()),
        },
        FieldKind::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            _ => Err(wrong_kind()),
        },
        FieldKind::Enum => match value {
            Value::String(s) if field.allows(s) => Ok(value.clone()),
            Value::String(s) => Err(ValidationError::new(
                path,
                ValidationIssue::NotAllowed {
                    value: s.clone(),
                    allowed: field.allowed_values.clone().unwrap_or_default(),
                },
            )),
            _ => Err(wrong_kind()),
        },
        FieldKind::Object => match value {
            Value::Object(inner) => match field.nested.as_deref() {
                Some(nested) => Ok(Value::Object(validate_object(
                    inner,
                    nested,
                    UnknownFieldPolicy::PassThrough,
                    path,
                )?)),
                None => Ok(value.clone()),
            },
            _ => Err(wrong_kind()),
        },
        FieldKind::Array => match value {
            Value::Array(items) => match field.nested.as_deref() {
                Some(nested) => {
                    let mut out = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        let item_path = format!("{}[{}]", path, i);
                        let Value::Object(inner) = item else {
                            return Err(ValidationError::new(
                                item_path,
                                ValidationIssue::WrongKind {
                                    expected: FieldKind::Object,
                                    found: json_kind(item),
                                },
                            ));
                        };
                        out.push(Value::Object(validate_object(
                            inner,
                            nested,
                            UnknownFieldPolicy::PassThrough,
                            &item_path,
                        )?));
                    }
                    Ok(Value::Array(out))
                }
                None => match field.items {
                    Some(kind) => {
                        let element = FieldSpec::new(field.name.clone(), "", kind);
                        items
                            .iter()
                            .enumerate()
                            .map(|(i, item)| coerce(item, &element, &format!("{}[{}]", path, i)))
                            .collect::<Result<Vec<_>, _>>()
                            .map(Value::Array)
                    }
                    None => Ok(value.clone()),
                },
            },
            _ => Err(wrong_kind()),
        },
    }
}
