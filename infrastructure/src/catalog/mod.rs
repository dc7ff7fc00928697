//! Tool catalog: per-domain definitions and presenters.
//!
//! Everything here is pure. Definitions describe what each tool accepts and
//! how generic field names are normalized; presenters reshape the raw,
//! provider-named records an adapter returns into the caller-facing output.
//! The SDK calls that produce those raw records live in `crate::aws`.
//!
//! | Domain     | Client    | Tools |
//! |------------|-----------|-------|
//! | `compute`  | EC2       | list, describe, start, stop, terminate, tag |
//! | `database` | DynamoDB  | list, describe, create, delete |

pub mod compute;
pub mod database;

use cloudops_domain::{FieldSpec, RemoteError, ToolDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

/// Optional per-call region override, declared by every catalog tool.
pub(crate) fn region_field() -> FieldSpec {
    FieldSpec::string("region", "Region to run in (defaults to the credential region)")
}

/// Every catalog definition, across domains.
pub fn definitions() -> Vec<ToolDefinition> {
    let mut all = compute::definitions();
    all.extend(database::definitions());
    all
}

// ==================== Raw records ====================

/// Serialize a raw record for the dispatcher.
pub fn to_raw<T: Serialize>(operation: &str, record: &T) -> Result<Value, RemoteError> {
    serde_json::to_value(record)
        .map_err(|e| RemoteError::UnexpectedResponse(format!("{}: {}", operation, e)))
}

/// Run `present` over `raw` parsed as `T`.
///
/// A raw value of another shape is returned unchanged rather than dropped.
pub(crate) fn reshape<T, F>(raw: Value, present: F) -> Value
where
    T: DeserializeOwned,
    F: FnOnce(T) -> Value,
{
    match serde_json::from_value::<T>(raw.clone()) {
        Ok(record) => present(record),
        Err(e) => {
            warn!("Raw result did not match its record type: {}", e);
            raw
        }
    }
}

// ==================== Parameter access ====================
//
// Parameters reaching an adapter are already validated and normalized, so
// these only fail when a catalog definition and its adapter disagree.

pub fn string_param<'a>(
    operation: &str,
    params: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a str, RemoteError> {
    params
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| RemoteError::provider(operation, format!("missing parameter '{}'", name)))
}

pub fn optional_string<'a>(params: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    params.get(name).and_then(Value::as_str)
}

pub fn optional_i64(params: &Map<String, Value>, name: &str) -> Option<i64> {
    params.get(name).and_then(Value::as_i64)
}

/// An integer parameter narrowed to `i32`, as most SDK page sizes are.
pub fn optional_i32(
    operation: &str,
    params: &Map<String, Value>,
    name: &str,
) -> Result<Option<i32>, RemoteError> {
    optional_i64(params, name)
        .map(|n| {
            i32::try_from(n).map_err(|_| {
                RemoteError::provider(operation, format!("'{}' is out of range: {}", name, n))
            })
        })
        .transpose()
}

/// A required array of strings.
pub fn string_list(
    operation: &str,
    params: &Map<String, Value>,
    name: &str,
) -> Result<Vec<String>, RemoteError> {
    let items = params
        .get(name)
        .and_then(Value::as_array)
        .ok_or_else(|| RemoteError::provider(operation, format!("missing parameter '{}'", name)))?;

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                RemoteError::provider(operation, format!("'{}' must contain only strings", name))
            })
        })
        .collect()
}

/// A required array of objects.
pub fn object_list<'a>(
    operation: &str,
    params: &'a Map<String, Value>,
    name: &str,
) -> Result<Vec<&'a Map<String, Value>>, RemoteError> {
    let items = params
        .get(name)
        .and_then(Value::as_array)
        .ok_or_else(|| RemoteError::provider(operation, format!("missing parameter '{}'", name)))?;

    items
        .iter()
        .map(|item| {
            item.as_object().ok_or_else(|| {
                RemoteError::provider(operation, format!("'{}' must contain only objects", name))
            })
        })
        .collect()
}
