//! Argument parsing for tool calls.
//!
//! Arguments are checked against the tool's JSON schema before any request is
//! made: every missing required argument is reported at once, then every
//! provided argument whose JSON type or numeric range does not fit its
//! declaration. Only then is the object deserialized into the typed
//! parameters.

use rmcp::{handler::server::tool::cached_schema_for_type, model::JsonObject};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ToolError;

const MAX_REF_DEPTH: usize = 16;

/// Parse raw call arguments into `A`.
pub fn parse_arguments<A>(arguments: JsonObject) -> Result<A, ToolError>
where
    A: DeserializeOwned + JsonSchema + 'static,
{
    let schema = Value::Object((*cached_schema_for_type::<A>()).clone());

    let missing = missing_required(&schema, &arguments);
    if !missing.is_empty() {
        return Err(ToolError::invalid_arguments(
            missing,
            "missing required argument(s)",
        ));
    }

    let malformed = malformed_arguments(&schema, &arguments);
    if !malformed.is_empty() {
        return Err(ToolError::invalid_arguments(
            malformed,
            "argument(s) have the wrong type or are out of range",
        ));
    }

    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(Vec::new(), e.to_string()))
}

/// Required names that are absent or explicitly null.
fn missing_required(schema: &Value, arguments: &JsonObject) -> Vec<String> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|required| {
            required
                .iter()
                .filter_map(Value::as_str)
                .filter(|name| arguments.get(*name).is_none_or(Value::is_null))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Provided names whose value does not match the declared property schema.
/// Unknown names are left to serde.
fn malformed_arguments(schema: &Value, arguments: &JsonObject) -> Vec<String> {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut names: Vec<String> = arguments
        .iter()
        .filter(|(name, value)| {
            properties
                .get(*name)
                .is_some_and(|property| !matches_schema(schema, property, value, 0))
        })
        .map(|(name, _)| name.clone())
        .collect();
    names.sort();
    names
}

/// Shallow structural check: `$ref`, `anyOf`/`oneOf`/`allOf`, `enum`, `const`,
/// `type` and numeric bounds. Nested object members are not inspected.
fn matches_schema(root: &Value, schema: &Value, value: &Value, depth: usize) -> bool {
    if depth > MAX_REF_DEPTH {
        return true;
    }

    let object = match schema {
        Value::Bool(accepts) => return *accepts,
        Value::Object(object) => object,
        _ => return true,
    };

    if let Some(target) = object.get("$ref").and_then(Value::as_str) {
        return match resolve_ref(root, target) {
            Some(resolved) => matches_schema(root, resolved, value, depth + 1),
            None => true,
        };
    }

    if value.is_null() && object.get("nullable") == Some(&Value::Bool(true)) {
        return true;
    }

    for key in ["anyOf", "oneOf"] {
        if let Some(options) = object.get(key).and_then(Value::as_array) {
            if !options
                .iter()
                .any(|option| matches_schema(root, option, value, depth + 1))
            {
                return false;
            }
        }
    }

    if let Some(parts) = object.get("allOf").and_then(Value::as_array) {
        if !parts
            .iter()
            .all(|part| matches_schema(root, part, value, depth + 1))
        {
            return false;
        }
    }

    if let Some(allowed) = object.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            return false;
        }
    }

    if object.get("const").is_some_and(|expected| expected != value) {
        return false;
    }

    let typed = match object.get("type") {
        Some(Value::String(kind)) => matches_type(kind, value),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .any(|kind| matches_type(kind, value)),
        _ => true,
    };
    typed && within_bounds(object, value)
}

/// Numeric range from `minimum`/`maximum` (inclusive or exclusive) and from
/// integer formats such as `uint32`, which carry the width of the Rust type.
fn within_bounds(schema: &JsonObject, value: &Value) -> bool {
    let Some(n) = value.as_f64() else {
        return true;
    };
    let bound = |key: &str| schema.get(key).and_then(Value::as_f64);

    if bound("minimum").is_some_and(|min| n < min)
        || bound("maximum").is_some_and(|max| n > max)
        || bound("exclusiveMinimum").is_some_and(|min| n <= min)
        || bound("exclusiveMaximum").is_some_and(|max| n >= max)
    {
        return false;
    }

    match schema.get("format").and_then(Value::as_str).and_then(format_range) {
        Some((min, max)) => n >= min && n <= max,
        None => true,
    }
}

fn format_range(format: &str) -> Option<(f64, f64)> {
    let range = match format {
        "uint8" => (0.0, u8::MAX as f64),
        "uint16" => (0.0, u16::MAX as f64),
        "uint32" => (0.0, u32::MAX as f64),
        "uint" | "uint64" => (0.0, u64::MAX as f64),
        "int8" => (i8::MIN as f64, i8::MAX as f64),
        "int16" => (i16::MIN as f64, i16::MAX as f64),
        "int32" => (i32::MIN as f64, i32::MAX as f64),
        "int64" => (i64::MIN as f64, i64::MAX as f64),
        _ => return None,
    };
    Some(range)
}

fn matches_type(kind: &str, value: &Value) -> bool {
    match kind {
        "null" => value.is_null(),
        "boolean" => value.is_boolean(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => {
            value.is_i64()
                || value.is_u64()
                || value.as_f64().is_some_and(|n| n.fract() == 0.0)
        }
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

/// Resolve a local reference such as `#/$defs/Role`.
fn resolve_ref<'a>(root: &'a Value, target: &str) -> Option<&'a Value> {
    target.strip_prefix('#').and_then(|pointer| root.pointer(pointer))
}
