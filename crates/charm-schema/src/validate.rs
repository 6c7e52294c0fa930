//! # Params Validation
//!
//! Checks caller-supplied action params against an assembled schema and
//! reports the first violation with a dotted instance path and the
//! offending value rendered as compact, key-sorted JSON.
//!
//! ## Supported Keywords
//!
//! `type` (name or list of names), `enum`, `minimum`/`maximum` with the
//! boolean `exclusiveMinimum`/`exclusiveMaximum` flags, `multipleOf`,
//! `minLength`, `maxLength`, `pattern`, `items`, `minItems`, `maxItems`,
//! `required`, `properties`, and `additionalProperties` (boolean or schema).
//! `format`, `title`, `description`, `default`, and `definitions` are
//! descriptive and never fail validation.
//!
//! ## Order
//!
//! Each node checks `type`, then `enum`, then numeric, string, and array
//! bounds. Objects then check `required`, then `additionalProperties`, then
//! recurse into declared properties. Keys are visited in sorted order so the
//! reported violation is deterministic.

use regex::Regex;
use serde_json::{Map, Value};

use charm_core::render_json;

use crate::error::ValidationError;

const ROOT: &str = "(root)";

/// Validate `params` against `schema`. `None` validates as an empty object.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate_params(
    schema: &Map<String, Value>,
    params: Option<&Map<String, Value>>,
) -> Result<(), ValidationError> {
    let instance = Value::Object(params.cloned().unwrap_or_default());
    let result = validate_node(schema, &instance, ROOT);
    if let Err(err) = &result {
        let action = schema.get("title").and_then(Value::as_str).unwrap_or_default();
        tracing::debug!(action, path = %err.path, "params failed validation");
    }
    result
}

fn violation(path: &str, message: impl Into<String>, given: &Value) -> ValidationError {
    ValidationError {
        path: path.to_string(),
        message: message.into(),
        given: render_json(given),
    }
}

fn child_path(path: &str, segment: impl std::fmt::Display) -> String {
    format!("{path}.{segment}")
}

fn validate_node(schema: &Map<String, Value>, instance: &Value, path: &str) -> Result<(), ValidationError> {
    check_type(schema, instance, path)?;
    check_enum(schema, instance, path)?;
    match instance {
        Value::Number(_) => check_number(schema, instance, path),
        Value::String(s) => check_string(schema, s, instance, path),
        Value::Array(items) => check_array(schema, items, instance, path),
        Value::Object(object) => check_object(schema, object, instance, path),
        Value::Null | Value::Bool(_) => Ok(()),
    }
}

/// Validate against a sub-schema. Non-mapping sub-schemas accept anything.
fn validate_subschema(schema: &Value, instance: &Value, path: &str) -> Result<(), ValidationError> {
    match schema.as_object() {
        Some(rules) => validate_node(rules, instance, path),
        None => Ok(()),
    }
}

fn matches_type(name: &str, instance: &Value) -> bool {
    match name {
        "object" => instance.is_object(),
        "array" => instance.is_array(),
        "string" => instance.is_string(),
        "boolean" => instance.is_boolean(),
        "null" => instance.is_null(),
        "number" => instance.is_number(),
        "integer" => is_integer(instance),
        _ => false,
    }
}

fn is_integer(instance: &Value) -> bool {
    match instance {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    }
}

fn check_type(schema: &Map<String, Value>, instance: &Value, path: &str) -> Result<(), ValidationError> {
    match schema.get("type") {
        Some(Value::String(name)) if !matches_type(name, instance) => {
            Err(violation(path, format!("must be of type {name}"), instance))
        }
        Some(Value::Array(names)) => {
            let names: Vec<&str> = names.iter().filter_map(Value::as_str).collect();
            if names.iter().any(|name| matches_type(name, instance)) {
                Ok(())
            } else {
                Err(violation(path, format!("must be of type {}", names.join(",")), instance))
            }
        }
        _ => Ok(()),
    }
}

/// JSON equality where `5` and `5.0` compare equal.
fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| json_equal(v, w)))
        }
        _ => a == b,
    }
}

fn check_enum(schema: &Map<String, Value>, instance: &Value, path: &str) -> Result<(), ValidationError> {
    let Some(Value::Array(allowed)) = schema.get("enum") else {
        return Ok(());
    };
    if allowed.iter().any(|option| json_equal(option, instance)) {
        return Ok(());
    }
    let listed: Vec<String> = allowed.iter().map(render_json).collect();
    Err(violation(
        path,
        format!("must be one of the following: {}", listed.join(", ")),
        instance,
    ))
}

fn is_exclusive(schema: &Map<String, Value>, flag: &str) -> bool {
    matches!(schema.get(flag), Some(Value::Bool(true)))
}

fn check_number(schema: &Map<String, Value>, instance: &Value, path: &str) -> Result<(), ValidationError> {
    let Some(n) = instance.as_f64() else {
        return Ok(());
    };

    if let Some(bound) = schema.get("minimum") {
        if let Some(min) = bound.as_f64() {
            let bound = render_json(bound);
            if is_exclusive(schema, "exclusiveMinimum") {
                if n <= min {
                    return Err(violation(path, format!("must be greater than {bound}"), instance));
                }
            } else if n < min {
                return Err(violation(
                    path,
                    format!("must be greater than or equal to {bound}"),
                    instance,
                ));
            }
        }
    }

    if let Some(bound) = schema.get("maximum") {
        if let Some(max) = bound.as_f64() {
            let bound = render_json(bound);
            if is_exclusive(schema, "exclusiveMaximum") {
                if n >= max {
                    return Err(violation(path, format!("must be less than {bound}"), instance));
                }
            } else if n > max {
                return Err(violation(
                    path,
                    format!("must be less than or equal to {bound}"),
                    instance,
                ));
            }
        }
    }

    if let Some(divisor) = schema.get("multipleOf") {
        if let Some(d) = divisor.as_f64().filter(|d| *d > 0.0) {
            let quotient = n / d;
            if (quotient - quotient.round()).abs() > 1e-9 {
                return Err(violation(
                    path,
                    format!("must be a multiple of {}", render_json(divisor)),
                    instance,
                ));
            }
        }
    }

    Ok(())
}

fn check_string(
    schema: &Map<String, Value>,
    s: &str,
    instance: &Value,
    path: &str,
) -> Result<(), ValidationError> {
    let length = s.chars().count() as u64;

    if let Some(min) = schema.get("minLength").and_then(Value::as_u64) {
        if length < min {
            return Err(violation(
                path,
                format!("string length must be greater than or equal to {min}"),
                instance,
            ));
        }
    }

    if let Some(max) = schema.get("maxLength").and_then(Value::as_u64) {
        if length > max {
            return Err(violation(
                path,
                format!("string length must be less than or equal to {max}"),
                instance,
            ));
        }
    }

    if let Some(pattern) = schema.get("pattern").and_then(Value::as_str) {
        // Loaded schemas have every pattern compiled at assembly; hand-built
        // specs may not.
        let matched = Regex::new(pattern).map(|re| re.is_match(s));
        match matched {
            Ok(true) => {}
            Ok(false) => {
                return Err(violation(path, format!("does not match pattern '{pattern}'"), instance));
            }
            Err(_) => {
                return Err(violation(path, format!("has an invalid pattern '{pattern}'"), instance));
            }
        }
    }

    Ok(())
}

fn check_array(
    schema: &Map<String, Value>,
    items: &[Value],
    instance: &Value,
    path: &str,
) -> Result<(), ValidationError> {
    let count = items.len() as u64;

    if let Some(min) = schema.get("minItems").and_then(Value::as_u64) {
        if count < min {
            return Err(violation(path, format!("array must have at least {min} items"), instance));
        }
    }

    if let Some(max) = schema.get("maxItems").and_then(Value::as_u64) {
        if count > max {
            return Err(violation(path, format!("array must have at most {max} items"), instance));
        }
    }

    match schema.get("items") {
        Some(Value::Array(positional)) => {
            for (index, (item, item_schema)) in items.iter().zip(positional).enumerate() {
                validate_subschema(item_schema, item, &child_path(path, index))?;
            }
        }
        Some(item_schema) => {
            for (index, item) in items.iter().enumerate() {
                validate_subschema(item_schema, item, &child_path(path, index))?;
            }
        }
        None => {}
    }

    Ok(())
}

fn sorted_keys(object: &Map<String, Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = object.keys().collect();
    keys.sort();
    keys
}

fn check_object(
    schema: &Map<String, Value>,
    object: &Map<String, Value>,
    instance: &Value,
    path: &str,
) -> Result<(), ValidationError> {
    if let Some(Value::Array(required)) = schema.get("required") {
        for key in required.iter().filter_map(Value::as_str) {
            if !object.contains_key(key) {
                return Err(violation(
                    path,
                    format!("\"{key}\" property is missing and required"),
                    instance,
                ));
            }
        }
    }

    let empty = Map::new();
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    match schema.get("additionalProperties") {
        Some(Value::Bool(false)) => {
            if let Some(key) = sorted_keys(object).into_iter().find(|k| !properties.contains_key(*k)) {
                return Err(violation(
                    path,
                    format!("additional property \"{key}\" is not allowed"),
                    instance,
                ));
            }
        }
        Some(extra @ Value::Object(_)) => {
            for key in sorted_keys(object) {
                if !properties.contains_key(key) {
                    validate_subschema(extra, &object[key], &child_path(path, key))?;
                }
            }
        }
        _ => {}
    }

    for key in sorted_keys(properties) {
        if let Some(value) = object.get(key) {
            validate_subschema(&properties[key], value, &child_path(path, key))?;
        }
    }

    Ok(())
}
