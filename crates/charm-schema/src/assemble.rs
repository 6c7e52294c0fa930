//! # Schema Assembly
//!
//! Turns one raw action entry into an [`ActionSpec`].
//!
//! An entry looks like:
//!
//! ```yaml
//! snapshot:
//!    description: Take a snapshot of the database.
//!    params:
//!       outfile:
//!          type: string
//!    required: [outfile]
//! ```
//!
//! `params` holds the property map and becomes the schema's `properties`.
//! Every other key on the entry (`required`, `definitions`,
//! `additionalProperties`, ...) is a schema keyword and is carried into the
//! schema after cleansing.
//!
//! ## Steps
//!
//! Each step has its own failure:
//!
//! 1. The entry is cleansed; null means an empty entry.
//! 2. `description` defaults to `"No description"` and must be a string.
//! 3. `params`, when present, must be a mapping.
//! 4. No mapping anywhere in the schema may carry a forbidden keyword.
//! 5. `required`, when present, must be a list.
//! 6. `definitions`, when present, must map names to schema mappings.
//! 7. Every `pattern` must compile with the validator's regex engine.
//! 8. `title`, `description`, and `type` are forced; `properties` defaults
//!    to an empty mapping.
//! 9. The result must compile as a JSON-Schema Draft 4 document. An empty
//!    `required` list is tolerated even though Draft 4 asks for one item.

use std::collections::BTreeSet;

use regex::Regex;
use serde_json::{Map, Value};

use charm_core::{cleanse, resolve_object, ActionName, DocumentNode};

use crate::actions::ActionSpec;
use crate::config::{DEFAULT_DESCRIPTION, FORBIDDEN_KEYWORDS};
use crate::error::ActionsError;

/// Schema keys the assembler owns. Caller values for them are replaced.
const OVERRIDDEN_KEYS: &[&str] = &["title", "type"];

/// Builds action specs from raw document entries.
#[derive(Debug, Clone)]
pub struct SchemaAssembler {
    default_description: String,
    forbidden_keywords: BTreeSet<String>,
}

impl Default for SchemaAssembler {
    fn default() -> Self {
        Self::new(
            DEFAULT_DESCRIPTION,
            FORBIDDEN_KEYWORDS.iter().map(|k| k.to_string()),
        )
    }
}

impl SchemaAssembler {
    pub fn new(
        default_description: impl Into<String>,
        forbidden_keywords: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            default_description: default_description.into(),
            forbidden_keywords: forbidden_keywords.into_iter().collect(),
        }
    }

    /// Assemble the spec for action `name` from its raw entry.
    ///
    /// # Errors
    ///
    /// Returns the [`ActionsError`] of the first step that fails; see the
    /// module documentation for the order.
    pub fn assemble(&self, name: &ActionName, raw: &DocumentNode) -> Result<ActionSpec, ActionsError> {
        let mut entry = match cleanse(raw)? {
            Value::Null => Map::new(),
            Value::Object(entry) => entry,
            _ => return Err(ActionsError::EntryNotAMap(name.to_string())),
        };

        let description = match entry.remove("description") {
            None => self.default_description.clone(),
            Some(Value::String(description)) => description,
            Some(_) => return Err(ActionsError::NotAString("description".to_string())),
        };

        let properties = match entry.remove("params") {
            None => None,
            Some(Value::Object(properties)) => Some(properties),
            Some(_) => return Err(ActionsError::ParamsNotAMap),
        };

        let mut schema = Map::new();
        for (key, value) in entry {
            if OVERRIDDEN_KEYS.contains(&key.as_str()) {
                tracing::debug!(action = %name, key = %key, "overriding caller-supplied schema key");
                continue;
            }
            schema.insert(key, value);
        }
        if let Some(properties) = properties {
            if schema.contains_key("properties") {
                tracing::debug!(action = %name, "params replaces entry-level properties");
            }
            schema.insert("properties".to_string(), Value::Object(properties));
        }

        if let Some(keyword) = self.find_forbidden_key(&schema) {
            return Err(ActionsError::ForbiddenKeyword(keyword.to_string()));
        }
        check_required(&schema)?;
        check_definitions(name, &schema)?;
        if let Some(pattern) = find_unsupported_pattern(&schema) {
            return Err(ActionsError::InvalidSchema {
                action: name.to_string(),
                reason: format!("pattern '{pattern}' is not a supported regular expression"),
            });
        }

        schema.insert("title".to_string(), Value::String(name.to_string()));
        schema.insert("description".to_string(), Value::String(description.clone()));
        schema.insert("type".to_string(), Value::String("object".to_string()));
        schema
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()));

        compile_draft4(name, &schema)?;

        tracing::debug!(action = %name, keys = schema.len(), "assembled action schema");
        Ok(ActionSpec::new(description, schema))
    }

    /// Depth-first search for a forbidden keyword used as a mapping key.
    fn find_forbidden_key<'a>(&self, map: &'a Map<String, Value>) -> Option<&'a str> {
        map.iter().find_map(|(key, value)| {
            if self.forbidden_keywords.contains(key) {
                Some(key.as_str())
            } else {
                self.find_forbidden(value)
            }
        })
    }

    fn find_forbidden<'a>(&self, node: &'a Value) -> Option<&'a str> {
        match node {
            Value::Object(map) => self.find_forbidden_key(map),
            Value::Array(items) => items.iter().find_map(|item| self.find_forbidden(item)),
            _ => None,
        }
    }
}

/// Assemble with the default description and forbidden keywords.
pub fn assemble(name: &ActionName, raw: &DocumentNode) -> Result<ActionSpec, ActionsError> {
    SchemaAssembler::default().assemble(name, raw)
}

fn check_required(schema: &Map<String, Value>) -> Result<(), ActionsError> {
    match schema.get("required") {
        None | Some(Value::Array(_)) => Ok(()),
        Some(_) => Err(ActionsError::NotAList("required".to_string())),
    }
}

fn check_definitions(name: &ActionName, schema: &Map<String, Value>) -> Result<(), ActionsError> {
    let invalid = |reason: &str| ActionsError::InvalidSchema {
        action: name.to_string(),
        reason: reason.to_string(),
    };
    let Some(definitions) = schema.get("definitions") else {
        return Ok(());
    };
    let entries = definitions
        .as_object()
        .ok_or_else(|| invalid("definitions must be of type object"))?;
    for key in entries.keys() {
        if resolve_object(&[key], definitions).is_none() {
            // Message text is matched verbatim by existing tooling.
            return Err(invalid("definitions must be of type array of schemas"));
        }
    }
    Ok(())
}

/// First `pattern` in the schema tree the `regex` crate cannot compile.
///
/// Lookaround and backreferences are accepted by the Draft 4 compile but not
/// by the validator, so they are rejected here.
fn find_unsupported_pattern(schema: &Map<String, Value>) -> Option<&str> {
    schema.iter().find_map(|(key, value)| match (key.as_str(), value) {
        ("pattern", Value::String(pattern)) => {
            Regex::new(pattern).is_err().then_some(pattern.as_str())
        }
        ("properties" | "definitions" | "patternProperties", Value::Object(named)) => {
            named.values().find_map(find_unsupported_pattern_in)
        }
        (
            "items" | "additionalItems" | "additionalProperties" | "not" | "allOf" | "anyOf"
            | "oneOf",
            nested,
        ) => find_unsupported_pattern_in(nested),
        _ => None,
    })
}

fn find_unsupported_pattern_in(node: &Value) -> Option<&str> {
    match node {
        Value::Object(schema) => find_unsupported_pattern(schema),
        Value::Array(schemas) => schemas.iter().find_map(find_unsupported_pattern_in),
        _ => None,
    }
}

/// Remove `required: []` at any depth. Draft 4 demands at least one entry.
fn drop_empty_required(node: &mut Value) {
    match node {
        Value::Object(map) => {
            if matches!(map.get("required"), Some(Value::Array(keys)) if keys.is_empty()) {
                map.remove("required");
            }
            map.values_mut().for_each(drop_empty_required);
        }
        Value::Array(items) => items.iter_mut().for_each(drop_empty_required),
        _ => {}
    }
}

fn compile_draft4(name: &ActionName, schema: &Map<String, Value>) -> Result<(), ActionsError> {
    let mut document = Value::Object(schema.clone());
    drop_empty_required(&mut document);
    jsonschema::options()
        .with_draft(jsonschema::Draft::Draft4)
        .build(&document)
        .map(|_| ())
        .map_err(|e| ActionsError::InvalidSchema {
            action: name.to_string(),
            reason: e.to_string(),
        })
}
