//! # Actions Data Model
//!
//! An [`ActionSpec`] pairs an action's human description with its assembled
//! params schema. [`Actions`] maps validated action names to specs.
//!
//! ## Invariants
//!
//! For every spec produced by the loader:
//!
//! - `params["title"]` equals the action name.
//! - `params["type"]` is `"object"`.
//! - `params["properties"]` is a mapping.
//! - `params["required"]`, if present, is a list.
//! - No mapping anywhere in `params` has a `$schema` or `$ref` key.
//!
//! Neither type offers mutation after construction, so a loaded collection
//! can be shared across threads and validated against concurrently.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use charm_core::ActionName;

use crate::error::{ActionsError, ValidationError};
use crate::validate;

/// One action: its description and its params schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Human-readable description of what the action does.
    pub description: String,
    /// Canonical params schema (restricted JSON-Schema, Draft 4 keywords).
    pub params: Map<String, Value>,
}

impl ActionSpec {
    /// Build a spec from an already-assembled schema.
    pub fn new(description: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            description: description.into(),
            params,
        }
    }

    /// Validate caller-supplied params against this spec's schema.
    ///
    /// `None` is validated as an empty object.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate_params(&self, params: Option<&Map<String, Value>>) -> Result<(), ValidationError> {
        validate::validate_params(&self.params, params)
    }

    /// Fill in schema defaults for any top-level property the caller left out.
    ///
    /// Caller-supplied values are never overwritten.
    pub fn insert_defaults(&self, params: Option<&Map<String, Value>>) -> Map<String, Value> {
        let mut filled = params.cloned().unwrap_or_default();
        let Some(properties) = self.params.get("properties").and_then(Value::as_object) else {
            return filled;
        };
        for (name, property) in properties {
            if let Some(default) = property.get("default") {
                filled
                    .entry(name.clone())
                    .or_insert_with(|| default.clone());
            }
        }
        filled
    }
}

/// All actions declared by a charm, keyed by name.
///
/// Names are checked by the loader under its configured rule and stored as
/// plain strings, so a collection loaded with a custom rule deserializes
/// back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Actions {
    #[serde(rename = "actions")]
    specs: BTreeMap<String, ActionSpec>,
}

impl Actions {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_specs(specs: BTreeMap<ActionName, ActionSpec>) -> Self {
        Self {
            specs: specs.into_iter().map(|(name, spec)| (name.into(), spec)).collect(),
        }
    }

    /// Look up an action by name.
    pub fn get(&self, name: &str) -> Option<&ActionSpec> {
        self.specs.get(name)
    }

    /// Action names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.specs.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActionSpec)> {
        self.specs.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Validate params for the named action.
    ///
    /// # Errors
    ///
    /// Returns [`ActionsError::UnknownAction`] if no such action is declared,
    /// or [`ActionsError::Validation`] with the first violation.
    pub fn validate_params(
        &self,
        name: &str,
        params: Option<&Map<String, Value>>,
    ) -> Result<(), ActionsError> {
        let spec = self
            .get(name)
            .ok_or_else(|| ActionsError::UnknownAction(name.to_string()))?;
        spec.validate_params(params)?;
        Ok(())
    }
}
