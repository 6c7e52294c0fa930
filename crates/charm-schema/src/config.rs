//! Loader configuration.
//!
//! Covers the action name rule, the default description and the forbidden
//! schema keywords. Defaults match charm tooling. The configuration is plain
//! data; the embedding layer decides where it comes from.

use serde::{Deserialize, Serialize};

use charm_core::ACTION_NAME_PATTERN;

/// Description used when an action entry has none.
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Schema keywords rejected anywhere in a params schema.
pub const FORBIDDEN_KEYWORDS: &[&str] = &["$schema", "$ref"];

/// Configuration for an [`ActionsLoader`](crate::ActionsLoader).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    /// Regular expression every action name must match.
    pub name_pattern: String,
    /// Description for entries that do not declare one.
    pub default_description: String,
    /// Schema keywords that fail loading wherever they appear.
    pub forbidden_keywords: Vec<String>,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            name_pattern: ACTION_NAME_PATTERN.to_string(),
            default_description: DEFAULT_DESCRIPTION.to_string(),
            forbidden_keywords: FORBIDDEN_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid action name pattern {pattern:?}: {reason}")]
    InvalidNamePattern { pattern: String, reason: String },
}
