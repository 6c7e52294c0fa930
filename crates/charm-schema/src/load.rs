//! # Actions Document Loading
//!
//! Decodes an actions YAML document into [`Actions`]. The top-level node
//! maps action names to entries; each name is checked against the name rule
//! and each entry is handed to the [`SchemaAssembler`]. Assembler errors are
//! returned unchanged.
//!
//! An empty document loads as an empty collection.

use std::collections::BTreeMap;
use std::io::Read;
use std::sync::LazyLock;

use charm_core::{ActionNameRule, CleanseError, DocumentNode};

use crate::actions::Actions;
use crate::assemble::SchemaAssembler;
use crate::config::{ActionsConfig, ConfigError};
use crate::error::ActionsError;

static DEFAULT_LOADER: LazyLock<ActionsLoader> = LazyLock::new(ActionsLoader::default);

/// Read an actions document with the default configuration.
///
/// # Errors
///
/// Returns [`ActionsError`] for unreadable input, malformed YAML, bad action
/// names, or any assembly failure.
pub fn read_actions_yaml<R: Read>(reader: R) -> Result<Actions, ActionsError> {
    DEFAULT_LOADER.read(reader)
}

/// Loads actions documents under a fixed configuration.
///
/// ## Thread Safety
///
/// `ActionsLoader` is `Send + Sync`; the name rule is compiled once at
/// construction and never mutated.
#[derive(Debug, Clone)]
pub struct ActionsLoader {
    name_rule: ActionNameRule,
    assembler: SchemaAssembler,
}

impl Default for ActionsLoader {
    fn default() -> Self {
        Self {
            name_rule: ActionNameRule::default_rule().clone(),
            assembler: SchemaAssembler::default(),
        }
    }
}

impl ActionsLoader {
    /// Build a loader from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNamePattern`] if the name pattern does
    /// not compile.
    pub fn from_config(config: &ActionsConfig) -> Result<Self, ConfigError> {
        let name_rule = ActionNameRule::new(&config.name_pattern).map_err(|e| {
            ConfigError::InvalidNamePattern {
                pattern: config.name_pattern.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            name_rule,
            assembler: SchemaAssembler::new(
                config.default_description.clone(),
                config.forbidden_keywords.iter().cloned(),
            ),
        })
    }

    /// Read and load a document from `reader`.
    pub fn read<R: Read>(&self, mut reader: R) -> Result<Actions, ActionsError> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        self.load_str(&source)
    }

    /// Load a document from YAML text.
    pub fn load_str(&self, source: &str) -> Result<Actions, ActionsError> {
        if source.trim().is_empty() {
            return Ok(Actions::new());
        }
        let document: DocumentNode = serde_yaml::from_str(source).map_err(syntax_error)?;
        self.load_document(&document)
    }

    /// Load an already-parsed document tree.
    pub fn load_document(&self, document: &DocumentNode) -> Result<Actions, ActionsError> {
        let entries = match document {
            DocumentNode::Null => return Ok(Actions::new()),
            DocumentNode::Mapping(entries) => entries,
            DocumentNode::Tagged(tagged) => return self.load_document(&tagged.value),
            _ => return Err(ActionsError::DocumentNotAMap),
        };

        let mut specs = BTreeMap::new();
        for (key, entry) in entries {
            let DocumentNode::String(name) = key else {
                return Err(CleanseError::NonStringKey.into());
            };
            let name = self.name_rule.parse(name)?;
            let spec = self.assembler.assemble(&name, entry)?;
            specs.insert(name, spec);
        }

        tracing::debug!(actions = specs.len(), "loaded actions document");
        Ok(Actions::from_specs(specs))
    }
}

/// Convert a parser error into `line N: <problem>` form.
///
/// The parser appends the problem position and, for some errors, a
/// `while parsing ...` context with its own position. Only the problem text
/// is kept.
fn syntax_error(err: serde_yaml::Error) -> ActionsError {
    let message = err.to_string();
    match err.location() {
        Some(location) => {
            let position = format!(" at line {} column {}", location.line(), location.column());
            let problem = message
                .split_once(&position)
                .map_or(message.as_str(), |(problem, _)| problem);
            ActionsError::Syntax(format!("line {}: {}", location.line(), problem))
        }
        None => ActionsError::Syntax(message),
    }
}
