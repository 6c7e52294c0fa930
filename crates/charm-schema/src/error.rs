//! # Error Types
//!
//! Loading either yields a fully assembled [`Actions`](crate::Actions) or a
//! single [`ActionsError`]; validation either succeeds or yields the first
//! [`ValidationError`] found. No partial results are returned.
//!
//! Message texts are compared verbatim by callers and by charm tooling, so
//! they are part of the public contract.

use charm_core::{CleanseError, IdentityError};
use thiserror::Error;

/// Error loading or assembling an actions document.
#[derive(Error, Debug)]
pub enum ActionsError {
    /// The document is not well-formed YAML. Carries the parser's
    /// line-numbered message, e.g. `line 6: mapping values are not allowed
    /// in this context`.
    #[error("YAML error: {0}")]
    Syntax(String),

    /// The input stream could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The top-level node is neither empty nor a mapping.
    #[error("actions document must be a map of action names")]
    DocumentNotAMap,

    /// An action name failed the name rule (`bad action name <name>`).
    #[error(transparent)]
    BadActionName(#[from] IdentityError),

    /// An action entry is neither null nor a mapping.
    #[error("value for action \"{0}\" must be a map")]
    EntryNotAMap(String),

    /// A schema key that must hold a string holds something else.
    #[error("value for schema key \"{0}\" must be a string")]
    NotAString(String),

    /// A schema key that must hold a list holds something else.
    #[error("value for schema key \"{0}\" must be a YAML list")]
    NotAList(String),

    /// `params` is empty or is not a mapping.
    #[error("params failed to parse as a map")]
    ParamsNotAMap,

    /// `$schema` or `$ref` appears somewhere in the params schema.
    #[error("schema key \"{0}\" not compatible with this version of juju")]
    ForbiddenKeyword(String),

    /// The assembled schema is structurally invalid.
    #[error("invalid params schema for action schema {action}: {reason}")]
    InvalidSchema {
        /// Name of the action whose schema failed.
        action: String,
        /// Why the schema was rejected.
        reason: String,
    },

    /// A mapping in the document has a non-string key.
    #[error(transparent)]
    Cleanse(#[from] CleanseError),

    /// Params were validated against an action the collection does not have.
    #[error("unknown action \"{0}\"")]
    UnknownAction(String),

    /// Params failed validation against a known action.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// First violation found while validating params against a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation failed: {path} : {message}, given {given}")]
pub struct ValidationError {
    /// Dotted instance path, e.g. `(root).outfile`.
    pub path: String,
    /// What was violated, e.g. `must be of type string`.
    pub message: String,
    /// The offending value as compact JSON with sorted keys.
    pub given: String,
}
