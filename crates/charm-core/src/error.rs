//! # Error Types
//!
//! Errors raised by the core value-tree and identity primitives. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Message texts are part of the public contract: callers compare them
//! verbatim, so changing a `#[error(...)]` string is a breaking change.

use thiserror::Error;

/// Error while converting a permissively-parsed document tree into a
/// canonical, string-keyed tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CleanseError {
    /// A mapping carried a key that is not a string (e.g. `5:` in YAML).
    #[error("map keyed with non-string value")]
    NonStringKey,

    /// A float with no JSON representation (`.nan`, `.inf`).
    #[error("cannot represent float {0} in JSON")]
    NonFiniteFloat(f64),
}

/// Error constructing a validated identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The action name does not match the configured name rule.
    #[error("bad action name {0}")]
    BadActionName(String),
}
