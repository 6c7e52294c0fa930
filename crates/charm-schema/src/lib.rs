//! # charm-schema — Action Definitions for Charms
//!
//! Loads a charm's actions YAML document, assembles a params schema for
//! every declared action, and validates caller-supplied params against
//! those schemas.
//!
//! ## Loading (`load`, `assemble`)
//!
//! [`read_actions_yaml`] decodes a document with the default configuration;
//! [`ActionsLoader`] does the same under an [`ActionsConfig`]. Each entry is
//! turned into an [`ActionSpec`] by the [`SchemaAssembler`], which checks
//! the schema structurally and compiles it as JSON-Schema Draft 4 before
//! accepting it.
//!
//! ## Validation (`validate`)
//!
//! [`Actions::validate_params`] and [`ActionSpec::validate_params`] check a
//! params object against an action's schema and report the first violation
//! as a [`ValidationError`] of the form
//! `validation failed: (root).outfile : must be of type string, given 5`.
//!
//! ## Crate Policy
//!
//! - Depends only on `charm-core` internally.
//! - Loading is all-or-nothing: a document either yields a complete
//!   [`Actions`] or a single [`ActionsError`].
//! - Error message texts are part of the public contract.

pub mod actions;
pub mod assemble;
pub mod config;
pub mod error;
pub mod load;
pub mod validate;

pub use actions::{ActionSpec, Actions};
pub use assemble::{assemble, SchemaAssembler};
pub use config::{ActionsConfig, ConfigError, DEFAULT_DESCRIPTION, FORBIDDEN_KEYWORDS};
pub use error::{ActionsError, ValidationError};
pub use load::{read_actions_yaml, ActionsLoader};
pub use validate::validate_params;
