//! # charm-core — Foundational Types for Charm Actions
//!
//! Leaf crate of the workspace. It defines the value trees an actions
//! document passes through and the primitives the schema layer builds on.
//!
//! ## Modules
//!
//! - [`canonical`]: the permissive [`DocumentNode`] and strict
//!   [`CanonicalNode`] trees, the [`cleanse`] conversion between them, and
//!   [`render_json`] for deterministic diagnostics.
//! - [`navigate`]: key-path lookups into canonical trees.
//! - [`identity`]: the validated [`ActionName`] newtype and its name rule.
//! - [`error`]: structured error enums.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `charm-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests and constant regex compilation.

pub mod canonical;
pub mod error;
pub mod identity;
pub mod navigate;

// Re-export primary types for ergonomic imports.
pub use canonical::{cleanse, render_json, CanonicalNode, DocumentNode};
pub use error::{CleanseError, IdentityError};
pub use identity::{ActionName, ActionNameRule, ACTION_NAME_PATTERN};
pub use navigate::{resolve, resolve_object};
