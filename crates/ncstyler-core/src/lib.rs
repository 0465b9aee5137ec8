//! # ncstyler-core
//!
//! Naming-convention validation for C-family declarations.
//!
//! This crate is independent of any parser. A language front-end produces a
//! [`SourceEntities`] value for one file; this crate checks every declared
//! name against a user-supplied rule table. It includes:
//!
//! - [`RuleTable`] for loading rules keyed by [`ConstructKind`]
//! - [`RuleResolver`] for inheriting unset rule fields along a fixed graph
//! - [`scanner`] for recovering function bodies and local variables
//! - [`Validator`] for the per-kind naming policy
//! - [`ValidationError`] for the first mismatch found
//!
//! ## Example
//!
//! ```ignore
//! use ncstyler_core::{RuleTable, Validator};
//!
//! let rules = RuleTable::from_file("rules.toml".as_ref())?;
//! let validator = Validator::new(&rules)?;
//! validator.validate("widget.cpp", &entities, &source)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod entity;
mod error;
mod kind;
mod matcher;
mod resolver;
mod validator;

/// `#define` parsing.
pub mod macros;
/// Name normalization helpers.
pub mod names;
/// Function body recovery.
pub mod scanner;

pub use config::{ConfigError, PartialRule, RuleTable, DEFAULT_ERROR, DEFAULT_PATTERN};
pub use entity::{
    Access, Declaration, Enum, EnumValue, Function, MacroText, Namespace, Parameter, Record,
    RecordStyle, SourceEntities, Variable,
};
pub use error::ValidationError;
pub use kind::ConstructKind;
pub use matcher::{NameMatcher, NameSource};
pub use resolver::{RuleResolver, RuleSpec};
pub use validator::Validator;
