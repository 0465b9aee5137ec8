//! # ncstyler-cpp
//!
//! Tree-sitter based declaration parser for C and C++.
//!
//! This crate produces the [`ncstyler_core::SourceEntities`] consumed by the
//! validator in `ncstyler-core`. It adds:
//!
//! - [`DeclarationParser`] trait for pluggable language front-ends
//! - [`CppParser`] for C/C++ macros, functions, records, enums, variables,
//!   namespaces and typedefs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cpp;
pub mod parser;

pub use cpp::CppParser;
pub use parser::{DeclarationParser, ParseError};
