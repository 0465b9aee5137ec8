//! Language-agnostic parser trait.
//!
//! `DeclarationParser` is the extension point for adding new front-ends.
//! Implement it to teach ncstyler how to extract declarations from a new
//! language via Tree-sitter.

use std::path::Path;

use ncstyler_core::SourceEntities;

/// Errors raised while parsing a source file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The Tree-sitter grammar could not be loaded.
    #[error("Failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// Tree-sitter returned no syntax tree.
    #[error("Parser produced no syntax tree")]
    NoTree,
}

/// Trait for language-specific declaration extraction.
///
/// The parser receives raw source text and returns every declaration the
/// validator checks, in the language-agnostic [`SourceEntities`] form.
pub trait DeclarationParser: Send + Sync {
    /// Language identifier (e.g., `"cpp"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this parser handles (e.g., `&[".cpp", ".h"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extracts declarations from source code.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or no tree is
    /// produced. Syntax errors inside the source are not errors.
    fn parse(&self, source: &str) -> Result<SourceEntities, ParseError>;

    /// Returns true if `path` has one of [`Self::extensions`].
    fn handles(&self, path: &Path) -> bool {
        let name = path.to_string_lossy();
        self.extensions().iter().any(|ext| name.ends_with(ext))
    }
}
