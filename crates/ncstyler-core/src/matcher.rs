//! Matching names against resolved rules.

use regex::Regex;
use std::collections::HashMap;

use crate::config::{ConfigError, RuleTable};
use crate::entity::Declaration;
use crate::error::ValidationError;
use crate::kind::ConstructKind;
use crate::names;
use crate::resolver::{RuleResolver, RuleSpec};

/// Where a checked name comes from.
#[derive(Debug, Clone, Copy)]
pub enum NameSource<'a> {
    /// A name already derived by the caller (macro names, parameters, locals).
    Literal {
        /// The name.
        name: &'a str,
        /// Line (1-indexed).
        line: usize,
    },
    /// A structured declaration whose raw text can help recover the name.
    Entity(&'a Declaration),
}

impl<'a> NameSource<'a> {
    /// Creates a literal source.
    #[must_use]
    pub fn literal(name: &'a str, line: usize) -> Self {
        Self::Literal { name, line }
    }

    /// Line to report on failure.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::Literal { line, .. } => *line,
            Self::Entity(decl) => decl.line,
        }
    }

    /// Name to match, or `None` when nothing checkable remains.
    ///
    /// Only the last whitespace separated token is kept. A name carrying
    /// template arguments is reduced to its plain name, using the raw
    /// declaration text when the name alone is not enough.
    #[must_use]
    pub fn normalized(&self) -> Option<String> {
        let (name, raw) = match self {
            Self::Literal { name, .. } => (*name, ""),
            Self::Entity(decl) => (decl.name.as_str(), decl.raw.as_str()),
        };
        let name = names::last_token(name);
        if name.is_empty() {
            return None;
        }
        if name.contains('<') {
            return names::recover_template_name(name, raw);
        }
        Some(name.to_string())
    }
}

#[derive(Debug)]
struct CompiledRule {
    spec: RuleSpec,
    regex: Regex,
}

/// Every resolved rule, compiled once.
#[derive(Debug)]
pub struct NameMatcher {
    rules: HashMap<ConstructKind, CompiledRule>,
}

impl NameMatcher {
    /// Resolves and compiles the rule of every construct kind.
    ///
    /// Patterns are anchored at the start of the name only; a full match
    /// needs `$` in the pattern itself.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for the first kind whose
    /// resolved pattern does not compile.
    pub fn new(table: &RuleTable) -> Result<Self, ConfigError> {
        let resolver = RuleResolver::new(table);
        let mut rules = HashMap::new();
        for (kind, spec) in resolver.resolve_all() {
            let regex = Regex::new(&format!("^(?:{})", spec.pattern))
                .map_err(|source| ConfigError::InvalidPattern { kind, source })?;
            tracing::debug!("rule {kind}: re={:?} error={:?}", spec.pattern, spec.error_message);
            rules.insert(kind, CompiledRule { spec, regex });
        }
        Ok(Self { rules })
    }

    /// Resolved rule for a kind.
    #[must_use]
    pub fn rule(&self, kind: ConstructKind) -> Option<&RuleSpec> {
        self.rules.get(&kind).map(|r| &r.spec)
    }

    /// Returns true if `name` satisfies the rule of `kind`.
    #[must_use]
    pub fn is_match(&self, kind: ConstructKind, name: &str) -> bool {
        self.rules
            .get(&kind)
            .map_or(true, |rule| rule.regex.is_match(name))
    }

    /// Checks a name against the rule of `kind`.
    ///
    /// Names that normalize to nothing are skipped.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] carrying `trail` when the name does not
    /// match.
    pub fn check(
        &self,
        filename: &str,
        source: NameSource<'_>,
        kind: ConstructKind,
        trail: &[String],
    ) -> Result<(), ValidationError> {
        let Some(name) = source.normalized() else {
            tracing::trace!("skipping unnamed {kind} at line {}", source.line());
            return Ok(());
        };
        if self.is_match(kind, &name) {
            return Ok(());
        }
        let error_message = self.rule(kind).map_or("", |s| s.error_message.as_str());
        Err(
            ValidationError::mismatch(filename, source.line(), &name, kind, error_message)
                .with_trail(trail.to_vec()),
        )
    }
}
