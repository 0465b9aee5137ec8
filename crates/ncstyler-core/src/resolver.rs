//! Effective rule computation over the inheritance graph.

use serde::Serialize;

use crate::config::{RuleTable, DEFAULT_ERROR, DEFAULT_PATTERN};
use crate::kind::ConstructKind;

/// A fully resolved rule: every field is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSpec {
    /// Regular expression a name must match at its start.
    pub pattern: String,
    /// Message appended to violations, may be empty.
    pub error_message: String,
}

impl Default for RuleSpec {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            error_message: DEFAULT_ERROR.to_string(),
        }
    }
}

/// Computes the effective rule for a construct kind.
///
/// The parent's resolved rule is the base; the kind's own explicit entry then
/// overrides `re` and `error` independently. Resolution never fails: a kind
/// without entries anywhere along its chain resolves to the defaults.
#[derive(Debug, Clone, Copy)]
pub struct RuleResolver<'a> {
    table: &'a RuleTable,
}

impl<'a> RuleResolver<'a> {
    /// Creates a resolver over a rule table.
    #[must_use]
    pub fn new(table: &'a RuleTable) -> Self {
        Self { table }
    }

    /// Returns the effective rule for `kind`.
    #[must_use]
    pub fn resolve(&self, kind: ConstructKind) -> RuleSpec {
        let mut spec = match kind.parent() {
            Some(parent) => self.resolve(parent),
            None => RuleSpec::default(),
        };

        if let Some(entry) = self.table.entry(kind) {
            if let Some(re) = &entry.re {
                spec.pattern.clone_from(re);
            }
            if let Some(error) = &entry.error {
                spec.error_message.clone_from(error);
            }
        }

        spec
    }

    /// Resolves every kind, root first.
    #[must_use]
    pub fn resolve_all(&self) -> Vec<(ConstructKind, RuleSpec)> {
        ConstructKind::ALL
            .into_iter()
            .map(|kind| (kind, self.resolve(kind)))
            .collect()
    }
}
