//! The violation raised by a failed name check.

use serde::Serialize;

use crate::kind::ConstructKind;

/// First naming mismatch found in a file.
///
/// Validation is fail-fast, so a pass yields at most one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{filename}:{line_number}:error: {message}")]
pub struct ValidationError {
    /// Path of the validated file as given to the validator.
    pub filename: String,
    /// Line (1-indexed) of the offending declaration.
    pub line_number: usize,
    /// Normalized name that failed to match.
    pub entity_name: String,
    /// Kind whose rule was applied.
    pub rule_kind: ConstructKind,
    /// Full violation message.
    pub message: String,
    /// Enclosing constructs being validated when the check failed,
    /// outermost first.
    pub trail: Vec<String>,
}

impl ValidationError {
    /// Builds the violation for `name` failing the rule of `kind`.
    ///
    /// The configured message is appended after the humanized kind only when
    /// it is non-empty.
    #[must_use]
    pub fn mismatch(
        filename: &str,
        line_number: usize,
        name: &str,
        kind: ConstructKind,
        error_message: &str,
    ) -> Self {
        let mut message = format!("Name '{name}' isn't matched with rule: {kind}!");
        if !error_message.is_empty() {
            message.push(' ');
            message.push_str(&kind.humanized());
            message.push(' ');
            message.push_str(error_message);
        }
        Self {
            filename: filename.to_string(),
            line_number,
            entity_name: name.to_string(),
            rule_kind: kind,
            message,
            trail: Vec::new(),
        }
    }

    /// Attaches the trail of enclosing constructs.
    #[must_use]
    pub fn with_trail(mut self, trail: Vec<String>) -> Self {
        self.trail = trail;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_with_configured_error() {
        let err = ValidationError::mismatch(
            "a.cpp",
            3,
            "myClass",
            ConstructKind::Class,
            "must be PascalCase",
        );
        assert_eq!(
            err.to_string(),
            "a.cpp:3:error: Name 'myClass' isn't matched with rule: class! Class must be PascalCase"
        );
    }

    #[test]
    fn message_without_configured_error() {
        let err = ValidationError::mismatch("a.cpp", 7, "Bad", ConstructKind::ClassMethod, "");
        assert_eq!(err.message, "Name 'Bad' isn't matched with rule: class_method!");
        assert_eq!(err.rule_kind, ConstructKind::ClassMethod);
        assert!(err.trail.is_empty());
    }

    #[test]
    fn trail_is_attached() {
        let err = ValidationError::mismatch("a.cpp", 1, "x", ConstructKind::Variant, "")
            .with_trail(vec!["function run".to_string()]);
        assert_eq!(err.trail, vec!["function run"]);
    }
}
