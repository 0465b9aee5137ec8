//! Rule table loading.
//!
//! A rule file is a TOML document whose tables are keyed by construct-kind
//! names. Each table may set `re` (a regular expression) and/or `error` (a
//! message appended to violations):
//!
//! ```toml
//! [_base_]
//! re = "[A-Za-z0-9_]+"
//!
//! [class]
//! re = "^[A-Z][A-Za-z0-9]*$"
//! error = "must be PascalCase"
//! ```

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::kind::ConstructKind;

/// Pattern used when neither `_base_` nor any ancestor sets `re`.
pub const DEFAULT_PATTERN: &str = "[A-Za-z0-9_]+";

/// Message used when neither `_base_` nor any ancestor sets `error`.
pub const DEFAULT_ERROR: &str = "";

/// A possibly incomplete rule as written for one kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialRule {
    /// Regular expression a name must match.
    #[serde(default)]
    pub re: Option<String>,
    /// Message appended to the violation report.
    #[serde(default)]
    pub error: Option<String>,
}

impl PartialRule {
    /// Creates a rule setting both fields.
    #[must_use]
    pub fn new(re: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            re: Some(re.into()),
            error: Some(error.into()),
        }
    }

    /// Creates a rule setting only the pattern.
    #[must_use]
    pub fn pattern(re: impl Into<String>) -> Self {
        Self {
            re: Some(re.into()),
            error: None,
        }
    }

    /// Creates a rule setting only the message.
    #[must_use]
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            re: None,
            error: Some(error.into()),
        }
    }
}

/// The user-supplied rules, keyed by construct kind.
///
/// Loaded once per run and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    entries: HashMap<ConstructKind, PartialRule>,
}

impl RuleTable {
    /// Creates an empty table (only the hardcoded defaults apply).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the explicit entry for a kind, replacing any previous one.
    #[must_use]
    pub fn with(mut self, kind: ConstructKind, rule: PartialRule) -> Self {
        self.entries.insert(kind, rule);
        self
    }

    /// Loads a rule table from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses a rule table from a TOML string.
    ///
    /// Unknown kind names are logged and ignored. A missing `_base_` table is
    /// tolerated; the hardcoded defaults take its place.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a table carries fields
    /// other than `re` and `error`.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: BTreeMap<String, PartialRule> =
            toml::from_str(content).map_err(|e| ConfigError::Parse {
                message: e.to_string(),
            })?;

        let mut entries = HashMap::new();
        for (name, rule) in raw {
            match ConstructKind::from_name(&name) {
                Some(kind) => {
                    entries.insert(kind, rule);
                }
                None => tracing::warn!("ignoring rule for unknown construct kind '{name}'"),
            }
        }

        if !entries.contains_key(&ConstructKind::Base) {
            tracing::warn!("rule table has no [_base_] entry, using built-in defaults");
        }

        Ok(Self { entries })
    }

    /// Explicit entry for a kind, if the table sets one.
    #[must_use]
    pub fn entry(&self, kind: ConstructKind) -> Option<&PartialRule> {
        self.entries.get(&kind)
    }

    /// Number of kinds with an explicit entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no kind has an explicit entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the rule file.
    #[error("Failed to read rule file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in the rule file.
    #[error("Failed to parse rules: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A resolved pattern is not a valid regular expression.
    #[error("Invalid pattern for rule '{kind}': {source}")]
    InvalidPattern {
        /// Kind whose resolved rule carries the pattern.
        kind: ConstructKind,
        /// Regex compilation error.
        source: regex::Error,
    },
}
