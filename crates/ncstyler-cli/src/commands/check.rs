//! Check command implementation.

use anyhow::{Context, Result};
use ncstyler_core::{RuleTable, ValidationError, Validator};
use ncstyler_cpp::{CppParser, DeclarationParser};
use std::path::Path;

use crate::OutputFormat;

/// Runs the check command.
///
/// Exits the process with status 1 when a violation is found.
pub fn run(file: &Path, rules: &Path, format: OutputFormat, debug: bool) -> Result<()> {
    if let Some(violation) = check_file(file, rules)? {
        super::output::print(&violation, format, debug)?;
        std::process::exit(1);
    }
    Ok(())
}

/// Validates one file, returning the first violation.
///
/// # Errors
///
/// Returns an error if the rule file or source cannot be loaded, a rule
/// pattern is invalid, or the source cannot be parsed.
pub fn check_file(file: &Path, rules: &Path) -> Result<Option<ValidationError>> {
    let table = RuleTable::from_file(rules)
        .with_context(|| format!("Failed to load rules: {}", rules.display()))?;
    let validator = Validator::new(&table).context("Invalid rule table")?;

    let source = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let parser = CppParser::new();
    if !parser.handles(file) {
        tracing::warn!(
            "{} has no known {} extension, parsing anyway",
            file.display(),
            parser.language_id()
        );
    }

    let entities = parser
        .parse(&source)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    tracing::debug!(
        "Checking {} with {} explicit rules",
        file.display(),
        table.len()
    );

    let filename = file.to_string_lossy();
    Ok(validator.validate(&filename, &entities, &source).err())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ncstyler_core::ConstructKind;
    use std::fs;
    use tempfile::TempDir;

    const RULES: &str = r#"
[_base_]
re = "[A-Za-z0-9_]+"
error = ""

[class]
re = "^[A-Z][A-Za-z0-9]*$"
error = "must be PascalCase"
"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reports_first_violation() {
        let tmp = TempDir::new().unwrap();
        let rules = write(&tmp, "rules.toml", RULES);
        let file = write(&tmp, "sample.cpp", "class myClass { };\n");

        let violation = check_file(&file, &rules).unwrap().expect("violation");
        assert_eq!(violation.rule_kind, ConstructKind::Class);
        assert!(violation
            .to_string()
            .ends_with(":1:error: Name 'myClass' isn't matched with rule: class! Class must be PascalCase"));
        assert_eq!(violation.filename, file.to_string_lossy());
    }

    #[test]
    fn clean_file_has_no_violation() {
        let tmp = TempDir::new().unwrap();
        let rules = write(&tmp, "rules.toml", RULES);
        let file = write(&tmp, "sample.cpp", "class MyClass { };\n");

        assert!(check_file(&file, &rules).unwrap().is_none());
    }

    #[test]
    fn unknown_extension_still_checked() {
        let tmp = TempDir::new().unwrap();
        let rules = write(&tmp, "rules.toml", RULES);
        let file = write(&tmp, "sample.txt", "class myClass { };\n");

        assert!(check_file(&file, &rules).unwrap().is_some());
    }

    #[test]
    fn missing_rule_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let file = write(&tmp, "sample.cpp", "");
        let err = check_file(&file, &tmp.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to load rules"));
    }

    #[test]
    fn invalid_pattern_is_error() {
        let tmp = TempDir::new().unwrap();
        let rules = write(&tmp, "rules.toml", "[namespace]\nre = \"[\"\n");
        let file = write(&tmp, "sample.cpp", "");
        let err = check_file(&file, &rules).unwrap_err();
        assert!(err.to_string().contains("Invalid rule table"));
    }

    #[test]
    fn missing_source_is_error() {
        let tmp = TempDir::new().unwrap();
        let rules = write(&tmp, "rules.toml", RULES);
        let err = check_file(&tmp.path().join("absent.cpp"), &rules).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn repeated_checks_agree() {
        let tmp = TempDir::new().unwrap();
        let rules = write(&tmp, "rules.toml", RULES);
        let file = write(&tmp, "sample.cpp", "class myClass { };\n");

        let first = check_file(&file, &rules).unwrap();
        let second = check_file(&file, &rules).unwrap();
        assert_eq!(first, second);
    }
}
