//! Show-rules command implementation.

use anyhow::{Context, Result};
use ncstyler_core::{ConstructKind, RuleResolver, RuleSpec, RuleTable};
use std::path::Path;

use crate::OutputFormat;

/// Runs the show-rules command.
pub fn run(rules: &Path, format: OutputFormat) -> Result<()> {
    let table = RuleTable::from_file(rules)
        .with_context(|| format!("Failed to load rules: {}", rules.display()))?;
    let resolved = RuleResolver::new(&table).resolve_all();

    match format {
        OutputFormat::Text => print!("{}", render_table(&resolved)),
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = resolved
                .iter()
                .map(|(kind, spec)| Ok((kind.to_string(), serde_json::to_value(spec)?)))
                .collect::<Result<_, serde_json::Error>>()?;
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
    }
    Ok(())
}

fn render_table(resolved: &[(ConstructKind, RuleSpec)]) -> String {
    let mut out = format!("{:<26} {:<30} Error\n", "Kind", "Pattern");
    out.push_str(&"-".repeat(80));
    out.push('\n');
    for (kind, spec) in resolved {
        out.push_str(&format!(
            "{:<26} {:<30} {}\n",
            kind.as_str(),
            spec.pattern,
            spec.error_message
        ));
    }
    out
}
