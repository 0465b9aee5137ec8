//! Shared output formatting for violations.

use anyhow::Result;
use ncstyler_core::ValidationError;

use crate::OutputFormat;

/// Print a violation in the specified format.
pub fn print(violation: &ValidationError, format: OutputFormat, debug: bool) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", render_text(violation, debug)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(violation)?),
    }
    Ok(())
}

/// The violation line, followed by the trail of enclosing declarations when
/// `debug` is set.
fn render_text(violation: &ValidationError, debug: bool) -> String {
    let mut text = violation.to_string();
    if debug {
        for (depth, frame) in violation.trail.iter().enumerate() {
            text.push('\n');
            text.push_str(&"  ".repeat(depth + 1));
            text.push_str("in ");
            text.push_str(frame);
        }
    }
    text
}
