//! ncstyler CLI tool.
//!
//! Usage:
//! ```bash
//! ncstyler -c rules.toml [OPTIONS] FILE
//! ncstyler -c rules.toml --show-rules
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Naming-convention checker for C and C++ sources
#[derive(Parser)]
#[command(name = "ncstyler")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the rule file
    #[arg(short, long, env = "NCSTYLER_CONFIG")]
    config: PathBuf,

    /// Output path (accepted for compatibility, nothing is written to it)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the chain of enclosing declarations with a violation
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Print the resolved rule of every construct kind and exit
    #[arg(long)]
    show_rules: bool,

    /// Source file to check
    #[arg(required_unless_present = "show_rules")]
    file: Option<PathBuf>,
}

/// Output format for violations and rule listings.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Some(output) = &cli.output {
        tracing::debug!("output path {} is not used", output.display());
    }

    if cli.show_rules {
        return commands::show_rules::run(&cli.config, cli.format);
    }

    match &cli.file {
        Some(file) => commands::check::run(file, &cli.config, cli.format, cli.debug),
        None => anyhow::bail!("No source file given"),
    }
}
