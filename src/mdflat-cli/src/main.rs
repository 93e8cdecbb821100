//! mdflat: dump tool for the flattening renderer.
//!
//! Reads markdown from a file or stdin, flattens it, and prints either the
//! plain display lines or the full `{ text, attrs }` result as JSON. The
//! JSON form is what a display/highlight layer consumes; the plain form is
//! for eyeballing layout.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Flatten markdown into display lines and attribute spans.
#[derive(Debug, Parser)]
#[command(name = "mdflat", version, about)]
struct Cli {
    /// Markdown file to render; stdin when omitted.
    file: Option<PathBuf>,

    /// Print the full render output (text + attrs) as pretty JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let source = read_source(cli.file.as_deref())?;
    debug!(bytes = source.len(), "read input");

    let output = mdflat_core::render_markdown(&source)?;
    if cli.json {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &output)
            .context("failed to write JSON output")?;
        println!();
    } else {
        for line in &output.text {
            println!("{line}");
        }
    }
    Ok(())
}

fn read_source(file: Option<&std::path::Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}
