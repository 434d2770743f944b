use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use unquote::catalog::{Catalog, QuoteEntry, scramble};

/// Fill in the scrambles a quote catalog leaves out and check the result.
#[derive(Parser)]
#[command(name = "build_catalog", version)]
struct Cli {
    /// Catalog JSON to read.
    input: PathBuf,

    /// Where to write the filled catalog. Prints to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only validate; write nothing.
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let entries: Vec<QuoteEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", cli.input.display()))?;

    let missing = entries
        .iter()
        .filter(|e| e.scrambled_words.is_none() || e.scrambled_author.is_none())
        .count();

    let catalog = Catalog::from_entries(entries)?;
    let (first, last) = (catalog.earliest_date(), catalog.latest_date());
    eprintln!(
        "{} quotes ({} scrambled here), {} to {}",
        catalog.len(),
        missing,
        first.map(|d| d.to_string()).unwrap_or_default(),
        last.map(|d| d.to_string()).unwrap_or_default(),
    );

    if cli.check {
        return Ok(());
    }

    let filled: Vec<QuoteEntry> = catalog.iter().map(scramble::to_entry).collect();
    let json = serde_json::to_string_pretty(&filled)?;
    match cli.output {
        Some(path) => {
            fs::write(&path, &json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {} ({} bytes)", path.display(), json.len());
        }
        None => println!("{json}"),
    }
    Ok(())
}
