//! abbrev-bridge command line
//!
//! Runs the renumbering and planning stages on raw engine output, for
//! debugging host integrations.
//!
//! # Usage
//!
//! ```bash
//! # Renumber tabstops in expanded text
//! echo '<a href="${1}">${2}</a>${0}' | abbrev-bridge renumber
//!
//! # Plan inserting expanded text over bytes 10..12 of a document
//! abbrev-bridge plan --start 10 --end 12 --document index.html expansion.txt
//!
//! # Resolve syntax and profile for a scope string
//! abbrev-bridge detect "source.python string.quoted.double.block.python"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;

use abbrev_bridge::config::{self, BridgeConfig};
use abbrev_bridge::insertion::InsertionPlanner;
use abbrev_bridge::tabstops::{ExitPoint, Renumbered};
use abbrev_bridge::{logging, syntax, utils, TextRange};

#[derive(Parser)]
#[command(name = "abbrev-bridge")]
#[command(version)]
#[command(about = "Tabstop renumbering and insertion planning for abbreviation expansions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: <config dir>/abbrev-bridge/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Renumber tabstops and print the result as JSON
    Renumber {
        /// Input file (reads stdin if not provided)
        file: Option<PathBuf>,
    },

    /// Plan inserting expanded text into a document and print the plan as JSON
    Plan {
        /// Start of the replaced range (byte offset)
        #[arg(long)]
        start: usize,

        /// End of the replaced range (byte offset)
        #[arg(long)]
        end: usize,

        /// Document the text is inserted into, used for indentation
        #[arg(long)]
        document: Option<PathBuf>,

        /// Expanded text (reads stdin if not provided)
        file: Option<PathBuf>,
    },

    /// Resolve syntax and output profile for a scope string
    Detect {
        scope: String,
    },
}

#[derive(Serialize)]
struct RenumberOutput {
    text: String,
    exit_point: Option<ExitPoint>,
    placeholders: usize,
}

#[derive(Serialize)]
struct DetectOutput {
    syntax: String,
    profile: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref());
    let _guard = logging::init(&config.logging);

    match cli.command {
        Commands::Renumber { file } => renumber(&config, file.as_deref()),
        Commands::Plan {
            start,
            end,
            document,
            file,
        } => plan(&config, start, end, document.as_deref(), file.as_deref()),
        Commands::Detect { scope } => detect(&config, &scope),
    }
}

fn renumber(config: &BridgeConfig, file: Option<&Path>) -> Result<()> {
    let source = read_input(file)?;
    let renumbered = Renumbered::from_source(&source, &config.tabstops);
    info!(
        placeholders = renumbered.placeholders.len(),
        "Renumbered input"
    );
    print_json(&RenumberOutput {
        placeholders: renumbered.placeholders.len(),
        text: renumbered.text,
        exit_point: renumbered.exit_point,
    })
}

fn plan(
    config: &BridgeConfig,
    start: usize,
    end: usize,
    document: Option<&Path>,
    file: Option<&Path>,
) -> Result<()> {
    let source = read_input(file)?;
    let document = match document {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document {}", path.display()))?,
        None => String::new(),
    };

    let replace = TextRange::new(start, end);
    let (replace_start, replace_end) = replace.ordered();
    if !document.is_empty() && replace_end > document.len() {
        anyhow::bail!(
            "Range {}..{} is outside the document ({} bytes)",
            replace_start,
            replace_end,
            document.len()
        );
    }

    let renumbered = Renumbered::from_source(&source, &config.tabstops);
    let indent = utils::indentation_at(&document, replace_start);
    let plan = InsertionPlanner::from_config(&config.formatting).plan(
        &renumbered.text,
        renumbered.exit_point,
        replace,
        indent,
    );
    print_json(&plan)
}

fn detect(config: &BridgeConfig, scope: &str) -> Result<()> {
    let syntax = syntax::resolve_syntax(scope, &config.syntax);
    let profile = syntax::detect_profile(scope, &syntax, "", 0, &config.syntax);
    print_json(&DetectOutput { syntax, profile })
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
