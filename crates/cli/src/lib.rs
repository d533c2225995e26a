//! # modelsql CLI
//!
//! Command-line front end: parses flags, layers them over an optional
//! `modelsql.toml`, runs extraction and generation and reports the outcome.
//!
//! ```text
//! modelsql --input app --output sql --dialect mysql
//! modelsql --input app --dry-run --json
//! ```
//!
//! Files that fail to parse are reported and skipped; the run still
//! succeeds with everything else. Relations to models that were not
//! extracted are warnings unless `--strict-relations` is given. A missing
//! input directory or an unreadable file fails the run before anything is
//! written.

pub mod report;
pub mod settings;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use modelsql_codegen::{Generator, TableOrder, summarize};
use modelsql_core::Dialect;
use modelsql_extract::extract_dir;

pub use clap::Parser;
pub use settings::{FileConfig, Settings};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Arguments
// ============================================================================

#[derive(Parser, Debug, Clone)]
#[command(name = "modelsql")]
#[command(version = VERSION)]
#[command(about = "Turn Django-style model classes into SQL schema, migrations and sqlc config")]
#[command(after_help = "EXAMPLES:
  modelsql -i app                          Write ./out/schema.sql and friends
  modelsql -i app -o sql -d mysql          MySQL engine in sqlc.yaml
  modelsql -i app --order dependency       Referenced tables first
  modelsql -i app --dry-run --json         Dump the extracted models")]
pub struct Cli {
    /// Directory containing the model sources
    #[arg(short, long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Directory the generated files are written to [default: ./out]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// SQL dialect: postgres (alias postgresql) or mysql [default: postgres]
    #[arg(short, long, value_parser = Dialect::from_str)]
    pub dialect: Option<Dialect>,

    /// Print the extracted models and queries instead of writing files
    #[arg(long)]
    pub dry_run: bool,

    /// With --dry-run, print the extraction result as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Table order: extraction or dependency [default: extraction]
    #[arg(long, value_parser = TableOrder::from_str)]
    pub order: Option<TableOrder>,

    /// Fail when a relation target is not a declared model
    #[arg(long)]
    pub strict_relations: bool,

    /// Base-class name that marks a model
    #[arg(long, value_name = "NAME")]
    pub marker: Option<String>,

    /// Directory name to skip while scanning (repeatable)
    #[arg(long, value_name = "DIR")]
    pub exclude: Vec<String>,

    /// Config file [default: ./modelsql.toml when present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Log filter selected by `-v` / `-q`
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

// ============================================================================
// Run
// ============================================================================

/// Execute one invocation
pub fn run(cli: &Cli) -> Result<()> {
    let settings = Settings::resolve(cli)?;
    execute(&settings)
}

/// Execute with already resolved settings
pub fn execute(settings: &Settings) -> Result<()> {
    let report = extract_dir(&settings.input, &settings.extract)
        .with_context(|| format!("failed to extract models from '{}'", settings.input.display()))?;

    report::print_problems(&report);

    if settings.dry_run {
        if settings.json {
            println!("{}", report::dry_run_json(&report.result)?);
        } else {
            report::print_dry_run(&report);
        }
        return Ok(());
    }

    let generator = Generator::new(settings.generator.clone());
    let project = generator
        .generate_and_write(&report.result)
        .context("generation failed")?;

    report::print_generation_warnings(&project);
    if !settings.quiet {
        report::print_generated(&summarize(&report.result, &project), &project);
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
