//! Run settings
//!
//! Settings come from three layers, later layers winning:
//! built-in defaults, an optional `modelsql.toml`, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use modelsql_codegen::{GeneratorConfig, TableOrder};
use modelsql_core::Dialect;
use modelsql_extract::ExtractConfig;

use crate::Cli;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "modelsql.toml";

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "./out";

// ============================================================================
// File config
// ============================================================================

/// Contents of a `modelsql.toml` file. Every key is optional.
///
/// ```toml
/// input = "app"
/// output = "sql"
/// dialect = "mysql"
/// order = "dependency"
/// strict_relations = true
///
/// [extract]
/// marker = "Model"
/// extension = "py"
/// exclude_dirs = ["migrations"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub dialect: Option<String>,
    pub order: Option<TableOrder>,
    pub strict_relations: Option<bool>,
    pub extract: Option<ExtractConfig>,
}

impl FileConfig {
    /// Parse TOML text
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config file")
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        Self::parse(&text).with_context(|| format!("in '{}'", path.display()))
    }

    /// The explicit `--config` file, or `modelsql.toml` from the working
    /// directory when present
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    tracing::debug!(path = DEFAULT_CONFIG_FILE, "using config file");
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub input: PathBuf,
    pub extract: ExtractConfig,
    pub generator: GeneratorConfig,
    pub dry_run: bool,
    pub json: bool,
    pub quiet: bool,
}

impl Settings {
    /// Resolve settings from the command line and the discovered config file
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = FileConfig::discover(cli.config.as_deref())?;
        Self::merge(cli, file)
    }

    /// Layer command-line flags over a config file
    pub fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let Some(input) = cli.input.clone().or(file.input) else {
            bail!("no input directory given; pass --input <DIR> or set `input` in {}", DEFAULT_CONFIG_FILE);
        };

        let output = cli
            .output
            .clone()
            .or(file.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let dialect = match (cli.dialect, file.dialect) {
            (Some(dialect), _) => dialect,
            (None, Some(token)) => token
                .parse::<Dialect>()
                .context("invalid `dialect` in config file")?,
            (None, None) => Dialect::default(),
        };

        let order = cli.order.or(file.order).unwrap_or_default();

        let mut extract = file.extract.unwrap_or_default();
        if let Some(marker) = &cli.marker {
            extract.marker = marker.clone();
        }
        for dir in &cli.exclude {
            if !extract.exclude_dirs.contains(dir) {
                extract.exclude_dirs.push(dir.clone());
            }
        }

        let mut generator = GeneratorConfig::new()
            .with_output_dir(output)
            .with_dialect(dialect)
            .with_table_order(order);
        if cli.strict_relations || file.strict_relations.unwrap_or(false) {
            generator = generator.strict_relations();
        }

        Ok(Self {
            input,
            extract,
            generator,
            dry_run: cli.dry_run,
            json: cli.json,
            quiet: cli.quiet,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
