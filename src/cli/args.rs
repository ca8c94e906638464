use crate::strategy::{EntityExport, RunConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Reconcile and clear open GL account items
#[derive(Parser, Debug)]
#[command(name = "clearing-engine")]
#[command(about = "Match open ledger items into zero-sum clearing groups", long_about = None)]
pub struct CliArgs {
    /// Entity exports to process, one raw export file per entity
    #[arg(
        value_name = "ENTITY=PATH",
        required = true,
        help = "Entity code and export file path, e.g. 0073=exports/fbl3n_0073.txt"
    )]
    pub exports: Vec<String>,

    /// Rules file mapping entities and accounts to matching criteria
    #[arg(long = "rules", value_name = "FILE", help = "Path to the TOML rules file")]
    pub rules_file: PathBuf,

    /// Run strategy to use for processing entities
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Run strategy: 'sync' for sequential or 'async' for entity-parallel"
    )]
    pub strategy: StrategyType,

    /// Number of entities processed concurrently (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of entities processing concurrently (default: CPU cores)"
    )]
    pub max_concurrent_entities: Option<usize>,

    /// Directory the per-entity reports are written to
    #[arg(
        long = "output-dir",
        value_name = "DIR",
        default_value = ".",
        help = "Directory for the per-entity report CSV files"
    )]
    pub output_dir: PathBuf,

    /// Enable debug logging
    #[arg(long, short, help = "Enable debug logging")]
    pub verbose: bool,
}

/// Available run strategies
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a RunConfig from CLI arguments
    ///
    /// Uses the CLI value if provided, falling back to defaults (with a
    /// warning for invalid values).
    pub fn to_run_config(&self) -> RunConfig {
        match self.max_concurrent_entities {
            Some(count) => RunConfig::new(count),
            None => RunConfig::default(),
        }
    }

    /// Decode the ENTITY=PATH export arguments
    ///
    /// # Errors
    ///
    /// Returns an error message for arguments without a `=` separator or
    /// with an empty entity code or path.
    pub fn entity_exports(&self) -> Result<Vec<EntityExport>, String> {
        self.exports
            .iter()
            .map(|spec| {
                let (entity, path) = spec
                    .split_once('=')
                    .ok_or_else(|| format!("Invalid export '{}': expected ENTITY=PATH", spec))?;
                if entity.is_empty() || path.is_empty() {
                    return Err(format!("Invalid export '{}': expected ENTITY=PATH", spec));
                }
                Ok(EntityExport {
                    entity: entity.to_string(),
                    path: PathBuf::from(path),
                })
            })
            .collect()
    }
}
