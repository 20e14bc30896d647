//! Demostats CLI
//!
//! Aggregates decoded replays into a local store of match reports and
//! answers per-match and per-player queries from it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;
use std::path::{Path, PathBuf};

use demostats::commands::{
    display_schema, display_version, execute_ingest, execute_list, execute_player, execute_show, validate_args,
    IngestArgs,
};
use demostats::parser::schema::SteamId;
use demostats::store::JsonStore;
use demostats::utils::config::{load_config, PipelineConfig, DEFAULT_STORE_DIR};

/// Demostats - match statistics from decoded replays
#[derive(Parser, Debug)]
#[command(name = "demostats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Directory holding stored match reports
    #[arg(long, global = true, env = "DEMOSTATS_STORE", default_value = DEFAULT_STORE_DIR)]
    store: PathBuf,

    /// TOML file overriding pipeline thresholds
    #[arg(long, global = true, env = "DEMOSTATS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate decoded match files into the store
    Ingest {
        /// Decoded match JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Re-aggregate matches that are already stored
        #[arg(long)]
        force: bool,

        /// Worker threads (0 = one per core)
        #[arg(short, long, default_value = "0")]
        jobs: usize,
    },

    /// List stored matches
    List,

    /// Show one stored match
    Show {
        /// Match hash or unique prefix
        hash: String,
    },

    /// Summarize one player across stored matches
    Player {
        /// 64-bit steam id
        steam_id: SteamId,

        /// Only matches on or after this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Ingest { files, force, jobs } => {
            let args = IngestArgs {
                files,
                store_dir: cli.store.clone(),
                config: pipeline_config(cli.config.as_deref())?,
                force,
                jobs,
            };
            validate_args(&args)?;

            let store = open_store(&args.store_dir)?;
            let summary = execute_ingest(&args, &store)?;

            println!(
                "Ingested {} matches, skipped {}, failed {}",
                summary.ingested.len(),
                summary.skipped.len(),
                summary.failed.len()
            );
            for (path, reason) in &summary.failed {
                println!("  ✗ {}: {}", path.display(), reason);
            }
            if !summary.failed.is_empty() && summary.ingested.is_empty() && summary.skipped.is_empty() {
                anyhow::bail!("No match file could be ingested");
            }
        }

        Commands::List => {
            let store = open_store(&cli.store)?;
            println!("{}", execute_list(&store)?);
        }

        Commands::Show { hash } => {
            let config = pipeline_config(cli.config.as_deref())?;
            let store = open_store(&cli.store)?;
            println!("{}", execute_show(&store, &hash, &config)?);
        }

        Commands::Player { steam_id, since } => {
            let config = pipeline_config(cli.config.as_deref())?;
            let store = open_store(&cli.store)?;
            println!("{}", execute_player(&store, steam_id, since.as_deref(), &config)?);
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Load thresholds from `--config`, or the defaults
///
/// **Private** - shared by commands that aggregate or render
fn pipeline_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => load_config(path).with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            debug!("Using default pipeline config");
            Ok(PipelineConfig::default())
        }
    }
}

fn open_store(dir: &Path) -> Result<JsonStore> {
    JsonStore::open(dir).with_context(|| format!("Failed to open store {}", dir.display()))
}
