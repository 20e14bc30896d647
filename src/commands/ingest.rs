//! Ingest command implementation.
//!
//! The ingest command:
//! 1. Reads decoded match files in parallel
//! 2. Drops matches already stored (unless forced)
//! 3. Aggregates the rest in parallel
//! 4. Writes reports to the store on the calling thread

use super::models::{IngestArgs, IngestSummary};
use crate::aggregator::aggregate_match;
use crate::output::schema::MatchReport;
use crate::parser::demo_match::read_match;
use crate::parser::schema::RawMatch;
use crate::store::StatsStore;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

/// Execute the ingest command
///
/// **Public** - main entry point called from main.rs
///
/// Unreadable or invalid files are reported in the summary and do not
/// stop the rest of the batch.
///
/// # Errors
/// * Thread pool cannot be created
/// * A finished report cannot be written to the store
///
/// # Example
/// ```ignore
/// let store = JsonStore::open("demostats-data")?;
/// let args = IngestArgs {
///     files: vec![PathBuf::from("match.json")],
///     ..Default::default()
/// };
/// let summary = execute_ingest(&args, &store)?;
/// ```
pub fn execute_ingest(args: &IngestArgs, store: &impl StatsStore) -> Result<IngestSummary> {
    let start_time = Instant::now();
    info!("Ingesting {} match files", args.files.len());

    let pool = build_pool(args.jobs)?;
    let mut summary = IngestSummary::default();

    // Step 1: read
    info!("Step 1/3: Reading match files...");
    let read: Vec<(PathBuf, Result<RawMatch, String>)> = pool.install(|| {
        args.files
            .par_iter()
            .map(|path| (path.clone(), read_match(path).map_err(|e| e.to_string())))
            .collect()
    });

    let mut seen = HashSet::new();
    let mut pending = Vec::new();
    for (path, result) in read {
        match result {
            Ok(demo) => {
                if !seen.insert(demo.hash.clone()) {
                    debug!("{} repeats match {} in this batch", path.display(), demo.hash);
                    summary.skipped.push(demo.hash);
                    continue;
                }
                match store.exists(&demo.hash) {
                    Ok(true) if !args.force => {
                        debug!("Match {} already stored, skipping", demo.hash);
                        summary.skipped.push(demo.hash);
                    }
                    Ok(_) => pending.push((path, demo)),
                    Err(e) => {
                        warn!("Cannot store {}: {}", path.display(), e);
                        summary.failed.push((path, e.to_string()));
                    }
                }
            }
            Err(reason) => {
                warn!("Cannot read {}: {}", path.display(), reason);
                summary.failed.push((path, reason));
            }
        }
    }

    // Step 2: aggregate
    info!("Step 2/3: Aggregating {} matches...", pending.len());
    let config = &args.config;
    let aggregated: Vec<(PathBuf, Result<MatchReport, String>)> = pool.install(|| {
        pending
            .par_iter()
            .map(|(path, demo)| (path.clone(), aggregate_match(demo, config).map_err(|e| e.to_string())))
            .collect()
    });

    // Step 3: store
    info!("Step 3/3: Writing reports...");
    for (path, result) in aggregated {
        match result {
            Ok(report) => {
                store
                    .upsert(&report)
                    .with_context(|| format!("Failed to store match {}", report.match_hash))?;
                summary.ingested.push(report.match_hash);
            }
            Err(reason) => {
                warn!("Cannot aggregate {}: {}", path.display(), reason);
                summary.failed.push((path, reason));
            }
        }
    }

    info!(
        "Ingest completed in {:.2}s: {} stored, {} skipped, {} failed",
        start_time.elapsed().as_secs_f64(),
        summary.ingested.len(),
        summary.skipped.len(),
        summary.failed.len()
    );

    Ok(summary)
}

/// Validate ingest arguments
///
/// **Public** - can be called before execute_ingest for early validation
pub fn validate_args(args: &IngestArgs) -> Result<()> {
    if args.files.is_empty() {
        anyhow::bail!("No match files given");
    }

    if args.jobs > 256 {
        anyhow::bail!("jobs is too large (max 256)");
    }

    args.config.validate().context("Invalid pipeline config")?;

    Ok(())
}

fn build_pool(jobs: usize) -> Result<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if jobs > 0 {
        builder = builder.num_threads(jobs);
    }
    builder.build().context("Failed to create worker pool")
}
