use crate::utils::config::{PipelineConfig, DEFAULT_STORE_DIR};
use std::path::PathBuf;

/// Arguments for the ingest command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct IngestArgs {
    /// Decoded match JSON files
    pub files: Vec<PathBuf>,

    /// Store directory
    pub store_dir: PathBuf,

    /// Pipeline thresholds
    pub config: PipelineConfig,

    /// Re-aggregate matches already in the store
    pub force: bool,

    /// Worker threads (0 = rayon default)
    pub jobs: usize,
}

impl Default for IngestArgs {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            config: PipelineConfig::default(),
            force: false,
            jobs: 0,
        }
    }
}

/// Outcome of one ingest run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestSummary {
    /// Hashes written to the store
    pub ingested: Vec<String>,

    /// Hashes already stored, or repeated within the batch
    pub skipped: Vec<String>,

    /// Files that could not be read or aggregated, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl IngestSummary {
    pub fn total(&self) -> usize {
        self.ingested.len() + self.skipped.len() + self.failed.len()
    }
}
