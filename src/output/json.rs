//! JSON report writer.
//!
//! Writes MatchReport structs to JSON files with proper formatting.

use super::schema::MatchReport;
use crate::utils::error::StoreError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Write a match report to a JSON file
///
/// **Public** - used by the store
///
/// # Arguments
/// * `report` - Report to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `StoreError::IoError` - I/O error during write
/// * `StoreError::SerializationFailed` - JSON serialization error
/// * `StoreError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let report = aggregate_match(&demo, &config)?;
/// write_report(&report, "reports/abc123.json")?;
/// ```
pub fn write_report(report: &MatchReport, output_path: impl AsRef<Path>) -> Result<(), StoreError> {
    let output_path = output_path.as_ref();

    debug!("Writing report {} to: {}", report.match_hash, output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::InvalidPath(format!("Cannot create directory {}: {}", parent.display(), e))
            })?;
        }
    }

    let file = File::create(output_path)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report)?;

    info!(
        "Report {} written ({} bytes)",
        report.match_hash,
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), StoreError> {
    if path.as_os_str().is_empty() {
        return Err(StoreError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(StoreError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a match report from a JSON file
///
/// **Public** - used by the store and for validation
///
/// # Errors
/// * `StoreError::IoError` - File read error
/// * `StoreError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<MatchReport, StoreError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path)?;
    let report: MatchReport = serde_json::from_reader(BufReader::new(file))?;

    debug!("Report loaded: version {}, match {}", report.version, report.match_hash);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::schema::PlayerMatchStats;
    use tempfile::NamedTempFile;

    fn create_test_report() -> MatchReport {
        let mut player = PlayerMatchStats::new("abc123", 76561198000000001);
        player.name = "alpha".to_string();
        player.kills = 21;

        MatchReport {
            version: "1.0.0".to_string(),
            match_hash: "abc123".to_string(),
            map_name: "de_mirage".to_string(),
            tick_rate: 64.0,
            round_count: 24,
            played_at: None,
            ingested_at: None,
            players: vec![player],
            rounds: Vec::new(),
            weapons: Vec::new(),
            duel_segments: Vec::new(),
        }
    }

    #[test]
    fn test_write_and_read_report() {
        let report = create_test_report();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_report(&report, path).unwrap();
        let loaded = read_report(path).unwrap();

        assert_eq!(loaded, report);
    }

    #[test]
    fn test_validate_output_path_empty() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_output_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/report.json");

        write_report(&create_test_report(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = read_report(temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(StoreError::IoError(_))));
    }
}
