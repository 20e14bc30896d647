//! Directory of pretty JSON reports, one `<hash>.json` per match.

use super::{MatchSummary, StatsStore};
use crate::aggregator::career::CareerEntry;
use crate::output::json::{read_report, write_report};
use crate::output::schema::MatchReport;
use crate::parser::schema::SteamId;
use crate::utils::error::StoreError;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::fs;
use std::path::PathBuf;

const REPORT_EXTENSION: &str = "json";

/// File-backed [`StatsStore`]
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `root`; the directory is created on first write
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if root.exists() && !root.is_dir() {
            return Err(StoreError::InvalidPath(format!(
                "Store path is not a directory: {}",
                root.display()
            )));
        }
        debug!("Opened store at {}", root.display());
        Ok(Self { root })
    }

    fn report_path(&self, match_hash: &str) -> Result<PathBuf, StoreError> {
        validate_hash(match_hash)?;
        Ok(self.root.join(format!("{}.{}", match_hash, REPORT_EXTENSION)))
    }

    /// Stored hashes in ascending order; files not named like a hash are skipped
    fn hashes(&self) -> Result<Vec<String>, StoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut hashes = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(REPORT_EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if validate_hash(stem).is_ok() => hashes.push(stem.to_string()),
                _ => warn!("Ignoring stray file in store: {}", path.display()),
            }
        }
        hashes.sort();

        Ok(hashes)
    }

    /// Every readable report; unreadable files are skipped with a warning
    fn reports(&self) -> Result<Vec<MatchReport>, StoreError> {
        let mut reports = Vec::new();
        for hash in self.hashes()? {
            match read_report(self.report_path(&hash)?) {
                Ok(report) => reports.push(report),
                Err(e) => warn!("Skipping unreadable report {}: {}", hash, e),
            }
        }
        Ok(reports)
    }
}

impl StatsStore for JsonStore {
    fn exists(&self, match_hash: &str) -> Result<bool, StoreError> {
        Ok(self.report_path(match_hash)?.is_file())
    }

    fn upsert(&self, report: &MatchReport) -> Result<MatchReport, StoreError> {
        let path = self.report_path(&report.match_hash)?;

        let mut stored = report.clone();
        stored.ingested_at = Some(Utc::now());
        write_report(&stored, &path)?;

        Ok(stored)
    }

    fn get(&self, hash_prefix: &str) -> Result<MatchReport, StoreError> {
        if hash_prefix.is_empty() {
            return Err(StoreError::NotFound(String::new()));
        }

        let hashes = self.hashes()?;
        if hashes.iter().any(|h| h == hash_prefix) {
            return read_report(self.report_path(hash_prefix)?);
        }

        let matching: Vec<&String> = hashes.iter().filter(|h| h.starts_with(hash_prefix)).collect();
        match matching.as_slice() {
            [] => Err(StoreError::NotFound(hash_prefix.to_string())),
            [hash] => read_report(self.report_path(hash)?),
            many => Err(StoreError::AmbiguousPrefix(hash_prefix.to_string(), many.len())),
        }
    }

    fn list(&self) -> Result<Vec<MatchSummary>, StoreError> {
        let mut summaries: Vec<MatchSummary> = self.reports()?.iter().map(MatchSummary::from).collect();
        summaries.sort_by(|a, b| {
            a.played_at
                .or(a.ingested_at)
                .cmp(&b.played_at.or(b.ingested_at))
                .then_with(|| a.match_hash.cmp(&b.match_hash))
        });
        Ok(summaries)
    }

    fn player_rows(&self, steam_id: SteamId, since: Option<DateTime<Utc>>) -> Result<Vec<CareerEntry>, StoreError> {
        let mut entries = Vec::new();

        for report in self.reports()? {
            let played_at = report.effective_date();
            if let Some(since) = since {
                if played_at.map_or(true, |date| date < since) {
                    continue;
                }
            }
            let Some(stats) = report.player(steam_id).cloned() else {
                continue;
            };
            entries.push(CareerEntry {
                played_at,
                stats,
                segments: report.player_segments(steam_id).cloned().collect(),
            });
        }

        entries.sort_by(|a, b| {
            a.played_at
                .cmp(&b.played_at)
                .then_with(|| a.stats.match_hash.cmp(&b.stats.match_hash))
        });
        debug!("Found {} stored matches for player {}", entries.len(), steam_id);

        Ok(entries)
    }
}

/// Hashes become file names, so only plain identifier characters pass
fn validate_hash(match_hash: &str) -> Result<(), StoreError> {
    let valid = !match_hash.is_empty()
        && match_hash
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidPath(format!("Invalid match hash: '{}'", match_hash)))
    }
}
