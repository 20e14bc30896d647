//! Persistence of match reports.
//!
//! The pipeline itself never touches storage. Commands hand finished
//! reports to a [`StatsStore`] and read them back for listing and career
//! queries.

pub mod json_store;

pub use json_store::JsonStore;

use crate::aggregator::career::CareerEntry;
use crate::output::schema::MatchReport;
use crate::parser::schema::SteamId;
use crate::utils::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Listing row for one stored match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_hash: String,
    pub map_name: String,
    pub round_count: u32,
    pub player_count: usize,
    pub played_at: Option<DateTime<Utc>>,
    pub ingested_at: Option<DateTime<Utc>>,
}

impl From<&MatchReport> for MatchSummary {
    fn from(report: &MatchReport) -> Self {
        Self {
            match_hash: report.match_hash.clone(),
            map_name: report.map_name.clone(),
            round_count: report.round_count,
            player_count: report.players.len(),
            played_at: report.played_at,
            ingested_at: report.ingested_at,
        }
    }
}

/// Storage for aggregated matches, keyed by match hash
pub trait StatsStore {
    /// Whether a report for this exact hash is stored
    fn exists(&self, match_hash: &str) -> Result<bool, StoreError>;

    /// Insert or replace the report for `report.match_hash`
    ///
    /// Returns the stored copy, stamped with its ingest time.
    fn upsert(&self, report: &MatchReport) -> Result<MatchReport, StoreError>;

    /// Fetch the one report whose hash starts with `hash_prefix`
    ///
    /// # Errors
    /// * `StoreError::NotFound` - no hash matches
    /// * `StoreError::AmbiguousPrefix` - more than one hash matches
    fn get(&self, hash_prefix: &str) -> Result<MatchReport, StoreError>;

    /// Summaries of every stored match, oldest first
    fn list(&self) -> Result<Vec<MatchSummary>, StoreError>;

    /// One player's rows from every match played at or after `since`
    fn player_rows(&self, steam_id: SteamId, since: Option<DateTime<Utc>>) -> Result<Vec<CareerEntry>, StoreError>;
}
