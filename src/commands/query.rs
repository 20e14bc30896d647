//! Read-side commands: list, show and player.
//!
//! Each command renders to a string so main.rs only prints.

use crate::aggregator::career::build_career;
use crate::output::table::{render_career, render_match};
use crate::parser::schema::SteamId;
use crate::store::StatsStore;
use crate::utils::config::PipelineConfig;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Table of every stored match
pub fn execute_list(store: &impl StatsStore) -> Result<String> {
    let summaries = store.list().context("Failed to list stored matches")?;

    if summaries.is_empty() {
        return Ok("No matches stored".to_string());
    }

    let mut lines = vec![format!(
        "{:<16} {:<14} {:>6} {:>7}  {}",
        "Match", "Map", "Rounds", "Players", "Played"
    )];
    for s in &summaries {
        let played = s
            .played_at
            .or(s.ingested_at)
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "{:<16} {:<14} {:>6} {:>7}  {}",
            short_hash(&s.match_hash),
            s.map_name,
            s.round_count,
            s.player_count,
            played
        ));
    }
    lines.push(format!("{} matches", summaries.len()));

    Ok(lines.join("\n"))
}

/// Scoreboard and FHHS tables for one stored match
pub fn execute_show(store: &impl StatsStore, hash_prefix: &str, config: &PipelineConfig) -> Result<String> {
    let report = store
        .get(hash_prefix)
        .with_context(|| format!("Failed to load match '{}'", hash_prefix))?;

    Ok(render_match(&report, config.low_sample_duels))
}

/// Career summary for one player, optionally from a date onwards
pub fn execute_player(
    store: &impl StatsStore,
    steam_id: SteamId,
    since: Option<&str>,
    config: &PipelineConfig,
) -> Result<String> {
    let since = since.map(parse_since).transpose()?;
    let entries = store
        .player_rows(steam_id, since)
        .with_context(|| format!("Failed to load matches for player {}", steam_id))?;

    if entries.is_empty() {
        anyhow::bail!("No stored matches for player {}", steam_id);
    }

    let career = build_career(steam_id, &entries, &config.roles);
    Ok(render_career(&career, config.low_sample_duels))
}

/// Parse a `YYYY-MM-DD` date as midnight UTC
pub fn parse_since(date: &str) -> Result<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", date))?;
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("Invalid date '{}'", date))?;

    Ok(Utc.from_utc_datetime(&midnight))
}

fn short_hash(hash: &str) -> &str {
    hash.get(..16).unwrap_or(hash)
}
