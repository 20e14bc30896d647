//! Pipeline entry point.
//!
//! Runs every pass in a fixed order over one match held in memory. Later
//! passes read earlier outputs but never re-run them, and the result is a
//! pure function of the match and the config.

use super::awp::analyze_awp_deaths;
use super::duels::analyze_duels;
use super::flash::analyze_flashes;
use super::index::MatchIndex;
use super::opening::detect_openings;
use super::role::assign_roles;
use super::rollup::rollup_match;
use super::rounds::classify_rounds;
use super::teams::TeamTable;
use super::timing::{analyze_counter_strafe, analyze_kill_timing};
use super::trades::annotate_trades;
use super::weapon_stats::rollup_weapons;
use crate::output::schema::MatchReport;
use crate::parser::demo_match::validate_match_format;
use crate::parser::schema::RawMatch;
use crate::utils::config::{PipelineConfig, SCHEMA_VERSION};
use crate::utils::error::AggregateError;
use log::{debug, info};

/// Aggregate one decoded match into its statistics tables
///
/// **Public** - main entry point of the library
///
/// # Arguments
/// * `demo` - Decoded match
/// * `config` - Heuristic thresholds
///
/// # Returns
/// Report with player, round, weapon and duel-segment rows, each sorted
/// by steam id first
///
/// # Errors
/// * `AggregateError::InvalidMatch` - empty hash, non-positive tick rate,
///   inverted round boundaries or an invalid config
///
/// # Example
/// ```ignore
/// let demo = read_match("match.json")?;
/// let report = aggregate_match(&demo, &PipelineConfig::default())?;
/// println!("{} players", report.players.len());
/// ```
pub fn aggregate_match(demo: &RawMatch, config: &PipelineConfig) -> Result<MatchReport, AggregateError> {
    validate_match_format(demo).map_err(|e| AggregateError::InvalidMatch(e.to_string()))?;
    config
        .validate()
        .map_err(|e| AggregateError::InvalidMatch(e.to_string()))?;

    let hash = demo.hash.as_str();
    let rate = demo.tick_rate;
    let ticks = |secs: f64| PipelineConfig::window_ticks(secs, rate);

    debug!("Aggregating match {} ({} @ {} tick)", hash, demo.map_name, rate);

    // Step 1: indices and team table
    let index = MatchIndex::build(demo);
    let teams = TeamTable::build(demo);

    // Step 2: kill annotations
    let trades = annotate_trades(&index, ticks(config.trade_window_secs));
    let openings = detect_openings(&index);

    // Step 3: per-round rows (clutches run inside)
    let rounds = classify_rounds(hash, &index, &teams, &trades, &openings, &config.buys);

    // Step 4: match totals
    let mut players = rollup_match(demo, &index, &teams, &trades, &rounds, config.crosshair_good_deg);

    // Step 5: enrichment passes
    let duel_segments = analyze_duels(hash, &index, config.correction_small_deg, &mut players);
    analyze_awp_deaths(hash, &index, ticks(config.awp_flash_window_secs), &mut players);
    analyze_flashes(hash, &index, ticks(config.flash_effect_window_secs), &mut players);
    analyze_kill_timing(hash, &index, ticks(config.ttk_window_secs), &mut players);
    analyze_counter_strafe(hash, &index, config.counter_strafe_max_speed, &mut players);
    assign_roles(&mut players, &config.roles);

    let weapons = rollup_weapons(demo, &index);

    let report = MatchReport {
        version: SCHEMA_VERSION.to_string(),
        match_hash: hash.to_string(),
        map_name: demo.map_name.clone(),
        tick_rate: rate,
        round_count: index.rounds().count() as u32,
        played_at: demo.played_at,
        ingested_at: None,
        players: players.into_values().collect(),
        rounds,
        weapons,
        duel_segments,
    };

    info!(
        "Aggregated {} on {}: {} players, {} rounds, {} duel segments",
        report.match_hash,
        report.map_name,
        report.players.len(),
        report.round_count,
        report.duel_segments.len()
    );

    Ok(report)
}
