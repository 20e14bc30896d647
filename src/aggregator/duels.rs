//! Duel reconstruction and FHHS segmentation.
//!
//! A duel is a kill whose killer had a recorded first sight of the victim
//! at or before the kill. From the sight -> kill window we derive:
//! - winning exposure time (sight to kill)
//! - hits landed and whether the first hit was a headshot
//! - pre-shot correction: view delta between sight and the first shot
//! - engagement distance: first shot position to victim's first-hit position
//!
//! Samples accumulate per (player, weapon bucket, distance bin) and per
//! player. The victim side records loss exposure from their own sight of
//! the killer, or 0 ms when they never saw them.

use super::index::MatchIndex;
use super::numeric::{median, pct_below, ticks_to_ms, view_angle_delta};
use super::rollup::{player_row, PlayerTable};
use crate::output::schema::{percentage, DistanceBin, PlayerDuelSegment};
use crate::parser::schema::{RawKill, SteamId};
use crate::parser::weapons::WeaponBucket;
use crate::utils::config::UNITS_TO_METERS;
use log::debug;
use std::collections::BTreeMap;

/// Samples gathered for one won duel
#[derive(Debug, Clone, PartialEq)]
pub struct DuelSample {
    pub winner: SteamId,
    pub loser: SteamId,
    pub bucket: WeaponBucket,
    pub bin: DistanceBin,
    pub exposure_ms: f64,
    pub loss_exposure_ms: f64,
    pub sight_deg: f64,
    pub hits: u32,
    pub first_hit_head: Option<bool>,
    pub correction_deg: Option<f64>,
    /// Meters; negative when unavailable
    pub distance_m: f64,
}

/// Reconstruct the duel behind one kill, if the killer saw the victim first
pub fn reconstruct_duel(index: &MatchIndex<'_>, kill: &RawKill) -> Option<DuelSample> {
    let killer = kill.player_killer()?;
    let sight = index
        .first_sight(killer, kill.victim, kill.round)
        .filter(|s| s.tick <= kill.tick)?;

    let hits: Vec<_> = index
        .duel_damage(kill.round, killer, kill.victim)
        .iter()
        .filter(|d| d.tick >= sight.tick && d.tick <= kill.tick)
        .collect();
    let first_hit = hits.first();

    let first_fire = index.first_fire_between(killer, kill.round, sight.tick, kill.tick);
    let correction_deg = first_fire
        .map(|fire| view_angle_delta(sight.view_pitch, sight.view_yaw, fire.view_pitch, fire.view_yaw));

    let distance_m = match (
        first_fire.and_then(|f| f.position),
        first_hit.and_then(|h| h.victim_position),
    ) {
        (Some(shooter), Some(victim)) => shooter.distance(&victim) * UNITS_TO_METERS,
        _ => -1.0,
    };

    let loss_exposure_ms = index
        .first_sight(kill.victim, killer, kill.round)
        .filter(|s| s.tick <= kill.tick)
        .map(|s| ticks_to_ms(kill.tick - s.tick, index.tick_rate))
        .unwrap_or(0.0);

    Some(DuelSample {
        winner: killer,
        loser: kill.victim,
        bucket: WeaponBucket::classify(&kill.weapon),
        bin: DistanceBin::from_meters(distance_m),
        exposure_ms: ticks_to_ms(kill.tick - sight.tick, index.tick_rate),
        loss_exposure_ms,
        sight_deg: sight.angle_deviation.abs(),
        hits: hits.len() as u32,
        first_hit_head: first_hit.map(|h| h.hit_group.is_head()),
        correction_deg,
        distance_m,
    })
}

#[derive(Debug, Default)]
struct SegmentSamples {
    duels: u32,
    first_hits: u32,
    first_hit_hs: u32,
    corrections: Vec<f64>,
    sights: Vec<f64>,
    exposures: Vec<f64>,
}

impl SegmentSamples {
    fn add(&mut self, duel: &DuelSample) {
        self.duels += 1;
        if let Some(head) = duel.first_hit_head {
            self.first_hits += 1;
            self.first_hit_hs += head as u32;
        }
        self.corrections.extend(duel.correction_deg);
        self.sights.push(duel.sight_deg);
        self.exposures.push(duel.exposure_ms);
    }
}

#[derive(Debug, Default)]
struct PlayerDuelSamples {
    wins: u32,
    losses: u32,
    first_hits: u32,
    first_hit_hs: u32,
    hits_to_kill: Vec<f64>,
    corrections: Vec<f64>,
    win_exposures: Vec<f64>,
    loss_exposures: Vec<f64>,
}

/// Run the duel engine over every kill
///
/// **Public** - pipeline pass
///
/// Fills duel fields of `table` and returns segments sorted by
/// (steam id, bucket, bin).
pub fn analyze_duels(
    match_hash: &str,
    index: &MatchIndex<'_>,
    correction_small_deg: f64,
    table: &mut PlayerTable,
) -> Vec<PlayerDuelSegment> {
    let mut segments: BTreeMap<(SteamId, WeaponBucket, DistanceBin), SegmentSamples> = BTreeMap::new();
    let mut players: BTreeMap<SteamId, PlayerDuelSamples> = BTreeMap::new();

    let duels: Vec<DuelSample> = index
        .kills_by_round()
        .flat_map(|(_, kills)| kills.iter())
        .filter(|k| k.is_enemy_kill())
        .filter_map(|k| reconstruct_duel(index, k))
        .collect();

    for duel in &duels {
        segments
            .entry((duel.winner, duel.bucket, duel.bin))
            .or_default()
            .add(duel);

        let winner = players.entry(duel.winner).or_default();
        winner.wins += 1;
        winner.win_exposures.push(duel.exposure_ms);
        winner.corrections.extend(duel.correction_deg);
        if let Some(head) = duel.first_hit_head {
            winner.first_hits += 1;
            winner.first_hit_hs += head as u32;
            winner.hits_to_kill.push(duel.hits as f64);
        }

        let loser = players.entry(duel.loser).or_default();
        loser.losses += 1;
        loser.loss_exposures.push(duel.loss_exposure_ms);
    }

    for (player, samples) in players {
        let stats = player_row(table, match_hash, player);
        stats.duel_wins = samples.wins;
        stats.duel_losses = samples.losses;
        stats.first_hit_count = samples.first_hits;
        stats.first_hit_hs_count = samples.first_hit_hs;
        stats.first_hit_hs_rate = percentage(samples.first_hit_hs, samples.first_hits);
        stats.median_hits_to_kill = median(&samples.hits_to_kill);
        stats.correction_samples = samples.corrections.len() as u32;
        stats.median_correction_deg = median(&samples.corrections);
        stats.pct_correction_under_2 = pct_below(&samples.corrections, correction_small_deg);
        stats.median_win_exposure_ms = median(&samples.win_exposures);
        stats.median_loss_exposure_ms = median(&samples.loss_exposures);
    }

    debug!("Reconstructed {} duels into {} segments", duels.len(), segments.len());

    segments
        .into_iter()
        .map(|((steam_id, weapon_bucket, distance_bin), s)| PlayerDuelSegment {
            match_hash: match_hash.to_string(),
            steam_id,
            weapon_bucket,
            distance_bin,
            duel_count: s.duels,
            first_hit_count: s.first_hits,
            first_hit_hs_count: s.first_hit_hs,
            correction_samples: s.corrections.len() as u32,
            median_correction_deg: median(&s.corrections),
            median_sight_deg: median(&s.sights),
            median_exposure_ms: median(&s.exposures),
        })
        .collect()
}
