//! Cross-match summary for one player.
//!
//! Counts from stored match rows sum exactly. Medians cannot be re-derived
//! without the samples, so each career median is the mean of the
//! per-match medians over the matches that had samples for it.

use super::role::classify_role;
use crate::output::schema::{percentage, PlayerDuelSegment, PlayerMatchStats};
use crate::parser::schema::SteamId;
use crate::utils::config::RoleThresholds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One stored match as seen from a single player
#[derive(Debug, Clone, PartialEq)]
pub struct CareerEntry {
    pub played_at: Option<DateTime<Utc>>,
    pub stats: PlayerMatchStats,
    pub segments: Vec<PlayerDuelSegment>,
}

/// A player's totals across matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCareer {
    pub steam_id: SteamId,
    pub matches: u32,
    pub first_played: Option<DateTime<Utc>>,
    pub last_played: Option<DateTime<Utc>>,

    /// Summed row; `match_hash` is empty
    pub totals: PlayerMatchStats,

    /// Segments merged by (bucket, bin)
    pub segments: Vec<PlayerDuelSegment>,
}

/// Running mean of per-match values that had samples
#[derive(Default)]
struct MatchMean {
    sum: f64,
    count: u32,
}

impl MatchMean {
    fn add(&mut self, value: f64, samples: u32) {
        if samples > 0 {
            self.sum += value;
            self.count += 1;
        }
    }

    fn value(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

#[derive(Default)]
struct CareerMeans {
    trade_kill_delay: MatchMean,
    trade_death_delay: MatchMean,
    hits_to_kill: MatchMean,
    correction: MatchMean,
    correction_under_2: MatchMean,
    win_exposure: MatchMean,
    loss_exposure: MatchMean,
    crosshair: MatchMean,
    crosshair_pitch: MatchMean,
    crosshair_yaw: MatchMean,
    crosshair_under_5: MatchMean,
    ttk: MatchMean,
    ttd: MatchMean,
}

/// Fold one player's stored rows into a career
///
/// **Public** - read side of the store, used by the `player` command
///
/// # Arguments
/// * `steam_id` - Player to summarize
/// * `entries` - That player's rows, one per match
/// * `roles` - Thresholds used to reclassify the role from summed counts
pub fn build_career(steam_id: SteamId, entries: &[CareerEntry], roles: &RoleThresholds) -> PlayerCareer {
    let mut totals = PlayerMatchStats {
        steam_id,
        ..Default::default()
    };
    let mut means = CareerMeans::default();
    let mut segments: BTreeMap<_, PlayerDuelSegment> = BTreeMap::new();
    let mut still_shots = 0.0;

    for entry in entries {
        let s = &entry.stats;
        if !s.name.is_empty() {
            totals.name = s.name.clone();
            totals.team = s.team;
        }

        totals.rounds_played += s.rounds_played;
        totals.kills += s.kills;
        totals.assists += s.assists;
        totals.deaths += s.deaths;
        totals.damage += s.damage;
        totals.utility_damage += s.utility_damage;
        totals.headshot_kills += s.headshot_kills;
        totals.flash_assists += s.flash_assists;
        totals.kast_rounds += s.kast_rounds;

        totals.opening_kills += s.opening_kills;
        totals.opening_deaths += s.opening_deaths;
        totals.trade_kills += s.trade_kills;
        totals.trade_deaths += s.trade_deaths;
        totals.traded_deaths += s.traded_deaths;
        totals.clutch_rounds += s.clutch_rounds;
        totals.clutch_wins += s.clutch_wins;
        totals.rounds_won += s.rounds_won;
        for (total, n) in totals.multi_kills.iter_mut().zip(s.multi_kills) {
            *total += n;
        }

        totals.duel_wins += s.duel_wins;
        totals.duel_losses += s.duel_losses;
        totals.first_hit_count += s.first_hit_count;
        totals.first_hit_hs_count += s.first_hit_hs_count;
        totals.correction_samples += s.correction_samples;
        totals.crosshair_samples += s.crosshair_samples;

        totals.awp_kills += s.awp_kills;
        totals.awp_deaths += s.awp_deaths;
        totals.awp_deaths_dry += s.awp_deaths_dry;
        totals.awp_deaths_repeek += s.awp_deaths_repeek;
        totals.awp_deaths_isolated += s.awp_deaths_isolated;

        totals.flash_blinds += s.flash_blinds;
        totals.enemies_flashed += s.enemies_flashed;
        totals.team_flashes += s.team_flashes;
        totals.effective_flashes += s.effective_flashes;
        totals.enemy_blind_secs += s.enemy_blind_secs;

        totals.ttk_samples += s.ttk_samples;
        totals.ttd_samples += s.ttd_samples;
        totals.one_taps += s.one_taps;
        totals.shots_fired += s.shots_fired;
        still_shots += s.counter_strafe_pct / 100.0 * s.shots_fired as f64;

        means.trade_kill_delay.add(s.median_trade_kill_delay_ms, s.trade_kills);
        means.trade_death_delay.add(s.median_trade_death_delay_ms, s.trade_deaths);
        means.hits_to_kill.add(s.median_hits_to_kill, s.first_hit_count);
        means.win_exposure.add(s.median_win_exposure_ms, s.duel_wins);
        means.loss_exposure.add(s.median_loss_exposure_ms, s.duel_losses);
        means.correction.add(s.median_correction_deg, s.correction_samples);
        means.correction_under_2.add(s.pct_correction_under_2, s.correction_samples);
        means.crosshair.add(s.crosshair_median_deg, s.crosshair_samples);
        means.crosshair_pitch.add(s.crosshair_median_pitch_deg, s.crosshair_samples);
        means.crosshair_yaw.add(s.crosshair_median_yaw_deg, s.crosshair_samples);
        means.crosshair_under_5.add(s.crosshair_pct_under_5, s.crosshair_samples);
        means.ttk.add(s.median_ttk_ms, s.ttk_samples);
        means.ttd.add(s.median_ttd_ms, s.ttd_samples);

        for segment in &entry.segments {
            segments
                .entry((segment.weapon_bucket, segment.distance_bin))
                .and_modify(|merged: &mut PlayerDuelSegment| merged.merge(segment))
                .or_insert_with(|| PlayerDuelSegment {
                    match_hash: String::new(),
                    ..segment.clone()
                });
        }
    }

    totals.median_trade_kill_delay_ms = means.trade_kill_delay.value();
    totals.median_trade_death_delay_ms = means.trade_death_delay.value();
    totals.median_hits_to_kill = means.hits_to_kill.value();
    totals.median_win_exposure_ms = means.win_exposure.value();
    totals.median_loss_exposure_ms = means.loss_exposure.value();
    totals.median_correction_deg = means.correction.value();
    totals.pct_correction_under_2 = means.correction_under_2.value();
    totals.crosshair_median_deg = means.crosshair.value();
    totals.crosshair_median_pitch_deg = means.crosshair_pitch.value();
    totals.crosshair_median_yaw_deg = means.crosshair_yaw.value();
    totals.crosshair_pct_under_5 = means.crosshair_under_5.value();
    totals.median_ttk_ms = means.ttk.value();
    totals.median_ttd_ms = means.ttd.value();

    totals.first_hit_hs_rate = percentage(totals.first_hit_hs_count, totals.first_hit_count);
    totals.counter_strafe_pct = if totals.shots_fired == 0 {
        0.0
    } else {
        still_shots / totals.shots_fired as f64 * 100.0
    };
    totals.role = classify_role(&totals, roles);

    let dates = entries.iter().filter_map(|e| e.played_at);

    PlayerCareer {
        steam_id,
        matches: entries.len() as u32,
        first_played: dates.clone().min(),
        last_played: dates.max(),
        totals,
        segments: segments.into_values().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::schema::{DistanceBin, Role};
    use crate::parser::weapons::WeaponBucket;
    use chrono::TimeZone;

    fn entry(hash: &str, kills: u32, deaths: u32, ttk: Option<f64>) -> CareerEntry {
        let mut stats = PlayerMatchStats::new(hash, 7);
        stats.name = "seven".to_string();
        stats.rounds_played = 10;
        stats.kills = kills;
        stats.deaths = deaths;
        stats.headshot_kills = kills / 2;
        if let Some(ms) = ttk {
            stats.ttk_samples = 3;
            stats.median_ttk_ms = ms;
        }
        CareerEntry {
            played_at: None,
            stats,
            segments: Vec::new(),
        }
    }

    fn segment(hash: &str, duels: u32, hits: u32, hs: u32) -> PlayerDuelSegment {
        PlayerDuelSegment {
            match_hash: hash.to_string(),
            steam_id: 7,
            weapon_bucket: WeaponBucket::AK,
            distance_bin: DistanceBin::TenToFifteen,
            duel_count: duels,
            first_hit_count: hits,
            first_hit_hs_count: hs,
            correction_samples: duels,
            median_correction_deg: 1.0,
            median_sight_deg: 4.0,
            median_exposure_ms: 300.0,
        }
    }

    #[test]
    fn test_counts_sum_and_rates_recompute() {
        let entries = vec![entry("a", 10, 5, None), entry("b", 20, 5, None)];
        let career = build_career(7, &entries, &RoleThresholds::default());

        assert_eq!(career.matches, 2);
        assert_eq!(career.totals.name, "seven");
        assert_eq!(career.totals.kills, 30);
        assert_eq!(career.totals.rounds_played, 20);
        assert_eq!(career.totals.kd(), 3.0);
        assert_eq!(career.totals.hs_pct(), 50.0);
    }

    #[test]
    fn test_medians_skip_matches_without_samples() {
        let entries = vec![
            entry("a", 1, 1, Some(400.0)),
            entry("b", 1, 1, None),
            entry("c", 1, 1, Some(600.0)),
        ];
        let career = build_career(7, &entries, &RoleThresholds::default());

        assert_eq!(career.totals.median_ttk_ms, 500.0);
        assert_eq!(career.totals.ttk_samples, 6);
    }

    #[test]
    fn test_hits_to_kill_skips_matches_without_hits() {
        let mut a = entry("a", 4, 0, None);
        a.stats.duel_wins = 4;
        a.stats.first_hit_count = 4;
        a.stats.median_hits_to_kill = 2.0;
        let mut b = entry("b", 1, 0, None);
        b.stats.duel_wins = 1;

        let career = build_career(7, &[a, b], &RoleThresholds::default());

        assert_eq!(career.totals.median_hits_to_kill, 2.0);
        assert_eq!(career.totals.duel_wins, 5);
    }

    #[test]
    fn test_segments_merge_by_key() {
        let mut a = entry("a", 1, 0, None);
        a.segments.push(segment("a", 3, 2, 1));
        let mut b = entry("b", 1, 0, None);
        b.segments.push(segment("b", 1, 1, 1));

        let career = build_career(7, &[a, b], &RoleThresholds::default());

        assert_eq!(career.segments.len(), 1);
        let merged = &career.segments[0];
        assert_eq!(merged.duel_count, 4);
        assert_eq!(merged.first_hit_count, 3);
        assert_eq!(merged.first_hit_hs_count, 2);
        assert!(merged.match_hash.is_empty());
    }

    #[test]
    fn test_role_reclassified_from_totals() {
        let mut a = entry("a", 10, 0, None);
        a.stats.awp_kills = 8;
        a.stats.role = Role::AWPer;
        let b = entry("b", 30, 0, None);

        let career = build_career(7, &[a, b], &RoleThresholds::default());

        // 8 of 40 kills is below the AWP share
        assert_eq!(career.totals.role, Role::Rifler);
    }

    #[test]
    fn test_date_range() {
        let mut a = entry("a", 1, 0, None);
        a.played_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        let mut b = entry("b", 1, 0, None);
        b.played_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        let career = build_career(7, &[a, b, entry("c", 1, 0, None)], &RoleThresholds::default());

        assert_eq!(career.first_played, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(career.last_played, Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_empty_career() {
        let career = build_career(7, &[], &RoleThresholds::default());
        assert_eq!(career.matches, 0);
        assert_eq!(career.totals.kills, 0);
        assert!(career.first_played.is_none());
    }
}
