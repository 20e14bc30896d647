//! Time-to-kill, time-to-death and counter-strafe discipline.

use super::index::MatchIndex;
use super::numeric::{median, ticks_to_ms};
use super::rollup::{player_row, PlayerTable};
use crate::output::schema::percentage;
use crate::parser::schema::{RawKill, SteamId, Tick};
use std::collections::BTreeMap;

/// Engagement timing of one kill
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KillTiming {
    /// First shot in the window was the killing shot
    OneTap,
    /// Milliseconds from first shot to kill
    Delay(f64),
}

/// Killer's earliest fire in the window ending at the kill tick
pub fn kill_timing(index: &MatchIndex<'_>, kill: &RawKill, window_ticks: Tick) -> Option<KillTiming> {
    let killer = kill.player_killer()?;
    let fire = index.first_fire_between(killer, kill.round, kill.tick - window_ticks, kill.tick)?;

    if fire.tick == kill.tick {
        Some(KillTiming::OneTap)
    } else {
        Some(KillTiming::Delay(ticks_to_ms(kill.tick - fire.tick, index.tick_rate)))
    }
}

/// Fill TTK/TTD medians and one-tap counts
///
/// **Public** - pipeline pass
pub fn analyze_kill_timing(match_hash: &str, index: &MatchIndex<'_>, window_ticks: Tick, table: &mut PlayerTable) {
    let mut ttk: BTreeMap<SteamId, Vec<f64>> = BTreeMap::new();
    let mut ttd: BTreeMap<SteamId, Vec<f64>> = BTreeMap::new();

    for (_, kills) in index.kills_by_round() {
        for kill in kills.iter().filter(|k| k.is_enemy_kill()) {
            let Some(killer) = kill.player_killer() else {
                continue;
            };
            match kill_timing(index, kill, window_ticks) {
                Some(KillTiming::OneTap) => player_row(table, match_hash, killer).one_taps += 1,
                Some(KillTiming::Delay(ms)) => {
                    ttk.entry(killer).or_default().push(ms);
                    ttd.entry(kill.victim).or_default().push(ms);
                }
                None => {}
            }
        }
    }

    for (player, samples) in ttk {
        let stats = player_row(table, match_hash, player);
        stats.ttk_samples = samples.len() as u32;
        stats.median_ttk_ms = median(&samples);
    }
    for (player, samples) in ttd {
        let stats = player_row(table, match_hash, player);
        stats.ttd_samples = samples.len() as u32;
        stats.median_ttd_ms = median(&samples);
    }
}

/// Share of fires at or below the counter-strafe speed, per shooter
///
/// **Public** - pipeline pass
pub fn analyze_counter_strafe(match_hash: &str, index: &MatchIndex<'_>, max_speed: f64, table: &mut PlayerTable) {
    let mut shots: BTreeMap<SteamId, (u32, u32)> = BTreeMap::new();

    for (shooter, fires) in index.fire_lists() {
        let entry = shots.entry(shooter).or_default();
        entry.0 += fires.len() as u32;
        entry.1 += fires.iter().filter(|f| f.horizontal_speed <= max_speed).count() as u32;
    }

    for (shooter, (total, still)) in shots {
        let stats = player_row(table, match_hash, shooter);
        stats.shots_fired = total;
        stats.counter_strafe_pct = percentage(still, total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{RawMatch, RawWeaponFire, Team};

    fn kill(tick: Tick, killer: SteamId, victim: SteamId) -> RawKill {
        RawKill {
            tick,
            round: 1,
            killer: Some(killer),
            killer_team: Team::T,
            victim,
            victim_team: Team::CT,
            ..Default::default()
        }
    }

    fn fire(tick: Tick, shooter: SteamId, speed: f64) -> RawWeaponFire {
        RawWeaponFire {
            tick,
            round: 1,
            shooter,
            horizontal_speed: speed,
            ..Default::default()
        }
    }

    // 3s at 64 tick
    const WINDOW: Tick = 192;

    #[test]
    fn test_one_tap_and_delay() {
        let demo = RawMatch {
            tick_rate: 64.0,
            kills: vec![kill(1000, 1, 2), kill(3000, 1, 3), kill(5000, 1, 4)],
            weapon_fires: vec![
                fire(1000, 1, 0.0),
                fire(2968, 1, 0.0),
                fire(2990, 1, 0.0),
                fire(4000, 1, 0.0),
            ],
            ..Default::default()
        };
        let index = MatchIndex::build(&demo);

        assert_eq!(kill_timing(&index, &demo.kills[0], WINDOW), Some(KillTiming::OneTap));
        assert_eq!(kill_timing(&index, &demo.kills[1], WINDOW), Some(KillTiming::Delay(500.0)));
        // Fire at 4000 is outside the 3s window before 5000
        assert_eq!(kill_timing(&index, &demo.kills[2], WINDOW), None);

        let mut table = PlayerTable::new();
        analyze_kill_timing("m", &index, WINDOW, &mut table);

        assert_eq!(table[&1].one_taps, 1);
        assert_eq!(table[&1].ttk_samples, 1);
        assert_eq!(table[&1].median_ttk_ms, 500.0);
        assert_eq!(table[&3].median_ttd_ms, 500.0);
        assert!(!table.contains_key(&2));
    }

    #[test]
    fn test_counter_strafe_pct() {
        let demo = RawMatch {
            tick_rate: 64.0,
            weapon_fires: vec![
                fire(10, 1, 0.0),
                fire(20, 1, 34.0),
                fire(30, 1, 34.1),
                fire(40, 1, 250.0),
            ],
            ..Default::default()
        };
        let index = MatchIndex::build(&demo);
        let mut table = PlayerTable::new();
        analyze_counter_strafe("m", &index, 34.0, &mut table);

        assert_eq!(table[&1].shots_fired, 4);
        assert_eq!(table[&1].counter_strafe_pct, 50.0);
    }
}
