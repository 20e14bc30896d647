//! Match rollup: per-player totals from round rows and the kill list.
//!
//! Later enrichment passes (duels, AWP, flashes, timing, roles) fill in
//! the remaining fields of the rows created here.

use super::index::MatchIndex;
use super::numeric::{median, pct_below, ticks_to_ms};
use super::teams::TeamTable;
use super::trades::TradeAnnotations;
use crate::output::schema::{PlayerMatchStats, PlayerRoundStats};
use crate::parser::schema::{RawMatch, SteamId};
use log::debug;
use std::collections::BTreeMap;

/// Per-player rows keyed by steam id
pub type PlayerTable = BTreeMap<SteamId, PlayerMatchStats>;

/// Row for `steam_id`, created on first touch
pub fn player_row<'t>(table: &'t mut PlayerTable, match_hash: &str, steam_id: SteamId) -> &'t mut PlayerMatchStats {
    table
        .entry(steam_id)
        .or_insert_with(|| PlayerMatchStats::new(match_hash, steam_id))
}

/// Sum round facts and kill-list tallies per player
///
/// **Public** - pipeline pass
pub fn rollup_match(
    demo: &RawMatch,
    index: &MatchIndex<'_>,
    teams: &TeamTable,
    trades: &TradeAnnotations,
    round_rows: &[PlayerRoundStats],
    crosshair_good_deg: f64,
) -> PlayerTable {
    let hash = demo.hash.as_str();
    let mut table = PlayerTable::new();

    for player in teams.players() {
        player_row(&mut table, hash, player).team = teams.team_of(player);
    }
    for player in &demo.players {
        player_row(&mut table, hash, player.steam_id).name = player.name.clone();
    }

    for row in round_rows {
        let stats = player_row(&mut table, hash, row.steam_id);
        stats.rounds_played += 1;
        stats.kast_rounds += row.kast as u32;
        stats.opening_kills += row.opening_kill as u32;
        stats.opening_deaths += row.opening_death as u32;
        stats.trade_kills += row.trade_kill as u32;
        stats.trade_deaths += row.trade_death as u32;
        stats.traded_deaths += row.was_traded as u32;
        stats.rounds_won += row.won_round as u32;
        stats.utility_damage += index.round_utility_damage(row.round, row.steam_id);

        if row.in_clutch {
            stats.clutch_rounds += 1;
            stats.clutch_wins += row.won_round as u32;
        }

        match row.kills {
            0 | 1 => {}
            k => stats.multi_kills[(k.min(5) - 2) as usize] += 1,
        }
    }

    // Damage comes from the index so matches without round rows still count it
    for (_, attacker, damage) in index.damage_totals() {
        player_row(&mut table, hash, attacker).damage += damage;
    }

    rollup_kills(hash, index, trades, &mut table);
    rollup_crosshair(hash, index, crosshair_good_deg, &mut table);

    debug!("Rolled up {} players", table.len());
    table
}

fn rollup_kills(hash: &str, index: &MatchIndex<'_>, trades: &TradeAnnotations, table: &mut PlayerTable) {
    let mut trade_kill_delays: BTreeMap<SteamId, Vec<f64>> = BTreeMap::new();
    let mut trade_death_delays: BTreeMap<SteamId, Vec<f64>> = BTreeMap::new();

    for (round, kills) in index.kills_by_round() {
        for (position, kill) in kills.iter().enumerate() {
            player_row(table, hash, kill.victim).deaths += 1;

            if let Some(killer) = kill.player_killer() {
                if kill.is_enemy_kill() {
                    let stats = player_row(table, hash, killer);
                    stats.kills += 1;
                    stats.headshot_kills += kill.headshot as u32;
                }

                let info = trades.get(round, position);
                if let Some(delay) = info.trade_kill_delay.filter(|_| kill.is_enemy_kill()) {
                    trade_kill_delays
                        .entry(killer)
                        .or_default()
                        .push(ticks_to_ms(delay, index.tick_rate));
                }
                if let Some(after) = info.traded_after {
                    trade_death_delays
                        .entry(killer)
                        .or_default()
                        .push(ticks_to_ms(after, index.tick_rate));
                }
            }

            if let Some(assister) = kill.assister {
                if Some(assister) != kill.killer && assister != kill.victim {
                    let stats = player_row(table, hash, assister);
                    stats.assists += 1;
                    stats.flash_assists += kill.assisted_flash as u32;
                }
            }
        }
    }

    for (player, delays) in trade_kill_delays {
        player_row(table, hash, player).median_trade_kill_delay_ms = median(&delays);
    }
    for (player, delays) in trade_death_delays {
        player_row(table, hash, player).median_trade_death_delay_ms = median(&delays);
    }
}

/// Crosshair placement from each observer's first-sight samples
fn rollup_crosshair(hash: &str, index: &MatchIndex<'_>, good_deg: f64, table: &mut PlayerTable) {
    for (observer, sights) in index.sights_by_observer() {
        let total: Vec<f64> = sights.iter().map(|s| s.angle_deviation.abs()).collect();
        let pitch: Vec<f64> = sights.iter().map(|s| s.pitch_deviation.abs()).collect();
        let yaw: Vec<f64> = sights.iter().map(|s| s.yaw_deviation.abs()).collect();

        let stats = player_row(table, hash, observer);
        stats.crosshair_samples = total.len() as u32;
        stats.crosshair_median_deg = median(&total);
        stats.crosshair_median_pitch_deg = median(&pitch);
        stats.crosshair_median_yaw_deg = median(&yaw);
        stats.crosshair_pct_under_5 = pct_below(&total, good_deg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::opening::detect_openings;
    use crate::aggregator::rounds::classify_rounds;
    use crate::aggregator::trades::annotate_trades;
    use crate::parser::schema::{RawDamage, RawFirstSight, RawKill, RawRound, RawRoundPlayer, Team, Tick};
    use crate::utils::config::BuyThresholds;

    fn kill(tick: Tick, round: u32, killer: SteamId, victim: SteamId) -> RawKill {
        let (killer_team, victim_team) = if killer < 10 { (Team::T, Team::CT) } else { (Team::CT, Team::T) };
        RawKill {
            tick,
            round,
            killer: Some(killer),
            killer_team,
            victim,
            victim_team,
            weapon: "ak47".to_string(),
            ..Default::default()
        }
    }

    fn round(number: u32, start: Tick) -> RawRound {
        RawRound {
            number,
            start_tick: start,
            freeze_end_tick: start + 100,
            end_tick: start + 5000,
            winner: Team::T,
            bomb_plant_tick: 0,
            players: vec![
                RawRoundPlayer { steam_id: 1, team: Team::T, alive: true, ..Default::default() },
                RawRoundPlayer { steam_id: 11, team: Team::CT, alive: false, ..Default::default() },
                RawRoundPlayer { steam_id: 12, team: Team::CT, alive: false, ..Default::default() },
            ],
        }
    }

    fn rollup(demo: &RawMatch) -> PlayerTable {
        let index = MatchIndex::build(demo);
        let teams = TeamTable::build(demo);
        let trades = annotate_trades(&index, 320);
        let openings = detect_openings(&index);
        let rows = classify_rounds(&demo.hash, &index, &teams, &trades, &openings, &BuyThresholds::default());
        rollup_match(demo, &index, &teams, &trades, &rows, 5.0)
    }

    #[test]
    fn test_counts_and_multi_kills() {
        let mut headshot = kill(1200, 1, 1, 12);
        headshot.headshot = true;
        headshot.assister = Some(2);
        headshot.assisted_flash = true;

        let demo = RawMatch {
            hash: "m".to_string(),
            tick_rate: 64.0,
            rounds: vec![round(1, 0), round(2, 6000)],
            kills: vec![kill(1000, 1, 1, 11), headshot, kill(7000, 2, 11, 1)],
            ..Default::default()
        };
        let table = rollup(&demo);

        let p1 = &table[&1];
        assert_eq!(p1.rounds_played, 2);
        assert_eq!(p1.kills, 2);
        assert_eq!(p1.headshot_kills, 1);
        assert_eq!(p1.deaths, 1);
        assert_eq!(p1.multi_kills, [1, 0, 0, 0]);
        assert_eq!(p1.opening_kills, 1);
        assert_eq!(p1.opening_deaths, 1);

        let p2 = &table[&2];
        assert_eq!(p2.assists, 1);
        assert_eq!(p2.flash_assists, 1);
        assert_eq!(table[&11].kills, 1);
    }

    #[test]
    fn test_adr_single_hit() {
        let demo = RawMatch {
            hash: "m".to_string(),
            tick_rate: 64.0,
            rounds: vec![round(1, 0)],
            kills: vec![kill(1000, 1, 1, 11)],
            damages: vec![RawDamage {
                tick: 1000,
                round: 1,
                attacker: Some(1),
                victim: 11,
                attacker_team: Team::T,
                victim_team: Team::CT,
                health_damage: 75,
                weapon: "ak47".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let table = rollup(&demo);

        assert_eq!(table[&1].damage, 75);
        assert_eq!(table[&1].adr(), 75.0);
    }

    #[test]
    fn test_crosshair_samples() {
        let sight = |enemy, angle: f64| RawFirstSight {
            tick: 500,
            round: 1,
            observer: 1,
            enemy,
            angle_deviation: angle,
            pitch_deviation: angle / 2.0,
            yaw_deviation: -angle,
            ..Default::default()
        };
        let demo = RawMatch {
            hash: "m".to_string(),
            tick_rate: 64.0,
            rounds: vec![round(1, 0)],
            first_sights: vec![sight(11, 2.0), sight(12, 8.0), sight(13, 4.0)],
            ..Default::default()
        };
        let table = rollup(&demo);
        let p1 = &table[&1];

        assert_eq!(p1.crosshair_samples, 3);
        assert_eq!(p1.crosshair_median_deg, 4.0);
        assert_eq!(p1.crosshair_median_pitch_deg, 2.0);
        assert_eq!(p1.crosshair_median_yaw_deg, 4.0);
        assert!((p1.crosshair_pct_under_5 - 66.666).abs() < 0.01);
    }
}
