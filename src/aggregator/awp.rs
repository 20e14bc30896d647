//! AWP death taxonomy.
//!
//! Every death to the AWP is counted and tagged with any of:
//! - dry: no enemy flash blinded the victim in the preceding window
//! - re-peek: the victim already had a kill earlier in the round
//! - isolated: no living teammate was near the victim

use super::index::MatchIndex;
use super::rollup::{player_row, PlayerTable};
use crate::parser::schema::{RawKill, Tick};
use crate::parser::weapons::is_awp;

/// Classification of one AWP death
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AwpDeath {
    pub dry: bool,
    pub repeek: bool,
    pub isolated: bool,
}

/// Classify a kill made with the AWP; None for other weapons
pub fn classify_awp_death(
    index: &MatchIndex<'_>,
    kill: &RawKill,
    flash_window_ticks: Tick,
) -> Option<AwpDeath> {
    if !is_awp(&kill.weapon) || kill.player_killer().is_none() {
        return None;
    }

    let window_start = kill.tick - flash_window_ticks;
    let flashed = index.round_flashes(kill.round).iter().any(|f| {
        f.victim == kill.victim
            && f.blind_duration > 0.0
            && f.attacker_team.opposes(f.victim_team)
            && f.tick >= window_start
            && f.tick <= kill.tick
    });

    let repeek = index
        .round_kills(kill.round)
        .iter()
        .any(|k| k.tick < kill.tick && k.player_killer() == Some(kill.victim) && k.is_enemy_kill());

    Some(AwpDeath {
        dry: !flashed,
        repeek,
        isolated: kill.nearby_victim_teammates == 0,
    })
}

/// Tally AWP kills and classified AWP deaths per player
///
/// **Public** - pipeline pass
pub fn analyze_awp_deaths(
    match_hash: &str,
    index: &MatchIndex<'_>,
    flash_window_ticks: Tick,
    table: &mut PlayerTable,
) {
    for (_, kills) in index.kills_by_round() {
        for kill in kills {
            let Some(death) = classify_awp_death(index, kill, flash_window_ticks) else {
                continue;
            };

            if let Some(killer) = kill.player_killer().filter(|_| kill.is_enemy_kill()) {
                player_row(table, match_hash, killer).awp_kills += 1;
            }

            let victim = player_row(table, match_hash, kill.victim);
            victim.awp_deaths += 1;
            victim.awp_deaths_dry += death.dry as u32;
            victim.awp_deaths_repeek += death.repeek as u32;
            victim.awp_deaths_isolated += death.isolated as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{RawFlash, RawMatch, SteamId, Team};

    fn kill(tick: Tick, killer: SteamId, killer_team: Team, victim: SteamId, weapon: &str, nearby: u32) -> RawKill {
        RawKill {
            tick,
            round: 1,
            killer: Some(killer),
            killer_team,
            victim,
            victim_team: if killer_team == Team::T { Team::CT } else { Team::T },
            weapon: weapon.to_string(),
            nearby_victim_teammates: nearby,
            ..Default::default()
        }
    }

    fn flash(tick: Tick, victim: SteamId, duration: f64) -> RawFlash {
        RawFlash {
            tick,
            round: 1,
            attacker: 9,
            victim,
            attacker_team: Team::CT,
            victim_team: Team::T,
            blind_duration: duration,
        }
    }

    // 3s at 64 tick
    const WINDOW: Tick = 192;

    #[test]
    fn test_dry_repeek_isolated() {
        let demo = RawMatch {
            tick_rate: 64.0,
            kills: vec![
                kill(500, 2, Team::T, 5, "ak47", 1),
                kill(1000, 1, Team::CT, 2, "awp", 0),
            ],
            ..Default::default()
        };
        let index = MatchIndex::build(&demo);
        let death = classify_awp_death(&index, &demo.kills[1], WINDOW).unwrap();

        assert_eq!(death, AwpDeath { dry: true, repeek: true, isolated: true });
        assert!(classify_awp_death(&index, &demo.kills[0], WINDOW).is_none());
    }

    #[test]
    fn test_supported_by_recent_flash() {
        let demo = RawMatch {
            tick_rate: 64.0,
            kills: vec![kill(1000, 1, Team::CT, 2, "weapon_awp", 2)],
            flashes: vec![flash(900, 2, 1.8)],
            ..Default::default()
        };
        let index = MatchIndex::build(&demo);
        let death = classify_awp_death(&index, &demo.kills[0], WINDOW).unwrap();

        assert_eq!(death, AwpDeath::default());
    }

    #[test]
    fn test_old_or_zero_flash_is_dry() {
        let demo = RawMatch {
            tick_rate: 64.0,
            kills: vec![kill(1000, 1, Team::CT, 2, "awp", 2)],
            flashes: vec![flash(700, 2, 2.0), flash(950, 2, 0.0)],
            ..Default::default()
        };
        let index = MatchIndex::build(&demo);
        assert!(classify_awp_death(&index, &demo.kills[0], WINDOW).unwrap().dry);
    }

    #[test]
    fn test_analyze_awp_deaths_tallies() {
        let demo = RawMatch {
            tick_rate: 64.0,
            kills: vec![
                kill(1000, 1, Team::CT, 2, "awp", 0),
                kill(2000, 1, Team::CT, 3, "awp", 1),
                kill(3000, 4, Team::T, 1, "ak47", 0),
            ],
            ..Default::default()
        };
        let index = MatchIndex::build(&demo);
        let mut table = PlayerTable::new();
        analyze_awp_deaths("m", &index, WINDOW, &mut table);

        assert_eq!(table[&1].awp_kills, 2);
        assert_eq!(table[&1].awp_deaths, 0);
        assert_eq!(table[&2].awp_deaths_isolated, 1);
        assert_eq!(table[&3].awp_deaths_isolated, 0);
        assert_eq!(table[&3].awp_deaths_dry, 1);
    }
}
