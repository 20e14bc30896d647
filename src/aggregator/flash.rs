//! Flash quality.
//!
//! A flash is effective for its thrower when it blinds an enemy and that
//! enemy is killed by the thrower's side within the effect window. Each
//! flash record credits at most one effective flash.

use super::index::MatchIndex;
use super::rollup::{player_row, PlayerTable};
use crate::parser::schema::{RawFlash, Tick};

/// Whether a flash set up a kill on the blinded player
pub fn is_effective_flash(index: &MatchIndex<'_>, flash: &RawFlash, window_ticks: Tick) -> bool {
    if !flash.attacker_team.opposes(flash.victim_team) || flash.blind_duration <= 0.0 {
        return false;
    }

    index.round_kills(flash.round).iter().any(|k| {
        k.victim == flash.victim
            && k.player_killer().is_some()
            && k.killer_team == flash.attacker_team
            && k.tick >= flash.tick
            && k.tick - flash.tick <= window_ticks
    })
}

/// Tally blinds, enemy, team and effective flashes per thrower
///
/// **Public** - pipeline pass
pub fn analyze_flashes(match_hash: &str, index: &MatchIndex<'_>, window_ticks: Tick, table: &mut PlayerTable) {
    for flash in index.flashes() {
        if flash.attacker == flash.victim {
            continue;
        }

        let effective = is_effective_flash(index, flash, window_ticks);
        let stats = player_row(table, match_hash, flash.attacker);
        stats.flash_blinds += 1;

        if flash.blind_duration <= 0.0 {
            continue;
        }
        if flash.attacker_team.opposes(flash.victim_team) {
            stats.enemies_flashed += 1;
            stats.enemy_blind_secs += flash.blind_duration;
        } else if flash.attacker_team.is_playing() && flash.attacker_team == flash.victim_team {
            stats.team_flashes += 1;
        }
        stats.effective_flashes += effective as u32;
    }
}
