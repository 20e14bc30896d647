//! Role classification from match totals.

use super::rollup::PlayerTable;
use crate::output::schema::{ratio, PlayerMatchStats, Role};
use crate::utils::config::RoleThresholds;

/// First matching role in priority order AWPer, Entry, Support, Rifler
pub fn classify_role(stats: &PlayerMatchStats, thresholds: &RoleThresholds) -> Role {
    let rounds = stats.rounds_played;

    if ratio(stats.awp_kills, stats.kills) > thresholds.awp_kill_share {
        Role::AWPer
    } else if ratio(stats.opening_kills, rounds) > thresholds.entry_openings_per_round {
        Role::Entry
    } else if ratio(stats.flash_assists, rounds) > thresholds.support_flash_assists_per_round
        || ratio(stats.utility_damage, rounds) > thresholds.support_utility_damage_per_round
    {
        Role::Support
    } else {
        Role::Rifler
    }
}

/// Assign a role to every player
///
/// **Public** - pipeline pass, runs after AWP and rollup passes
pub fn assign_roles(table: &mut PlayerTable, thresholds: &RoleThresholds) {
    for stats in table.values_mut() {
        stats.role = classify_role(stats, thresholds);
    }
}
