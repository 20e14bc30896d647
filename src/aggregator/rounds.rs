//! Per-(player, round) classification.
//!
//! Combines the trade, opening and clutch passes with the round roster
//! into one [`PlayerRoundStats`] row per participant.

use super::clutch::track_clutches;
use super::index::MatchIndex;
use super::opening::Opening;
use super::teams::TeamTable;
use super::trades::TradeAnnotations;
use crate::output::schema::{BuyType, PlayerRoundStats};
use crate::parser::schema::{RawRound, SteamId, Team};
use crate::utils::config::BuyThresholds;
use log::debug;
use std::collections::BTreeMap;

/// Classify a freeze-end equipment value; missing values are eco
pub fn classify_buy(equipment_value: Option<u32>, thresholds: &BuyThresholds) -> BuyType {
    match equipment_value {
        Some(v) if v >= thresholds.full => BuyType::Full,
        Some(v) if v >= thresholds.force => BuyType::Force,
        Some(v) if v >= thresholds.half => BuyType::Half,
        _ => BuyType::Eco,
    }
}

/// Build round rows for every round of the match
///
/// **Public** - pipeline pass
///
/// Rows are sorted by (steam id, round).
pub fn classify_rounds(
    match_hash: &str,
    index: &MatchIndex<'_>,
    teams: &TeamTable,
    trades: &TradeAnnotations,
    openings: &BTreeMap<u32, Opening>,
    buys: &BuyThresholds,
) -> Vec<PlayerRoundStats> {
    let mut rows: Vec<PlayerRoundStats> = index
        .rounds()
        .flat_map(|round| {
            classify_round(match_hash, round, index, teams, trades, openings.get(&round.number), buys)
        })
        .collect();

    rows.sort_by_key(|r| (r.steam_id, r.round));
    debug!("Classified {} player-rounds", rows.len());
    rows
}

fn classify_round(
    match_hash: &str,
    round: &RawRound,
    index: &MatchIndex<'_>,
    teams: &TeamTable,
    trades: &TradeAnnotations,
    opening: Option<&Opening>,
    buys: &BuyThresholds,
) -> Vec<PlayerRoundStats> {
    let kills = index.round_kills(round.number);
    let mut rows: BTreeMap<SteamId, PlayerRoundStats> = BTreeMap::new();
    let mut rostered_alive: BTreeMap<SteamId, bool> = BTreeMap::new();

    let new_row = |steam_id: SteamId, team: Team| PlayerRoundStats {
        match_hash: match_hash.to_string(),
        steam_id,
        round: round.number,
        team: if team.is_playing() { team } else { teams.team_of(steam_id) },
        ..Default::default()
    };

    for player in &round.players {
        let mut row = new_row(player.steam_id, player.team);
        row.equipment_value = player.equipment_value;
        rows.insert(player.steam_id, row);
        rostered_alive.insert(player.steam_id, player.alive);
    }

    // Kill participants missing from the roster still played the round
    for kill in kills {
        for id in kill.player_killer().into_iter().chain(Some(kill.victim)) {
            rows.entry(id).or_insert_with(|| new_row(id, teams.team_of(id)));
        }
    }

    for (position, kill) in kills.iter().enumerate() {
        let info = trades.get(round.number, position);

        if let Some(victim) = rows.get_mut(&kill.victim) {
            victim.died = true;
            victim.was_traded |= info.is_traded();
        }

        if let Some(killer) = kill.player_killer() {
            if let Some(row) = rows.get_mut(&killer) {
                if kill.is_enemy_kill() {
                    row.kills += 1;
                    row.trade_kill |= info.is_trade_kill();
                }
                row.trade_death |= info.is_traded();
            }
        }

        if let Some(assister) = kill.assister {
            if Some(assister) != kill.killer && assister != kill.victim {
                if let Some(row) = rows.get_mut(&assister) {
                    row.assists += 1;
                }
            }
        }
    }

    if let Some(opening) = opening {
        if let Some(killer) = opening.killer.and_then(|k| rows.get_mut(&k)) {
            killer.opening_kill = true;
        }
        if let Some(victim) = rows.get_mut(&opening.victim) {
            victim.opening_death = true;
        }
    }

    let clutches = track_clutches(rows.values().map(|r| (r.steam_id, r.team)), kills);

    for row in rows.values_mut() {
        row.damage = index.round_damage(round.number, row.steam_id);
        row.survived = rostered_alive.get(&row.steam_id).copied().unwrap_or(true) && !row.died;
        row.kast = row.kills > 0 || row.assists > 0 || row.survived || row.was_traded;
        row.post_plant = round.bomb_plant_tick > 0;
        row.won_round = round.winner.is_playing() && round.winner == row.team;
        row.buy_type = classify_buy(row.equipment_value, buys);

        if let Some(&enemies) = clutches.get(&row.steam_id) {
            row.in_clutch = true;
            row.clutch_enemies = enemies;
        }
    }

    rows.into_values().collect()
}
