//! Trade annotation.
//!
//! A kill is a trade kill when it avenges a teammate killed by its victim
//! within the trade window. A kill is traded when its killer is, in turn,
//! killed within the window by a teammate of its victim: the victim then
//! `was_traded` and the killer suffered a trade death. Scans never leave
//! the round's kill list.

use super::index::MatchIndex;
use crate::parser::schema::{RawKill, Tick};
use std::collections::BTreeMap;

/// Trade facts for one kill
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TradeInfo {
    /// Ticks since the avenged death, when this kill is a trade kill
    pub trade_kill_delay: Option<Tick>,

    /// Ticks until this kill's killer died to a teammate of its victim
    pub traded_after: Option<Tick>,
}

impl TradeInfo {
    pub fn is_trade_kill(&self) -> bool {
        self.trade_kill_delay.is_some()
    }

    pub fn is_traded(&self) -> bool {
        self.traded_after.is_some()
    }
}

/// Per-round trade annotations, parallel to `MatchIndex::round_kills`
#[derive(Debug, Default)]
pub struct TradeAnnotations {
    by_round: BTreeMap<u32, Vec<TradeInfo>>,
}

impl TradeAnnotations {
    /// Annotation for the kill at `position` in the round's kill list
    pub fn get(&self, round: u32, position: usize) -> TradeInfo {
        self.by_round
            .get(&round)
            .and_then(|infos| infos.get(position))
            .copied()
            .unwrap_or_default()
    }
}

/// Annotate every kill of the match
///
/// **Public** - pipeline pass
pub fn annotate_trades(index: &MatchIndex<'_>, window_ticks: Tick) -> TradeAnnotations {
    let by_round = index
        .kills_by_round()
        .map(|(round, kills)| (round, annotate_round(kills, window_ticks)))
        .collect();

    TradeAnnotations { by_round }
}

/// Annotate one round's kills (ascending by tick)
pub fn annotate_round(kills: &[&RawKill], window_ticks: Tick) -> Vec<TradeInfo> {
    kills
        .iter()
        .enumerate()
        .map(|(i, kill)| TradeInfo {
            trade_kill_delay: find_avenged(kills, i, window_ticks),
            traded_after: find_avenger(kills, i, window_ticks),
        })
        .collect()
}

/// Backward scan: nearest earlier kill by this kill's victim on a teammate of its killer
fn find_avenged(kills: &[&RawKill], i: usize, window: Tick) -> Option<Tick> {
    let kill = kills[i];
    // World kills and suicides avenge nobody
    kill.player_killer()?;

    kills[..i]
        .iter()
        .rev()
        .take_while(|prev| kill.tick - prev.tick <= window)
        .find(|prev| {
            prev.player_killer() == Some(kill.victim) && prev.victim_team == kill.killer_team
        })
        .map(|prev| kill.tick - prev.tick)
}

/// Forward scan: first later kill of this kill's killer by a teammate of its victim
fn find_avenger(kills: &[&RawKill], i: usize, window: Tick) -> Option<Tick> {
    let kill = kills[i];
    let killer = kill.player_killer()?;

    kills[i + 1..]
        .iter()
        .take_while(|next| next.tick - kill.tick <= window)
        .find(|next| {
            next.victim == killer
                && next.player_killer().is_some()
                && next.killer_team == kill.victim_team
        })
        .map(|next| next.tick - kill.tick)
}
