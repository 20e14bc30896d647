//! Opening kill detection: the first kill after freeze time ends.

use super::index::MatchIndex;
use crate::parser::schema::{RawKill, SteamId, Tick};
use std::collections::BTreeMap;

/// Opening duel of one round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opening {
    /// None when the opening death was a world kill
    pub killer: Option<SteamId>,
    pub victim: SteamId,
    pub tick: Tick,
}

/// First kill with `tick >= freeze_end_tick`, if any
pub fn find_opening(kills: &[&RawKill], freeze_end_tick: Tick) -> Option<Opening> {
    kills
        .iter()
        .find(|k| k.tick >= freeze_end_tick)
        .map(|k| Opening {
            killer: k.player_killer(),
            victim: k.victim,
            tick: k.tick,
        })
}

/// Openings for every round that has one
///
/// **Public** - pipeline pass
pub fn detect_openings(index: &MatchIndex<'_>) -> BTreeMap<u32, Opening> {
    index
        .rounds()
        .filter_map(|round| {
            find_opening(index.round_kills(round.number), round.freeze_end_tick)
                .map(|opening| (round.number, opening))
        })
        .collect()
}
