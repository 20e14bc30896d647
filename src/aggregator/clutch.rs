//! Clutch detection.
//!
//! Replays a round's deaths against the team rosters. A player enters a
//! clutch the first time they are the last living member of their team
//! while at least one enemy is alive. The recorded enemy count is the
//! highest seen while in the clutch, so later enemy deaths never lower it.

use crate::parser::schema::{RawKill, SteamId, Team};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy)]
struct Slot {
    team: Team,
    alive: bool,
}

/// Per-round clutch state machine
#[derive(Debug)]
pub struct ClutchTracker {
    slots: BTreeMap<SteamId, Slot>,
    clutches: BTreeMap<SteamId, u32>,
}

impl ClutchTracker {
    /// Start a round with every playing participant alive
    pub fn new(participants: impl IntoIterator<Item = (SteamId, Team)>) -> Self {
        let slots = participants
            .into_iter()
            .filter(|(_, team)| team.is_playing())
            .map(|(id, team)| (id, Slot { team, alive: true }))
            .collect();

        Self {
            slots,
            clutches: BTreeMap::new(),
        }
    }

    /// Mark a player dead and re-evaluate clutch state
    pub fn record_death(&mut self, victim: SteamId) {
        let Some(slot) = self.slots.get_mut(&victim) else {
            return;
        };
        if !slot.alive {
            return;
        }
        slot.alive = false;

        let alive = |team: Team| self.slots.values().filter(|s| s.alive && s.team == team).count() as u32;
        let (alive_t, alive_ct) = (alive(Team::T), alive(Team::CT));

        for (&id, slot) in &self.slots {
            if !slot.alive {
                continue;
            }
            let (own, enemies) = match slot.team {
                Team::T => (alive_t, alive_ct),
                _ => (alive_ct, alive_t),
            };

            if let Some(recorded) = self.clutches.get_mut(&id) {
                *recorded = (*recorded).max(enemies);
            } else if own == 1 && enemies >= 1 {
                self.clutches.insert(id, enemies);
            }
        }
    }

    /// Players who entered a clutch, with the enemy count faced
    pub fn finish(self) -> BTreeMap<SteamId, u32> {
        self.clutches
    }
}

/// Run the tracker over one round's kills (ascending by tick)
///
/// **Public** - pipeline pass, called per round
pub fn track_clutches(
    participants: impl IntoIterator<Item = (SteamId, Team)>,
    kills: &[&RawKill],
) -> BTreeMap<SteamId, u32> {
    let mut tracker = ClutchTracker::new(participants);
    for kill in kills {
        tracker.record_death(kill.victim);
    }
    tracker.finish()
}
