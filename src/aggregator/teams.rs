//! Player -> dominant team lookup.
//!
//! Teams are voted from every event that names a player's side. The first
//! team to reach the highest count wins ties; players with no playing-team
//! votes fall back to the roster's reported team.

use crate::parser::schema::{RawMatch, SteamId, Team};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
struct Votes {
    counts: HashMap<Team, u32>,
    leader: Option<(Team, u32)>,
}

impl Votes {
    fn add(&mut self, team: Team) {
        if !team.is_playing() {
            return;
        }
        let count = self.counts.entry(team).or_insert(0);
        *count += 1;

        // Strictly greater keeps the first team that reached the max
        match self.leader {
            Some((_, best)) if *count <= best => {}
            _ => self.leader = Some((team, *count)),
        }
    }
}

/// Precomputed player -> team table
#[derive(Debug, Default, Clone)]
pub struct TeamTable {
    teams: BTreeMap<SteamId, Team>,
}

impl TeamTable {
    /// Vote teams from rounds, kills, damages and flashes, in that order
    pub fn build(demo: &RawMatch) -> Self {
        let mut votes: BTreeMap<SteamId, Votes> = BTreeMap::new();
        let mut vote = |player: SteamId, team: Team| votes.entry(player).or_default().add(team);

        for round in &demo.rounds {
            for player in &round.players {
                vote(player.steam_id, player.team);
            }
        }
        for kill in &demo.kills {
            if let Some(killer) = kill.killer {
                vote(killer, kill.killer_team);
            }
            vote(kill.victim, kill.victim_team);
        }
        for damage in &demo.damages {
            if let Some(attacker) = damage.attacker {
                vote(attacker, damage.attacker_team);
            }
            vote(damage.victim, damage.victim_team);
        }
        for flash in &demo.flashes {
            vote(flash.attacker, flash.attacker_team);
            vote(flash.victim, flash.victim_team);
        }

        let mut teams: BTreeMap<SteamId, Team> = votes
            .into_iter()
            .filter_map(|(player, v)| v.leader.map(|(team, _)| (player, team)))
            .collect();

        for player in &demo.players {
            teams.entry(player.steam_id).or_insert(player.team);
        }

        Self { teams }
    }

    /// Dominant team, Unknown for players never seen
    pub fn team_of(&self, player: SteamId) -> Team {
        self.teams.get(&player).copied().unwrap_or_default()
    }

    /// Every player seen in the match, ascending by id
    pub fn players(&self) -> impl Iterator<Item = SteamId> + '_ {
        self.teams.keys().copied()
    }
}
