//! Temporal indices over a decoded match.
//!
//! Built once per match and borrowed immutably by every later pass, so no
//! pass re-groups or re-sorts raw events. Sorting is stable: events on the
//! same tick keep their decoder order.

use crate::parser::schema::{
    RawDamage, RawFirstSight, RawFlash, RawKill, RawMatch, RawRound, RawWeaponFire, SteamId, Tick,
};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};

/// Lookup tables derived from one [`RawMatch`]
///
/// **Public** - consumed by every aggregation pass
#[derive(Debug)]
pub struct MatchIndex<'a> {
    pub tick_rate: f64,
    rounds: BTreeMap<u32, &'a RawRound>,
    kills_by_round: BTreeMap<u32, Vec<&'a RawKill>>,
    flashes_by_round: BTreeMap<u32, Vec<&'a RawFlash>>,
    /// (round, attacker, victim) -> non-utility hits, by tick
    duel_damage: HashMap<(u32, SteamId, SteamId), Vec<&'a RawDamage>>,
    /// (round, attacker) -> enemy health damage, utility included
    damage_totals: HashMap<(u32, SteamId), u32>,
    /// (round, attacker) -> enemy utility damage
    utility_totals: HashMap<(u32, SteamId), u32>,
    /// (shooter, round) -> fires, by tick
    fires: HashMap<(SteamId, u32), Vec<&'a RawWeaponFire>>,
    /// (observer, enemy, round) -> first sight
    first_sights: HashMap<(SteamId, SteamId, u32), &'a RawFirstSight>,
    /// observer -> every retained first sight, in tick order
    sights_by_observer: BTreeMap<SteamId, Vec<&'a RawFirstSight>>,
}

impl<'a> MatchIndex<'a> {
    /// Build all indices for a match
    ///
    /// **Public** - first pass of the pipeline
    pub fn build(demo: &'a RawMatch) -> Self {
        let rounds: BTreeMap<u32, &RawRound> = demo.rounds.iter().map(|r| (r.number, r)).collect();

        // Without a round list every event is kept as-is
        let known_round = |round: u32| rounds.is_empty() || rounds.contains_key(&round);

        let mut kills_by_round: BTreeMap<u32, Vec<&RawKill>> = BTreeMap::new();
        for kill in sorted_by_tick(&demo.kills, |k| k.tick) {
            if !known_round(kill.round) {
                warn!("Skipping kill at tick {} in unknown round {}", kill.tick, kill.round);
                continue;
            }
            kills_by_round.entry(kill.round).or_default().push(kill);
        }

        let mut flashes_by_round: BTreeMap<u32, Vec<&RawFlash>> = BTreeMap::new();
        let mut orphaned_flashes = 0;
        for flash in sorted_by_tick(&demo.flashes, |f| f.tick) {
            if !known_round(flash.round) {
                orphaned_flashes += 1;
                continue;
            }
            flashes_by_round.entry(flash.round).or_default().push(flash);
        }

        let mut duel_damage: HashMap<(u32, SteamId, SteamId), Vec<&RawDamage>> = HashMap::new();
        let mut damage_totals: HashMap<(u32, SteamId), u32> = HashMap::new();
        let mut utility_totals: HashMap<(u32, SteamId), u32> = HashMap::new();
        let mut orphaned_damages = 0;

        for damage in sorted_by_tick(&demo.damages, |d| d.tick) {
            if !known_round(damage.round) {
                orphaned_damages += 1;
                continue;
            }
            let Some(attacker) = damage.attacker else {
                continue;
            };
            if attacker == damage.victim {
                continue;
            }

            if !damage.is_utility {
                duel_damage
                    .entry((damage.round, attacker, damage.victim))
                    .or_default()
                    .push(damage);
            }

            if damage.is_friendly() {
                continue;
            }

            *damage_totals.entry((damage.round, attacker)).or_insert(0) += damage.health_damage;
            if damage.is_utility {
                *utility_totals.entry((damage.round, attacker)).or_insert(0) += damage.health_damage;
            }
        }

        let mut fires: HashMap<(SteamId, u32), Vec<&RawWeaponFire>> = HashMap::new();
        for fire in sorted_by_tick(&demo.weapon_fires, |f| f.tick) {
            fires.entry((fire.shooter, fire.round)).or_default().push(fire);
        }

        let mut first_sights: HashMap<(SteamId, SteamId, u32), &RawFirstSight> = HashMap::new();
        let mut sights_by_observer: BTreeMap<SteamId, Vec<&RawFirstSight>> = BTreeMap::new();
        for sight in sorted_by_tick(&demo.first_sights, |s| s.tick) {
            let key = (sight.observer, sight.enemy, sight.round);
            if first_sights.contains_key(&key) {
                continue;
            }
            first_sights.insert(key, sight);
            sights_by_observer.entry(sight.observer).or_default().push(sight);
        }

        if orphaned_damages + orphaned_flashes > 0 {
            warn!(
                "Skipped {} damage and {} flash events in unknown rounds",
                orphaned_damages, orphaned_flashes
            );
        }

        debug!(
            "Indexed {} rounds, {} kill rounds, {} duel pairs, {} fire lists, {} first sights",
            demo.rounds.len(),
            kills_by_round.len(),
            duel_damage.len(),
            fires.len(),
            first_sights.len()
        );

        Self {
            tick_rate: demo.tick_rate,
            rounds,
            kills_by_round,
            flashes_by_round,
            duel_damage,
            damage_totals,
            utility_totals,
            fires,
            first_sights,
            sights_by_observer,
        }
    }

    pub fn rounds(&self) -> impl Iterator<Item = &'a RawRound> + '_ {
        self.rounds.values().copied()
    }

    /// Kills of one round, ascending by tick
    pub fn round_kills(&self, round: u32) -> &[&'a RawKill] {
        self.kills_by_round.get(&round).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All kills grouped by round
    pub fn kills_by_round(&self) -> impl Iterator<Item = (u32, &[&'a RawKill])> + '_ {
        self.kills_by_round.iter().map(|(r, k)| (*r, k.as_slice()))
    }

    /// Flashes of one round, ascending by tick
    pub fn round_flashes(&self, round: u32) -> &[&'a RawFlash] {
        self.flashes_by_round.get(&round).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn flashes(&self) -> impl Iterator<Item = &'a RawFlash> + '_ {
        self.flashes_by_round.values().flatten().copied()
    }

    /// Non-utility hits from attacker on victim in a round, by tick
    pub fn duel_damage(&self, round: u32, attacker: SteamId, victim: SteamId) -> &[&'a RawDamage] {
        self.duel_damage
            .get(&(round, attacker, victim))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Enemy damage dealt by attacker in a round
    pub fn round_damage(&self, round: u32, attacker: SteamId) -> u32 {
        self.damage_totals.get(&(round, attacker)).copied().unwrap_or(0)
    }

    /// Enemy utility damage dealt by attacker in a round
    pub fn round_utility_damage(&self, round: u32, attacker: SteamId) -> u32 {
        self.utility_totals.get(&(round, attacker)).copied().unwrap_or(0)
    }

    /// (round, attacker, damage) for every attacker with enemy damage
    pub fn damage_totals(&self) -> impl Iterator<Item = (u32, SteamId, u32)> + '_ {
        self.damage_totals.iter().map(|(&(round, attacker), &dmg)| (round, attacker, dmg))
    }

    /// Shooter's fires in a round, by tick
    pub fn fires(&self, shooter: SteamId, round: u32) -> &[&'a RawWeaponFire] {
        self.fires.get(&(shooter, round)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Earliest fire by shooter with tick in `[from, to]`
    pub fn first_fire_between(
        &self,
        shooter: SteamId,
        round: u32,
        from: Tick,
        to: Tick,
    ) -> Option<&'a RawWeaponFire> {
        let fires = self.fires(shooter, round);
        let start = fires.partition_point(|f| f.tick < from);
        fires[start..].first().copied().filter(|f| f.tick <= to)
    }

    /// Every (shooter, fires) list
    pub fn fire_lists(&self) -> impl Iterator<Item = (SteamId, &[&'a RawWeaponFire])> + '_ {
        self.fires.iter().map(|(&(shooter, _), fires)| (shooter, fires.as_slice()))
    }

    /// First time observer saw enemy in a round
    pub fn first_sight(&self, observer: SteamId, enemy: SteamId, round: u32) -> Option<&'a RawFirstSight> {
        self.first_sights.get(&(observer, enemy, round)).copied()
    }

    /// Retained first sights per observer
    pub fn sights_by_observer(&self) -> impl Iterator<Item = (SteamId, &[&'a RawFirstSight])> + '_ {
        self.sights_by_observer.iter().map(|(o, s)| (*o, s.as_slice()))
    }
}

/// Stable sort of borrowed events by tick
fn sorted_by_tick<T>(events: &[T], tick: impl Fn(&T) -> Tick) -> Vec<&T> {
    let mut sorted: Vec<&T> = events.iter().collect();
    sorted.sort_by_key(|e| tick(e));
    sorted
}
