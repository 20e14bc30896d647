//! Per-(player, weapon) rollup.

use super::index::MatchIndex;
use crate::output::schema::PlayerWeaponStats;
use crate::parser::schema::{RawMatch, SteamId};
use crate::parser::weapons::normalize_weapon_name;
use std::collections::BTreeMap;

/// Build weapon rows sorted by (steam id, weapon)
///
/// **Public** - pipeline pass
///
/// Weapon names are normalized so decoder spelling variants of the same
/// weapon share a row.
pub fn rollup_weapons(demo: &RawMatch, index: &MatchIndex<'_>) -> Vec<PlayerWeaponStats> {
    let mut rows: BTreeMap<(SteamId, String), PlayerWeaponStats> = BTreeMap::new();
    let hash = demo.hash.as_str();

    for (_, kills) in index.kills_by_round() {
        for kill in kills {
            if let Some(killer) = kill.player_killer().filter(|_| kill.is_enemy_kill()) {
                let stats = weapon_row(&mut rows, hash, killer, &kill.weapon);
                stats.kills += 1;
                stats.headshot_kills += kill.headshot as u32;
            }
            if let Some(assister) = kill.assister.filter(|&a| Some(a) != kill.killer && a != kill.victim) {
                weapon_row(&mut rows, hash, assister, &kill.weapon).assists += 1;
            }
            weapon_row(&mut rows, hash, kill.victim, &kill.weapon).deaths += 1;
        }
    }

    for damage in &demo.damages {
        let Some(attacker) = damage.attacker else {
            continue;
        };
        if attacker == damage.victim || damage.is_friendly() {
            continue;
        }
        let stats = weapon_row(&mut rows, hash, attacker, &damage.weapon);
        stats.damage += damage.health_damage;
        stats.hits += 1;
    }

    rows.into_values().collect()
}

fn weapon_row<'r>(
    rows: &'r mut BTreeMap<(SteamId, String), PlayerWeaponStats>,
    match_hash: &str,
    player: SteamId,
    weapon: &str,
) -> &'r mut PlayerWeaponStats {
    let weapon = normalize_weapon_name(weapon);
    rows.entry((player, weapon.clone()))
        .or_insert_with(|| PlayerWeaponStats {
            match_hash: match_hash.to_string(),
            steam_id: player,
            weapon,
            ..Default::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{RawDamage, RawKill, Team};

    #[test]
    fn test_weapon_rows() {
        let demo = RawMatch {
            hash: "m".to_string(),
            tick_rate: 64.0,
            kills: vec![
                RawKill {
                    tick: 100,
                    round: 1,
                    killer: Some(1),
                    killer_team: Team::T,
                    victim: 2,
                    victim_team: Team::CT,
                    assister: Some(3),
                    weapon: "weapon_ak47".to_string(),
                    headshot: true,
                    ..Default::default()
                },
            ],
            damages: vec![
                RawDamage {
                    tick: 90,
                    round: 1,
                    attacker: Some(1),
                    victim: 2,
                    attacker_team: Team::T,
                    victim_team: Team::CT,
                    health_damage: 100,
                    weapon: "AK47".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let index = MatchIndex::build(&demo);
        let rows = rollup_weapons(&demo, &index);

        assert_eq!(rows.len(), 3);
        let ak = &rows[0];
        assert_eq!((ak.steam_id, ak.weapon.as_str()), (1, "ak47"));
        assert_eq!((ak.kills, ak.headshot_kills, ak.damage, ak.hits), (1, 1, 100, 1));
        assert_eq!(rows[1].deaths, 1);
        assert_eq!(rows[2].assists, 1);
    }
}
