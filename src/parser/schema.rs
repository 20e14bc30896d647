//! Input schema for decoded matches.
//!
//! These types mirror the JSON produced by the replay decoder. They are
//! immutable once loaded; every aggregation pass borrows them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 64-bit player identity
pub type SteamId = u64;

/// Discrete simulation time; one monotonically increasing axis per match
pub type Tick = i64;

/// Team side of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Team {
    #[serde(alias = "t", alias = "TERRORIST", alias = "Terrorist")]
    T,
    #[serde(alias = "ct", alias = "COUNTER_TERRORIST", alias = "CounterTerrorist")]
    CT,
    #[serde(alias = "spectator", alias = "SPECTATOR")]
    Spectator,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Team {
    /// Whether the team takes part in rounds (T or CT)
    pub fn is_playing(self) -> bool {
        matches!(self, Team::T | Team::CT)
    }

    /// Whether two teams are known playing sides facing each other
    pub fn opposes(self, other: Team) -> bool {
        self.is_playing() && other.is_playing() && self != other
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Team::T => "T",
            Team::CT => "CT",
            Team::Spectator => "Spectator",
            Team::Unknown => "Unknown",
        }
    }
}

/// Body part hit by a damage event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitGroup {
    Head,
    Neck,
    Chest,
    Stomach,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    #[default]
    #[serde(other)]
    Generic,
}

impl HitGroup {
    pub fn is_head(self) -> bool {
        self == HitGroup::Head
    }
}

/// World-space position in game units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in game units
    pub fn distance(&self, other: &Vec3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// A whole decoded match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMatch {
    /// Content-derived identity hash, used for idempotent storage
    pub hash: String,

    pub map_name: String,

    /// Simulation ticks per second
    pub tick_rate: f64,

    /// When the match was played, if the decoder knows it
    #[serde(default)]
    pub played_at: Option<DateTime<Utc>>,

    /// Participants as reported by the decoder
    #[serde(default)]
    pub players: Vec<RawPlayer>,

    #[serde(default)]
    pub rounds: Vec<RawRound>,

    #[serde(default)]
    pub kills: Vec<RawKill>,

    #[serde(default)]
    pub damages: Vec<RawDamage>,

    #[serde(default)]
    pub flashes: Vec<RawFlash>,

    #[serde(default)]
    pub first_sights: Vec<RawFirstSight>,

    #[serde(default)]
    pub weapon_fires: Vec<RawWeaponFire>,
}

/// Roster entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPlayer {
    pub steam_id: SteamId,

    #[serde(default)]
    pub name: String,

    /// Team reported by the decoder (fallback for team resolution)
    #[serde(default)]
    pub team: Team,
}

/// Round boundaries and end-of-round player state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRound {
    pub number: u32,
    pub start_tick: Tick,
    pub freeze_end_tick: Tick,
    pub end_tick: Tick,

    #[serde(default)]
    pub winner: Team,

    /// 0 when the bomb was not planted
    #[serde(default)]
    pub bomb_plant_tick: Tick,

    #[serde(default)]
    pub players: Vec<RawRoundPlayer>,
}

/// Per-player state recorded for one round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRoundPlayer {
    pub steam_id: SteamId,

    #[serde(default)]
    pub team: Team,

    /// Alive when the round ended
    #[serde(default)]
    pub alive: bool,

    /// Equipment value at freeze end
    #[serde(default)]
    pub equipment_value: Option<u32>,

    #[serde(default)]
    pub grenade_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawKill {
    pub tick: Tick,
    pub round: u32,

    /// None for world kills (fall damage, bomb)
    #[serde(default)]
    pub killer: Option<SteamId>,
    pub victim: SteamId,
    #[serde(default)]
    pub assister: Option<SteamId>,

    #[serde(default)]
    pub killer_team: Team,
    #[serde(default)]
    pub victim_team: Team,

    #[serde(default)]
    pub weapon: String,
    #[serde(default)]
    pub headshot: bool,
    #[serde(default)]
    pub assisted_flash: bool,

    /// Victim's living teammates near them at kill time
    #[serde(default)]
    pub nearby_victim_teammates: u32,
}

impl RawKill {
    /// Killer id, when the kill was made by another player
    pub fn player_killer(&self) -> Option<SteamId> {
        self.killer.filter(|&k| k != self.victim)
    }

    /// Whether the kill was against an opponent (not a team kill or suicide)
    pub fn is_enemy_kill(&self) -> bool {
        self.player_killer().is_some() && !(self.killer_team.is_playing() && self.killer_team == self.victim_team)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDamage {
    pub tick: Tick,
    pub round: u32,

    #[serde(default)]
    pub attacker: Option<SteamId>,
    pub victim: SteamId,

    #[serde(default)]
    pub attacker_team: Team,
    #[serde(default)]
    pub victim_team: Team,

    /// Health removed by this hit
    pub health_damage: u32,

    #[serde(default)]
    pub weapon: String,

    /// Grenade/fire damage
    #[serde(default)]
    pub is_utility: bool,

    #[serde(default)]
    pub hit_group: HitGroup,

    #[serde(default)]
    pub victim_position: Option<Vec3>,
}

impl RawDamage {
    pub fn is_friendly(&self) -> bool {
        self.attacker_team.is_playing() && self.attacker_team == self.victim_team
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFlash {
    pub tick: Tick,
    pub round: u32,
    pub attacker: SteamId,
    pub victim: SteamId,

    #[serde(default)]
    pub attacker_team: Team,
    #[serde(default)]
    pub victim_team: Team,

    /// Blind duration in seconds
    #[serde(default)]
    pub blind_duration: f64,
}

/// First moment an observer had an enemy in view
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFirstSight {
    pub tick: Tick,
    pub round: u32,
    pub observer: SteamId,
    pub enemy: SteamId,

    /// Total angular distance between crosshair and enemy (degrees)
    pub angle_deviation: f64,
    #[serde(default)]
    pub pitch_deviation: f64,
    #[serde(default)]
    pub yaw_deviation: f64,

    /// Observer's absolute view angles at sight time (degrees)
    #[serde(default)]
    pub view_pitch: f64,
    #[serde(default)]
    pub view_yaw: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawWeaponFire {
    pub tick: Tick,
    pub round: u32,
    pub shooter: SteamId,

    #[serde(default)]
    pub weapon: String,

    #[serde(default)]
    pub view_pitch: f64,
    #[serde(default)]
    pub view_yaw: f64,

    #[serde(default)]
    pub position: Option<Vec3>,

    /// Horizontal speed in units per second
    #[serde(default)]
    pub horizontal_speed: f64,
}
