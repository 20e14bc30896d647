//! Output schema definitions for computed statistics.
//!
//! One [`MatchReport`] bundles the four collections produced by a single
//! pipeline run. Rows carry raw counts; rates are derived on read so rows
//! from several matches can be summed.

use crate::parser::schema::{SteamId, Team};
use crate::parser::weapons::WeaponBucket;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything computed for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Schema version for compatibility checking
    pub version: String,

    pub match_hash: String,
    pub map_name: String,
    pub tick_rate: f64,
    pub round_count: u32,

    #[serde(default)]
    pub played_at: Option<DateTime<Utc>>,

    /// Set by the store when the report is persisted
    #[serde(default)]
    pub ingested_at: Option<DateTime<Utc>>,

    pub players: Vec<PlayerMatchStats>,
    pub rounds: Vec<PlayerRoundStats>,
    pub weapons: Vec<PlayerWeaponStats>,
    pub duel_segments: Vec<PlayerDuelSegment>,
}

impl MatchReport {
    pub fn player(&self, steam_id: SteamId) -> Option<&PlayerMatchStats> {
        self.players.iter().find(|p| p.steam_id == steam_id)
    }

    pub fn player_rounds(&self, steam_id: SteamId) -> impl Iterator<Item = &PlayerRoundStats> {
        self.rounds.iter().filter(move |r| r.steam_id == steam_id)
    }

    pub fn player_segments(&self, steam_id: SteamId) -> impl Iterator<Item = &PlayerDuelSegment> {
        self.duel_segments.iter().filter(move |s| s.steam_id == steam_id)
    }

    /// Played-at time, falling back to ingest time for date-window queries
    pub fn effective_date(&self) -> Option<DateTime<Utc>> {
        self.played_at.or(self.ingested_at)
    }
}

/// Economic classification of a player's round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuyType {
    Full,
    Force,
    Half,
    #[default]
    Eco,
}

/// Playstyle derived from match totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    AWPer,
    Entry,
    Support,
    #[default]
    Rifler,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::AWPer => "AWPer",
            Role::Entry => "Entry",
            Role::Support => "Support",
            Role::Rifler => "Rifler",
        };
        f.write_str(label)
    }
}

/// Engagement distance class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DistanceBin {
    #[serde(rename = "0-5m")]
    UnderFive,
    #[serde(rename = "5-10m")]
    FiveToTen,
    #[serde(rename = "10-15m")]
    TenToFifteen,
    #[serde(rename = "15-20m")]
    FifteenToTwenty,
    #[serde(rename = "20-30m")]
    TwentyToThirty,
    #[serde(rename = "30m+")]
    ThirtyPlus,
    #[serde(rename = "unknown")]
    Unknown,
}

impl DistanceBin {
    /// Bin a distance in meters; negative or non-finite means unavailable
    pub fn from_meters(meters: f64) -> Self {
        if !meters.is_finite() || meters < 0.0 {
            Self::Unknown
        } else if meters < 5.0 {
            Self::UnderFive
        } else if meters < 10.0 {
            Self::FiveToTen
        } else if meters < 15.0 {
            Self::TenToFifteen
        } else if meters < 20.0 {
            Self::FifteenToTwenty
        } else if meters < 30.0 {
            Self::TwentyToThirty
        } else {
            Self::ThirtyPlus
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnderFive => "0-5m",
            Self::FiveToTen => "5-10m",
            Self::TenToFifteen => "10-15m",
            Self::FifteenToTwenty => "15-20m",
            Self::TwentyToThirty => "20-30m",
            Self::ThirtyPlus => "30m+",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DistanceBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-match totals for one player
///
/// Median and percentage fields are 0.0 when the player has no samples
/// for them; the matching sample counts tell "no data" apart from a real
/// zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerMatchStats {
    pub match_hash: String,
    pub steam_id: SteamId,
    pub name: String,
    pub team: Team,

    // Core counts
    pub rounds_played: u32,
    pub kills: u32,
    pub assists: u32,
    pub deaths: u32,
    pub damage: u32,
    pub utility_damage: u32,
    pub headshot_kills: u32,
    pub flash_assists: u32,
    pub kast_rounds: u32,

    // Round events
    pub opening_kills: u32,
    pub opening_deaths: u32,
    pub trade_kills: u32,
    pub trade_deaths: u32,
    pub traded_deaths: u32,
    pub clutch_rounds: u32,
    pub clutch_wins: u32,
    pub rounds_won: u32,
    /// Rounds with exactly 2, 3, 4 and 5+ kills
    pub multi_kills: [u32; 4],

    // Trade timing (ms)
    pub median_trade_kill_delay_ms: f64,
    pub median_trade_death_delay_ms: f64,

    // Duels
    pub duel_wins: u32,
    pub duel_losses: u32,
    pub first_hit_count: u32,
    pub first_hit_hs_count: u32,
    pub first_hit_hs_rate: f64,
    pub median_hits_to_kill: f64,
    pub median_correction_deg: f64,
    pub pct_correction_under_2: f64,
    pub correction_samples: u32,
    pub median_win_exposure_ms: f64,
    pub median_loss_exposure_ms: f64,

    // Crosshair placement
    pub crosshair_samples: u32,
    pub crosshair_median_deg: f64,
    pub crosshair_median_pitch_deg: f64,
    pub crosshair_median_yaw_deg: f64,
    pub crosshair_pct_under_5: f64,

    // AWP
    pub awp_kills: u32,
    pub awp_deaths: u32,
    pub awp_deaths_dry: u32,
    pub awp_deaths_repeek: u32,
    pub awp_deaths_isolated: u32,

    // Flashes
    /// Blind records credited to the thrower, one per player caught
    pub flash_blinds: u32,
    pub enemies_flashed: u32,
    pub team_flashes: u32,
    pub effective_flashes: u32,
    pub enemy_blind_secs: f64,

    pub role: Role,

    // Timing and movement
    pub median_ttk_ms: f64,
    pub median_ttd_ms: f64,
    pub ttk_samples: u32,
    pub ttd_samples: u32,
    pub one_taps: u32,
    pub shots_fired: u32,
    pub counter_strafe_pct: f64,
}

impl PlayerMatchStats {
    pub fn new(match_hash: &str, steam_id: SteamId) -> Self {
        Self {
            match_hash: match_hash.to_string(),
            steam_id,
            ..Default::default()
        }
    }

    /// Kills per death; kills when the player never died
    pub fn kd(&self) -> f64 {
        if self.deaths == 0 {
            self.kills as f64
        } else {
            self.kills as f64 / self.deaths as f64
        }
    }

    /// Average damage per round
    pub fn adr(&self) -> f64 {
        ratio(self.damage, self.rounds_played)
    }

    /// Headshot kill percentage
    pub fn hs_pct(&self) -> f64 {
        percentage(self.headshot_kills, self.kills)
    }

    /// Percentage of rounds with a kill, assist, survival or trade
    pub fn kast_pct(&self) -> f64 {
        percentage(self.kast_rounds, self.rounds_played)
    }

    pub fn duel_count(&self) -> u32 {
        self.duel_wins + self.duel_losses
    }
}

/// One player's facts for one round
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerRoundStats {
    pub match_hash: String,
    pub steam_id: SteamId,
    pub round: u32,
    pub team: Team,

    pub kills: u32,
    pub assists: u32,
    pub damage: u32,

    pub opening_kill: bool,
    pub opening_death: bool,
    pub trade_kill: bool,
    pub trade_death: bool,
    pub died: bool,
    pub survived: bool,
    pub was_traded: bool,
    pub kast: bool,
    pub post_plant: bool,
    pub in_clutch: bool,
    pub clutch_enemies: u32,
    pub won_round: bool,

    pub buy_type: BuyType,
    pub equipment_value: Option<u32>,
}

/// One player's use of one weapon across a match
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerWeaponStats {
    pub match_hash: String,
    pub steam_id: SteamId,
    pub weapon: String,

    pub kills: u32,
    pub headshot_kills: u32,
    pub assists: u32,
    pub deaths: u32,
    pub damage: u32,
    pub hits: u32,
}

/// Won duels for one (player, weapon bucket, distance bin)
///
/// Counts are additive across matches. Wilson intervals are derived from
/// `first_hit_hs_count` / `first_hit_count` at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDuelSegment {
    pub match_hash: String,
    pub steam_id: SteamId,
    pub weapon_bucket: WeaponBucket,
    pub distance_bin: DistanceBin,

    pub duel_count: u32,
    pub first_hit_count: u32,
    pub first_hit_hs_count: u32,

    /// Won duels with a shot between sight and kill
    #[serde(default)]
    pub correction_samples: u32,

    pub median_correction_deg: f64,
    pub median_sight_deg: f64,
    pub median_exposure_ms: f64,
}

impl PlayerDuelSegment {
    pub fn key(&self) -> (SteamId, WeaponBucket, DistanceBin) {
        (self.steam_id, self.weapon_bucket, self.distance_bin)
    }

    /// First-hit headshot percentage; None without any first hit
    pub fn fhhs_pct(&self) -> Option<f64> {
        if self.first_hit_count == 0 {
            None
        } else {
            Some(percentage(self.first_hit_hs_count, self.first_hit_count))
        }
    }

    /// Fold another segment with the same key into this one
    ///
    /// Counts sum exactly. Medians cannot be merged without samples, so
    /// they combine as means weighted by each side's sample count.
    pub fn merge(&mut self, other: &PlayerDuelSegment) {
        self.median_correction_deg = weighted_mean(
            (self.median_correction_deg, self.correction_samples),
            (other.median_correction_deg, other.correction_samples),
        );
        self.median_sight_deg = weighted_mean(
            (self.median_sight_deg, self.duel_count),
            (other.median_sight_deg, other.duel_count),
        );
        self.median_exposure_ms = weighted_mean(
            (self.median_exposure_ms, self.duel_count),
            (other.median_exposure_ms, other.duel_count),
        );

        self.duel_count += other.duel_count;
        self.correction_samples += other.correction_samples;
        self.first_hit_count += other.first_hit_count;
        self.first_hit_hs_count += other.first_hit_hs_count;
    }
}

/// Mean of two values weighted by their sample counts; 0.0 when both are empty
fn weighted_mean((x, a): (f64, u32), (y, b): (f64, u32)) -> f64 {
    let total = a + b;
    if total == 0 {
        0.0
    } else {
        (x * a as f64 + y * b as f64) / total as f64
    }
}

/// `part / whole`, 0.0 for an empty whole
pub fn ratio(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// `part / whole` as a percentage, 0.0 for an empty whole
pub fn percentage(part: u32, whole: u32) -> f64 {
    ratio(part, whole) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(duels: u32, hits: u32, hs: u32, exposure: f64) -> PlayerDuelSegment {
        PlayerDuelSegment {
            match_hash: "m".to_string(),
            steam_id: 7,
            weapon_bucket: WeaponBucket::AK,
            distance_bin: DistanceBin::TenToFifteen,
            duel_count: duels,
            first_hit_count: hits,
            first_hit_hs_count: hs,
            correction_samples: duels,
            median_correction_deg: 2.0,
            median_sight_deg: 4.0,
            median_exposure_ms: exposure,
        }
    }

    #[test]
    fn test_distance_bin_edges() {
        assert_eq!(DistanceBin::from_meters(4.99).as_str(), "0-5m");
        assert_eq!(DistanceBin::from_meters(5.00).as_str(), "5-10m");
        assert_eq!(DistanceBin::from_meters(29.99).as_str(), "20-30m");
        assert_eq!(DistanceBin::from_meters(30.00).as_str(), "30m+");
        assert_eq!(DistanceBin::from_meters(-1.0).as_str(), "unknown");
        assert_eq!(DistanceBin::from_meters(f64::NAN), DistanceBin::Unknown);
    }

    #[test]
    fn test_distance_bin_serializes_label() {
        let json = serde_json::to_string(&DistanceBin::FifteenToTwenty).unwrap();
        assert_eq!(json, "\"15-20m\"");
    }

    #[test]
    fn test_segment_merge_sums_counts() {
        let mut a = segment(3, 2, 1, 400.0);
        let b = segment(1, 1, 1, 800.0);
        a.merge(&b);

        assert_eq!(a.duel_count, 4);
        assert_eq!(a.first_hit_count, 3);
        assert_eq!(a.first_hit_hs_count, 2);
        assert_eq!(a.median_exposure_ms, 500.0);
    }

    #[test]
    fn test_segment_merge_ignores_correction_without_shots() {
        let mut a = segment(3, 2, 1, 400.0);
        let mut b = segment(2, 0, 0, 400.0);
        b.correction_samples = 0;
        b.median_correction_deg = 0.0;
        a.merge(&b);

        assert_eq!(a.median_correction_deg, 2.0);
        assert_eq!(a.correction_samples, 3);
        assert_eq!(a.duel_count, 5);
    }

    #[test]
    fn test_segment_zero_first_hits_has_no_fhhs() {
        let seg = segment(2, 0, 0, 300.0);
        assert_eq!(seg.fhhs_pct(), None);
        assert_eq!(segment(4, 4, 1, 0.0).fhhs_pct(), Some(25.0));
    }

    #[test]
    fn test_derived_rates() {
        let mut stats = PlayerMatchStats::new("m", 1);
        assert_eq!(stats.adr(), 0.0);
        assert_eq!(stats.kd(), 0.0);

        stats.rounds_played = 4;
        stats.damage = 300;
        stats.kills = 6;
        stats.deaths = 3;
        stats.headshot_kills = 3;
        stats.kast_rounds = 3;

        assert_eq!(stats.adr(), 75.0);
        assert_eq!(stats.kd(), 2.0);
        assert_eq!(stats.hs_pct(), 50.0);
        assert_eq!(stats.kast_pct(), 75.0);
    }
}
