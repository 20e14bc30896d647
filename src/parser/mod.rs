//! Decoded match parsing and schema definitions.
//!
//! This module handles:
//! - Reading decoder JSON into typed events
//! - Validating match identity and round boundaries
//! - Normalizing weapon names into coarse buckets

pub mod demo_match;
pub mod schema;
pub mod weapons;

// Re-export main types
pub use demo_match::{parse_match, read_match, validate_match_format};
pub use schema::{
    HitGroup, RawDamage, RawFirstSight, RawFlash, RawKill, RawMatch, RawPlayer, RawRound,
    RawRoundPlayer, RawWeaponFire, SteamId, Team, Tick, Vec3,
};
pub use weapons::{is_awp, normalize_weapon_name, WeaponBucket};
