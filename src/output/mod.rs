//! Output schema and writers for computed statistics.
//!
//! This module handles:
//! - The serializable report tables
//! - JSON reports on disk
//! - Text scoreboards and FHHS tables

pub mod json;
pub mod schema;
pub mod table;

// Re-export main types and functions
pub use json::{read_report, write_report};
pub use schema::{
    BuyType, DistanceBin, MatchReport, PlayerDuelSegment, PlayerMatchStats, PlayerRoundStats,
    PlayerWeaponStats, Role,
};
pub use table::{format_interval, render_career, render_match};
