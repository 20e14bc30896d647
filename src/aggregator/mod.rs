//! Aggregation of decoded matches into statistics tables.
//!
//! The pipeline runs these passes in order over one match:
//! - Temporal index and team table
//! - Trade, opening and clutch annotation
//! - Per-round classification and match rollup
//! - Duel, AWP, flash, timing and role enrichment
//! - Weapon rollup
//!
//! [`career`] is the read side that folds stored rows across matches.

pub mod awp;
pub mod career;
pub mod clutch;
pub mod duels;
pub mod flash;
pub mod index;
pub mod numeric;
pub mod opening;
pub mod pipeline;
pub mod role;
pub mod rollup;
pub mod rounds;
pub mod teams;
pub mod timing;
pub mod trades;
pub mod weapon_stats;

// Re-export main types and functions
pub use career::{build_career, CareerEntry, PlayerCareer};
pub use index::MatchIndex;
pub use numeric::{median, wilson_interval, WILSON_Z_95};
pub use pipeline::aggregate_match;
pub use teams::TeamTable;
pub use trades::{annotate_trades, TradeAnnotations, TradeInfo};
