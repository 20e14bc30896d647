//! Demostats
//!
//! Per-player, per-round and per-duel statistics from decoded competitive
//! shooter replays.
//!
//! The library turns one decoded match into a [`output::MatchReport`]
//! with a pure pipeline ([`aggregator::aggregate_match`]), persists
//! reports through a [`store::StatsStore`] and folds stored rows into
//! cross-match careers.
//!
//! ## Getting Started
//!
//! ```bash
//! demostats ingest matches/*.json
//! demostats player 76561198000000001 --since 2024-01-01
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod store;
pub mod utils;
