//! Loader for decoded match JSON.
//!
//! The replay decoder writes one JSON document per match. This module reads
//! it into a [`RawMatch`] and performs the structural checks the pipeline
//! relies on.

use super::schema::RawMatch;
use crate::utils::error::ParseError;
use log::{debug, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Parse decoded match JSON
///
/// **Public** - main entry point for parsing
///
/// # Errors
/// * `ParseError::JsonError` - Invalid JSON structure
/// * `ParseError::InvalidFormat` - `null` document or missing identity
pub fn parse_match(raw: &serde_json::Value) -> Result<RawMatch, ParseError> {
    if raw.is_null() {
        return Err(ParseError::InvalidFormat("match document is null".to_string()));
    }

    if !raw.is_object() {
        return Err(ParseError::InvalidFormat(
            "match document must be a JSON object".to_string(),
        ));
    }

    let demo: RawMatch = serde_json::from_value(raw.clone())?;
    validate_match_format(&demo)?;

    debug!(
        "Parsed match {} on {}: {} rounds, {} kills, {} damages, {} sights, {} fires",
        demo.hash,
        demo.map_name,
        demo.rounds.len(),
        demo.kills.len(),
        demo.damages.len(),
        demo.first_sights.len(),
        demo.weapon_fires.len()
    );

    Ok(demo)
}

/// Read and parse a decoded match file
///
/// # Errors
/// * `ParseError::IoError` - File cannot be opened
/// * `ParseError::JsonError` / `ParseError::InvalidFormat` - see [`parse_match`]
pub fn read_match(path: impl AsRef<Path>) -> Result<RawMatch, ParseError> {
    let path = path.as_ref();
    debug!("Reading match from: {}", path.display());

    let file = File::open(path)?;
    let raw: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;

    parse_match(&raw)
}

/// Check identity fields and round boundaries
///
/// **Public** - also used by the pipeline entry point
pub fn validate_match_format(demo: &RawMatch) -> Result<(), ParseError> {
    if demo.hash.trim().is_empty() {
        return Err(ParseError::InvalidFormat("match hash is empty".to_string()));
    }

    if !demo.tick_rate.is_finite() || demo.tick_rate <= 0.0 {
        return Err(ParseError::InvalidFormat(format!(
            "tick rate must be positive, got {}",
            demo.tick_rate
        )));
    }

    for round in &demo.rounds {
        if round.end_tick < round.start_tick {
            return Err(ParseError::InvalidFormat(format!(
                "round {} ends before it starts ({} < {})",
                round.number, round.end_tick, round.start_tick
            )));
        }

        if round.freeze_end_tick < round.start_tick || round.freeze_end_tick > round.end_tick {
            warn!(
                "Round {} freeze end {} outside [{}, {}]",
                round.number, round.freeze_end_tick, round.start_tick, round.end_tick
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        json!({
            "hash": "abc123",
            "map_name": "de_mirage",
            "tick_rate": 64.0,
            "rounds": [
                { "number": 1, "start_tick": 0, "freeze_end_tick": 100, "end_tick": 2000, "winner": "CT" }
            ],
            "kills": [
                { "tick": 500, "round": 1, "killer": 1, "victim": 2, "killer_team": "CT", "victim_team": "T", "weapon": "ak47" }
            ]
        })
    }

    #[test]
    fn test_parse_minimal_match() {
        let demo = parse_match(&minimal()).unwrap();
        assert_eq!(demo.hash, "abc123");
        assert_eq!(demo.rounds.len(), 1);
        assert_eq!(demo.kills[0].killer, Some(1));
        assert!(demo.damages.is_empty());
        assert!(demo.played_at.is_none());
    }

    #[test]
    fn test_parse_null_match() {
        let result = parse_match(&serde_json::Value::Null);
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_non_object() {
        assert!(parse_match(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_parse_zero_tick_rate() {
        let mut raw = minimal();
        raw["tick_rate"] = json!(0.0);
        assert!(matches!(parse_match(&raw), Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_empty_hash() {
        let mut raw = minimal();
        raw["hash"] = json!("  ");
        assert!(parse_match(&raw).is_err());
    }

    #[test]
    fn test_parse_inverted_round() {
        let mut raw = minimal();
        raw["rounds"][0]["end_tick"] = json!(-5);
        assert!(parse_match(&raw).is_err());
    }

    #[test]
    fn test_read_match_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match.json");
        std::fs::write(&path, minimal().to_string()).unwrap();

        let demo = read_match(&path).unwrap();
        assert_eq!(demo.map_name, "de_mirage");
    }
}
