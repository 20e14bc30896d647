//! Configuration and constants for the pipeline and the CLI.
//!
//! Every heuristic threshold used by the aggregation passes lives in
//! [`PipelineConfig`]. Passes never hardcode windows or cutoffs; they read
//! them from the config handed to [`crate::aggregator::aggregate_match`].

use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default directory for the JSON match store
pub const DEFAULT_STORE_DIR: &str = "demostats-data";

// Source-engine world units are inches
pub const UNITS_TO_METERS: f64 = 0.0254;

/// Tunable thresholds for every aggregation pass
///
/// **Public** - injected into the pipeline call
///
/// All fields have defaults, so a TOML file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum delay between a death and its trade (seconds)
    pub trade_window_secs: f64,

    /// Window after a flash in which a kill on the blinded player counts (seconds)
    pub flash_effect_window_secs: f64,

    /// Look-back window for a supporting flash before an AWP death (seconds)
    pub awp_flash_window_secs: f64,

    /// Engagement window ending at the kill for TTK/TTD (seconds)
    pub ttk_window_secs: f64,

    /// Maximum horizontal speed of an accurate (counter-strafed) shot
    pub counter_strafe_max_speed: f64,

    /// Crosshair placement samples under this angle count as "good" (degrees)
    pub crosshair_good_deg: f64,

    /// Pre-shot corrections under this angle count as "small" (degrees)
    pub correction_small_deg: f64,

    /// Duel counts below this are flagged as low sample in reports
    pub low_sample_duels: u32,

    /// Role classification thresholds
    pub roles: RoleThresholds,

    /// Buy-type equipment value thresholds
    pub buys: BuyThresholds,
}

/// Role classification thresholds (priority order: AWPer, Entry, Support)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleThresholds {
    /// Share of kills with the AWP above which a player is an AWPer
    pub awp_kill_share: f64,

    /// Opening kills per round above which a player is an entry
    pub entry_openings_per_round: f64,

    /// Flash assists per round above which a player is support
    pub support_flash_assists_per_round: f64,

    /// Utility damage per round above which a player is support
    pub support_utility_damage_per_round: f64,
}

/// Equipment value thresholds for buy classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyThresholds {
    pub full: u32,
    pub force: u32,
    pub half: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            trade_window_secs: 5.0,
            flash_effect_window_secs: 1.5,
            awp_flash_window_secs: 3.0,
            ttk_window_secs: 3.0,
            counter_strafe_max_speed: 34.0,
            crosshair_good_deg: 5.0,
            correction_small_deg: 2.0,
            low_sample_duels: 10,
            roles: RoleThresholds::default(),
            buys: BuyThresholds::default(),
        }
    }
}

impl Default for RoleThresholds {
    fn default() -> Self {
        Self {
            awp_kill_share: 0.30,
            entry_openings_per_round: 0.12,
            support_flash_assists_per_round: 0.08,
            support_utility_damage_per_round: 15.0,
        }
    }
}

impl Default for BuyThresholds {
    fn default() -> Self {
        Self {
            full: 4500,
            force: 2000,
            half: 1000,
        }
    }
}

impl PipelineConfig {
    /// Create a config with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trade_window_secs(mut self, secs: f64) -> Self {
        self.trade_window_secs = secs;
        self
    }

    pub fn with_flash_effect_window_secs(mut self, secs: f64) -> Self {
        self.flash_effect_window_secs = secs;
        self
    }

    pub fn with_awp_flash_window_secs(mut self, secs: f64) -> Self {
        self.awp_flash_window_secs = secs;
        self
    }

    pub fn with_ttk_window_secs(mut self, secs: f64) -> Self {
        self.ttk_window_secs = secs;
        self
    }

    pub fn with_counter_strafe_max_speed(mut self, speed: f64) -> Self {
        self.counter_strafe_max_speed = speed;
        self
    }

    pub fn with_roles(mut self, roles: RoleThresholds) -> Self {
        self.roles = roles;
        self
    }

    /// Convert a window in seconds to a whole number of ticks
    ///
    /// **Public** - every windowed pass uses the same rounding
    pub fn window_ticks(secs: f64, tick_rate: f64) -> i64 {
        (secs * tick_rate).round() as i64
    }

    /// Reject windows and thresholds that cannot produce meaningful results
    ///
    /// # Errors
    /// * `ConfigError::InvalidValue` - negative or non-finite value
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("trade_window_secs", self.trade_window_secs),
            ("flash_effect_window_secs", self.flash_effect_window_secs),
            ("awp_flash_window_secs", self.awp_flash_window_secs),
            ("ttk_window_secs", self.ttk_window_secs),
            ("counter_strafe_max_speed", self.counter_strafe_max_speed),
            ("crosshair_good_deg", self.crosshair_good_deg),
            ("correction_small_deg", self.correction_small_deg),
            ("roles.awp_kill_share", self.roles.awp_kill_share),
            ("roles.entry_openings_per_round", self.roles.entry_openings_per_round),
            (
                "roles.support_flash_assists_per_round",
                self.roles.support_flash_assists_per_round,
            ),
            (
                "roles.support_utility_damage_per_round",
                self.roles.support_utility_damage_per_round,
            ),
        ];

        for (name, value) in windows {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if !(self.buys.full >= self.buys.force && self.buys.force >= self.buys.half) {
            return Err(ConfigError::InvalidValue(
                "buy thresholds must satisfy full >= force >= half".to_string(),
            ));
        }

        Ok(())
    }
}

/// Load a pipeline config from a TOML file
///
/// # Errors
/// * `ConfigError::IoError` - If file cannot be read
/// * `ConfigError::ParseFailed` - If TOML is invalid
/// * `ConfigError::InvalidValue` - If a threshold is out of range
///
/// # Example
/// ```ignore
/// let config = load_config("demostats.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading pipeline config from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    let config: PipelineConfig = toml::from_str(&contents)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_ticks_rounds() {
        assert_eq!(PipelineConfig::window_ticks(5.0, 64.0), 320);
        assert_eq!(PipelineConfig::window_ticks(1.5, 64.0), 96);
        assert_eq!(PipelineConfig::window_ticks(5.0, 128.3), 642);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: PipelineConfig = toml::from_str(
            r#"
            trade_window_secs = 3.0

            [roles]
            awp_kill_share = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.trade_window_secs, 3.0);
        assert_eq!(config.roles.awp_kill_share, 0.5);
        assert_eq!(config.roles.entry_openings_per_round, 0.12);
        assert_eq!(config.ttk_window_secs, 3.0);
        assert_eq!(config.buys.full, 4500);
    }

    #[test]
    fn test_validate_rejects_negative_window() {
        let config = PipelineConfig::new().with_trade_window_secs(-1.0);
        assert!(config.validate().is_err());

        let config = PipelineConfig::new().with_ttk_window_secs(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unordered_buys() {
        let mut config = PipelineConfig::new();
        config.buys.half = 5000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demostats.toml");
        fs::write(&path, "flash_effect_window_secs = 2.0\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.flash_effect_window_secs, 2.0);
        assert_eq!(config.trade_window_secs, 5.0);
    }
}
