//! Referee configuration
//!
//! Every tunable constant of the rules lives in [`RefereeConfig`]. Values can
//! come from a preset, from an environment-selected profile or from a JSON or
//! YAML file; partial files fill the missing fields from the defaults.
//!
//! ## Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | clock | Tick rate, regulation, hike/kick/stall clocks |
//! | down | Yards to gain, scrimmage distances, interception geometry |
//! | penalties | Penalty yardage, red-zone escalation |
//! | tackle | Contact radius, touches to tackle, fumbles |
//! | crowding | Anti-stalling zone and threshold |
//! | kicks | Kickoff, punt, field goal and extra point layout |
//! | scoring | Points and post-score delays |
//!
//! ## Usage
//!
//! ```rust
//! use hfb_core::config::RefereeConfig;
//!
//! // Default rules
//! let config = RefereeConfig::default();
//!
//! // Casual preset (longer clocks, harder to tackle)
//! let casual = RefereeConfig::casual();
//!
//! // From environment variable
//! let from_env = RefereeConfig::from_env_or_default();
//! # assert!(config.validate().is_ok() && casual.validate().is_ok() && from_env.validate().is_ok());
//! ```
//!
//! ## Environment Variables
//!
//! - `HFB_RULES_PROFILE`: Select preset (casual, competitive, default)

pub mod rules;

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

pub use rules::{
    ClockRules, CrowdingRules, DownRules, KickRules, PenaltyRules, ScoringRules, TackleRules,
};

/// Environment variable naming the rules preset
pub const PROFILE_ENV_VAR: &str = "HFB_RULES_PROFILE";

/// Complete rule set of a referee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefereeConfig {
    pub clock: ClockRules,
    pub down: DownRules,
    pub penalties: PenaltyRules,
    pub tackle: TackleRules,
    pub crowding: CrowdingRules,
    pub kicks: KickRules,
    pub scoring: ScoringRules,
    /// Seed of the fumble and formation RNG
    pub seed: u64,
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            clock: ClockRules::default(),
            down: DownRules::default(),
            penalties: PenaltyRules::default(),
            tackle: TackleRules::default(),
            crowding: CrowdingRules::default(),
            kicks: KickRules::default(),
            scoring: ScoringRules::default(),
            seed: 0x4846_4252,
        }
    }
}

impl RefereeConfig {
    /// Casual preset - longer clocks, harder to bring a runner down, fewer fumbles
    pub fn casual() -> Self {
        Self {
            clock: ClockRules {
                hike_clock_ms: 20_000,
                blitz_delay_ms: 15_000,
                ..ClockRules::default()
            },
            tackle: TackleRules {
                touches_to_tackle_runner: 5, // Runners shrug off arm tackles
                touches_to_tackle_quarterback: 3,
                fumble_chance: 0.5,
                ..TackleRules::default()
            },
            crowding: CrowdingRules {
                threshold_ms: 4_000,
                ..CrowdingRules::default()
            },
            ..Self::default()
        }
    }

    /// Competitive preset - short clocks, strict crowding
    pub fn competitive() -> Self {
        Self {
            clock: ClockRules {
                hike_clock_ms: 12_000,
                blitz_delay_ms: 10_000,
                ..ClockRules::default()
            },
            crowding: CrowdingRules {
                threshold_ms: 2_500,
                ..CrowdingRules::default()
            },
            penalties: PenaltyRules {
                max_red_zone_penalties: 2,
                ..PenaltyRules::default()
            },
            ..Self::default()
        }
    }

    /// Preset by name (`default`, `casual`, `competitive`).
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "" | "default" => Some(Self::default()),
            "casual" => Some(Self::casual()),
            "competitive" => Some(Self::competitive()),
            _ => None,
        }
    }

    /// Load from environment variable HFB_RULES_PROFILE or use default
    pub fn from_env_or_default() -> Self {
        let profile = env::var(PROFILE_ENV_VAR).unwrap_or_default();
        Self::preset(&profile).unwrap_or_default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a `.json`, `.yaml` or `.yml` rules file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
            Some("json") => Self::from_json_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            other => Err(ConfigError::UnknownFormat(other.unwrap_or("").to_string())),
        }
    }

    /// Rejects rule sets the referee cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock.tick_rate_hz == 0 {
            return Err(ConfigError::invalid("clock.tick_rate_hz", "must be positive"));
        }
        if !(1..=50).contains(&self.down.yards_to_gain) {
            return Err(ConfigError::invalid("down.yards_to_gain", "must be within 1..=50"));
        }
        if !(1..=50).contains(&self.down.conversion_distance) {
            return Err(ConfigError::invalid(
                "down.conversion_distance",
                "must be within 1..=50",
            ));
        }
        if self.tackle.touches_to_tackle_runner == 0 || self.tackle.touches_to_tackle_quarterback == 0
        {
            return Err(ConfigError::invalid("tackle", "touches to tackle must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.tackle.fumble_chance) {
            return Err(ConfigError::invalid("tackle.fumble_chance", "must be within 0.0..=1.0"));
        }
        if self.tackle.contact_radius < 0.0 {
            return Err(ConfigError::invalid("tackle.contact_radius", "must not be negative"));
        }
        if self.penalties.max_red_zone_penalties == 0 {
            return Err(ConfigError::invalid(
                "penalties.max_red_zone_penalties",
                "must be at least 1",
            ));
        }
        for (field, yards) in [
            ("kicks.touchback_yard_line", self.kicks.touchback_yard_line),
            ("kicks.safety_kick_yard_line", self.kicks.safety_kick_yard_line),
            ("kicks.kickoff_out_of_bounds_yard_line", self.kicks.kickoff_out_of_bounds_yard_line),
            ("kicks.extra_point_yard_line", self.kicks.extra_point_yard_line),
        ] {
            if !(1..=50).contains(&yards) {
                return Err(ConfigError::invalid(field, "must be a yard line within 1..=50"));
            }
        }
        Ok(())
    }

    /// Duration of one host tick in milliseconds.
    pub fn tick_ms(&self) -> f64 {
        1000.0 / self.clock.tick_rate_hz.max(1) as f64
    }

    /// Converts a duration to a number of host ticks (rounded up).
    pub fn ms_to_ticks(&self, ms: u64) -> u32 {
        let rate = self.clock.tick_rate_hz.max(1) as u64;
        ((ms * rate).div_ceil(1000)) as u32
    }
}
