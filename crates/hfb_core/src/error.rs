//! Error types
//!
//! Rule violations are never errors: they are rulings. Errors only cover
//! administrative input the referee refuses and files it cannot load.

use thiserror::Error;

use crate::referee::Mode;
use crate::room::PlayerId;

/// Refused administrative command. State is left unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdminError {
    #[error("No game in progress")]
    NoGameInProgress,

    #[error("Not allowed during {mode}: wait for the ball to be spotted")]
    NotBetweenDowns { mode: Mode },

    #[error("No down in progress (currently {mode})")]
    NoLiveDown { mode: Mode },

    #[error("Not allowed during a conversion attempt")]
    ConversionInProgress,

    #[error("Invalid down {0}: expected 1 to 4")]
    InvalidDown(i64),

    #[error("Invalid distance {0}: expected 1 to 20")]
    InvalidDistance(i64),

    #[error("Invalid score {0}: must not be negative")]
    InvalidScore(i64),

    #[error("Invalid yard line {0}: expected 1 to 50")]
    InvalidYardLine(i64),

    #[error("Invalid team '{0}': expected red or blue")]
    InvalidTeam(String),

    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("Player {0} is not on the team with the ball")]
    NotInPossession(PlayerId),

    #[error("Player {player} is too far from the ball ({distance:.1} > {max:.1})")]
    TooFarFromBall { player: PlayerId, distance: f64, max: f64 },

    #[error("Field goal of {yards} yards exceeds the {max}-yard limit")]
    FieldGoalOutOfRange { yards: i32, max: i32 },

    #[error("The game is paused")]
    Paused,
}

impl AdminError {
    /// Whether the same command may succeed later without changing its input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AdminError::NoGameInProgress
                | AdminError::NotBetweenDowns { .. }
                | AdminError::NoLiveDown { .. }
                | AdminError::ConversionInProgress
                | AdminError::TooFarFromBall { .. }
                | AdminError::Paused
        )
    }
}

/// Rules file could not be loaded
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Unknown rules file format '{0}': expected json, yaml or yml")]
    UnknownFormat(String),
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { field, reason: reason.into() }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, ConfigError::Io(_))
    }
}

/// Scenario script could not be loaded or replayed
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Rules error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown scenario format '{0}': expected json, yaml or yml")]
    UnknownFormat(String),

    #[error("Unknown rules profile '{0}'")]
    UnknownProfile(String),

    #[error("Step {step}: unknown player {player}")]
    UnknownPlayer { step: usize, player: PlayerId },

    #[error("Step {step}: {source}")]
    Admin {
        step: usize,
        #[source]
        source: AdminError,
    },
}

impl ScenarioError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ScenarioError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_messages() {
        assert_eq!(
            AdminError::InvalidDown(7).to_string(),
            "Invalid down 7: expected 1 to 4"
        );
        assert_eq!(
            AdminError::NotBetweenDowns { mode: Mode::Down }.to_string(),
            "Not allowed during down: wait for the ball to be spotted"
        );
    }

    #[test]
    fn test_recoverability() {
        assert!(AdminError::Paused.is_recoverable());
        assert!(!AdminError::InvalidScore(-1).is_recoverable());
        assert!(!ConfigError::invalid("seed", "bad").is_recoverable());
    }
}
