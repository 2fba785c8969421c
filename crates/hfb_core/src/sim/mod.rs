//! Scripted matches
//!
//! A [`Scenario`] is a lineup plus a list of host events (ticks, touches,
//! chat, disc moves, admin commands) replayed against a [`ScriptedRoom`].
//! Replays are deterministic: the referee RNG is seeded from the rules.
//!
//! ## Format
//!
//! ```yaml
//! name: kickoff out of bounds
//! profile: competitive
//! red: [1, 2, 3]
//! blue: [4, 5, 6]
//! steps:
//!   - step: kick
//!     player: 2
//!   - step: place_ball
//!     x: 300
//!     y: 280
//!     vy: 3
//!   - step: tick
//! ```

pub mod room;

#[cfg(test)]
pub(crate) mod fixtures;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::RefereeConfig;
use crate::error::{AdminError, ScenarioError};
use crate::field::{Team, Vec2};
use crate::referee::{HikeClockCommand, MatchState, Referee};
use crate::room::PlayerId;
use crate::ruling::Ruling;
use crate::stats::StatsLedger;

pub use room::ScriptedRoom;

fn one() -> u32 {
    1
}

/// One host event of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Host ticks; with `advance` the room integrates velocities first
    Tick {
        #[serde(default = "one")]
        count: u32,
        #[serde(default)]
        advance: bool,
    },
    /// Ticks covering `ms` of engine time
    Wait { ms: u64 },
    MovePlayer { player: u32, x: f64, y: f64 },
    PlaceBall {
        x: f64,
        y: f64,
        #[serde(default)]
        vx: f64,
        #[serde(default)]
        vy: f64,
    },
    Kick { player: u32 },
    Chat { player: u32, message: String },
    Leave { player: u32 },
    ChangeTeam { player: u32, team: Team },
    Pause,
    Unpause,
    Stop,

    // Admin commands and requests
    SetDown { down: i64 },
    SetDistance { distance: i64 },
    SetPossession {
        #[serde(default)]
        team: Option<Team>,
    },
    SetScore { team: Team, score: i64 },
    SetBall { team: Team, yards: i64 },
    Unhike,
    ResetPlayers,
    HikeClock { command: HikeClockCommand },
    Punt { player: u32 },
    FieldGoal { player: u32 },
}

/// Lineup and events of a scripted match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    /// Rules preset; ignored when `rules` is given
    #[serde(default)]
    pub profile: Option<String>,
    /// Inline rules, missing fields taken from the defaults
    #[serde(default)]
    pub rules: Option<RefereeConfig>,
    pub red: Vec<u32>,
    pub blue: Vec<u32>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Ruling tagged with the step that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportedRuling {
    /// 0 for the game start, then 1-based step index
    pub step: usize,
    pub elapsed_ms: u64,
    #[serde(flatten)]
    pub ruling: Ruling,
}

/// Outcome of a replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub rulings: Vec<ReportedRuling>,
    pub state: MatchState,
    pub stats: StatsLedger,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads a `.json`, `.yaml` or `.yml` scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
            Some("json") => Self::from_json_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            other => Err(ScenarioError::UnknownFormat(other.unwrap_or("").to_string())),
        }
    }

    /// Rules the scenario runs with.
    pub fn config(&self) -> Result<RefereeConfig, ScenarioError> {
        let config = match (&self.rules, &self.profile) {
            (Some(rules), _) => rules.clone(),
            (None, Some(profile)) => RefereeConfig::preset(profile)
                .ok_or_else(|| ScenarioError::UnknownProfile(profile.clone()))?,
            (None, None) => RefereeConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Starts a game on the lineup and replays every step.
    pub fn run(&self) -> Result<ScenarioReport, ScenarioError> {
        let config = self.config()?;
        let mut runner = Runner {
            room: ScriptedRoom::lineup(&self.red, &self.blue),
            referee: Referee::new(config),
            rulings: Vec::new(),
        };

        log::info!("running scenario '{}' ({} steps)", self.name, self.steps.len());

        let rulings = runner.referee.on_game_start(&mut runner.room);
        runner.record(0, rulings);

        for (index, step) in self.steps.iter().enumerate() {
            runner.apply(index + 1, step)?;
        }

        Ok(ScenarioReport {
            name: self.name.clone(),
            rulings: runner.rulings,
            state: runner.referee.snapshot(),
            stats: runner.referee.stats().clone(),
        })
    }
}

struct Runner {
    room: ScriptedRoom,
    referee: Referee,
    rulings: Vec<ReportedRuling>,
}

impl Runner {
    fn record(&mut self, step: usize, rulings: Vec<Ruling>) {
        let elapsed_ms = self.referee.elapsed_ms();
        self.rulings.extend(rulings.into_iter().map(|ruling| ReportedRuling {
            step,
            elapsed_ms,
            ruling,
        }));
    }

    fn ticks(&mut self, step: usize, count: u32, advance: bool) {
        for _ in 0..count {
            if advance {
                self.room.advance();
            }
            let rulings = self.referee.on_tick(&mut self.room);
            self.record(step, rulings);
        }
    }

    fn known(&self, step: usize, player: u32) -> Result<PlayerId, ScenarioError> {
        let id = PlayerId(player);
        if self.room.disc(id).is_some() {
            Ok(id)
        } else {
            Err(ScenarioError::UnknownPlayer { step, player: id })
        }
    }

    fn admin(&mut self, step: usize, result: Result<(), AdminError>) -> Result<(), ScenarioError> {
        result.map_err(|source| ScenarioError::Admin { step, source })?;
        let rulings = self.referee.drain();
        self.record(step, rulings);
        Ok(())
    }

    fn apply(&mut self, step: usize, event: &Step) -> Result<(), ScenarioError> {
        log::debug!("step {}: {:?}", step, event);

        let rulings = match event {
            Step::Tick { count, advance } => {
                self.ticks(step, *count, *advance);
                return Ok(());
            }
            Step::Wait { ms } => {
                let count = self.referee.config().ms_to_ticks(*ms);
                self.ticks(step, count, false);
                return Ok(());
            }
            Step::MovePlayer { player, x, y } => {
                let id = self.known(step, *player)?;
                self.room.move_player(id, Vec2::new(*x, *y));
                return Ok(());
            }
            Step::PlaceBall { x, y, vx, vy } => {
                self.room.place_ball(Vec2::new(*x, *y), Vec2::new(*vx, *vy));
                return Ok(());
            }
            Step::Kick { player } => {
                let id = self.known(step, *player)?;
                self.referee.on_ball_kick(&mut self.room, id)
            }
            Step::Chat { player, message } => {
                let id = self.known(step, *player)?;
                self.referee.on_chat(&mut self.room, id, message)
            }
            Step::Leave { player } => {
                let id = self.known(step, *player)?;
                match self.room.remove_player(id) {
                    Some(disc) => self.referee.on_player_leave(&mut self.room, &disc),
                    None => Vec::new(),
                }
            }
            Step::ChangeTeam { player, team } => {
                let id = self.known(step, *player)?;
                match self.room.change_team(id, *team) {
                    Some(disc) => self.referee.on_player_team_change(&mut self.room, &disc),
                    None => Vec::new(),
                }
            }
            Step::Pause => self.referee.on_pause(),
            Step::Unpause => self.referee.on_unpause(),
            Step::Stop => self.referee.on_game_stop(&mut self.room),

            Step::SetDown { down } => {
                let result = self.referee.set_down_count(*down);
                return self.admin(step, result);
            }
            Step::SetDistance { distance } => {
                let result = self.referee.set_distance(&mut self.room, *distance);
                return self.admin(step, result);
            }
            Step::SetPossession { team } => {
                let result = self.referee.set_possession(&mut self.room, *team);
                return self.admin(step, result);
            }
            Step::SetScore { team, score } => {
                let result = self.referee.set_score(*team, *score);
                return self.admin(step, result);
            }
            Step::SetBall { team, yards } => {
                let result = self.referee.set_ball_position(&mut self.room, *team, *yards);
                return self.admin(step, result);
            }
            Step::Unhike => {
                let result = self.referee.unhike(&mut self.room);
                return self.admin(step, result);
            }
            Step::ResetPlayers => {
                let result = self.referee.reset_players(&mut self.room);
                return self.admin(step, result);
            }
            Step::HikeClock { command } => {
                let result = self.referee.hike_clock(*command);
                return self.admin(step, result);
            }
            Step::Punt { player } => {
                let id = self.known(step, *player)?;
                let result = self.referee.request_punt(&mut self.room, id);
                return self.admin(step, result);
            }
            Step::FieldGoal { player } => {
                let id = self.known(step, *player)?;
                let result = self.referee.request_field_goal(&mut self.room, id);
                return self.admin(step, result);
            }
        };

        self.record(step, rulings);
        Ok(())
    }
}
