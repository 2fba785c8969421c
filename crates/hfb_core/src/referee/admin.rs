//! Administrative commands
//!
//! Room admins correct the referee between downs: down and distance,
//! possession, score and the spot of the ball. Every setter validates its
//! input first and leaves the match untouched when it refuses.

use serde::{Deserialize, Serialize};

use crate::error::AdminError;
use crate::field::{is_in_red_zone, FieldPosition, Team};
use crate::referee::{DownSetup, Mode, Referee};
use crate::room::Room;
use crate::stats::StatsSink;

/// Hike-clock administration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HikeClockCommand {
    /// Stop the clock of the current down only
    Clear,
    /// No hike clock on this or any later down
    Disable,
    /// Hike clocks again from the next down on
    Enable,
}

/// Parses a `red`/`blue` argument.
pub fn parse_team(arg: &str) -> Result<Team, AdminError> {
    match arg.parse::<Team>() {
        Ok(team) if team.is_playing() => Ok(team),
        Ok(team) => Err(AdminError::InvalidTeam(team.name().to_string())),
        Err(other) => Err(AdminError::InvalidTeam(other)),
    }
}

fn playing(team: Team) -> Result<Team, AdminError> {
    if team.is_playing() {
        Ok(team)
    } else {
        Err(AdminError::InvalidTeam(team.name().to_string()))
    }
}

impl<S: StatsSink> Referee<S> {
    // ===========================================
    // Preconditions
    // ===========================================

    fn require_game(&self) -> Result<(), AdminError> {
        if self.state.in_progress {
            Ok(())
        } else {
            Err(AdminError::NoGameInProgress)
        }
    }

    /// Ball spotted and waiting for the hike, outside a conversion.
    fn require_between_downs(&self) -> Result<(), AdminError> {
        self.require_game()?;
        if self.state.mode != Mode::WaitingForHike {
            return Err(AdminError::NotBetweenDowns { mode: self.state.mode });
        }
        if self.state.play.conversion {
            return Err(AdminError::ConversionInProgress);
        }
        Ok(())
    }

    /// Waiting for the hike or during the down itself.
    fn require_series(&self) -> Result<(), AdminError> {
        self.require_game()?;
        if !matches!(self.state.mode, Mode::WaitingForHike | Mode::Down) {
            return Err(AdminError::NotBetweenDowns { mode: self.state.mode });
        }
        if self.state.play.conversion {
            return Err(AdminError::ConversionInProgress);
        }
        Ok(())
    }

    // ===========================================
    // Setters
    // ===========================================

    pub fn set_down_count(&mut self, down: i64) -> Result<(), AdminError> {
        self.require_series()?;
        if !(1..=4).contains(&down) {
            return Err(AdminError::InvalidDown(down));
        }

        log::info!("down changed from {} to {}", self.state.down.count, down);
        self.state.down.count = down as u8;
        Ok(())
    }

    pub fn set_distance(&mut self, room: &mut dyn Room, distance: i64) -> Result<(), AdminError> {
        self.require_series()?;
        if !(1..=20).contains(&distance) {
            return Err(AdminError::InvalidDistance(distance));
        }

        log::info!("distance changed from {} to {}", self.state.down.distance, distance);
        self.state.down.distance = distance as i32;

        let defending = self.state.team_with_ball.opponent();
        if !is_in_red_zone(self.state.ball_position, defending) {
            self.render_down_markers(room);
        }
        Ok(())
    }

    /// Gives the ball to `team`, or to the other team when `None`. Down and
    /// distance are kept.
    pub fn set_possession(&mut self, room: &mut dyn Room, team: Option<Team>) -> Result<(), AdminError> {
        self.require_between_downs()?;
        let team = match team {
            Some(team) => playing(team)?,
            None => self.state.team_with_ball.opponent(),
        };

        log::info!("possession set to {}", team);
        self.state.team_with_ball = team;
        self.state.down.goal_mode = false;
        self.render_down_markers(room);
        self.spot_ball_for_hike(room);
        Ok(())
    }

    /// Overrides a team's score. Allowed at any point of a running game.
    pub fn set_score(&mut self, team: Team, score: i64) -> Result<(), AdminError> {
        self.require_game()?;
        let team = playing(team)?;
        let points = u32::try_from(score).map_err(|_| AdminError::InvalidScore(score))?;

        log::info!("{} score changed from {} to {}", team, self.state.score.get(team), points);
        self.state.score.set(team, points);
        Ok(())
    }

    /// Moves the line of scrimmage to `side` `yards` and sets the same down
    /// again there.
    pub fn set_ball_position(
        &mut self,
        room: &mut dyn Room,
        side: Team,
        yards: i64,
    ) -> Result<(), AdminError> {
        self.require_between_downs()?;
        let side = playing(side)?;
        if !(1..=50).contains(&yards) {
            return Err(AdminError::InvalidYardLine(yards));
        }

        let spot = FieldPosition::new(side, yards as i32);
        log::info!("ball moved to {}", spot);
        self.state.ball_position = spot;
        self.set_down(room, DownSetup::replay());
        Ok(())
    }

    /// Calls back a live down and replays it from the same spot.
    pub fn unhike(&mut self, room: &mut dyn Room) -> Result<(), AdminError> {
        self.require_game()?;
        if self.state.mode != Mode::Down {
            return Err(AdminError::NoLiveDown { mode: self.state.mode });
        }
        if self.state.play.conversion {
            return Err(AdminError::ConversionInProgress);
        }

        log::info!("down called back");
        self.set_down(room, DownSetup::replay());
        Ok(())
    }

    /// Puts both teams back on their side of the ball.
    pub fn reset_players(&mut self, room: &mut dyn Room) -> Result<(), AdminError> {
        self.require_game()?;
        if self.state.mode != Mode::WaitingForHike {
            return Err(AdminError::NotBetweenDowns { mode: self.state.mode });
        }

        self.reset_formation(room);
        Ok(())
    }

    pub fn hike_clock(&mut self, command: HikeClockCommand) -> Result<(), AdminError> {
        self.require_game()?;

        match command {
            HikeClockCommand::Clear => self.clear_hike_clock(),
            HikeClockCommand::Disable => {
                self.down.hike_clock_enabled = false;
                self.clear_hike_clock();
            }
            HikeClockCommand::Enable => self.down.hike_clock_enabled = true,
        }
        log::info!("hike clock {:?}", command);
        Ok(())
    }
}
