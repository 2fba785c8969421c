//! Punt
//!
//! Requested by the offense between downs. The ball stays on the line of
//! scrimmage; the punting team lines up behind it and the receivers wait on
//! their return line.

use crate::error::AdminError;
use crate::field::{coordinate_from_yards, Team};
use crate::referee::{DownState, Mode, Referee};
use crate::room::{Marker, PlayerId, Room, RoomExt};
use crate::ruling::Ruling;
use crate::stats::StatsSink;

impl<S: StatsSink> Referee<S> {
    /// `player` asks to punt instead of running the next down.
    pub fn request_punt(&mut self, room: &mut dyn Room, player: PlayerId) -> Result<(), AdminError> {
        self.check_kick_request(room, player)?;

        log::info!("{} requested a punt", player);
        self.set_punt(room, self.state.team_with_ball);
        Ok(())
    }

    /// Preconditions shared by punt and field-goal requests.
    pub(crate) fn check_kick_request(&self, room: &dyn Room, player: PlayerId) -> Result<(), AdminError> {
        if !self.state.in_progress {
            return Err(AdminError::NoGameInProgress);
        }
        if self.state.paused {
            return Err(AdminError::Paused);
        }

        let disc = room.player(player).ok_or(AdminError::UnknownPlayer(player))?;
        if disc.team != self.state.team_with_ball {
            return Err(AdminError::NotInPossession(player));
        }
        if self.state.mode != Mode::WaitingForHike {
            return Err(AdminError::NotBetweenDowns { mode: self.state.mode });
        }
        if self.state.play.conversion {
            return Err(AdminError::ConversionInProgress);
        }

        let ball = room.ball().ok_or(AdminError::NoGameInProgress)?;
        let distance = disc.gap_to_ball(&ball);
        let max = self.config.kicks.request_max_distance;
        if distance > max {
            return Err(AdminError::TooFarFromBall { player, distance, max });
        }

        Ok(())
    }

    pub(crate) fn set_punt(&mut self, room: &mut dyn Room, team: Team) {
        self.state.mode = Mode::None;
        self.reset_play(room);
        self.reset_series();

        let spot = self.state.ball_position;
        self.state.team_with_ball = team;
        self.state.down = DownState::new_series(self.config.down.yards_to_gain);

        self.announce(Ruling::PuntSet { team, spot });

        let ball_at = coordinate_from_yards(spot);
        room.stop_ball();
        room.set_ball_position(ball_at);
        room.set_ball_kick_force(self.config.kicks.kickoff_kick_force);

        self.line_up_free_kick(room, team, ball_at.x);

        room.clear_marker(Marker::FirstDownLine);
        self.render_ball_line(room, ball_at.x);

        room.block_team(team.opponent());

        self.state.mode = Mode::Punt;
    }
}
