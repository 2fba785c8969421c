//! Extra point and conversion
//!
//! After a touchdown the scoring team gets the ball at the opponent's 10. It
//! either kicks (one point through the goal line) or says `hike` to run a
//! single conversion down from the same spot. Every outcome of the kick ends
//! with a kickoff by the scoring team.

use crate::field::math::{ball_path_from, segment_intersection};
use crate::field::{
    ball_within_goal_line, goal_line, is_out_of_bounds, measures, FieldPosition, Team, Vec2,
};
use crate::referee::{DownState, Mode, Referee, ScheduledAction};
use crate::room::{Marker, PlayerDisc, PlayerId, Room, RoomExt};
use crate::rules::down::HikeOutcome;
use crate::ruling::{ExtraPointMiss, Ruling};
use crate::stats::StatsSink;
use crate::timer::TimerId;

/// Length of the projected path checked against the goal line
const KICK_PATH_LENGTH: f64 = 2_000.0;

#[derive(Debug, Clone, Default)]
pub struct ExtraPointPlay {
    pub(crate) clock: Option<TimerId>,
}

impl ExtraPointPlay {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

impl<S: StatsSink> Referee<S> {
    /// Sets up the kick. A `silent` set (after a refused conversion hike)
    /// keeps the running clock and leaves the players where they are.
    pub(crate) fn set_extra_point(&mut self, room: &mut dyn Room, team: Team, silent: bool) {
        let remaining = if silent {
            self.extra_point
                .clock
                .and_then(|id| self.timers.remaining_time(id, self.now()))
        } else {
            None
        };

        self.state.mode = Mode::None;
        self.reset_play(room);
        self.reset_series();

        let spot = FieldPosition::new(team.opponent(), self.config.kicks.extra_point_yard_line);
        self.state.team_with_ball = team;
        self.state.ball_position = spot;
        self.state.down = DownState::new_series(self.config.down.yards_to_gain);

        let start = self.ball_start();
        room.stop_ball();
        room.set_ball_position(start);
        room.feather_players();
        self.down.ball_origin = Some(start);
        self.down.set_at_ms = Some(self.now());

        let line = self.line_x();
        room.clear_marker(Marker::FirstDownLine);
        self.render_ball_line(room, line);

        if !silent {
            log::info!("extra point for {}", team);
            self.announce(Ruling::ExtraPointSet { team, spot });

            let sign = team.attack_sign();
            let depth = self.config.kicks.extra_point_formation_depth;
            let defense_x = sign * self.config.kicks.extra_point_defense_x;
            for player in room.players() {
                if player.team == team {
                    room.set_player_x(player.id, line - sign * depth);
                } else if player.team == team.opponent() {
                    room.set_player_x(player.id, defense_x);
                }
            }
        }

        self.state.mode = Mode::ExtraPoint;

        let delay = remaining.unwrap_or(self.config.clock.extra_point_clock_ms);
        let clock = self.schedule(ScheduledAction::ExtraPointClockExpired { team }, delay);
        self.extra_point.clock = Some(clock);
    }

    /// `hike` during an extra point: run a conversion down instead.
    pub(crate) fn start_conversion(&mut self, room: &mut dyn Room, player: PlayerId) {
        if self.state.mode != Mode::ExtraPoint || self.state.play.conversion || self.state.play.qb_kicked_ball {
            return;
        }
        let team = self.state.team_with_ball;
        if room.player(player).map(|p| p.team) != Some(team) {
            return;
        }

        let previous_down = self.state.down.clone();
        self.state.play.conversion = true;
        self.state.down.count = 4;
        self.state.down.distance = self.config.down.conversion_distance;
        self.state.down.goal_mode = true;
        self.state.mode = Mode::WaitingForHike;

        let announced_at = self.rulings.len();
        match self.hike(room, player) {
            HikeOutcome::Hiked => {
                log::info!("conversion attempt for {}", team);
                let spot = self.state.ball_position;
                self.rulings.insert(announced_at, Ruling::ConversionSet { team, spot });
            }
            // The extra point was set again by the refusal
            HikeOutcome::Refused => {}
            HikeOutcome::Ignored => {
                self.state.play.conversion = false;
                self.state.down = previous_down;
                self.state.mode = Mode::ExtraPoint;
            }
        }
    }

    pub(crate) fn clear_extra_point_clock(&mut self) {
        if let Some(id) = self.extra_point.clock.take() {
            self.timers.stop(id);
        }
    }

    // ===========================================
    // Live extra point
    // ===========================================

    pub(crate) fn extra_point_tick(&mut self, room: &mut dyn Room) {
        if self.state.mode != Mode::ExtraPoint || !self.state.play.qb_kicked_ball {
            return;
        }
        let Some(ball) = room.ball() else {
            log::warn!("extra point in progress without a ball");
            return;
        };

        let team = self.state.team_with_ball;
        let through_goal = is_out_of_bounds(ball.position, 0.0)
            && ball_within_goal_line(ball.position, ball.radius, ball.speed(), team.opponent());

        if through_goal {
            self.extra_point_good(room, self.config.scoring.extra_point, false);
        } else if ball.speed() < self.config.kicks.extra_point_stop_speed {
            self.miss_extra_point(room, ExtraPointMiss::BallStopped);
        }
    }

    pub(crate) fn extra_point_ball_kick(&mut self, room: &mut dyn Room, player: &PlayerDisc) {
        if self.state.mode != Mode::ExtraPoint {
            return;
        }
        self.clear_extra_point_clock();

        let team = self.state.team_with_ball;
        if player.team != team {
            log::info!("{} touched the extra point", player.id);
            self.extra_point_good(room, self.config.scoring.conversion, true);
            return;
        }

        if self.state.play.qb_kicked_ball {
            self.miss_extra_point(room, ExtraPointMiss::DoubleTouch);
            return;
        }

        self.state.play.qb_kicked_ball = true;
        room.feather_players();
        room.lock_ball();
        room.set_ball_unkickable();

        let Some(ball) = room.ball() else {
            log::warn!("extra point kicked without a ball");
            return;
        };
        self.schedule(
            ScheduledAction::CheckExtraPointDirection {
                kicking_team: team,
                origin: ball.position,
            },
            0,
        );
    }

    pub(crate) fn check_extra_point_direction(&mut self, room: &mut dyn Room, kicking_team: Team, origin: Vec2) {
        if self.state.mode != Mode::ExtraPoint {
            return;
        }
        let Some(ball) = room.ball() else {
            return;
        };

        let scale = self.config.kicks.kick_direction_goal_scale;
        let on_target = ball_path_from(origin, ball.position, KICK_PATH_LENGTH)
            .zip(goal_line(kicking_team.opponent(), scale))
            .and_then(|((from, to), (top, bottom))| segment_intersection(from, to, top, bottom))
            .is_some();

        if !on_target && self.state.carrier.is_none() {
            self.miss_extra_point(room, ExtraPointMiss::WrongDirection);
        }
    }

    pub(crate) fn extra_point_clock_expired(&mut self, room: &mut dyn Room, team: Team) {
        self.extra_point.clock = None;
        if self.state.mode != Mode::ExtraPoint {
            return;
        }
        self.announce(Ruling::ExtraPointMissed {
            team,
            reason: ExtraPointMiss::ClockExpired,
        });
        self.reset_to_kickoff(room, Some(team));
    }

    fn extra_point_good(&mut self, room: &mut dyn Room, points: u32, defensive_touch: bool) {
        let team = self.state.team_with_ball;
        self.state.score.add(team, points);
        self.announce(Ruling::ExtraPointGood {
            team,
            points,
            defensive_touch,
        });
        self.reset_to_kickoff(room, Some(team));
    }

    fn miss_extra_point(&mut self, room: &mut dyn Room, reason: ExtraPointMiss) {
        let team = self.state.team_with_ball;
        self.announce(Ruling::ExtraPointMissed { team, reason });
        self.reset_to_kickoff(room, Some(team));
    }

    // ===========================================
    // Conversion
    // ===========================================

    /// A conversion carrier who leaves the red zone loses the attempt.
    pub(crate) fn conversion_zone_tick(&mut self, room: &mut dyn Room) {
        if self.state.mode != Mode::Down || !self.state.play.conversion || self.state.play.intercept {
            return;
        }
        let Some(carrier) = self.state.carrier_id() else {
            return;
        };
        let Some(disc) = room.player(carrier) else {
            return;
        };

        let left_red_zone = match self.state.team_with_ball {
            Team::Red => disc.position.x < measures::RED_ZONE_X,
            Team::Blue => disc.position.x > -measures::RED_ZONE_X,
            Team::Spectators => false,
        };
        if left_red_zone {
            log::info!("{} carried the conversion out of the red zone", carrier);
            self.reset_to_kickoff(room, None);
        }
    }
}
