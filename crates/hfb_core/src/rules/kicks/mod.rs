//! Kicking plays
//!
//! Kickoffs, punts and safety kicks are free kicks: the receiving team is
//! held back until the ball is kicked, the first receiving-team touch makes a
//! returner, and any kicking-team touch after the kick gives the ball to the
//! receiving team where it happened. Field goals and extra points are set
//! pieces with their own clocks and do not produce returners.

pub mod extra_point;
pub mod field_goal;
pub mod kickoff;
pub mod punt;
pub mod safety;

use crate::field::math::formation_points;
use crate::field::{is_past_line, measures, yards_from_coordinate, Team, Vec2};
use crate::referee::{CarrierRole, DownSetup, Mode, Referee};
use crate::room::{Marker, PlayerDisc, Room, RoomExt};
use crate::ruling::Ruling;
use crate::stats::StatsSink;

pub use extra_point::ExtraPointPlay;
pub use field_goal::FieldGoalPlay;
pub use kickoff::KickoffPlay;

/// Half length of the line the kicking team forms on punts and safety kicks
const KICKING_LINE_HALF: f64 = 100.0;

/// Half length of the line the receiving team forms
const RECEIVING_LINE_HALF: f64 = 200.0;

/// |y| beyond which pushed-back coverage players are brought back inside
const COVERAGE_MAX_Y: f64 = 100.0;

impl<S: StatsSink> Referee<S> {
    // ===========================================
    // Free-kick formation
    // ===========================================

    /// Lines up `team`'s players on a vertical line at `x`.
    pub(crate) fn line_up(&mut self, room: &mut dyn Room, team: Team, x: f64, half_length: f64) {
        let players = room.team_players(team);
        let points = formation_points(
            Vec2::new(x, half_length),
            Vec2::new(x, -half_length),
            players.len(),
            &mut self.rng,
        );
        for (player, point) in players.iter().zip(points) {
            room.set_player_position(player.id, point);
        }
    }

    /// Punt and safety-kick formation: kickers behind the ball, receivers
    /// on the return line.
    pub(crate) fn line_up_free_kick(&mut self, room: &mut dyn Room, kicking: Team, ball_x: f64) {
        let sign = kicking.attack_sign();
        let depth = self.config.kicks.punt_formation_depth;
        let return_x = sign * measures::RETURN_LINE_X;

        self.line_up(room, kicking, ball_x - sign * depth, KICKING_LINE_HALF);
        self.line_up(room, kicking.opponent(), return_x, RECEIVING_LINE_HALF);
    }

    pub(crate) fn render_ball_line(&mut self, room: &mut dyn Room, x: f64) {
        let top = Vec2::new(x, -measures::FIELD_MAX_Y);
        let bottom = Vec2::new(x, measures::FIELD_MAX_Y);
        room.place_marker(Marker::BallLine, top, bottom);
    }

    // ===========================================
    // Kick return
    // ===========================================

    /// Kick event during a kickoff, punt or safety kick.
    pub(crate) fn kick_ball_kick(&mut self, room: &mut dyn Room, kicker: &PlayerDisc) {
        let mode = self.state.mode;
        let epoch = self.state.epoch;

        self.player_returned_ball(room, kicker);
        if self.state.mode != mode || self.state.epoch != epoch {
            return;
        }

        room.unblock_teams();

        if !self.state.play.qb_kicked_ball {
            self.state.play.qb_kicked_ball = true;
            self.coverage_reset(room);
        }
    }

    /// A receiver close enough to touch the loose ball fields it.
    pub(crate) fn kick_return_tick(&mut self, room: &mut dyn Room) {
        if self.state.carrier.is_some() {
            return;
        }
        let Some(ball) = room.ball() else {
            return;
        };

        let touch = self.config.down.touch_distance;
        let toucher = room
            .players()
            .into_iter()
            .find(|p| p.team.is_playing() && p.gap_to_ball(&ball) < touch);

        if let Some(player) = toucher {
            self.player_returned_ball(room, &player);
        }
    }

    /// First touch of a kicked ball: a receiver becomes the returner, a
    /// kicking-team player after the kick is an illegal touch.
    fn player_returned_ball(&mut self, room: &mut dyn Room, player: &PlayerDisc) {
        if !player.team.is_playing() || self.state.carrier.is_some() {
            return;
        }

        let kicking = self.state.team_with_ball;
        if player.team != kicking {
            let role = if self.state.mode == Mode::Punt {
                CarrierRole::PuntReturner
            } else {
                CarrierRole::KickoffReturner
            };
            self.set_carrier(room, player, role, true);
            self.announce(Ruling::KickReturned {
                returner: player.id,
                play: self.state.mode,
            });
        } else if self.state.play.qb_kicked_ball {
            let team_awarded = kicking.opponent();
            let spot = yards_from_coordinate(player.position.x);

            log::info!("illegal touch by {} on the {}", player.id, self.state.mode);
            self.announce(Ruling::IllegalKickTouch {
                player: player.id,
                team_awarded,
                spot,
            });
            self.set_down(room, DownSetup::at_counting(spot, team_awarded, false));
        }
    }

    /// Kicking-team players ahead of the ball at the kick are pushed back.
    fn coverage_reset(&mut self, room: &mut dyn Room) {
        let Some(ball) = room.ball() else {
            return;
        };
        let kicking = self.state.team_with_ball;
        let sign = kicking.attack_sign();
        let pushback = self.config.kicks.coverage_pushback;
        let speed = self.config.kicks.coverage_push_speed;

        for player in room.team_players(kicking) {
            if !is_past_line(player.position.x, ball.position.x, kicking) {
                continue;
            }

            let y = player.position.y.clamp(-COVERAGE_MAX_Y, COVERAGE_MAX_Y);
            room.set_player_position(player.id, Vec2::new(ball.position.x - sign * pushback, y));
            room.set_player_velocity(player.id, Vec2::new(-sign * speed, player.velocity.y));

            self.announce(Ruling::CoverageReset { player: player.id });
        }
    }
}
