//! Field goal
//!
//! Requested by the offense between downs. The requesting player becomes the
//! kicker and is the only player allowed to touch the ball; the rest of the
//! offense and the defense line up past the ball toward the goal. A kicker
//! tackled before the kick hands the ball to the defense at the spot of the
//! tackle; any other miss hands it over at the line of scrimmage.

use crate::error::AdminError;
use crate::field::math::{ball_path_from, formation_points, segment_intersection};
use crate::field::{
    ball_within_goal_line, coordinate_from_yards, goal_line, is_out_of_bounds, measures,
    yards_from_coordinate, yards_to_goal, Vec2,
};
use crate::referee::{DownSetup, DownState, Mode, Referee, ScheduledAction};
use crate::room::{Marker, PlayerDisc, PlayerId, Room, RoomExt};
use crate::rules::tackle::Tackle;
use crate::ruling::{FieldGoalMiss, Ruling};
use crate::stats::{StatKind, StatsSink};
use crate::timer::TimerId;

/// Half length of both field-goal lines
const FIELD_GOAL_LINE_HALF: f64 = 100.0;

/// Length of the projected path checked against the goal line
const KICK_PATH_LENGTH: f64 = 2_000.0;

/// Ball displacement that counts as "moved" before the kick
const BALL_MOVED_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Default)]
pub struct FieldGoalPlay {
    pub(crate) kicker: Option<PlayerId>,
    pub(crate) clock: Option<TimerId>,
    /// Where the ball was placed for the kick
    pub(crate) spot: Option<Vec2>,
    pub(crate) ball_moved_at_ms: Option<u64>,
    /// Set once the kick direction was checked; later touches are ignored
    pub(crate) touch_disabled: bool,
}

impl FieldGoalPlay {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

impl FieldGoalMiss {
    /// Misses charged to the kicker's record.
    pub fn counts_against_kicker(self) -> bool {
        matches!(
            self,
            FieldGoalMiss::KickerTackled
                | FieldGoalMiss::BallCarried
                | FieldGoalMiss::KickerTooFar
                | FieldGoalMiss::WrongDirection
                | FieldGoalMiss::BallStopped
        )
    }
}

impl<S: StatsSink> Referee<S> {
    /// `player` asks to kick a field goal from the current spot.
    pub fn request_field_goal(&mut self, room: &mut dyn Room, player: PlayerId) -> Result<(), AdminError> {
        self.check_kick_request(room, player)?;

        let yards = yards_to_goal(self.state.ball_position, self.state.team_with_ball);
        let max = self.config.kicks.field_goal_max_yards;
        if yards > max {
            return Err(AdminError::FieldGoalOutOfRange { yards, max });
        }

        let kicker = room.player(player).ok_or(AdminError::UnknownPlayer(player))?;

        log::info!("{} requested a field goal from {} yards", player, yards);
        self.set_field_goal(room, &kicker);
        Ok(())
    }

    /// Distance of the kick: spot to goal line plus the end zone.
    fn field_goal_distance(&self) -> i32 {
        yards_to_goal(self.state.ball_position, self.state.team_with_ball) + measures::GOAL_DEPTH_YARDS
    }

    pub(crate) fn set_field_goal(&mut self, room: &mut dyn Room, kicker: &PlayerDisc) {
        self.state.mode = Mode::None;
        self.reset_play(room);
        self.reset_series();

        let team = kicker.team;
        let spot = self.state.ball_position;
        self.state.team_with_ball = team;
        self.state.down = DownState::new_series(self.config.down.yards_to_gain);

        self.field_goal.kicker = Some(kicker.id);

        self.announce(Ruling::FieldGoalSet {
            team,
            kicker: kicker.id,
            spot,
            yards: self.field_goal_distance(),
        });

        let ball_at = coordinate_from_yards(spot);
        room.stop_ball();
        room.set_ball_position(ball_at);
        self.field_goal.spot = Some(ball_at);

        room.clear_marker(Marker::FirstDownLine);
        room.clear_marker(Marker::BallLine);

        // Both lines stand between the ball and the goal, defense deepest
        let kicks = &self.config.kicks;
        let sign = team.attack_sign();
        let offense_x = sign
            * (sign * ball_at.x + measures::YARD * kicks.field_goal_offense_back_yards as f64)
                .min(kicks.field_goal_offense_max_x);
        let defense_x = sign
            * (sign * ball_at.x + measures::YARD * kicks.field_goal_defense_back_yards as f64)
                .min(kicks.field_goal_defense_max_x);
        let kicker_y = kicks.field_goal_kicker_y;

        let holders: Vec<PlayerDisc> = room
            .team_players(team)
            .into_iter()
            .filter(|p| p.id != kicker.id)
            .collect();
        let points = formation_points(
            Vec2::new(offense_x, FIELD_GOAL_LINE_HALF),
            Vec2::new(offense_x, -FIELD_GOAL_LINE_HALF),
            holders.len(),
            &mut self.rng,
        );
        for (player, point) in holders.iter().zip(points) {
            room.set_player_position(player.id, point);
        }
        self.line_up(room, team.opponent(), defense_x, FIELD_GOAL_LINE_HALF);

        room.set_player_y(kicker.id, kicker_y);

        self.state.mode = Mode::FieldGoal;

        let clock = self.schedule(ScheduledAction::FieldGoalClockExpired, self.config.clock.field_goal_clock_ms);
        self.field_goal.clock = Some(clock);
    }

    // ===========================================
    // Live field goal
    // ===========================================

    pub(crate) fn field_goal_tick(&mut self, room: &mut dyn Room) {
        if self.state.mode != Mode::FieldGoal {
            return;
        }
        let Some(kicker_id) = self.field_goal.kicker else {
            return;
        };
        let Some(ball) = room.ball() else {
            log::warn!("field goal in progress without a ball");
            return;
        };
        let players = room.players();

        let Some(kicker) = players.iter().find(|p| p.id == kicker_id).cloned() else {
            self.miss_field_goal(room, FieldGoalMiss::KickerLeft, 0);
            return;
        };

        if !self.field_goal.touch_disabled {
            let touch = self.config.down.touch_distance;
            if let Some(toucher) = players
                .iter()
                .find(|p| p.team.is_playing() && p.id != kicker_id && p.gap_to_ball(&ball) < touch)
            {
                self.field_goal_illegal_touch(room, toucher);
                return;
            }
        }

        if !self.state.play.qb_kicked_ball {
            let spot = self.field_goal.spot.unwrap_or(ball.position);
            let moved = (ball.position.x - spot.x).abs() > BALL_MOVED_EPSILON
                || (ball.position.y - spot.y).abs() > BALL_MOVED_EPSILON;
            if moved && self.field_goal.ball_moved_at_ms.is_none() {
                self.field_goal.ball_moved_at_ms = Some(self.now());
            }

            let tackle = self.player_tackle(&kicker, &players);
            if !tackle.players.is_empty() {
                self.kicker_tackled(room, &kicker, tackle);
                return;
            }

            let grace = self.config.kicks.field_goal_move_grace_ms;
            let held_too_long = self
                .field_goal
                .ball_moved_at_ms
                .is_some_and(|at| self.now() > at + grace);
            if ball.gap_to_spot(spot) > self.config.kicks.field_goal_max_ball_move || held_too_long {
                self.miss_field_goal(room, FieldGoalMiss::BallCarried, 0);
                return;
            }

            let reach = self.config.kicks.field_goal_kicker_max_yards * measures::YARD;
            if kicker.gap_to_ball(&ball) > reach {
                let delay = self.config.scoring.failed_field_goal_turnover_ms;
                self.miss_field_goal(room, FieldGoalMiss::KickerTooFar, delay);
            }
        } else {
            let team = self.state.team_with_ball;
            let through_goal = is_out_of_bounds(ball.position, 0.0)
                && ball_within_goal_line(ball.position, ball.radius, ball.speed(), team.opponent());

            if through_goal {
                self.field_goal_good(room, Some(kicker_id), false);
            } else if ball.speed() < self.config.kicks.field_goal_stop_speed {
                let delay = self.config.scoring.failed_field_goal_turnover_ms;
                self.miss_field_goal(room, FieldGoalMiss::BallStopped, delay);
            }
        }
    }

    pub(crate) fn field_goal_ball_kick(&mut self, room: &mut dyn Room, player: &PlayerDisc) {
        if self.state.mode != Mode::FieldGoal {
            return;
        }

        if let Some(id) = self.field_goal.clock.take() {
            self.timers.stop(id);
        }

        if self.field_goal.kicker != Some(player.id) {
            self.field_goal_illegal_touch(room, player);
            return;
        }

        if self.state.play.qb_kicked_ball {
            self.miss_field_goal(room, FieldGoalMiss::DoubleTouch, 0);
            return;
        }

        self.state.play.qb_kicked_ball = true;
        room.feather_players();
        room.lock_ball();
        room.set_ball_unkickable();

        let Some(ball) = room.ball() else {
            log::warn!("field goal kicked without a ball");
            return;
        };
        self.schedule(
            ScheduledAction::CheckFieldGoalDirection {
                kicker: player.id,
                origin: ball.position,
            },
            0,
        );
    }

    /// Projects the kicked ball onto the (enlarged) goal line.
    pub(crate) fn check_field_goal_direction(&mut self, room: &mut dyn Room, kicker: PlayerId, origin: Vec2) {
        if self.state.mode != Mode::FieldGoal || self.field_goal.kicker != Some(kicker) {
            return;
        }
        self.field_goal.touch_disabled = true;

        let Some(ball) = room.ball() else {
            return;
        };
        let goal_of = self.state.team_with_ball.opponent();
        let scale = self.config.kicks.kick_direction_goal_scale;

        let on_target = ball_path_from(origin, ball.position, KICK_PATH_LENGTH)
            .zip(goal_line(goal_of, scale))
            .and_then(|((from, to), (top, bottom))| segment_intersection(from, to, top, bottom))
            .is_some();

        if !on_target && self.state.carrier.is_none() {
            let delay = self.config.scoring.missed_field_goal_turnover_ms;
            self.miss_field_goal(room, FieldGoalMiss::WrongDirection, delay);
        }
    }

    pub(crate) fn field_goal_clock_expired(&mut self, room: &mut dyn Room) {
        self.field_goal.clock = None;
        if self.state.mode != Mode::FieldGoal {
            return;
        }
        self.miss_field_goal(room, FieldGoalMiss::ClockExpired, 0);
    }

    // ===========================================
    // Outcomes
    // ===========================================

    /// Someone other than the kicker touched the ball. A defensive touch
    /// concedes the points.
    fn field_goal_illegal_touch(&mut self, room: &mut dyn Room, player: &PlayerDisc) {
        if player.team != self.state.team_with_ball {
            log::info!("{} touched the field goal", player.id);
            self.field_goal_good(room, self.field_goal.kicker, true);
        } else {
            let delay = self.config.scoring.missed_field_goal_turnover_ms;
            self.miss_field_goal(room, FieldGoalMiss::OffensiveTouch, delay);
        }
    }

    fn kicker_tackled(&mut self, room: &mut dyn Room, kicker: &PlayerDisc, tackle: Tackle) {
        for &tackler in &tackle.players {
            self.credit(tackler, StatKind::Tackles, 1);
            self.credit(tackler, StatKind::Sacks, 1);
        }
        log::info!("kicker {} tackled by {:?}", kicker.id, tackle.players);

        let delay = self.config.scoring.failed_field_goal_turnover_ms;
        let setup = DownSetup::turnover_at(
            yards_from_coordinate(kicker.position.x),
            self.state.team_with_ball.opponent(),
        );
        self.end_field_goal(room, FieldGoalMiss::KickerTackled, setup, delay);
    }

    fn field_goal_good(&mut self, room: &mut dyn Room, kicker: Option<PlayerId>, defensive_touch: bool) {
        let team = self.state.team_with_ball;
        let yards = self.field_goal_distance();
        let points = self.config.scoring.field_goal;

        self.state.score.add(team, points);
        if let Some(kicker) = kicker.filter(|_| !defensive_touch) {
            self.credit(kicker, StatKind::FieldGoalYards, yards);
            self.credit(kicker, StatKind::FieldGoalsMade, 1);
        }

        self.announce(Ruling::FieldGoalGood {
            team,
            kicker,
            yards,
            points,
            defensive_touch,
        });
        self.reset_to_kickoff(room, Some(team));
    }

    /// Ends the attempt and gives the ball to the defense at the line of
    /// scrimmage, immediately or after `delay_ms`.
    fn miss_field_goal(&mut self, room: &mut dyn Room, reason: FieldGoalMiss, delay_ms: u64) {
        let setup = DownSetup::turnover(self.state.team_with_ball.opponent());
        self.end_field_goal(room, reason, setup, delay_ms);
    }

    fn end_field_goal(&mut self, room: &mut dyn Room, reason: FieldGoalMiss, setup: DownSetup, delay_ms: u64) {
        let team = self.state.team_with_ball;
        let kicker = self.field_goal.kicker;

        if let Some(kicker) = kicker.filter(|_| reason.counts_against_kicker()) {
            self.credit(kicker, StatKind::FieldGoalsMissed, 1);
        }
        self.announce(Ruling::FieldGoalMissed { team, kicker, reason });

        if delay_ms == 0 {
            self.set_down(room, setup);
        } else {
            self.halt_play();
            self.schedule(ScheduledAction::SetDown(setup), delay_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldPosition, Team};
    use crate::sim::fixtures::*;

    /// Red ball at the Blue 20 with RED_2 next to the ball.
    fn red_in_range() -> (Referee, crate::sim::room::ScriptedRoom) {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Blue, 20));
        room.move_player(PlayerId(RED_2), Vec2::new(440.0, 0.0));
        (referee, room)
    }

    fn kicking_formation() -> (Referee, crate::sim::room::ScriptedRoom) {
        let (mut referee, mut room) = red_in_range();
        referee.request_field_goal(&mut room, PlayerId(RED_2)).unwrap();
        referee.drain();
        (referee, room)
    }

    #[test]
    fn test_field_goal_formation() {
        let (mut referee, mut room) = red_in_range();
        referee.request_field_goal(&mut room, PlayerId(RED_2)).unwrap();

        assert_eq!(
            referee.drain(),
            vec![Ruling::FieldGoalSet {
                team: Team::Red,
                kicker: PlayerId(RED_2),
                spot: FieldPosition::new(Team::Blue, 20),
                yards: 30,
            }]
        );
        assert_eq!(referee.mode(), Mode::FieldGoal);
        assert_eq!(room.ball_disc().unwrap().position, Vec2::new(465.0, 0.0));
        assert_eq!(room.disc(PlayerId(RED_2)).unwrap().position, Vec2::new(440.0, 30.0));
        assert_eq!(room.disc(PlayerId(RED_3)).unwrap().position.x, 620.0);
        assert_eq!(room.disc(PlayerId(BLUE_1)).unwrap().position.x, 697.5);
        assert!(room.marker(Marker::BallLine).is_none());
    }

    #[test]
    fn test_formation_lines_are_capped() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Blue, FieldPosition::new(Team::Red, 5));
        room.move_player(PlayerId(BLUE_2), Vec2::new(-680.0, 0.0));
        referee.request_field_goal(&mut room, PlayerId(BLUE_2)).unwrap();

        // Ball at -697.5: the defense line stops at -900
        assert_eq!(room.disc(PlayerId(BLUE_3)).unwrap().position.x, -852.5);
        assert_eq!(room.disc(PlayerId(RED_QB)).unwrap().position.x, -900.0);
    }

    #[test]
    fn test_field_goal_out_of_range() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 40));
        room.move_player(PlayerId(RED_2), Vec2::new(-170.0, 0.0));

        assert_eq!(
            referee.request_field_goal(&mut room, PlayerId(RED_2)),
            Err(AdminError::FieldGoalOutOfRange { yards: 60, max: 57 })
        );
        assert_eq!(referee.mode(), Mode::WaitingForHike);
    }

    #[test]
    fn test_scenario_c_kicker_tackled() {
        let (mut referee, mut room) = kicking_formation();
        // Kicker drifted back to the Blue 31, away from the Blue 20 line
        room.move_player(PlayerId(RED_2), Vec2::new(300.0, 30.0));
        room.move_player(PlayerId(BLUE_1), Vec2::new(300.0, 60.0));

        let rulings = tick(&mut referee, &mut room);
        assert_eq!(
            rulings,
            vec![Ruling::FieldGoalMissed {
                team: Team::Red,
                kicker: Some(PlayerId(RED_2)),
                reason: FieldGoalMiss::KickerTackled,
            }]
        );
        assert_eq!(referee.stats().get(PlayerId(RED_2), StatKind::FieldGoalsMissed), 1);
        assert_eq!(referee.stats().get(PlayerId(BLUE_1), StatKind::Sacks), 1);
        assert_eq!(referee.stats().get(PlayerId(BLUE_1), StatKind::Tackles), 1);
        assert_eq!(referee.mode(), Mode::None);

        run_ms(&mut referee, &mut room, 1_000);
        assert_eq!(referee.team_with_ball(), Team::Blue);
        assert_eq!(referee.ball_position(), FieldPosition::new(Team::Blue, 31));
        assert_eq!(referee.down_count(), 1);
        assert_eq!(referee.mode(), Mode::WaitingForHike);
        assert_eq!(referee.score(), crate::referee::Score::default());
    }

    #[test]
    fn test_other_misses_turn_over_at_scrimmage_line() {
        let (mut referee, mut room) = kicking_formation();
        room.move_player(PlayerId(RED_3), Vec2::new(465.0, 20.0));

        let rulings = tick(&mut referee, &mut room);
        assert!(matches!(
            rulings.as_slice(),
            [Ruling::FieldGoalMissed { reason: FieldGoalMiss::OffensiveTouch, .. }]
        ));

        run_ms(&mut referee, &mut room, 3_000);
        assert_eq!(referee.team_with_ball(), Team::Blue);
        assert_eq!(referee.ball_position(), FieldPosition::new(Team::Blue, 20));
    }

    #[test]
    fn test_scenario_d_field_goal_good() {
        let (mut referee, mut room) = kicking_formation();
        referee.on_ball_kick(&mut room, PlayerId(RED_2));
        assert_eq!(room.ball_collision_group(), crate::room::CollisionMask::WALL);

        room.place_ball(Vec2::new(700.0, 0.0), Vec2::new(5.0, 0.0));
        assert!(tick(&mut referee, &mut room).is_empty());

        room.place_ball(Vec2::new(935.0, 0.0), Vec2::new(5.0, 0.0));
        let rulings = tick(&mut referee, &mut room);

        assert_eq!(
            rulings,
            vec![Ruling::FieldGoalGood {
                team: Team::Red,
                kicker: Some(PlayerId(RED_2)),
                yards: 30,
                points: 3,
                defensive_touch: false,
            }]
        );
        assert_eq!(referee.score().red, 3);
        assert_eq!(referee.stats().get(PlayerId(RED_2), StatKind::FieldGoalYards), 30);
        assert_eq!(referee.stats().get(PlayerId(RED_2), StatKind::FieldGoalsMade), 1);

        let rulings = run_ms(&mut referee, &mut room, 3_000);
        assert!(rulings.contains(&Ruling::KickoffSet {
            team: Team::Red,
            spot: FieldPosition::new(Team::Red, 50),
        }));
        assert_eq!(referee.mode(), Mode::Kickoff);
    }

    #[test]
    fn test_wrong_direction_is_a_miss() {
        let (mut referee, mut room) = kicking_formation();
        referee.on_ball_kick(&mut room, PlayerId(RED_2));

        room.place_ball(Vec2::new(470.0, 40.0), Vec2::new(0.5, 4.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.contains(&Ruling::FieldGoalMissed {
            team: Team::Red,
            kicker: Some(PlayerId(RED_2)),
            reason: FieldGoalMiss::WrongDirection,
        }));
        run_ms(&mut referee, &mut room, 2_000);
        assert_eq!(referee.team_with_ball(), Team::Blue);
    }

    #[test]
    fn test_defensive_touch_awards_points() {
        let (mut referee, mut room) = kicking_formation();
        room.move_player(PlayerId(BLUE_1), Vec2::new(486.0, 0.0));

        let rulings = tick(&mut referee, &mut room);
        assert!(rulings.contains(&Ruling::FieldGoalGood {
            team: Team::Red,
            kicker: Some(PlayerId(RED_2)),
            yards: 30,
            points: 3,
            defensive_touch: true,
        }));
        assert_eq!(referee.score().red, 3);
        assert_eq!(referee.stats().get(PlayerId(RED_2), StatKind::FieldGoalsMade), 0);
    }

    #[test]
    fn test_offensive_touch_turns_over() {
        let (mut referee, mut room) = kicking_formation();
        let rulings = referee.on_ball_kick(&mut room, PlayerId(RED_3));

        assert_eq!(
            rulings,
            vec![Ruling::FieldGoalMissed {
                team: Team::Red,
                kicker: Some(PlayerId(RED_2)),
                reason: FieldGoalMiss::OffensiveTouch,
            }]
        );
        run_ms(&mut referee, &mut room, 2_000);
        assert_eq!(referee.team_with_ball(), Team::Blue);
    }

    #[test]
    fn test_ball_carried_turns_over_immediately() {
        let (mut referee, mut room) = kicking_formation();
        room.place_ball(Vec2::new(490.0, 0.0), Vec2::ZERO);

        let rulings = tick(&mut referee, &mut room);
        assert!(rulings.contains(&Ruling::FieldGoalMissed {
            team: Team::Red,
            kicker: Some(PlayerId(RED_2)),
            reason: FieldGoalMiss::BallCarried,
        }));
        assert_eq!(referee.team_with_ball(), Team::Blue);
        assert_eq!(referee.mode(), Mode::WaitingForHike);
    }

    #[test]
    fn test_ball_nudged_and_held_is_carried() {
        let (mut referee, mut room) = kicking_formation();
        room.place_ball(Vec2::new(468.0, 0.0), Vec2::ZERO);

        let rulings = run_ms(&mut referee, &mut room, 900);
        assert!(rulings.is_empty());

        let rulings = run_ms(&mut referee, &mut room, 200);
        assert!(rulings.contains(&Ruling::FieldGoalMissed {
            team: Team::Red,
            kicker: Some(PlayerId(RED_2)),
            reason: FieldGoalMiss::BallCarried,
        }));
    }

    #[test]
    fn test_kicker_too_far_from_ball() {
        let (mut referee, mut room) = kicking_formation();
        room.move_player(PlayerId(RED_2), Vec2::new(250.0, 30.0));

        let rulings = tick(&mut referee, &mut room);
        assert!(rulings.contains(&Ruling::FieldGoalMissed {
            team: Team::Red,
            kicker: Some(PlayerId(RED_2)),
            reason: FieldGoalMiss::KickerTooFar,
        }));
    }

    #[test]
    fn test_clock_expiry() {
        let (mut referee, mut room) = kicking_formation();
        let rulings = run_ms(&mut referee, &mut room, 15_000);

        assert!(rulings.contains(&Ruling::FieldGoalMissed {
            team: Team::Red,
            kicker: Some(PlayerId(RED_2)),
            reason: FieldGoalMiss::ClockExpired,
        }));
        assert_eq!(referee.team_with_ball(), Team::Blue);
        assert_eq!(referee.stats().get(PlayerId(RED_2), StatKind::FieldGoalsMissed), 0);
    }

    #[test]
    fn test_ball_stops_short() {
        let (mut referee, mut room) = kicking_formation();
        referee.on_ball_kick(&mut room, PlayerId(RED_2));

        room.place_ball(Vec2::new(700.0, 0.0), Vec2::new(3.0, 0.0));
        tick(&mut referee, &mut room);
        assert_eq!(referee.mode(), Mode::FieldGoal);

        room.place_ball(Vec2::new(800.0, 0.0), Vec2::ZERO);
        let rulings = tick(&mut referee, &mut room);
        assert!(rulings.contains(&Ruling::FieldGoalMissed {
            team: Team::Red,
            kicker: Some(PlayerId(RED_2)),
            reason: FieldGoalMiss::BallStopped,
        }));
    }

    #[test]
    fn test_double_kick() {
        let (mut referee, mut room) = kicking_formation();
        referee.on_ball_kick(&mut room, PlayerId(RED_2));
        let rulings = referee.on_ball_kick(&mut room, PlayerId(RED_2));

        assert!(rulings.contains(&Ruling::FieldGoalMissed {
            team: Team::Red,
            kicker: Some(PlayerId(RED_2)),
            reason: FieldGoalMiss::DoubleTouch,
        }));
        assert_eq!(referee.team_with_ball(), Team::Blue);
    }

    #[test]
    fn test_field_goal_refused_during_conversion() {
        let (mut referee, mut room) = red_in_range();
        referee.state.play.conversion = true;

        assert_eq!(
            referee.request_field_goal(&mut room, PlayerId(RED_2)),
            Err(AdminError::ConversionInProgress)
        );
    }
}
