//! Ball-carrier lifecycle
//!
//! Shared by every play that can end with a player on the ground: downs and
//! the three kick variants. Each tick, in order:
//!
//! 1. Carrier out of bounds: safety inside the carrier's own end zone, otherwise the
//!    ball is spotted where the carrier stepped out
//! 2. Carrier across the opposing end-zone line: touchdown
//! 3. Tackle evaluation (with the fumble roll)
//! 4. Loose ball out of the field after a kick or pass

use rand::Rng;

use crate::field::{
    ball_within_goal_line, coordinate_from_yards, has_passed_end_zone_line, is_out_of_bounds,
    is_past_line, measures, yard_gain_between_points, yards_from_coordinate, FieldPosition,
    Team, Vec2,
};
use crate::referee::state::FumbleExposure;
use crate::referee::{CarrierRole, DownSetup, DownState, Mode, Referee, ScheduledAction};
use crate::room::{BallDisc, PlayerDisc, PlayerId, Room};
use crate::rules::tackle::Tackle;
use crate::rules::PlayKind;
use crate::ruling::Ruling;
use crate::stats::{StatKind, StatsSink};

impl<S: StatsSink> Referee<S> {
    pub(crate) fn land_play_tick(&mut self, room: &mut dyn Room, play: PlayKind) {
        let Some(ball) = room.ball() else {
            log::warn!("{} in progress without a ball", self.state.mode);
            return;
        };
        let players = room.players();
        let mode = self.state.mode;
        let epoch = self.state.epoch;

        if let Some(carrier) = self.state.carrier.as_ref().map(|c| c.player) {
            match players.iter().find(|p| p.id == carrier) {
                Some(disc) => {
                    let disc = disc.clone();
                    self.carrier_tick(room, &disc, &players);
                    if self.state.mode != mode || self.state.epoch != epoch {
                        return;
                    }
                }
                None => log::debug!("carrier {} is not on the field", carrier),
            }
        }

        let loose = self.state.carrier.is_none() || (self.down.sack && !self.down.sack_ball_touched);
        if loose && self.state.play.qb_kicked_ball && is_out_of_bounds(ball.position, 0.0) {
            self.ball_left_field(room, play, &ball);
        }
    }

    fn carrier_tick(&mut self, room: &mut dyn Room, carrier: &PlayerDisc, players: &[PlayerDisc]) {
        if is_out_of_bounds(carrier.position, 0.0) {
            self.carrier_out_of_bounds(room, carrier);
            return;
        }

        if has_passed_end_zone_line(carrier.position, carrier.radius, carrier.team.opponent()) {
            self.score_touchdown(room, carrier.team, Some(carrier.id), false);
            return;
        }

        if self.state.play.intercept_player == Some(carrier.id) {
            self.track_interceptor(carrier);
        }

        let tackle = self.carrier_tackle(carrier, players);
        if !tackle.players.is_empty() {
            self.resolve_tackle(room, carrier, players, tackle);
        }
    }

    fn track_interceptor(&mut self, interceptor: &PlayerDisc) {
        if !self.state.play.intercept_left_end_zone
            && !has_passed_end_zone_line(interceptor.position, interceptor.radius, interceptor.team)
        {
            self.state.play.intercept_left_end_zone = true;
        }
    }

    fn carrier_out_of_bounds(&mut self, room: &mut dyn Room, carrier: &PlayerDisc) {
        let in_own_end_zone = has_passed_end_zone_line(carrier.position, carrier.radius, carrier.team);
        if in_own_end_zone && !self.state.play.conversion {
            self.safety(room, carrier);
            return;
        }

        let spot = yards_from_coordinate(carrier.position.x);
        self.announce(Ruling::OutOfBounds {
            carrier: carrier.id,
            spot,
        });
        self.credit_carrier_yardage(carrier.position);

        if self.state.play.conversion {
            self.reset_to_kickoff(room, None);
        } else {
            let count_distance = self.state.mode == Mode::Down && !self.state.play.intercept;
            self.set_down(room, DownSetup::at_counting(spot, carrier.team, count_distance));
        }
    }

    // ===========================================
    // Tackles
    // ===========================================

    fn tackle_threshold(&self, carrier: PlayerId) -> u32 {
        if self.state.is_quarterback(carrier) {
            self.config.tackle.touches_to_tackle_quarterback
        } else {
            self.config.tackle.touches_to_tackle_runner
        }
    }

    fn resolve_tackle(&mut self, room: &mut dyn Room, carrier: &PlayerDisc, players: &[PlayerDisc], tackle: Tackle) {
        let running = self.state.play.running;
        if running && tackle.count < self.tackle_threshold(carrier.id) {
            if tackle.count == tackle.players.len() as u32 {
                self.announce(Ruling::TackleBroken {
                    carrier: carrier.id,
                    tacklers: tackle.players,
                });
            }
            return;
        }

        let conversion = self.state.play.conversion;

        if has_passed_end_zone_line(carrier.position, carrier.radius, carrier.team) && !conversion {
            if self.state.play.intercept {
                self.credit_all(&tackle.players, StatKind::Tackles);
                if self.state.play.intercept_left_end_zone {
                    self.safety(room, carrier);
                } else {
                    self.touchback(room, carrier.team, Some(carrier));
                }
            } else {
                self.safety(room, carrier);
            }
            return;
        }

        let team = self.state.team_with_ball;
        let quarterback = self
            .state
            .play
            .quarterback
            .and_then(|id| players.iter().find(|p| p.id == id));
        let sack = self.down.sack
            && quarterback.is_some_and(|qb| !is_past_line(qb.position.x, self.line_x(), team));

        if sack {
            self.credit_all(&tackle.players, StatKind::Sacks);
            if let Some(qb) = quarterback {
                self.credit(qb.id, StatKind::SacksTaken, 1);
            }
            if let Some(state) = self.state.carrier.as_mut() {
                state.role = CarrierRole::Sack;
            }
        }

        let spot = yards_from_coordinate(carrier.position.x);

        if self.fumble_roll(tackle.players.len()) {
            self.fumble(room, carrier, tackle.players, spot);
            return;
        }

        self.announce(Ruling::Tackled {
            carrier: carrier.id,
            tacklers: tackle.players.clone(),
            spot,
            sack,
        });
        self.credit_all(&tackle.players, StatKind::Tackles);
        self.credit_carrier_yardage(carrier.position);

        if conversion {
            self.reset_to_kickoff(room, None);
        } else {
            let count_distance = self.state.mode == Mode::Down && !self.state.play.intercept;
            self.set_down(room, DownSetup::at_counting(spot, carrier.team, count_distance));
        }
    }

    /// Whether a gang tackle knocks the ball loose.
    fn fumble_roll(&mut self, tacklers: usize) -> bool {
        let Some(carrier) = self.state.carrier.as_ref() else {
            return false;
        };
        if tacklers < self.config.tackle.fumble_min_tacklers {
            return false;
        }

        let exposed = match carrier.role.fumble_exposure() {
            FumbleExposure::Window => {
                self.now().saturating_sub(carrier.gained_at_ms) <= self.config.tackle.fumble_window_ms
            }
            FumbleExposure::SackOnly => self.down.sack,
            FumbleExposure::Never => false,
        };

        exposed && self.rng.gen_bool(self.config.tackle.fumble_chance.clamp(0.0, 1.0))
    }

    fn fumble(&mut self, room: &mut dyn Room, carrier: &PlayerDisc, tacklers: Vec<PlayerId>, spot: FieldPosition) {
        let recovering_team = carrier.team.opponent();

        self.credit_carrier_yardage(carrier.position);
        self.credit(carrier.id, StatKind::Fumbles, 1);
        self.credit_all(&tacklers, StatKind::ForcedFumbles);
        if self.down.sack {
            if let Some(qb) = self.state.play.quarterback {
                self.credit(qb, StatKind::StripSacksTaken, 1);
            }
        }

        self.announce(Ruling::Fumble {
            carrier: carrier.id,
            tacklers,
            recovering_team,
            spot,
        });

        if self.state.play.conversion {
            self.reset_to_kickoff(room, None);
            return;
        }

        self.state.down = DownState::new_series(self.config.down.yards_to_gain);
        self.set_down(room, DownSetup::turnover_at(spot, recovering_team));
    }

    // ===========================================
    // Loose ball
    // ===========================================

    fn ball_left_field(&mut self, room: &mut dyn Room, play: PlayKind, ball: &BallDisc) {
        let kicking = self.state.team_with_ball;
        let receiving = kicking.opponent();

        let spot = match play {
            PlayKind::Down => {
                self.failed_pass(room, ball);
                return;
            }
            PlayKind::Safety => FieldPosition::new(kicking, self.config.kicks.safety_kick_yard_line),
            PlayKind::Punt => {
                if ball.position.x.abs() > measures::END_ZONE_LINE_X {
                    self.touchback(room, receiving, None);
                    return;
                }
                yards_from_coordinate(ball.position.x)
            }
            PlayKind::Kickoff => FieldPosition::new(receiving, self.config.kicks.kickoff_out_of_bounds_yard_line),
            PlayKind::FieldGoal | PlayKind::ExtraPoint => return,
        };

        self.announce(Ruling::KickOutOfBounds {
            receiving_team: receiving,
            spot,
        });
        self.set_down(room, DownSetup::at_counting(spot, receiving, false));
    }

    /// Ball out of the field after the pass: interception through a goal
    /// line, or an incomplete pass.
    fn failed_pass(&mut self, room: &mut dyn Room, ball: &BallDisc) {
        let through_goal = [Team::Red, Team::Blue]
            .into_iter()
            .any(|goal_of| ball_within_goal_line(ball.position, ball.radius, ball.speed(), goal_of));

        let attempt = self.state.play.intercept_attempt;
        if (attempt.is_some() || self.state.play.intercept) && through_goal {
            if let Some(defender) = attempt.and_then(|id| room.player(id)) {
                self.interception(room, &defender);
                return;
            }
        }

        if self.down.sack || self.down.sack_ball_touched {
            return;
        }

        match attempt {
            Some(defender) => self.announce(Ruling::InterceptionFailed { defender }),
            None => self.announce(Ruling::PassIncomplete { blocked_by: None }),
        }

        if self.state.play.conversion {
            self.reset_to_kickoff(room, None);
        } else {
            self.set_down(room, DownSetup::next());
        }
    }

    fn interception(&mut self, room: &mut dyn Room, defender: &PlayerDisc) {
        if self.down.sack {
            self.qb_passed_in_sack();
            self.down.sack_ball_touched = true;
        }

        if let Some(qb) = self.state.play.quarterback {
            self.credit(qb, StatKind::InterceptionsThrown, 1);
        }
        self.credit(defender.id, StatKind::Interceptions, 1);
        self.announce(Ruling::Interception {
            defender: defender.id,
            team: defender.team,
        });

        self.track_interceptor(defender);

        self.state.play.intercept = true;
        self.set_carrier(room, defender, CarrierRole::Intercepter, true);
        self.state.play.intercept_player = Some(defender.id);
        self.state.play.intercept_attempt = None;

        self.state.team_with_ball = self.state.team_with_ball.opponent();
        self.state.down = DownState::new_series(self.config.down.yards_to_gain);
    }

    // ===========================================
    // Scores and restarts
    // ===========================================

    /// Touchdown for `team`. `automatic` touchdowns (red-zone penalties)
    /// credit no carrier statistics.
    pub(crate) fn score_touchdown(&mut self, room: &mut dyn Room, team: Team, scorer: Option<PlayerId>, automatic: bool) {
        let conversion = self.state.play.conversion;
        let intercept = self.state.play.intercept;
        let role = self.state.carrier.as_ref().map(|c| c.role);

        if !automatic {
            if let Some(carrier) = self.state.carrier.clone() {
                if !conversion {
                    self.credit_touchdown(carrier.player, carrier.role);
                }
                if let Some(disc) = room.player(carrier.player) {
                    self.credit_carrier_yardage(disc.position);
                }
            }
        }

        self.halt_play();

        if !conversion {
            let points = self.config.scoring.touchdown;
            self.state.score.add(team, points);
            self.announce(Ruling::Touchdown {
                team,
                scorer,
                points,
                pick_six: intercept && role == Some(CarrierRole::Intercepter),
                automatic,
            });
            self.schedule(
                ScheduledAction::ExtraPoint { team },
                self.config.scoring.touchdown_to_extra_point_ms,
            );
        } else {
            let points = if intercept {
                self.config.scoring.defensive_conversion
            } else {
                self.config.scoring.conversion
            };
            self.state.score.add(team, points);
            self.state.play.conversion = false;
            self.announce(Ruling::ConversionGood {
                team,
                scorer,
                points,
                defensive: intercept,
            });

            let kicking = if intercept { team.opponent() } else { team };
            self.schedule(
                ScheduledAction::Kickoff { team: kicking },
                self.config.scoring.conversion_to_kickoff_ms,
            );
        }
    }

    fn credit_touchdown(&mut self, carrier: PlayerId, role: CarrierRole) {
        match role {
            CarrierRole::Receiver => {
                if let Some(qb) = self.state.play.quarterback {
                    self.credit(qb, StatKind::TouchdownPasses, 1);
                }
                self.credit(carrier, StatKind::ReceivingTouchdowns, 1);
            }
            CarrierRole::Runner | CarrierRole::QbRunner | CarrierRole::QbRunnerSacking => {
                self.credit(carrier, StatKind::RushingTouchdowns, 1);
            }
            CarrierRole::PuntReturner | CarrierRole::KickoffReturner => {
                self.credit(carrier, StatKind::ReturnTouchdowns, 1);
            }
            CarrierRole::Intercepter => self.credit(carrier, StatKind::PickSixes, 1),
            CarrierRole::Sack => {}
        }
    }

    /// Carrier downed (or out) inside their own end zone: two points for the
    /// other team and a free kick by the conceding team.
    pub(crate) fn safety(&mut self, room: &mut dyn Room, carrier: &PlayerDisc) {
        if self.state.play.conversion {
            self.reset_to_kickoff(room, None);
            return;
        }

        let conceding_team = carrier.team;
        let points = self.config.scoring.safety;

        self.state.score.add(conceding_team.opponent(), points);
        self.credit_carrier_yardage(carrier.position);
        self.credit(carrier.id, StatKind::Fouls, 1);
        self.announce(Ruling::Safety {
            conceding_team,
            carrier: carrier.id,
            points,
        });

        self.set_safety_kick(room, conceding_team);
    }

    /// Possession to `team` at its own touchback line.
    pub(crate) fn touchback(&mut self, room: &mut dyn Room, team: Team, carrier: Option<&PlayerDisc>) {
        if let Some(carrier) = carrier {
            self.credit_carrier_yardage(carrier.position);
        }

        if self.state.play.conversion {
            self.reset_to_kickoff(room, None);
            return;
        }

        let spot = FieldPosition::new(team, self.config.kicks.touchback_yard_line);
        self.announce(Ruling::Touchback { team, spot });
        self.set_down(room, DownSetup::at_counting(spot, team, false));
    }

    /// Abandons the play and kicks off after the score delay. Without an
    /// explicit team the team with the ball kicks, unless a conversion was
    /// intercepted, in which case the conversion team kicks.
    pub(crate) fn reset_to_kickoff(&mut self, room: &mut dyn Room, team: Option<Team>) {
        let team = team.unwrap_or_else(|| {
            let with_ball = self.state.team_with_ball;
            if self.state.play.intercept && self.state.play.conversion {
                with_ball.opponent()
            } else {
                with_ball
            }
        });

        if self.state.play.conversion {
            self.announce(Ruling::ConversionFailed { team });
        }

        self.state.mode = Mode::None;
        self.reset_play(room);
        self.schedule(ScheduledAction::Kickoff { team }, self.config.scoring.score_to_kickoff_ms);
    }

    // ===========================================
    // Statistics
    // ===========================================

    /// Yardage of the current carrier ending at `end`.
    pub(crate) fn credit_carrier_yardage(&mut self, end: Vec2) {
        let Some(carrier) = self.state.carrier.clone() else {
            return;
        };
        let line = coordinate_from_yards(self.state.ball_position);

        match carrier.role {
            CarrierRole::Receiver => {
                let gain = yard_gain_between_points(line, end, carrier.team);
                self.credit(carrier.player, StatKind::ReceivingYards, gain);
                if let Some(qb) = self.state.play.quarterback {
                    self.credit(qb, StatKind::PassingYards, gain);
                }
            }
            CarrierRole::Runner | CarrierRole::QbRunner | CarrierRole::QbRunnerSacking => {
                let gain = yard_gain_between_points(line, end, carrier.team);
                self.credit(carrier.player, StatKind::RushingYards, gain);
            }
            CarrierRole::Sack => {
                let gain = yard_gain_between_points(line, end, carrier.team);
                self.credit(carrier.player, StatKind::SackYardsLost, gain);
            }
            CarrierRole::PuntReturner | CarrierRole::KickoffReturner => {
                let gain = yard_gain_between_points(carrier.initial_position, end, carrier.team);
                self.credit(carrier.player, StatKind::ReturnYards, gain);
                self.credit(carrier.player, StatKind::Returns, 1);
            }
            CarrierRole::Intercepter => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fixtures::*;

    fn red_at_30() -> (Referee, crate::sim::room::ScriptedRoom) {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));
        snap(&mut referee, &mut room, RED_QB);
        (referee, room)
    }

    #[test]
    fn test_touchdown_then_extra_point() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Blue, 20));
        snap(&mut referee, &mut room, RED_QB);
        hand_to(&mut referee, &mut room, RED_2, CarrierRole::Runner, true);

        room.move_player(PlayerId(RED_2), Vec2::new(770.0, 0.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.contains(&Ruling::Touchdown {
            team: Team::Red,
            scorer: Some(PlayerId(RED_2)),
            points: 6,
            pick_six: false,
            automatic: false,
        }));
        assert_eq!(referee.score().red, 6);
        assert_eq!(referee.mode(), Mode::None);
        assert_eq!(referee.stats().get(PlayerId(RED_2), StatKind::RushingTouchdowns), 1);

        run_ms(&mut referee, &mut room, 2_000);
        assert_eq!(referee.mode(), Mode::ExtraPoint);
    }

    #[test]
    fn test_safety_when_downed_in_own_end_zone() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 5));
        snap(&mut referee, &mut room, RED_QB);
        hand_to(&mut referee, &mut room, RED_2, CarrierRole::Receiver, false);

        room.move_player(PlayerId(RED_2), Vec2::new(-790.0, 0.0));
        room.move_player(PlayerId(BLUE_1), Vec2::new(-760.0, 0.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.contains(&Ruling::Safety {
            conceding_team: Team::Red,
            carrier: PlayerId(RED_2),
            points: 2,
        }));
        assert_eq!(referee.score().blue, 2);
        assert_eq!(referee.mode(), Mode::Safety);
    }

    #[test]
    fn test_gang_tackle_inside_window_fumbles() {
        let (mut referee, mut room) = red_at_30();
        hand_to(&mut referee, &mut room, RED_2, CarrierRole::Receiver, false);

        room.move_player(PlayerId(RED_2), Vec2::new(0.0, 100.0));
        room.move_player(PlayerId(BLUE_1), Vec2::new(30.0, 100.0));
        room.move_player(PlayerId(BLUE_2), Vec2::new(-30.0, 100.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.iter().any(|r| matches!(
            r,
            Ruling::Fumble { carrier: PlayerId(RED_2), recovering_team: Team::Blue, .. }
        )));
        assert_eq!(referee.team_with_ball(), Team::Blue);
        assert_eq!(referee.ball_position(), FieldPosition::new(Team::Red, 50));
        assert_eq!(referee.down_count(), 1);
        assert_eq!(referee.distance(), 20);
        assert_eq!(referee.stats().get(PlayerId(RED_2), StatKind::Fumbles), 1);
        assert_eq!(referee.stats().get(PlayerId(BLUE_1), StatKind::ForcedFumbles), 1);
        assert_eq!(referee.stats().get(PlayerId(RED_2), StatKind::ReceivingYards), 20);
    }

    #[test]
    fn test_gang_tackle_after_window_is_plain_tackle() {
        let (mut referee, mut room) = red_at_30();
        hand_to(&mut referee, &mut room, RED_2, CarrierRole::Receiver, false);
        run_ms(&mut referee, &mut room, 1_100);

        room.move_player(PlayerId(RED_2), Vec2::new(0.0, 100.0));
        room.move_player(PlayerId(BLUE_1), Vec2::new(30.0, 100.0));
        room.move_player(PlayerId(BLUE_2), Vec2::new(-30.0, 100.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.iter().any(|r| matches!(r, Ruling::Tackled { sack: false, .. })));
        assert_eq!(referee.team_with_ball(), Team::Red);
        assert_eq!(referee.ball_position(), FieldPosition::new(Team::Red, 50));
        assert_eq!(referee.stats().get(PlayerId(BLUE_1), StatKind::Tackles), 1);
        assert_eq!(referee.stats().get(PlayerId(BLUE_2), StatKind::Tackles), 1);
    }

    #[test]
    fn test_intercepter_never_fumbles() {
        let (mut referee, mut room) = red_at_30();
        referee.state.play.intercept = true;
        referee.state.team_with_ball = Team::Blue;
        hand_to(&mut referee, &mut room, BLUE_1, CarrierRole::Intercepter, false);

        room.move_player(PlayerId(BLUE_1), Vec2::new(0.0, 100.0));
        room.move_player(PlayerId(RED_2), Vec2::new(30.0, 100.0));
        room.move_player(PlayerId(RED_3), Vec2::new(-30.0, 100.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(!rulings.iter().any(|r| matches!(r, Ruling::Fumble { .. })));
        assert!(rulings.iter().any(|r| matches!(r, Ruling::Tackled { .. })));
        assert_eq!(referee.team_with_ball(), Team::Blue);
    }

    #[test]
    fn test_carrier_out_of_bounds_spots_ball() {
        let (mut referee, mut room) = red_at_30();
        hand_to(&mut referee, &mut room, RED_2, CarrierRole::Runner, true);

        room.move_player(PlayerId(RED_2), Vec2::new(-100.0, 280.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.contains(&Ruling::OutOfBounds {
            carrier: PlayerId(RED_2),
            spot: FieldPosition::new(Team::Red, 43),
        }));
        assert_eq!(referee.ball_position(), FieldPosition::new(Team::Red, 43));
        assert_eq!(referee.down_count(), 2);
        assert_eq!(referee.distance(), 7);
    }

    #[test]
    fn test_intercepter_downed_in_end_zone_is_touchback() {
        let (mut referee, mut room) = red_at_30();
        referee.state.play.intercept = true;
        referee.state.team_with_ball = Team::Blue;
        referee.state.down = DownState::new_series(20);
        hand_to(&mut referee, &mut room, BLUE_1, CarrierRole::Intercepter, false);
        referee.state.play.intercept_player = Some(PlayerId(BLUE_1));

        room.move_player(PlayerId(BLUE_1), Vec2::new(800.0, 0.0));
        room.move_player(PlayerId(RED_2), Vec2::new(770.0, 0.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.contains(&Ruling::Touchback {
            team: Team::Blue,
            spot: FieldPosition::new(Team::Blue, 25),
        }));
        assert_eq!(referee.team_with_ball(), Team::Blue);
        assert_eq!(referee.down_count(), 1);
        assert_eq!(referee.score(), crate::referee::Score::default());
    }

    #[test]
    fn test_intercepter_returning_to_end_zone_is_safety() {
        let (mut referee, mut room) = red_at_30();
        referee.state.play.intercept = true;
        referee.state.team_with_ball = Team::Blue;
        hand_to(&mut referee, &mut room, BLUE_1, CarrierRole::Intercepter, true);
        referee.state.play.intercept_player = Some(PlayerId(BLUE_1));

        // Out of the end zone first, then back in and downed
        room.move_player(PlayerId(BLUE_1), Vec2::new(600.0, 0.0));
        tick(&mut referee, &mut room);
        room.move_player(PlayerId(BLUE_1), Vec2::new(800.0, 0.0));
        room.move_player(PlayerId(RED_2), Vec2::new(770.0, 0.0));
        room.move_player(PlayerId(RED_3), Vec2::new(830.0, 0.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.iter().any(|r| matches!(r, Ruling::Safety { conceding_team: Team::Blue, .. })));
        assert_eq!(referee.score().red, 2);
    }

    #[test]
    fn test_punt_out_of_end_zone_is_touchback() {
        let (mut referee, mut room) = started();
        referee.state.team_with_ball = Team::Red;
        referee.state.mode = Mode::Punt;
        referee.state.play.qb_kicked_ball = true;

        room.place_ball(Vec2::new(935.0, 100.0), Vec2::new(3.0, 0.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.contains(&Ruling::Touchback {
            team: Team::Blue,
            spot: FieldPosition::new(Team::Blue, 25),
        }));
        assert_eq!(referee.team_with_ball(), Team::Blue);
    }

    #[test]
    fn test_kickoff_out_of_bounds_gives_forty() {
        let (mut referee, mut room) = started();
        referee.state.play.qb_kicked_ball = true;

        room.place_ball(Vec2::new(300.0, 280.0), Vec2::new(0.0, 3.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.contains(&Ruling::KickOutOfBounds {
            receiving_team: Team::Blue,
            spot: FieldPosition::new(Team::Blue, 40),
        }));
        assert_eq!(referee.ball_position(), FieldPosition::new(Team::Blue, 40));
        assert_eq!(referee.team_with_ball(), Team::Blue);
    }

    #[test]
    fn test_conversion_touchdown_scores_two_and_kicks_off() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Blue, 20));
        snap(&mut referee, &mut room, RED_QB);
        referee.state.play.conversion = true;
        hand_to(&mut referee, &mut room, RED_2, CarrierRole::Receiver, false);

        room.move_player(PlayerId(RED_2), Vec2::new(770.0, 0.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.iter().any(|r| matches!(
            r,
            Ruling::ConversionGood { team: Team::Red, points: 2, defensive: false, .. }
        )));
        assert_eq!(referee.score().red, 2);
        assert!(!referee.is_conversion());
        assert_eq!(referee.stats().get(PlayerId(RED_2), StatKind::ReceivingTouchdowns), 0);

        run_ms(&mut referee, &mut room, 2_000);
        assert_eq!(referee.mode(), Mode::Kickoff);
        assert_eq!(referee.team_with_ball(), Team::Red);
    }
}
