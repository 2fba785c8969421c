//! Down and hike controller
//!
//! A down goes through two modes: `WaitingForHike` while the ball sits
//! locked a few yards behind the line of scrimmage, then `Down` once the
//! offense hikes. Until the blitz clock runs out the scrimmage rules apply
//! (line crossing, illegal touches, holding, offside, crowding); afterwards
//! the defense may rush and the quarterback may run.
//!
//! ## Blitz clock
//!
//! The blitz clock starts at the hike. It ends `blitz_delay_ms` after the
//! hike, or `carried_ball_blitz_delay_ms` after the quarterback first moved
//! the ball, whichever comes first.

use crate::field::math::{ball_path_from, segment_intersection};
use crate::field::{
    add_yards, add_yards_unclamped, coordinate_from_yards, difference_in_yards, goal_line,
    is_in_red_zone, is_out_of_bounds, is_past_line, measures, yards_to_goal, Team, Vec2,
};
use crate::referee::{
    CarrierRole, DownSetup, DownState, Mode, PenaltyOutcome, Referee, ScheduledAction,
};
use crate::room::{BallDisc, Marker, PlayerDisc, PlayerId, Room, RoomExt};
use crate::ruling::{DeadBallReason, Foul, Ruling};
use crate::stats::{StatKind, StatsSink};
use crate::timer::TimerId;

/// Per-down state that lives outside the match snapshot
#[derive(Debug, Clone)]
pub(crate) struct DownPlay {
    /// Engine time the current down was set
    pub(crate) set_at_ms: Option<u64>,
    pub(crate) hike_clock: Option<TimerId>,
    /// Cleared by the hike-clock admin command for every later down
    pub(crate) hike_clock_enabled: bool,
    /// Where the ball was spotted for the snap
    pub(crate) ball_origin: Option<Vec2>,
    pub(crate) qb_carried_at_ms: Option<u64>,
    pub(crate) sack: bool,
    /// The ball got loose during a sack: the sack stands
    pub(crate) sack_ball_touched: bool,
    pub(crate) defender_blocking: Option<PlayerId>,
}

impl Default for DownPlay {
    fn default() -> Self {
        Self {
            set_at_ms: None,
            hike_clock: None,
            hike_clock_enabled: true,
            ball_origin: None,
            qb_carried_at_ms: None,
            sack: false,
            sack_ball_touched: false,
            defender_blocking: None,
        }
    }
}

impl DownPlay {
    pub(crate) fn reset(&mut self) {
        *self = Self {
            hike_clock_enabled: self.hike_clock_enabled,
            ..Self::default()
        };
    }
}

/// What a hike request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HikeOutcome {
    Hiked,
    /// Offensive players were past the line
    Refused,
    /// Not a valid hiker right now
    Ignored,
}

impl<S: StatsSink> Referee<S> {
    // ===========================================
    // Setting the down
    // ===========================================

    /// Spots the ball for the next down and waits for the hike.
    pub(crate) fn set_down(&mut self, room: &mut dyn Room, setup: DownSetup) {
        let mut setup = setup;
        let conversion = self.state.play.conversion;
        if conversion {
            setup.count_down = false;
            setup.count_distance = false;
        }
        let had_series = self.state.down.count > 0;

        self.state.mode = Mode::None;
        self.reset_play(room);
        self.state.play.conversion = conversion;

        let for_team = setup
            .for_team
            .filter(|t| t.is_playing())
            .unwrap_or(self.state.team_with_ball);
        if for_team != self.state.team_with_ball && !conversion {
            self.state.down = DownState::new_series(self.config.down.yards_to_gain);
            self.state.team_with_ball = for_team;
            setup.count_distance = false;
        }
        let mut team = self.state.team_with_ball;

        if let Some(spot) = setup.spot {
            if setup.count_distance {
                self.state.down.distance -=
                    difference_in_yards(self.state.ball_position, spot, Some(team));
            }
            self.state.ball_position = spot;
        }

        if let Some(increment) = setup.increment {
            self.state.ball_position = add_yards(self.state.ball_position, increment, team);
            self.state.down.distance -= increment;
        }

        self.state.down.in_red_zone = is_in_red_zone(self.state.ball_position, team.opponent());
        if !self.state.down.in_red_zone {
            self.state.down.goal_mode = false;
        }

        let mut first_down = false;
        if self.state.down.distance <= 0 && !self.state.down.goal_mode {
            self.state.down.distance = self.config.down.yards_to_gain;
            self.state.down.count = 0;
            first_down = had_series;
        }

        let spot = self.state.ball_position;

        if conversion {
            self.state.down.count = 4;
            self.state.down.distance = self.config.down.conversion_distance;
            self.state.down.goal_mode = true;
            self.announce(Ruling::ConversionSet { team, spot });
        } else if self.state.down.count == 0 {
            self.state.down.count = 1;
            if self.state.down.in_red_zone {
                self.state.down.goal_mode = true;
            }
        } else if self.state.down.count == 4 && setup.count_down {
            team = team.opponent();
            self.announce(Ruling::TurnoverOnDowns { team, spot });

            self.state.team_with_ball = team;
            self.state.down = DownState::new_series(self.config.down.yards_to_gain);
            self.state.down.count = 1;
            self.state.down.in_red_zone = is_in_red_zone(spot, team.opponent());
            self.state.down.goal_mode = self.state.down.in_red_zone;
        } else if setup.count_down {
            self.state.down.count += 1;
        }

        self.spot_ball_for_hike(room);
        self.reset_formation(room);

        self.state.mode = Mode::WaitingForHike;
        self.render_down_markers(room);
        self.down.set_at_ms = Some(self.now());
        self.arm_hike_clock();

        if !conversion {
            self.announce(Ruling::DownSet {
                team,
                down: self.state.down.count,
                distance: self.state.down.distance,
                goal: self.state.down.goal_mode,
                spot,
                first_down,
            });
        }
    }

    /// Ball stopped, locked and placed behind the line; players cannot push it.
    pub(crate) fn spot_ball_for_hike(&mut self, room: &mut dyn Room) {
        let start = self.ball_start();

        room.stop_ball();
        room.lock_ball();
        room.feather_players();
        room.set_ball_position(start);

        self.down.ball_origin = Some(start);
    }

    /// Lines both teams up `formation_offset_yards` from the ball, Red on the
    /// negative side.
    pub(crate) fn reset_formation(&mut self, room: &mut dyn Room) {
        let line = self.line_x();
        let offset = measures::YARD * self.config.down.formation_offset_yards as f64;

        for player in room.players() {
            if player.team.is_playing() {
                room.set_player_x(player.id, line - offset * player.team.attack_sign());
            }
        }
    }

    pub(crate) fn render_down_markers(&mut self, room: &mut dyn Room) {
        let team = self.state.team_with_ball;
        let top = -measures::FIELD_MAX_Y;
        let bottom = measures::FIELD_MAX_Y;

        let line_to_gain = add_yards_unclamped(self.state.ball_position, self.state.down.distance, team);
        if self.state.down.goal_mode || line_to_gain.yards < 1 {
            room.clear_marker(Marker::FirstDownLine);
        } else {
            let x = coordinate_from_yards(line_to_gain).x;
            room.place_marker(Marker::FirstDownLine, Vec2::new(x, top), Vec2::new(x, bottom));
        }

        self.render_ball_line(room, self.line_x());
    }

    pub(crate) fn clear_down_markers(&mut self, room: &mut dyn Room) {
        room.clear_marker(Marker::FirstDownLine);
        room.clear_marker(Marker::BallLine);
    }

    // ===========================================
    // Hike clock
    // ===========================================

    fn arm_hike_clock(&mut self) {
        self.clear_hike_clock();
        if !self.down.hike_clock_enabled {
            return;
        }

        let delay = if self.state.play.conversion {
            self.config.clock.extra_point_clock_ms
        } else {
            self.config.clock.hike_clock_ms
        };
        self.down.hike_clock = Some(self.schedule(ScheduledAction::HikeClockExpired, delay));
    }

    pub(crate) fn clear_hike_clock(&mut self) {
        if let Some(id) = self.down.hike_clock.take() {
            self.timers.stop(id);
        }
    }

    pub(crate) fn hike_clock_expired(&mut self, room: &mut dyn Room) {
        self.down.hike_clock = None;
        if self.state.mode != Mode::WaitingForHike {
            return;
        }

        let team = self.state.team_with_ball;
        self.announce(Ruling::HikeClockExpired { team });

        if self.state.play.conversion {
            self.reset_to_kickoff(room, Some(team));
        } else {
            self.set_down(room, DownSetup::next());
        }
    }

    /// Whether the defense may rush and the quarterback may run.
    pub(crate) fn blitz_expired(&self) -> bool {
        let Some(hiked_at) = self.state.play.hike_time_ms else {
            return false;
        };

        let mut deadline = hiked_at + self.config.clock.blitz_delay_ms;
        if let Some(carried_at) = self.down.qb_carried_at_ms {
            deadline = deadline.min(carried_at + self.config.clock.carried_ball_blitz_delay_ms);
        }
        self.now() > deadline
    }

    // ===========================================
    // Hike
    // ===========================================

    pub(crate) fn hike(&mut self, room: &mut dyn Room, player: PlayerId) -> HikeOutcome {
        if self.state.mode != Mode::WaitingForHike || self.state.paused || !self.state.in_progress {
            return HikeOutcome::Ignored;
        }

        let team = self.state.team_with_ball;
        let Some(hiker) = room.player(player) else {
            log::warn!("hike from unknown player {}", player);
            return HikeOutcome::Ignored;
        };
        if hiker.team != team {
            return HikeOutcome::Ignored;
        }
        let Some(ball) = room.ball() else {
            log::warn!("hike without a ball on the field");
            return HikeOutcome::Ignored;
        };
        if hiker.gap_to_ball(&ball) > self.config.down.hike_max_distance {
            return HikeOutcome::Ignored;
        }

        let line = self.line_x();
        let offenders: Vec<PlayerId> = room
            .team_players(team)
            .into_iter()
            .filter(|p| is_past_line(p.position.x, line, team))
            .map(|p| p.id)
            .collect();

        if !offenders.is_empty() {
            self.announce(Ruling::HikeRefused { team, offenders });
            if self.state.play.conversion {
                self.set_extra_point(room, team, true);
            }
            return HikeOutcome::Refused;
        }

        self.state.play.quarterback = Some(hiker.id);
        self.state.mode = Mode::Down;
        self.state.play.hike_time_ms = Some(self.now());

        room.unlock_ball();
        room.restore_player_mass();

        self.clear_hike_clock();
        self.clear_extra_point_clock();

        self.announce(Ruling::Hiked { quarterback: hiker.id });
        HikeOutcome::Hiked
    }

    // ===========================================
    // Live down
    // ===========================================

    pub(crate) fn down_tick(&mut self, room: &mut dyn Room) {
        let Some(ball) = room.ball() else {
            log::warn!("down in progress without a ball");
            return;
        };
        let players = room.players();
        let epoch = self.state.epoch;

        if self.state.play.intercept_attempt.is_none() {
            if let Some(qb) = self.state.play.quarterback.and_then(|id| find(&players, id)) {
                if self.state.carrier.is_none() && !self.state.play.qb_kicked_ball {
                    self.scrimmage_tick(room, &players, &ball, &qb);
                } else if self.state.play.qb_kicked_ball {
                    self.pass_tick(room, &players, &ball);
                }
            }
        }

        if self.state.mode == Mode::Down && self.state.epoch == epoch {
            self.interception_tick(room, &ball);
        }
    }

    /// Rules between the hike and the pass while nobody carries the ball.
    fn scrimmage_tick(&mut self, room: &mut dyn Room, players: &[PlayerDisc], ball: &BallDisc, qb: &PlayerDisc) {
        let team = self.state.team_with_ball;
        let line = self.line_x();

        if self.down.qb_carried_at_ms.is_none() {
            if let Some(origin) = self.down.ball_origin {
                if ball.gap_to_spot(origin) > self.config.down.ball_moved_threshold {
                    self.down.qb_carried_at_ms = Some(self.now());
                }
            }
        }

        let expired = self.blitz_expired();

        if is_past_line(qb.position.x, line, team) {
            if !expired {
                self.credit(qb.id, StatKind::Fouls, 1);
                let yards = self.config.penalties.quarterback_crossed_line_yards;
                self.offensive_foul(room, Foul::QuarterbackCrossedLine, vec![qb.id], yards);
            } else {
                self.quarterback_run(room, qb);
            }
            return;
        }

        if expired && qb.gap_to_ball(ball) > self.config.down.quarterback_run_distance {
            self.quarterback_run(room, qb);
            return;
        }

        let touch = self.config.down.touch_distance;
        if let Some(toucher) = players
            .iter()
            .find(|p| p.team.is_playing() && p.id != qb.id && p.gap_to_ball(ball) < touch)
        {
            self.illegal_ball_touch(room, toucher);
            return;
        }

        if is_past_line(ball.position.x, line, team) {
            self.credit(qb.id, StatKind::Fouls, 1);
            self.dead_ball(room, DeadBallReason::BallCrossedLine);
            return;
        }

        if is_out_of_bounds(ball.position, ball.radius * 2.0) {
            self.dead_ball(room, DeadBallReason::BallOutOfBounds);
            return;
        }

        let handoff = self.config.down.handoff_distance;
        if let Some(runner) = players
            .iter()
            .find(|p| p.team == team && p.id != qb.id && p.gap_to_player(qb) <= handoff)
        {
            self.announce(Ruling::Handoff { runner: runner.id });
            self.credit(runner.id, StatKind::Runs, 1);
            self.set_carrier(room, runner, CarrierRole::Runner, true);
            return;
        }

        if !expired {
            let holders = self.holding_offenders(players, qb.id);
            if !holders.is_empty() {
                self.credit_all(&holders, StatKind::Fouls);
                let yards = self.config.penalties.holding_yards;
                self.offensive_foul(room, Foul::OffensiveHolding, holders, yards);
                return;
            }
        }

        if let Some(defender) = players
            .iter()
            .find(|p| p.team == team.opponent() && is_past_line(p.position.x, line, team.opponent()))
        {
            if !expired {
                self.credit(defender.id, StatKind::Fouls, 1);
                let outcome = self.escalate_defensive_penalty(self.config.penalties.defensive_offside_yards);
                self.enforce_defensive_penalty(room, Foul::DefensiveOffside, vec![defender.id], outcome);
            } else {
                self.start_sack(room, defender.id);
            }
            return;
        }

        if !expired {
            self.crowding_tick(room, players);
        }
    }

    /// Rules once the quarterback kicked the ball (a pass in the air, or a
    /// loose ball during a sack).
    fn pass_tick(&mut self, room: &mut dyn Room, players: &[PlayerDisc], ball: &BallDisc) {
        let sacking = self.down.sack && !self.down.sack_ball_touched;
        if self.state.carrier.is_some() && !sacking {
            return;
        }

        if self.down.sack && is_out_of_bounds(ball.position, 0.0) {
            self.down.sack_ball_touched = true;
            return;
        }

        let team = self.state.team_with_ball;
        let qb = self.state.play.quarterback;
        let touch = self.config.down.touch_distance;

        let receiver = players
            .iter()
            .find(|p| p.team == team && Some(p.id) != qb && p.gap_to_ball(ball) < touch);
        if let Some(receiver) = receiver {
            let play = &self.state.play;
            if !play.blocked_pass && !play.intercept && play.intercept_attempt.is_none() {
                self.qb_passed_in_sack();
                self.set_receiver(room, receiver);
                return;
            }
        }

        let block = self.config.down.pass_block_distance;
        if !self.state.play.blocked_pass {
            if let Some(defender) = players
                .iter()
                .find(|p| p.team == team.opponent() && p.gap_to_ball(ball) < block)
            {
                self.down.defender_blocking = Some(defender.id);
                self.state.play.blocked_pass = true;
                self.schedule(
                    ScheduledAction::ConfirmPassBlock { defender: defender.id },
                    self.config.down.pass_block_confirm_ms,
                );
                return;
            }
        }

        if let Some(defender) = self.down.defender_blocking.and_then(|id| find(players, id)) {
            let released = defender.gap_to_ball(ball) > self.config.down.pass_block_release_distance;
            if released && self.state.play.intercept_attempt.is_none() && !self.state.play.intercept {
                if self.down.sack {
                    self.down.sack_ball_touched = true;
                } else {
                    self.block_pass(room, defender.id, true);
                }
            }
        }
    }

    /// Watches a pending interception until the ball dies or leaves the field.
    fn interception_tick(&mut self, room: &mut dyn Room, ball: &BallDisc) {
        let Some(defender) = self.state.play.intercept_attempt else {
            return;
        };

        if ball.speed() < self.config.down.interception_min_speed {
            room.set_ball_damping(measures::ball::DAMPING_DEFAULT);
            self.announce(Ruling::InterceptionFailed { defender });
            self.state.play.intercept_attempt = None;

            if self.down.sack {
                self.down.sack_ball_touched = true;
            } else {
                self.block_pass(room, defender, false);
            }
        } else if ball.damping == measures::ball::DAMPING_HIGHEST
            && ball.speed() > self.config.down.interception_damping_relax_speed
        {
            room.set_ball_damping(measures::ball::DAMPING_HIGH);
        }
    }

    pub(crate) fn down_ball_kick(&mut self, room: &mut dyn Room, kicker: &PlayerDisc) {
        if self.state.play.intercept {
            return;
        }

        let team = self.state.team_with_ball;

        if let Some(attempt) = self.state.play.intercept_attempt {
            if self.state.mode == Mode::Down && kicker.team != team && kicker.id != attempt {
                self.second_defender_touch(room, kicker.id);
            }
            return;
        }

        if self.state.mode == Mode::WaitingForHike {
            let grace_over = self
                .down
                .set_at_ms
                .map_or(true, |set_at| self.now() > set_at + self.config.down.defender_touch_grace_ms);
            if !self.state.play.qb_kicked_ball && kicker.team != team && grace_over {
                self.illegal_ball_touch(room, kicker);
            }
            return;
        }

        if self.state.mode != Mode::Down {
            return;
        }

        let is_qb = self.state.is_quarterback(kicker.id);

        if !self.state.play.qb_kicked_ball {
            if is_qb {
                self.state.play.qb_kicked_ball = true;
                self.credit(kicker.id, StatKind::PassesAttempted, 1);
            } else {
                self.illegal_ball_touch(room, kicker);
            }
            return;
        }

        let sacking = self.down.sack && !self.down.sack_ball_touched && !is_qb;
        if self.state.carrier.is_none() || sacking {
            if kicker.team != team {
                self.start_interception(room, kicker.id);
            } else {
                self.qb_passed_in_sack();
                self.set_receiver(room, kicker);
            }
        }
    }

    fn second_defender_touch(&mut self, room: &mut dyn Room, defender: PlayerId) {
        self.state.play.intercept_attempt = None;
        if self.down.sack {
            self.down.sack_ball_touched = true;
        } else {
            self.block_pass(room, defender, true);
        }
    }

    fn quarterback_run(&mut self, room: &mut dyn Room, qb: &PlayerDisc) {
        self.set_carrier(room, qb, CarrierRole::QbRunner, true);
        self.announce(Ruling::QuarterbackRun { quarterback: qb.id });
        self.credit(qb.id, StatKind::QuarterbackRuns, 1);
    }

    fn dead_ball(&mut self, room: &mut dyn Room, reason: DeadBallReason) {
        self.announce(Ruling::DeadBall { reason });
        if self.state.play.conversion {
            self.reset_to_kickoff(room, None);
        } else {
            self.set_down(room, DownSetup::next());
        }
    }

    /// A player other than the quarterback touched the ball before the pass.
    pub(crate) fn illegal_ball_touch(&mut self, room: &mut dyn Room, player: &PlayerDisc) {
        if self.state.carrier.is_some() {
            return;
        }

        let waiting = self.state.mode == Mode::WaitingForHike;

        if player.team != self.state.team_with_ball {
            if waiting || !self.blitz_expired() {
                if !waiting {
                    self.credit(player.id, StatKind::Fouls, 1);
                }
                let outcome =
                    self.escalate_defensive_penalty(self.config.penalties.defensive_illegal_touch_yards);
                self.enforce_defensive_penalty(room, Foul::DefensiveIllegalTouch, vec![player.id], outcome);
            } else {
                self.start_sack(room, player.id);
            }
        } else {
            self.credit(player.id, StatKind::Fouls, 1);
            let yards = self.config.penalties.offensive_illegal_touch_yards;
            self.offensive_foul(room, Foul::OffensiveIllegalTouch, vec![player.id], yards);
        }
    }

    fn start_sack(&mut self, room: &mut dyn Room, defender: PlayerId) {
        let Some(quarterback) = self.state.play.quarterback.and_then(|id| room.player(id)) else {
            return;
        };

        self.set_carrier(room, &quarterback, CarrierRole::QbRunnerSacking, true);
        self.down.sack = true;
        self.announce(Ruling::SackAttempt {
            defender,
            quarterback: quarterback.id,
        });
    }

    /// The quarterback got rid of the ball while being sacked.
    pub(crate) fn qb_passed_in_sack(&mut self) {
        let carrier_is_qb = self
            .state
            .carrier_id()
            .is_some_and(|id| self.state.is_quarterback(id));
        if carrier_is_qb && self.down.sack {
            self.down.sack = false;
        }
    }

    fn set_receiver(&mut self, room: &mut dyn Room, receiver: &PlayerDisc) {
        self.set_carrier(room, receiver, CarrierRole::Receiver, false);

        self.credit(receiver.id, StatKind::Receptions, 1);
        if let Some(qb) = self.state.play.quarterback {
            self.credit(qb, StatKind::PassesCompleted, 1);
        }
        self.announce(Ruling::PassCaught { receiver: receiver.id });
    }

    /// Attackers dragging a defender back across the line.
    ///
    /// Only defenders that reached the offense's side of the line and keep
    /// moving in their attack direction are considered. An attacker other
    /// than the quarterback holds when it is in contact, between the
    /// defender and the line, and moving back toward its own goal.
    pub(crate) fn holding_offenders(&self, players: &[PlayerDisc], quarterback: PlayerId) -> Vec<PlayerId> {
        let team = self.state.team_with_ball;
        let line = self.line_x();
        let reach = self.config.down.holding_distance;
        let mut holders: Vec<PlayerId> = Vec::new();

        for defender in players.iter().filter(|p| p.team == team.opponent()) {
            if is_past_line(defender.position.x, line, team) {
                continue;
            }
            if defender.velocity.x * defender.team.attack_sign() <= 0.0 {
                continue;
            }

            for attacker in players.iter().filter(|p| p.team == team && p.id != quarterback) {
                let sign = attacker.team.attack_sign();
                let ahead = (attacker.position.x - defender.position.x) * sign > 0.0;
                let pulling = attacker.velocity.x * sign < 0.0;

                if ahead && pulling && attacker.gap_to_player(defender) < reach && !holders.contains(&attacker.id) {
                    holders.push(attacker.id);
                }
            }
        }

        holders
    }

    // ===========================================
    // Penalties
    // ===========================================

    /// Applies red-zone escalation to a defensive foul worth `base` yards.
    pub(crate) fn escalate_defensive_penalty(&mut self, base: i32) -> PenaltyOutcome {
        let team = self.state.team_with_ball;
        if !is_in_red_zone(self.state.ball_position, team.opponent()) {
            return PenaltyOutcome::Yards(base);
        }

        self.state.down.red_zone_penalties += 1;
        if self.state.down.red_zone_penalties >= self.config.penalties.max_red_zone_penalties {
            return PenaltyOutcome::AutomaticTouchdown;
        }

        let half_way = yards_to_goal(self.state.ball_position, team) / 2;
        PenaltyOutcome::Yards(half_way.clamp(1, base.max(1)))
    }

    pub(crate) fn enforce_defensive_penalty(
        &mut self,
        room: &mut dyn Room,
        foul: Foul,
        offenders: Vec<PlayerId>,
        outcome: PenaltyOutcome,
    ) {
        let team = self.state.team_with_ball;
        let red_zone_penalties = is_in_red_zone(self.state.ball_position, team.opponent())
            .then_some(self.state.down.red_zone_penalties);

        match outcome {
            PenaltyOutcome::AutomaticTouchdown => {
                self.announce(Ruling::Penalty {
                    foul,
                    against: team.opponent(),
                    offenders,
                    yards: 0,
                    red_zone_penalties,
                });
                self.score_touchdown(room, team, None, true);
            }
            PenaltyOutcome::Yards(yards) => {
                self.adjust_end_time();
                self.announce(Ruling::Penalty {
                    foul,
                    against: team.opponent(),
                    offenders,
                    yards,
                    red_zone_penalties,
                });
                self.set_down(room, DownSetup::penalty(yards, false));
            }
        }
    }

    /// Offensive foul: yards back and a down lost, or the conversion.
    fn offensive_foul(&mut self, room: &mut dyn Room, foul: Foul, offenders: Vec<PlayerId>, yards: i32) {
        self.announce(Ruling::Penalty {
            foul,
            against: self.state.team_with_ball,
            offenders,
            yards,
            red_zone_penalties: None,
        });

        if self.state.play.conversion {
            self.reset_to_kickoff(room, None);
        } else {
            self.set_down(room, DownSetup::penalty(yards, true));
        }
    }

    // ===========================================
    // Passes and interceptions
    // ===========================================

    fn start_interception(&mut self, room: &mut dyn Room, defender: PlayerId) {
        let Some(ball) = room.ball() else {
            return;
        };

        self.state.play.intercept_attempt = Some(defender);
        room.lock_ball();

        self.schedule(
            ScheduledAction::CheckInterception {
                defender,
                origin: ball.position,
                velocity_x: ball.velocity.x,
            },
            0,
        );
    }

    /// Projects the deflected ball toward the goal line it travels to. A
    /// path that misses the (enlarged) goal line is a blocked pass.
    pub(crate) fn check_interception(&mut self, room: &mut dyn Room, defender: PlayerId, origin: Vec2, velocity_x: f64) {
        let Some(ball) = room.ball() else {
            return;
        };

        let interceptor_team = self.state.team_with_ball.opponent();
        let goal_of = if velocity_x < 0.0 { Team::Red } else { Team::Blue };
        let scale = if goal_of == interceptor_team {
            self.config.down.interception_own_goal_scale
        } else {
            self.config.down.interception_goal_scale
        };

        let path = ball_path_from(origin, ball.position, self.config.down.interception_path_length);
        let hits_goal = path
            .zip(goal_line(goal_of, scale))
            .and_then(|((from, to), (top, bottom))| segment_intersection(from, to, top, bottom))
            .is_some();

        let sacking = self.down.sack && !self.down.sack_ball_touched;
        if self.state.carrier.is_some() && !sacking {
            return;
        }

        if hits_goal {
            self.announce(Ruling::InterceptionAttempt { defender });
            let damping = if ball.speed() < self.config.down.interception_slow_speed {
                measures::ball::DAMPING_HIGHEST
            } else {
                measures::ball::DAMPING_HIGH
            };
            room.set_ball_damping(damping);
        } else {
            self.second_defender_touch(room, defender);
        }
    }

    pub(crate) fn confirm_pass_block(&mut self, room: &mut dyn Room, defender: PlayerId) {
        let play = &self.state.play;
        if play.intercept_attempt.is_some() || play.intercept || self.state.mode != Mode::Down {
            return;
        }

        if self.down.sack {
            self.down.sack_ball_touched = true;
        } else {
            self.block_pass(room, defender, true);
        }
    }

    /// Incomplete pass knocked down by `player`.
    pub(crate) fn block_pass(&mut self, room: &mut dyn Room, player: PlayerId, announce: bool) {
        room.unlock_ball();
        self.credit(player, StatKind::PassesBlocked, 1);
        if announce {
            self.announce(Ruling::PassIncomplete {
                blocked_by: Some(player),
            });
        }

        self.halt_play();

        if self.state.play.conversion {
            let team = self.state.team_with_ball;
            self.announce(Ruling::ConversionFailed { team });
            self.schedule(ScheduledAction::Kickoff { team }, self.config.scoring.score_to_kickoff_ms);
        } else {
            self.schedule(
                ScheduledAction::SetDown(DownSetup::next()),
                self.config.down.blocked_pass_restart_ms,
            );
        }
    }
}

fn find(players: &[PlayerDisc], id: PlayerId) -> Option<PlayerDisc> {
    players.iter().find(|p| p.id == id).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldPosition;
    use crate::sim::fixtures::*;

    #[test]
    fn test_new_series_is_first_and_twenty() {
        let (mut referee, mut room) = started();
        let rulings = spot(&mut referee, &mut room, Team::Blue, FieldPosition::new(Team::Blue, 30));

        assert_eq!(referee.mode(), Mode::WaitingForHike);
        assert_eq!(referee.team_with_ball(), Team::Blue);
        assert_eq!(referee.down_count(), 1);
        assert_eq!(referee.distance(), 20);
        assert!(rulings.iter().any(|r| matches!(r, Ruling::DownSet { down: 1, first_down: false, .. })));
    }

    #[test]
    fn test_formation_and_ball_spot() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));

        let line = coordinate_from_yards(FieldPosition::new(Team::Red, 30)).x;
        let ball = room.ball().unwrap();
        assert!((ball.position.x - (line - 31.0)).abs() < 1e-9);
        assert!((room.disc(PlayerId(RED_QB)).unwrap().position.x - (line - 155.0)).abs() < 1e-9);
        assert!((room.disc(PlayerId(BLUE_1)).unwrap().position.x - (line + 155.0)).abs() < 1e-9);
        assert!(room.marker(Marker::BallLine).is_some());
        assert!(room.marker(Marker::FirstDownLine).is_some());
    }

    #[test]
    fn test_goal_mode_hides_first_down_line() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Blue, 10));

        assert!(referee.is_goal_mode());
        assert!(room.marker(Marker::FirstDownLine).is_none());
    }

    #[test]
    fn test_scenario_a_twenty_yard_run_is_first_down() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));
        snap(&mut referee, &mut room, RED_QB);

        // Handoff
        let qb = room.disc(PlayerId(RED_QB)).unwrap().position;
        room.move_player(PlayerId(RED_2), Vec2::new(qb.x - 30.0, qb.y));
        let rulings = tick(&mut referee, &mut room);
        assert!(rulings.contains(&Ruling::Handoff { runner: PlayerId(RED_2) }));

        // Brought down at midfield by a lone tackler (two touches)
        room.move_player(PlayerId(RED_2), Vec2::new(5.0, 0.0));
        room.move_player(PlayerId(BLUE_1), Vec2::new(35.0, 0.0));
        let first = tick(&mut referee, &mut room);
        assert!(first.iter().any(|r| matches!(r, Ruling::TackleBroken { .. })));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.iter().any(|r| matches!(r, Ruling::Tackled { .. })));
        assert!(rulings.iter().any(|r| matches!(r, Ruling::DownSet { first_down: true, .. })));
        assert_eq!(referee.ball_position(), FieldPosition::new(Team::Red, 50));
        assert_eq!(referee.down_count(), 1);
        assert_eq!(referee.distance(), 20);
        assert_eq!(referee.stats().get(PlayerId(RED_2), StatKind::RushingYards), 20);
    }

    #[test]
    fn test_turnover_on_downs_after_four_plays() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 40));

        for expected in 2..=4 {
            referee.set_down(&mut room, DownSetup::next());
            assert_eq!(referee.down_count(), expected);
        }
        referee.drain();

        referee.set_down(&mut room, DownSetup::next());
        let rulings = referee.drain();

        assert_eq!(referee.team_with_ball(), Team::Blue);
        assert_eq!(referee.down_count(), 1);
        assert_eq!(referee.distance(), 20);
        assert_eq!(referee.ball_position(), FieldPosition::new(Team::Red, 40));
        assert!(rulings.contains(&Ruling::TurnoverOnDowns {
            team: Team::Blue,
            spot: FieldPosition::new(Team::Red, 40),
        }));
    }

    #[test]
    fn test_scenario_b_incomplete_on_fourth_down() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 45));
        referee.state.down.count = 4;
        referee.state.down.distance = 5;

        snap(&mut referee, &mut room, RED_QB);
        referee.on_ball_kick(&mut room, PlayerId(RED_QB));

        // Pass sails out over the sideline
        room.place_ball(Vec2::new(-100.0, 300.0), Vec2::new(0.0, 5.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.contains(&Ruling::PassIncomplete { blocked_by: None }));
        assert_eq!(referee.team_with_ball(), Team::Blue);
        assert_eq!(referee.down_count(), 1);
        assert_eq!(referee.distance(), 20);
        assert_eq!(referee.ball_position(), FieldPosition::new(Team::Red, 45));
    }

    #[test]
    fn test_hike_refused_with_player_past_line() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));

        room.move_player(PlayerId(RED_2), Vec2::new(0.0, 0.0));
        let rulings = snap(&mut referee, &mut room, RED_QB);

        assert_eq!(referee.mode(), Mode::WaitingForHike);
        assert!(rulings.iter().any(|r| matches!(r, Ruling::HikeRefused { offenders, .. } if offenders == &vec![PlayerId(RED_2)])));
    }

    #[test]
    fn test_hike_ignored_for_defense_or_far_player() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));

        assert_eq!(referee.hike(&mut room, PlayerId(BLUE_1)), HikeOutcome::Ignored);
        // Formation puts the quarterback ten yards back, out of reach
        assert_eq!(referee.hike(&mut room, PlayerId(RED_QB)), HikeOutcome::Ignored);
        assert_eq!(referee.mode(), Mode::WaitingForHike);
    }

    #[test]
    fn test_quarterback_crossing_early_costs_five() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));
        snap(&mut referee, &mut room, RED_QB);

        room.move_player(PlayerId(RED_QB), Vec2::new(-250.0, 0.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.iter().any(|r| matches!(r, Ruling::Penalty { foul: Foul::QuarterbackCrossedLine, yards: -5, .. })));
        assert_eq!(referee.ball_position(), FieldPosition::new(Team::Red, 25));
        assert_eq!(referee.down_count(), 2);
        assert_eq!(referee.distance(), 25);
    }

    #[test]
    fn test_defensive_offside_gives_ten_without_down() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));
        snap(&mut referee, &mut room, RED_QB);

        room.move_player(PlayerId(BLUE_1), Vec2::new(-320.0, 200.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.iter().any(|r| matches!(r, Ruling::Penalty { foul: Foul::DefensiveOffside, yards: 10, red_zone_penalties: None, .. })));
        assert_eq!(referee.ball_position(), FieldPosition::new(Team::Red, 40));
        assert_eq!(referee.down_count(), 1);
        assert_eq!(referee.distance(), 10);
    }

    #[test]
    fn test_red_zone_escalation_to_automatic_touchdown() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Blue, 10));

        assert_eq!(referee.escalate_defensive_penalty(10), PenaltyOutcome::Yards(5));
        assert_eq!(referee.escalate_defensive_penalty(10), PenaltyOutcome::Yards(5));
        assert_eq!(referee.escalate_defensive_penalty(10), PenaltyOutcome::AutomaticTouchdown);

        referee.enforce_defensive_penalty(&mut room, Foul::Crowding, vec![PlayerId(BLUE_1)], PenaltyOutcome::AutomaticTouchdown);
        let rulings = referee.drain();
        assert!(rulings.iter().any(|r| matches!(r, Ruling::Touchdown { team: Team::Red, automatic: true, .. })));
        assert_eq!(referee.score().red, 6);
    }

    #[test]
    fn test_escalation_outside_red_zone_is_plain() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));

        assert_eq!(referee.escalate_defensive_penalty(10), PenaltyOutcome::Yards(10));
        assert_eq!(referee.state.down.red_zone_penalties, 0);
    }

    #[test]
    fn test_quarterback_runs_after_blitz_clock() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));
        snap(&mut referee, &mut room, RED_QB);

        run_ms(&mut referee, &mut room, 12_000);
        room.move_player(PlayerId(RED_QB), Vec2::new(-250.0, 0.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.contains(&Ruling::QuarterbackRun { quarterback: PlayerId(RED_QB) }));
        assert_eq!(referee.carrier().map(|c| c.role), Some(CarrierRole::QbRunner));
    }

    #[test]
    fn test_hike_clock_expiry_counts_a_down() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));

        let rulings = run_ms(&mut referee, &mut room, 15_000);

        assert!(rulings.contains(&Ruling::HikeClockExpired { team: Team::Red }));
        assert_eq!(referee.down_count(), 2);
        assert_eq!(referee.mode(), Mode::WaitingForHike);
    }

    #[test]
    fn test_disabled_hike_clock_never_fires() {
        let (mut referee, mut room) = started();
        referee.down.hike_clock_enabled = false;
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));

        let rulings = run_ms(&mut referee, &mut room, 20_000);
        assert!(!rulings.iter().any(|r| matches!(r, Ruling::HikeClockExpired { .. })));
        assert_eq!(referee.down_count(), 1);
    }

    #[test]
    fn test_holding_detected() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));
        snap(&mut referee, &mut room, RED_QB);

        // Blue defender on the offense's side of the line, rushing toward -x;
        // the Red attacker between that defender and the line pulls back toward -x.
        let line = referee.line_x();
        let mut defender = PlayerDisc::new(BLUE_1, Team::Blue, Vec2::new(line - 40.0, 150.0));
        defender.velocity = Vec2::new(-2.0, 0.0);
        let mut attacker = PlayerDisc::new(RED_2, Team::Red, Vec2::new(line - 9.5, 150.0));
        attacker.velocity = Vec2::new(-1.0, 0.0);

        let players = vec![defender, attacker];
        assert_eq!(referee.holding_offenders(&players, PlayerId(RED_QB)), vec![PlayerId(RED_2)]);
    }

    #[test]
    fn test_holding_ignores_defender_on_own_side() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));

        let line = referee.line_x();
        let mut defender = PlayerDisc::new(BLUE_1, Team::Blue, Vec2::new(line + 40.0, 150.0));
        defender.velocity = Vec2::new(-2.0, 0.0);
        let mut attacker = PlayerDisc::new(RED_2, Team::Red, Vec2::new(line + 70.5, 150.0));
        attacker.velocity = Vec2::new(-1.0, 0.0);

        assert!(referee.holding_offenders(&[defender, attacker], PlayerId(RED_QB)).is_empty());
    }

    #[test]
    fn test_pass_caught_by_receiver() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));
        snap(&mut referee, &mut room, RED_QB);

        referee.on_ball_kick(&mut room, PlayerId(RED_QB));
        let rulings = referee.on_ball_kick(&mut room, PlayerId(RED_2));

        assert!(rulings.contains(&Ruling::PassCaught { receiver: PlayerId(RED_2) }));
        assert_eq!(referee.carrier().map(|c| c.role), Some(CarrierRole::Receiver));
        assert_eq!(referee.stats().get(PlayerId(RED_QB), StatKind::PassesAttempted), 1);
        assert_eq!(referee.stats().get(PlayerId(RED_QB), StatKind::PassesCompleted), 1);
    }

    #[test]
    fn test_defender_deflection_missing_goal_is_blocked_pass() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));
        snap(&mut referee, &mut room, RED_QB);
        referee.on_ball_kick(&mut room, PlayerId(RED_QB));

        // Deflected straight up the field
        room.place_ball(Vec2::new(-200.0, 0.0), Vec2::new(0.0, 4.0));
        referee.on_ball_kick(&mut room, PlayerId(BLUE_1));
        room.advance();
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.contains(&Ruling::PassIncomplete { blocked_by: Some(PlayerId(BLUE_1)) }));
        assert_eq!(referee.mode(), Mode::None);
        assert_eq!(referee.stats().get(PlayerId(BLUE_1), StatKind::PassesBlocked), 1);

        // Next down after the restart delay
        let rulings = run_ms(&mut referee, &mut room, 1_500);
        assert!(rulings.iter().any(|r| matches!(r, Ruling::DownSet { down: 2, .. })));
    }

    #[test]
    fn test_interception_through_goal_line() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));
        snap(&mut referee, &mut room, RED_QB);
        referee.on_ball_kick(&mut room, PlayerId(RED_QB));

        // Deflected back toward the Red goal
        room.place_ball(Vec2::new(-200.0, 0.0), Vec2::new(-10.0, 0.0));
        referee.on_ball_kick(&mut room, PlayerId(BLUE_1));
        room.advance();
        let rulings = tick(&mut referee, &mut room);
        assert!(rulings.contains(&Ruling::InterceptionAttempt { defender: PlayerId(BLUE_1) }));

        // Ball crosses the back of the Red end zone between the posts
        room.place_ball(Vec2::new(-935.0, 0.0), Vec2::new(-10.0, 0.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.contains(&Ruling::Interception { defender: PlayerId(BLUE_1), team: Team::Blue }));
        assert_eq!(referee.team_with_ball(), Team::Blue);
        assert_eq!(referee.carrier().map(|c| c.role), Some(CarrierRole::Intercepter));
        assert_eq!(referee.stats().get(PlayerId(RED_QB), StatKind::InterceptionsThrown), 1);
    }

    #[test]
    fn test_defender_touch_while_waiting_is_penalty() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));
        run_ms(&mut referee, &mut room, 600);

        let rulings = referee.on_ball_kick(&mut room, PlayerId(BLUE_1));
        assert!(rulings.iter().any(|r| matches!(r, Ruling::Penalty { foul: Foul::DefensiveIllegalTouch, yards: 10, .. })));
        assert_eq!(referee.ball_position(), FieldPosition::new(Team::Red, 40));
    }

    #[test]
    fn test_defender_touch_within_grace_is_ignored() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));

        let rulings = referee.on_ball_kick(&mut room, PlayerId(BLUE_1));
        assert!(rulings.is_empty());
        assert_eq!(referee.ball_position(), FieldPosition::new(Team::Red, 30));
    }

    #[test]
    fn test_quarterback_leaving_replays_down() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));
        snap(&mut referee, &mut room, RED_QB);

        let qb = room.remove_player(PlayerId(RED_QB)).unwrap();
        let rulings = referee.on_player_leave(&mut room, &qb);

        assert!(rulings.contains(&Ruling::QuarterbackLeft { quarterback: PlayerId(RED_QB) }));
        assert_eq!(referee.down_count(), 1);
        assert_eq!(referee.mode(), Mode::WaitingForHike);
    }
}
