//! Game orchestrator
//!
//! [`Referee`] owns the match state and routes host events to the active
//! play variant. Every handler returns the rulings it produced, in order.
//!
//! ## Tick order
//!
//! 1. Advance the engine clock (paused ticks are ignored)
//! 2. Fire due timers (stale epochs are dropped)
//! 3. End-of-game check
//! 4. Conversion red-zone check
//! 5. Dispatch to the active play: land play, kick return, then the variant
//!
//! Each stage re-checks the mode so a ruling taken earlier in the tick is
//! never evaluated twice.

pub mod actions;
pub mod admin;
mod clock;
pub mod state;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::RefereeConfig;
use crate::field::{coordinate_from_yards, measures, Team, Vec2};
use crate::room::{PlayerDisc, PlayerId, Room, RoomExt};
use crate::rules::crowding::CrowdingTracker;
use crate::rules::down::DownPlay;
use crate::rules::kicks::{ExtraPointPlay, FieldGoalPlay, KickoffPlay};
use crate::rules::PlayKind;
use crate::ruling::Ruling;
use crate::stats::{StatDelta, StatKind, StatsLedger, StatsSink};
use crate::timer::{TimerId, TimerRegistry};

pub use actions::{DownSetup, PenaltyOutcome};
pub(crate) use actions::ScheduledAction;
pub use admin::HikeClockCommand;
pub use state::{Carrier, CarrierRole, DownState, MatchClock, MatchState, Mode, PlayFlags, Score};

/// Play-state referee of one match
pub struct Referee<S: StatsSink = StatsLedger> {
    pub(crate) config: RefereeConfig,
    pub(crate) state: MatchState,
    pub(crate) timers: TimerRegistry<ScheduledAction>,
    pub(crate) down: DownPlay,
    pub(crate) crowding: CrowdingTracker,
    pub(crate) kickoff: KickoffPlay,
    pub(crate) field_goal: FieldGoalPlay,
    pub(crate) extra_point: ExtraPointPlay,
    pub(crate) stats: S,
    pub(crate) rulings: Vec<Ruling>,
    pub(crate) rng: ChaCha8Rng,
}

impl Referee<StatsLedger> {
    pub fn new(config: RefereeConfig) -> Self {
        Self::with_stats(config, StatsLedger::new())
    }
}

impl<S: StatsSink> Referee<S> {
    /// Referee delivering statistic credits to `stats`.
    pub fn with_stats(config: RefereeConfig, stats: S) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            state: MatchState::new(config.down.yards_to_gain),
            timers: TimerRegistry::new(),
            down: DownPlay::default(),
            crowding: CrowdingTracker::default(),
            kickoff: KickoffPlay::default(),
            field_goal: FieldGoalPlay::default(),
            extra_point: ExtraPointPlay::default(),
            stats,
            rulings: Vec::new(),
            rng,
            config,
        }
    }

    // ===========================================
    // Queries
    // ===========================================

    pub fn config(&self) -> &RefereeConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn team_with_ball(&self) -> Team {
        self.state.team_with_ball
    }

    pub fn down_count(&self) -> u8 {
        self.state.down.count
    }

    pub fn distance(&self) -> i32 {
        self.state.down.distance
    }

    pub fn is_goal_mode(&self) -> bool {
        self.state.down.goal_mode
    }

    pub fn ball_position(&self) -> crate::field::FieldPosition {
        self.state.ball_position
    }

    pub fn score(&self) -> Score {
        self.state.score
    }

    pub fn carrier(&self) -> Option<&Carrier> {
        self.state.carrier.as_ref()
    }

    pub fn player_with_ball(&self) -> Option<PlayerId> {
        self.state.carrier_id()
    }

    pub fn quarterback(&self) -> Option<PlayerId> {
        self.state.play.quarterback
    }

    pub fn is_conversion(&self) -> bool {
        self.state.play.conversion
    }

    /// Engine time since the game started.
    pub fn elapsed_ms(&self) -> u64 {
        self.now()
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn is_in_progress(&self) -> bool {
        self.state.in_progress
    }

    pub fn is_hike_clock_enabled(&self) -> bool {
        self.down.hike_clock_enabled
    }

    /// Serializable copy of the match state.
    pub fn snapshot(&self) -> MatchState {
        self.state.clone()
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut S {
        &mut self.stats
    }

    // ===========================================
    // Host events
    // ===========================================

    pub fn on_game_start(&mut self, room: &mut dyn Room) -> Vec<Ruling> {
        self.timers = TimerRegistry::new();
        self.state = MatchState::new(self.config.down.yards_to_gain);
        self.state.in_progress = true;
        self.state.clock.end_ms = self.config.clock.time_limit_secs as u64 * 1000;
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.kickoff = KickoffPlay::default();

        log::info!("game started, regulation {} ms", self.state.clock.end_ms);

        self.set_kickoff(room, Team::Red);
        self.drain()
    }

    pub fn on_game_stop(&mut self, room: &mut dyn Room) -> Vec<Ruling> {
        self.reset_play(room);
        self.timers = TimerRegistry::new();
        self.state = MatchState::new(self.config.down.yards_to_gain);
        self.clear_down_markers(room);
        self.clear_crowding_markers(room);

        log::info!("game stopped");
        self.drain()
    }

    pub fn on_pause(&mut self) -> Vec<Ruling> {
        if self.state.in_progress && !self.state.paused {
            self.state.paused = true;
            self.timers.pause_all(self.now());
        }
        self.drain()
    }

    pub fn on_unpause(&mut self) -> Vec<Ruling> {
        if self.state.paused {
            self.state.paused = false;
            self.timers.resume_all(self.now());
        }
        self.drain()
    }

    pub fn on_tick(&mut self, room: &mut dyn Room) -> Vec<Ruling> {
        if !self.state.in_progress || self.state.paused || self.state.clock.game_over {
            return self.drain();
        }

        self.state.clock.ticks += 1;

        self.run_due_timers(room);

        self.check_end_of_game(room);
        if self.state.clock.game_over {
            return self.drain();
        }

        self.conversion_zone_tick(room);
        self.dispatch_tick(room);

        self.drain()
    }

    pub fn on_ball_kick(&mut self, room: &mut dyn Room, player: PlayerId) -> Vec<Ruling> {
        if !self.state.in_progress {
            return self.drain();
        }

        let Some(kicker) = room.player(player) else {
            log::warn!("ball kick by unknown player {}", player);
            return self.drain();
        };

        room.restore_player_mass();

        match PlayKind::from_mode(self.state.mode) {
            Some(PlayKind::Down) => self.down_ball_kick(room, &kicker),
            Some(PlayKind::Kickoff) => {
                self.kick_ball_kick(room, &kicker);
                if self.state.mode == Mode::Kickoff {
                    self.kickoff_ball_kick();
                }
            }
            Some(PlayKind::Punt) | Some(PlayKind::Safety) => self.kick_ball_kick(room, &kicker),
            Some(PlayKind::FieldGoal) => self.field_goal_ball_kick(room, &kicker),
            Some(PlayKind::ExtraPoint) => self.extra_point_ball_kick(room, &kicker),
            None => {}
        }

        self.drain()
    }

    /// `player` carries its new team.
    pub fn on_player_team_change(&mut self, room: &mut dyn Room, player: &PlayerDisc) -> Vec<Ruling> {
        if !self.state.in_progress {
            return self.drain();
        }

        self.player_departed(room, player);

        if self.state.mode == Mode::Kickoff && !self.state.play.qb_kicked_ball {
            let kicking = self.state.team_with_ball;
            room.block_team(kicking.opponent());
            room.block_midfield(kicking);
        }

        self.drain()
    }

    /// `player` is the last known disc of the departed player.
    pub fn on_player_leave(&mut self, room: &mut dyn Room, player: &PlayerDisc) -> Vec<Ruling> {
        if self.state.in_progress {
            self.player_departed(room, player);
        }
        self.drain()
    }

    /// Only the literal `hike` is interpreted.
    pub fn on_chat(&mut self, room: &mut dyn Room, player: PlayerId, message: &str) -> Vec<Ruling> {
        if self.state.in_progress && message.trim().eq_ignore_ascii_case("hike") {
            match self.state.mode {
                Mode::WaitingForHike => {
                    self.hike(room, player);
                }
                Mode::ExtraPoint => self.start_conversion(room, player),
                _ => {}
            }
        }
        self.drain()
    }

    // ===========================================
    // Dispatch
    // ===========================================

    fn dispatch_tick(&mut self, room: &mut dyn Room) {
        let mode = self.state.mode;
        let Some(play) = PlayKind::from_mode(mode) else {
            return;
        };
        let capabilities = play.capabilities();
        let epoch = self.state.epoch;

        if capabilities.land_play && mode == play.live_mode() {
            self.land_play_tick(room, play);
            if self.state.mode != mode || self.state.epoch != epoch {
                return;
            }
        }

        if capabilities.kick_return {
            self.kick_return_tick(room);
            if self.state.mode != mode || self.state.epoch != epoch {
                return;
            }
        }

        match play {
            PlayKind::Down if mode == Mode::Down => self.down_tick(room),
            PlayKind::FieldGoal => self.field_goal_tick(room),
            PlayKind::ExtraPoint => self.extra_point_tick(room),
            _ => {}
        }
    }

    fn run_due_timers(&mut self, room: &mut dyn Room) {
        for timer in self.timers.take_due(self.now()) {
            if !self.state.in_progress {
                break;
            }
            if timer.epoch() != self.state.epoch {
                log::debug!("dropping stale timer {:?}", timer.action());
                continue;
            }
            self.run_action(room, timer.into_action());
        }
    }

    fn run_action(&mut self, room: &mut dyn Room, action: ScheduledAction) {
        match action {
            ScheduledAction::SetDown(setup) => self.set_down(room, setup),
            ScheduledAction::Kickoff { team } => self.set_kickoff(room, team),
            ScheduledAction::ExtraPoint { team } => self.set_extra_point(room, team, false),
            ScheduledAction::HikeClockExpired => self.hike_clock_expired(room),
            ScheduledAction::ConfirmPassBlock { defender } => self.confirm_pass_block(room, defender),
            ScheduledAction::CheckInterception {
                defender,
                origin,
                velocity_x,
            } => self.check_interception(room, defender, origin, velocity_x),
            ScheduledAction::CheckFieldGoalDirection { kicker, origin } => {
                self.check_field_goal_direction(room, kicker, origin)
            }
            ScheduledAction::CheckExtraPointDirection {
                kicking_team,
                origin,
            } => self.check_extra_point_direction(room, kicking_team, origin),
            ScheduledAction::KickoffStall => self.kickoff_stall(),
            ScheduledAction::FieldGoalClockExpired => self.field_goal_clock_expired(room),
            ScheduledAction::ExtraPointClockExpired { team } => {
                self.extra_point_clock_expired(room, team)
            }
            ScheduledAction::EnforceCrowding { outcome, offenders } => {
                self.enforce_crowding(room, outcome, offenders)
            }
        }
    }

    /// Carrier or quarterback left the play (team change or disconnect).
    fn player_departed(&mut self, room: &mut dyn Room, player: &PlayerDisc) {
        if self.state.mode == Mode::None {
            return;
        }

        if self.state.is_carrier(player.id) {
            let team = self.state.team_with_ball.opponent();
            let spot = crate::field::yards_from_coordinate(player.position.x);

            self.state.carrier = None;
            self.announce(Ruling::CarrierLeft {
                carrier: player.id,
                team_awarded: team,
            });
            self.set_down(room, DownSetup::at(spot, team));
        } else if self.state.is_quarterback(player.id) && self.state.mode == Mode::Down {
            self.announce(Ruling::QuarterbackLeft {
                quarterback: player.id,
            });
            self.set_down(room, DownSetup {
                count_down: false,
                ..DownSetup::default()
            });
        }
    }

    // ===========================================
    // Shared helpers
    // ===========================================

    /// Engine clock in milliseconds.
    pub(crate) fn now(&self) -> u64 {
        self.state.clock.ticks * 1000 / self.config.clock.tick_rate_hz.max(1) as u64
    }

    pub(crate) fn schedule(&mut self, action: ScheduledAction, delay_ms: u64) -> TimerId {
        self.timers.schedule(action, delay_ms, self.now(), self.state.epoch)
    }

    pub(crate) fn stop_timer(&mut self, id: &mut Option<TimerId>) {
        if let Some(id) = id.take() {
            self.timers.stop(id);
        }
    }

    pub(crate) fn announce(&mut self, ruling: Ruling) {
        if ruling.is_score() {
            log::info!("{:?}", ruling);
        } else {
            log::debug!("{:?}", ruling);
        }
        self.rulings.push(ruling);
    }

    pub(crate) fn credit(&mut self, player: PlayerId, kind: StatKind, amount: i32) {
        let delta = StatDelta { player, kind, amount };
        if let Err(e) = self.stats.record(&delta) {
            log::warn!("stats sink failed for {:?}: {}", delta, e);
        }
    }

    pub(crate) fn credit_all(&mut self, players: &[PlayerId], kind: StatKind) {
        for &player in players {
            self.credit(player, kind, 1);
        }
    }

    /// Takes the rulings produced outside event handlers (admin commands and
    /// kick requests) since the last event.
    pub fn drain(&mut self) -> Vec<Ruling> {
        std::mem::take(&mut self.rulings)
    }

    /// Ends the current play: no mode, every timer stopped. The carrier is
    /// kept until the next play is set.
    pub(crate) fn halt_play(&mut self) {
        self.state.mode = Mode::None;
        self.timers.stop_all();
        self.state.epoch += 1;
    }

    /// Clears every per-play flag, timer and physics tweak.
    pub(crate) fn reset_play(&mut self, room: &mut dyn Room) {
        if self.state.in_progress {
            room.unlock_ball();
            room.restore_player_mass();
            room.set_ball_kickable();
            room.unblock_teams();
            room.set_ball_damping(measures::ball::DAMPING_DEFAULT);
        }

        self.timers.stop_all();
        self.state.epoch += 1;

        self.down.reset();
        self.crowding.clear();
        self.kickoff.reset();
        self.field_goal.reset();
        self.extra_point.reset();

        self.state.play = PlayFlags::default();
        self.state.carrier = None;
    }

    /// Drops red-zone escalation and goal mode.
    pub(crate) fn reset_series(&mut self) {
        self.state.down.red_zone_penalties = 0;
        self.state.down.goal_mode = false;
    }

    pub(crate) fn set_carrier(
        &mut self,
        room: &mut dyn Room,
        player: &PlayerDisc,
        role: CarrierRole,
        running: bool,
    ) {
        room.unlock_ball();
        room.restore_player_mass();

        self.state.carrier = Some(Carrier {
            player: player.id,
            team: player.team,
            role,
            initial_position: player.position,
            gained_at_ms: self.now(),
            tackle_count: 0,
        });
        if running {
            self.state.play.running = true;
        }
    }

    /// Field x of the line of scrimmage.
    pub(crate) fn line_x(&self) -> f64 {
        coordinate_from_yards(self.state.ball_position).x
    }

    /// Spot of the ball at the snap, a few yards behind the line.
    pub(crate) fn ball_start(&self) -> Vec2 {
        let behind = measures::YARD * self.config.down.yards_ball_behind as f64;
        let line = coordinate_from_yards(self.state.ball_position);
        Vec2::new(line.x - behind * self.state.team_with_ball.attack_sign(), line.y)
    }

    pub(crate) fn offense(&self, players: &[PlayerDisc]) -> Vec<PlayerDisc> {
        let team = self.state.team_with_ball;
        players.iter().filter(|p| p.team == team).cloned().collect()
    }

    pub(crate) fn defense(&self, players: &[PlayerDisc]) -> Vec<PlayerDisc> {
        let team = self.state.team_with_ball.opponent();
        players.iter().filter(|p| p.team == team).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldPosition;
    use crate::ruling::FieldGoalMiss;
    use crate::sim::fixtures::*;

    #[test]
    fn test_pause_holds_hike_clock_remainder() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));
        ticks(&mut referee, &mut room, 600);
        assert_eq!(referee.elapsed_ms(), 10_000);

        referee.on_pause();
        // The host keeps ticking while paused
        assert!(ticks(&mut referee, &mut room, 1_200).is_empty());
        assert_eq!(referee.elapsed_ms(), 10_000);
        let clock = referee.down.hike_clock.expect("hike clock armed");
        assert_eq!(referee.timers.remaining_time(clock, referee.now()), Some(5_000));
        referee.on_unpause();

        let rulings = ticks(&mut referee, &mut room, 299);
        assert!(!rulings.iter().any(|r| matches!(r, Ruling::HikeClockExpired { .. })));
        assert_eq!(referee.down_count(), 1);

        let rulings = tick(&mut referee, &mut room);
        assert!(rulings.contains(&Ruling::HikeClockExpired { team: Team::Red }));
        assert_eq!(referee.down_count(), 2);
    }

    #[test]
    fn test_pause_holds_scheduled_turnover() {
        let (mut referee, mut room) = started();
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Blue, 20));
        room.move_player(PlayerId(RED_2), Vec2::new(440.0, 0.0));
        referee.request_field_goal(&mut room, PlayerId(RED_2)).unwrap();
        room.move_player(PlayerId(BLUE_1), Vec2::new(440.0, 60.0));

        let rulings = tick(&mut referee, &mut room);
        assert!(rulings.iter().any(|r| matches!(
            r,
            Ruling::FieldGoalMissed { reason: FieldGoalMiss::KickerTackled, .. }
        )));
        assert_eq!(referee.mode(), Mode::None);

        referee.on_pause();
        assert!(run_ms(&mut referee, &mut room, 5_000).is_empty());
        assert_eq!(referee.mode(), Mode::None);
        assert_eq!(referee.team_with_ball(), Team::Red);
        referee.on_unpause();

        ticks(&mut referee, &mut room, 60);
        assert_eq!(referee.mode(), Mode::None);

        tick(&mut referee, &mut room);
        assert_eq!(referee.mode(), Mode::WaitingForHike);
        assert_eq!(referee.team_with_ball(), Team::Blue);
    }

    #[test]
    fn test_pause_outside_a_game_is_ignored() {
        let mut referee = Referee::new(RefereeConfig::default());
        referee.on_pause();
        assert!(!referee.state.paused);
    }
}
