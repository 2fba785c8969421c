//! Kickoff
//!
//! Ball at the kicking team's 50 with a stronger kick. The receiving team is
//! held behind its barrier and the kicking team behind midfield until the
//! kick. Except on the opening kickoff, a stall clock adds stoppage time when
//! the kicking team takes too long, plus whatever time passes after it ran
//! out.

use crate::field::{coordinate_from_yards, measures, FieldPosition, Team};
use crate::referee::{DownState, Mode, Referee, ScheduledAction};
use crate::room::{Room, RoomExt};
use crate::ruling::Ruling;
use crate::stats::StatsSink;
use crate::timer::TimerId;

/// Half length of both kickoff lines
const KICKOFF_LINE_HALF: f64 = 200.0;

/// Kickoffs set before this much game time never get a stall clock
const STALL_CLOCK_MIN_ELAPSED_MS: u64 = 1_000;

#[derive(Debug, Clone, Default)]
pub struct KickoffPlay {
    pub(crate) stall_clock: Option<TimerId>,
    /// Engine time the stall clock ran out
    pub(crate) stalled_since_ms: Option<u64>,
    pub(crate) ball_to_be_kicked: bool,
    /// A kickoff was set earlier in this game
    pub(crate) kicked_off: bool,
}

impl KickoffPlay {
    pub(crate) fn reset(&mut self) {
        *self = Self {
            kicked_off: self.kicked_off,
            ..Self::default()
        };
    }
}

impl<S: StatsSink> Referee<S> {
    pub(crate) fn set_kickoff(&mut self, room: &mut dyn Room, team: Team) {
        self.state.mode = Mode::None;
        self.reset_play(room);
        self.reset_series();

        let spot = FieldPosition::new(team, 50);
        self.state.team_with_ball = team;
        self.state.ball_position = spot;
        self.state.down = DownState::new_series(self.config.down.yards_to_gain);

        let first = !self.kickoff.kicked_off;
        self.kickoff.kicked_off = true;
        self.kickoff.ball_to_be_kicked = true;

        if !first && self.state.clock.end_ms > 0 && self.now() > STALL_CLOCK_MIN_ELAPSED_MS {
            let id = self.schedule(ScheduledAction::KickoffStall, self.config.clock.kickoff_stall_ms);
            self.kickoff.stall_clock = Some(id);
        }

        log::info!("kickoff for {}", team);
        self.announce(Ruling::KickoffSet { team, spot });

        room.stop_ball();
        room.set_ball_position(coordinate_from_yards(spot));
        room.set_ball_kick_force(self.config.kicks.kickoff_kick_force);

        self.clear_down_markers(room);

        self.line_up(room, Team::Red, -measures::RED_ZONE_X, KICKOFF_LINE_HALF);
        self.line_up(room, Team::Blue, measures::RED_ZONE_X, KICKOFF_LINE_HALF);

        room.block_team(team.opponent());
        room.block_midfield(team);

        self.state.mode = Mode::Kickoff;
    }

    /// The kicking team ran out the stall clock.
    pub(crate) fn kickoff_stall(&mut self) {
        self.kickoff.stall_clock = None;
        if self.state.mode != Mode::Kickoff || !self.kickoff.ball_to_be_kicked {
            return;
        }

        log::debug!("kickoff stalled");
        self.kickoff.stalled_since_ms = Some(self.now());
        self.add_stoppage(self.config.clock.kickoff_stall_stoppage_ms);
    }

    /// Bookkeeping once the kickoff is in the air.
    pub(crate) fn kickoff_ball_kick(&mut self) {
        if let Some(since) = self.kickoff.stalled_since_ms.take() {
            let extra = self.now().saturating_sub(since);
            self.add_stoppage(extra);
        }

        self.kickoff.ball_to_be_kicked = false;
        if let Some(id) = self.kickoff.stall_clock.take() {
            self.timers.stop(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Vec2;
    use crate::room::{CollisionMask, PlayerId};
    use crate::sim::fixtures::*;

    fn stoppage_added(rulings: &[Ruling]) -> Vec<u64> {
        rulings
            .iter()
            .filter_map(|r| match r {
                Ruling::StoppageAdded { added_ms } => Some(*added_ms),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_opening_kickoff() {
        let mut referee = crate::referee::Referee::new(crate::config::RefereeConfig::default());
        let mut room = crate::sim::room::ScriptedRoom::lineup(&[1, 2, 3], &[4, 5, 6]);
        let rulings = referee.on_game_start(&mut room);

        assert_eq!(
            rulings,
            vec![Ruling::KickoffSet {
                team: Team::Red,
                spot: FieldPosition::new(Team::Red, 50),
            }]
        );
        assert_eq!(referee.mode(), Mode::Kickoff);
        assert_eq!(room.ball_disc().unwrap().position, Vec2::ZERO);
        assert_eq!(room.ball_disc().unwrap().inv_mass, 1.2);
        assert_eq!(room.disc(PlayerId(RED_2)).unwrap().position.x, -measures::RED_ZONE_X);
        assert_eq!(room.disc(PlayerId(BLUE_2)).unwrap().position.x, measures::RED_ZONE_X);
        assert!(room.disc(PlayerId(BLUE_1)).unwrap().collision_group.contains(CollisionMask::C1));
        assert!(room.disc(PlayerId(RED_2)).unwrap().collision_group.contains(CollisionMask::C2));
        assert!(referee.kickoff.stall_clock.is_none());
    }

    #[test]
    fn test_stall_clock_adds_stoppage() {
        let (mut referee, mut room) = started();
        run_ms(&mut referee, &mut room, 2_000);
        referee.set_kickoff(&mut room, Team::Blue);
        referee.drain();

        let rulings = run_ms(&mut referee, &mut room, 10_000);
        assert_eq!(stoppage_added(&rulings), vec![10_000]);

        run_ms(&mut referee, &mut room, 2_000);
        let rulings = referee.on_ball_kick(&mut room, PlayerId(BLUE_1));
        let added = stoppage_added(&rulings);
        assert_eq!(added.len(), 1);
        assert!((1_900..=2_100).contains(&added[0]));
        assert_eq!(referee.state.clock.stoppage_ms, 10_000 + added[0]);
    }

    #[test]
    fn test_prompt_kick_stops_stall_clock() {
        let (mut referee, mut room) = started();
        run_ms(&mut referee, &mut room, 2_000);
        referee.set_kickoff(&mut room, Team::Blue);
        referee.drain();

        referee.on_ball_kick(&mut room, PlayerId(BLUE_1));
        let rulings = run_ms(&mut referee, &mut room, 12_000);

        assert!(stoppage_added(&rulings).is_empty());
        assert_eq!(referee.state.clock.stoppage_ms, 0);
    }
}
