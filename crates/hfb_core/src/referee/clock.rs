//! Match clock
//!
//! Regulation ends at `end_ms`. Stoppage accumulated before that point is
//! announced once regulation runs out and pushes the end back. The game is
//! only called between plays with a leader; a live play gets a single
//! `LastPlay` (or `Overtime` on a tie) first.

use crate::field::Team;
use crate::referee::Referee;
use crate::room::Room;
use crate::ruling::Ruling;
use crate::stats::StatsSink;

impl<S: StatsSink> Referee<S> {
    /// Adds stoppage time. Ignored once stoppage time is running.
    pub(crate) fn add_stoppage(&mut self, added_ms: u64) {
        let clock = &mut self.state.clock;
        if clock.is_stoppage_time || added_ms == 0 {
            return;
        }

        clock.stoppage_ms += added_ms;
        log::debug!("stoppage +{} ms (total {} ms)", added_ms, clock.stoppage_ms);
        self.announce(Ruling::StoppageAdded { added_ms });
    }

    /// A defensive foul in the final seconds keeps regulation running for
    /// another `final_seconds`.
    pub(crate) fn adjust_end_time(&mut self) {
        let now = self.now();
        let window = self.config.clock.final_seconds as u64 * 1000;
        let clock = &mut self.state.clock;

        if clock.end_ms == 0 || clock.overtime {
            return;
        }
        if clock.end_ms.saturating_sub(now) >= window {
            return;
        }

        let ends_at_ms = now + window;
        if ends_at_ms == clock.end_ms {
            return;
        }

        clock.end_ms = ends_at_ms;
        clock.last_play_announced = false;
        log::info!("regulation extended to {} ms", ends_at_ms);
        self.announce(Ruling::EndTimeExtended { ends_at_ms });
    }

    pub(crate) fn check_end_of_game(&mut self, room: &mut dyn Room) {
        let now = self.now();
        let end = self.state.clock.end_ms;
        if end == 0 || now <= end {
            return;
        }

        let stoppage = self.state.clock.stoppage_ms;
        if stoppage != 0 && !self.state.clock.is_stoppage_time && !self.kickoff.ball_to_be_kicked {
            self.state.clock.is_stoppage_time = true;
            self.announce(Ruling::StoppageTime {
                stoppage_ms: stoppage,
                ends_at_ms: end + stoppage,
            });
        }

        let stoppage_ended = self.state.clock.is_stoppage_time && end + stoppage < now;
        if !stoppage_ended && stoppage != 0 {
            return;
        }

        let live = self.state.mode.is_live()
            || self.state.play.conversion
            || self.state.carrier.is_some();

        match self.state.score.leader() {
            Some(winner) if !live => self.game_over(room, winner),
            leader => {
                if self.state.clock.last_play_announced {
                    return;
                }
                self.state.clock.last_play_announced = true;

                if leader.is_none() {
                    self.state.clock.overtime = true;
                    log::info!("regulation over with a tie, overtime");
                    self.announce(Ruling::Overtime);
                } else {
                    self.announce(Ruling::LastPlay);
                }
            }
        }
    }

    fn game_over(&mut self, room: &mut dyn Room, winner: Team) {
        let score = self.state.score;
        self.state.clock.game_over = true;
        self.halt_play();

        log::info!("game over: {} wins {}-{}", winner, score.red, score.blue);
        self.announce(Ruling::GameOver {
            winner,
            red: score.red,
            blue: score.blue,
        });
        room.stop_game();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RefereeConfig;
    use crate::field::FieldPosition;
    use crate::referee::Mode;
    use crate::sim::fixtures::*;

    fn short_game(secs: u32) -> RefereeConfig {
        let mut config = RefereeConfig::default();
        config.clock.time_limit_secs = secs;
        config
    }

    fn count(rulings: &[Ruling], ruling: &Ruling) -> usize {
        rulings.iter().filter(|r| *r == ruling).count()
    }

    #[test]
    fn test_tied_live_play_goes_to_overtime_once() {
        let (mut referee, mut room) = started_with(short_game(1));

        let rulings = run_ms(&mut referee, &mut room, 3_000);
        assert_eq!(count(&rulings, &Ruling::Overtime), 1);
        assert!(referee.state.clock.overtime);
        assert!(!referee.state.clock.game_over);

        // The next score ends it once the ball is dead
        referee.state.score.red = 3;
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));
        let rulings = tick(&mut referee, &mut room);

        assert_eq!(
            rulings,
            vec![Ruling::GameOver {
                winner: Team::Red,
                red: 3,
                blue: 0,
            }]
        );
        assert_eq!(referee.mode(), Mode::None);
        assert!(room.is_stopped());
    }

    #[test]
    fn test_leader_during_live_play_gets_last_play() {
        let (mut referee, mut room) = started_with(short_game(1));
        referee.state.score.blue = 7;

        let rulings = run_ms(&mut referee, &mut room, 3_000);
        assert_eq!(count(&rulings, &Ruling::LastPlay), 1);
        assert!(!referee.state.clock.overtime);
        assert_eq!(referee.mode(), Mode::Kickoff);
    }

    #[test]
    fn test_game_ends_between_plays_with_leader() {
        let (mut referee, mut room) = started_with(short_game(1));
        referee.state.score.blue = 2;
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));

        let rulings = run_ms(&mut referee, &mut room, 1_100);
        assert!(rulings.contains(&Ruling::GameOver {
            winner: Team::Blue,
            red: 0,
            blue: 2,
        }));
        assert!(referee.state.clock.game_over);

        // Ticks after the final whistle do nothing
        assert!(tick(&mut referee, &mut room).is_empty());
    }

    #[test]
    fn test_stoppage_time_delays_the_end() {
        let (mut referee, mut room) = started_with(short_game(2));
        referee.add_stoppage(1_000);
        referee.state.score.red = 6;
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));
        referee.drain();

        let rulings = run_ms(&mut referee, &mut room, 2_100);
        assert_eq!(
            rulings,
            vec![Ruling::StoppageTime {
                stoppage_ms: 1_000,
                ends_at_ms: 3_000,
            }]
        );
        assert!(!referee.state.clock.game_over);

        let rulings = run_ms(&mut referee, &mut room, 1_000);
        assert!(rulings.iter().any(|r| matches!(r, Ruling::GameOver { winner: Team::Red, .. })));
    }

    #[test]
    fn test_stoppage_frozen_once_running() {
        let (mut referee, _room) = started();
        referee.add_stoppage(500);
        referee.state.clock.is_stoppage_time = true;
        referee.add_stoppage(500);

        assert_eq!(referee.state.clock.stoppage_ms, 500);
        assert_eq!(referee.drain(), vec![Ruling::StoppageAdded { added_ms: 500 }]);
    }

    #[test]
    fn test_late_defensive_foul_extends_regulation() {
        let (mut referee, mut room) = started_with(short_game(10));
        run_ms(&mut referee, &mut room, 1_000);
        referee.state.clock.last_play_announced = true;

        let now = referee.now();
        referee.adjust_end_time();

        assert_eq!(referee.state.clock.end_ms, now + 10_000);
        assert!(!referee.state.clock.last_play_announced);
        assert_eq!(
            referee.drain(),
            vec![Ruling::EndTimeExtended { ends_at_ms: now + 10_000 }]
        );
    }

    #[test]
    fn test_no_extension_early_or_in_overtime() {
        let (mut referee, mut room) = started();
        run_ms(&mut referee, &mut room, 1_000);
        referee.adjust_end_time();
        assert_eq!(referee.state.clock.end_ms, 600_000);

        referee.state.clock.end_ms = 1_500;
        referee.state.clock.overtime = true;
        referee.adjust_end_time();
        assert_eq!(referee.state.clock.end_ms, 1_500);
        assert!(referee.drain().is_empty());
    }

    #[test]
    fn test_unlimited_game_never_ends() {
        let (mut referee, mut room) = started_with(short_game(0));
        referee.state.score.red = 3;
        spot(&mut referee, &mut room, Team::Red, FieldPosition::new(Team::Red, 30));

        let rulings = run_ms(&mut referee, &mut room, 5_000);
        assert!(!rulings.iter().any(|r| matches!(r, Ruling::GameOver { .. } | Ruling::LastPlay)));
    }
}
