//! Safety kick
//!
//! Free kick by the team that conceded the safety, from its own 20. The
//! formation is the punt formation.

use crate::field::{coordinate_from_yards, FieldPosition, Team};
use crate::referee::{DownState, Mode, Referee};
use crate::room::{Marker, Room, RoomExt};
use crate::ruling::Ruling;
use crate::stats::StatsSink;

impl<S: StatsSink> Referee<S> {
    pub(crate) fn set_safety_kick(&mut self, room: &mut dyn Room, team: Team) {
        self.state.mode = Mode::None;
        self.reset_play(room);
        self.reset_series();

        let spot = FieldPosition::new(team, self.config.kicks.safety_kick_yard_line);
        self.state.team_with_ball = team;
        self.state.ball_position = spot;
        self.state.down = DownState::new_series(self.config.down.yards_to_gain);

        log::info!("safety kick for {}", team);
        self.announce(Ruling::SafetyKickSet { team, spot });

        let ball_at = coordinate_from_yards(spot);
        room.stop_ball();
        room.set_ball_position(ball_at);

        self.line_up_free_kick(room, team, ball_at.x);

        room.clear_marker(Marker::FirstDownLine);
        self.render_ball_line(room, ball_at.x);

        room.block_team(team.opponent());

        self.state.mode = Mode::Safety;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{measures, Vec2};
    use crate::room::{CollisionMask, PlayerId};
    use crate::sim::fixtures::*;

    #[test]
    fn test_safety_kick_formation() {
        let (mut referee, mut room) = started();
        referee.set_safety_kick(&mut room, Team::Red);
        let rulings = referee.drain();

        assert_eq!(
            rulings,
            vec![Ruling::SafetyKickSet {
                team: Team::Red,
                spot: FieldPosition::new(Team::Red, 20),
            }]
        );
        assert_eq!(referee.mode(), Mode::Safety);
        assert_eq!(referee.team_with_ball(), Team::Red);
        assert_eq!(room.ball_disc().unwrap().position, Vec2::new(-465.0, 0.0));
        assert_eq!(room.disc(PlayerId(RED_2)).unwrap().position.x, -565.0);
        assert_eq!(room.disc(PlayerId(BLUE_2)).unwrap().position.x, measures::RETURN_LINE_X);
        assert!(room.disc(PlayerId(BLUE_2)).unwrap().collision_group.contains(CollisionMask::C1));
        assert!(!room.disc(PlayerId(RED_2)).unwrap().collision_group.contains(CollisionMask::C0));
    }

    #[test]
    fn test_safety_kick_out_of_bounds_spots_at_twenty() {
        let (mut referee, mut room) = started();
        referee.set_safety_kick(&mut room, Team::Red);
        referee.on_ball_kick(&mut room, PlayerId(RED_2));

        room.place_ball(Vec2::new(300.0, 280.0), Vec2::new(2.0, 3.0));
        let rulings = tick(&mut referee, &mut room);

        assert!(rulings.contains(&Ruling::KickOutOfBounds {
            receiving_team: Team::Blue,
            spot: FieldPosition::new(Team::Red, 20),
        }));
        assert_eq!(referee.team_with_ball(), Team::Blue);
        assert_eq!(referee.ball_position(), FieldPosition::new(Team::Red, 20));
        assert_eq!(referee.down_count(), 1);
    }

    #[test]
    fn test_safety_kick_return() {
        let (mut referee, mut room) = started();
        referee.set_safety_kick(&mut room, Team::Blue);
        referee.on_ball_kick(&mut room, PlayerId(BLUE_2));

        let rulings = referee.on_ball_kick(&mut room, PlayerId(RED_3));
        assert!(rulings.contains(&Ruling::KickReturned {
            returner: PlayerId(RED_3),
            play: Mode::Safety,
        }));
        assert_eq!(referee.player_with_ball(), Some(PlayerId(RED_3)));
    }
}
