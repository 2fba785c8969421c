//! Yard-line ⇄ coordinate conversion and field-area tests
//!
//! All conversions go through the end-zone lines at x = ∓775: a yard line is
//! `yards × 15.5` units out of the end zone of the side it is named after.

use super::math::segment_touches_circle;
use super::measures::{
    END_ZONE_LINE_X, FIELD_MAX_X, FIELD_MAX_Y, GOAL_POST_Y, RED_ZONE_X, YARD,
};
use super::{FieldPosition, Team, Vec2};

/// Field coordinate of a yard line (on the center line, y = 0).
pub fn coordinate_from_yards(pos: FieldPosition) -> Vec2 {
    let offset = pos.yards as f64 * YARD;
    match pos.side {
        Team::Blue => Vec2::new(END_ZONE_LINE_X - offset, 0.0),
        _ => Vec2::new(-END_ZONE_LINE_X + offset, 0.0),
    }
}

/// Yard line containing field coordinate `x`.
///
/// Anything behind the 1-yard line (including the end zones) maps to the
/// 1-yard line of that side.
pub fn yards_from_coordinate(x: f64) -> FieldPosition {
    let count = ((x - (-END_ZONE_LINE_X + YARD)) / YARD).floor() as i32 + 1;

    if count <= 50 {
        FieldPosition::new(Team::Red, count.max(1))
    } else {
        FieldPosition::new(Team::Blue, (100 - count).max(1))
    }
}

/// Moves `pos` by `delta` yards in the attacking direction of `advancing`.
///
/// Crossing midfield flips the side and mirrors the yards. The result never
/// goes behind the 1-yard line.
pub fn add_yards(pos: FieldPosition, delta: i32, advancing: Team) -> FieldPosition {
    let mut moved = add_yards_unclamped(pos, delta, advancing);
    moved.yards = moved.yards.max(1);
    moved
}

/// Same as [`add_yards`] but allows yards ≤ 0, i.e. positions inside the end
/// zone. Used to tell whether a line to gain lies past the goal line.
pub fn add_yards_unclamped(pos: FieldPosition, delta: i32, advancing: Team) -> FieldPosition {
    let mut side = match pos.side {
        Team::Blue => Team::Blue,
        _ => Team::Red,
    };
    let mut yards = pos.yards;

    match advancing {
        Team::Red => yards += if side == Team::Red { delta } else { -delta },
        Team::Blue => yards += if side == Team::Red { -delta } else { delta },
        Team::Spectators => {}
    }

    if yards > 50 {
        side = side.opponent();
        yards = 100 - yards;
    }

    FieldPosition::new(side, yards)
}

/// Yards between two field positions.
///
/// With `advancing`, the result is the signed gain for that team going from
/// `from` to `to`; without it, the absolute distance.
pub fn difference_in_yards(from: FieldPosition, to: FieldPosition, advancing: Option<Team>) -> i32 {
    let delta = to.unified() - from.unified();
    match advancing {
        Some(Team::Red) => delta,
        Some(Team::Blue) => -delta,
        _ => delta.abs(),
    }
}

/// Signed yards gained by `team` between two physical points (rounded).
pub fn yard_gain_between_points(from: Vec2, to: Vec2, team: Team) -> i32 {
    ((to.x - from.x) * team.attack_sign() / YARD).round() as i32
}

/// Whether `pos` lies in the red zone defended by `defending`.
pub fn is_in_red_zone(pos: FieldPosition, defending: Team) -> bool {
    let x = coordinate_from_yards(pos).x;
    match defending {
        Team::Red => (-END_ZONE_LINE_X..=-RED_ZONE_X).contains(&x),
        Team::Blue => (RED_ZONE_X..=END_ZONE_LINE_X).contains(&x),
        Team::Spectators => false,
    }
}

/// Whether a point lies outside the playing surface (sidelines and the back
/// of the end zones), allowing `tolerance` units of slack.
pub fn is_out_of_bounds(point: Vec2, tolerance: f64) -> bool {
    point.y < -FIELD_MAX_Y - tolerance
        || point.y > FIELD_MAX_Y + tolerance
        || point.x < -FIELD_MAX_X - tolerance
        || point.x > FIELD_MAX_X + tolerance
}

/// Goal-line segment at the back of the end zone defended by `goal_of`,
/// with its height scaled by `scale`.
pub fn goal_line(goal_of: Team, scale: f64) -> Option<(Vec2, Vec2)> {
    let x = match goal_of {
        Team::Red => -FIELD_MAX_X,
        Team::Blue => FIELD_MAX_X,
        Team::Spectators => return None,
    };
    Some((Vec2::new(x, -GOAL_POST_Y * scale), Vec2::new(x, GOAL_POST_Y * scale)))
}

/// Whether a ball disc touches the goal-line segment at the back of the end
/// zone defended by `goal_of`.
///
/// The ball is treated as a circle of radius `max(radius, speed)` so that a
/// fast ball cannot tunnel through the segment between two ticks.
pub fn ball_within_goal_line(position: Vec2, radius: f64, speed: f64, goal_of: Team) -> bool {
    match goal_line(goal_of, 1.0) {
        Some((top, bottom)) => segment_touches_circle(top, bottom, position, radius.max(speed)),
        None => false,
    }
}

/// Whether a disc touches or crossed the end-zone line of `end_zone_of`.
pub fn has_passed_end_zone_line(position: Vec2, radius: f64, end_zone_of: Team) -> bool {
    match end_zone_of {
        Team::Red => position.x - radius <= -END_ZONE_LINE_X,
        Team::Blue => position.x + radius >= END_ZONE_LINE_X,
        Team::Spectators => false,
    }
}

/// Whether `x` is on the far side of the line of scrimmage at `line_x` from
/// the point of view of `team` (i.e. in the half the team attacks).
pub fn is_past_line(x: f64, line_x: f64, team: Team) -> bool {
    match team {
        Team::Red => x > line_x,
        Team::Blue => x < line_x,
        Team::Spectators => false,
    }
}

/// Yards between `pos` and the goal line attacked by `offense`.
pub fn yards_to_goal(pos: FieldPosition, offense: Team) -> i32 {
    difference_in_yards(pos, FieldPosition::new(offense.opponent(), 0), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(side: Team, yards: i32) -> FieldPosition {
        FieldPosition::new(side, yards)
    }

    #[test]
    fn test_coordinate_from_yards() {
        assert_eq!(coordinate_from_yards(pos(Team::Red, 30)), Vec2::new(-310.0, 0.0));
        assert_eq!(coordinate_from_yards(pos(Team::Blue, 30)), Vec2::new(310.0, 0.0));
        assert_eq!(coordinate_from_yards(pos(Team::Red, 50)).x, 0.0);
        assert_eq!(coordinate_from_yards(pos(Team::Blue, 50)).x, 0.0);
    }

    #[test]
    fn test_yards_from_coordinate_edges() {
        assert_eq!(yards_from_coordinate(-310.0), pos(Team::Red, 30));
        assert_eq!(yards_from_coordinate(310.0), pos(Team::Blue, 30));
        // Inside the end zones the spot is the 1-yard line
        assert_eq!(yards_from_coordinate(-850.0), pos(Team::Red, 1));
        assert_eq!(yards_from_coordinate(850.0), pos(Team::Blue, 1));
    }

    #[test]
    fn test_coordinate_round_trip_within_one_yard() {
        for side in [Team::Red, Team::Blue] {
            for yards in 1..=50 {
                let original = pos(side, yards);
                let back = yards_from_coordinate(coordinate_from_yards(original).x);
                let diff = difference_in_yards(original, back, None);
                assert!(diff <= 1, "{original} came back as {back}");
            }
        }
    }

    #[test]
    fn test_add_yards_crosses_midfield() {
        assert_eq!(add_yards(pos(Team::Red, 45), 10, Team::Red), pos(Team::Blue, 45));
        assert_eq!(add_yards(pos(Team::Blue, 45), 10, Team::Blue), pos(Team::Red, 45));
        assert_eq!(add_yards(pos(Team::Blue, 30), 10, Team::Blue), pos(Team::Blue, 40));
        assert_eq!(add_yards(pos(Team::Red, 30), -5, Team::Red), pos(Team::Red, 25));
    }

    #[test]
    fn test_add_yards_clamps_at_one() {
        assert_eq!(add_yards(pos(Team::Blue, 5), 10, Team::Red), pos(Team::Blue, 1));
        assert_eq!(add_yards(pos(Team::Red, 3), -5, Team::Red), pos(Team::Red, 1));
        assert_eq!(
            add_yards_unclamped(pos(Team::Blue, 5), 10, Team::Red),
            pos(Team::Blue, -5)
        );
    }

    #[test]
    fn test_add_then_difference_is_identity() {
        for side in [Team::Red, Team::Blue] {
            for advancing in [Team::Red, Team::Blue] {
                for yards in 1..=50 {
                    for delta in -30..=30 {
                        let start = pos(side, yards);
                        let unclamped = add_yards_unclamped(start, delta, advancing);
                        if unclamped.yards < 1 {
                            continue;
                        }
                        let moved = add_yards(start, delta, advancing);
                        assert_eq!(
                            difference_in_yards(start, moved, Some(advancing)),
                            delta,
                            "{start} + {delta} for {advancing}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_difference_sign_follows_advancing_team() {
        let a = pos(Team::Red, 30);
        let b = pos(Team::Red, 50);
        assert_eq!(difference_in_yards(a, b, Some(Team::Red)), 20);
        assert_eq!(difference_in_yards(a, b, Some(Team::Blue)), -20);
        assert_eq!(difference_in_yards(b, a, None), 20);
    }

    #[test]
    fn test_red_zone() {
        assert!(is_in_red_zone(pos(Team::Blue, 20), Team::Blue));
        assert!(!is_in_red_zone(pos(Team::Blue, 21), Team::Blue));
        assert!(is_in_red_zone(pos(Team::Red, 5), Team::Red));
        assert!(!is_in_red_zone(pos(Team::Red, 5), Team::Blue));
    }

    #[test]
    fn test_out_of_bounds_with_tolerance() {
        assert!(!is_out_of_bounds(Vec2::new(0.0, 266.0), 0.0));
        assert!(is_out_of_bounds(Vec2::new(0.0, 267.0), 0.0));
        assert!(!is_out_of_bounds(Vec2::new(0.0, 267.0), 10.0));
        assert!(is_out_of_bounds(Vec2::new(-931.0, 0.0), 0.0));
    }

    #[test]
    fn test_ball_within_goal_line() {
        assert!(ball_within_goal_line(Vec2::new(932.0, 10.0), 5.8, 1.0, Team::Blue));
        assert!(!ball_within_goal_line(Vec2::new(932.0, 10.0), 5.8, 1.0, Team::Red));
        assert!(!ball_within_goal_line(Vec2::new(932.0, 120.0), 5.8, 1.0, Team::Blue));
        // A fast ball counts from farther away
        assert!(ball_within_goal_line(Vec2::new(945.0, 0.0), 5.8, 20.0, Team::Blue));
    }

    #[test]
    fn test_end_zone_line_uses_radius() {
        assert!(has_passed_end_zone_line(Vec2::new(762.0, 0.0), 15.0, Team::Blue));
        assert!(!has_passed_end_zone_line(Vec2::new(755.0, 0.0), 15.0, Team::Blue));
        assert!(has_passed_end_zone_line(Vec2::new(-765.0, 0.0), 15.0, Team::Red));
    }

    #[test]
    fn test_yard_gain_between_points() {
        let a = Vec2::new(-310.0, 0.0);
        let b = Vec2::new(0.0, 50.0);
        assert_eq!(yard_gain_between_points(a, b, Team::Red), 20);
        assert_eq!(yard_gain_between_points(a, b, Team::Blue), -20);
    }

    #[test]
    fn test_yards_to_goal() {
        assert_eq!(yards_to_goal(pos(Team::Blue, 20), Team::Red), 20);
        assert_eq!(yards_to_goal(pos(Team::Red, 30), Team::Red), 70);
        assert_eq!(yards_to_goal(pos(Team::Red, 30), Team::Blue), 30);
    }

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn team_strategy() -> impl Strategy<Value = Team> {
            prop_oneof![Just(Team::Red), Just(Team::Blue)]
        }

        proptest! {
            #[test]
            fn prop_add_yards_stays_on_field(
                side in team_strategy(),
                advancing in team_strategy(),
                yards in 1i32..=50,
                delta in -100i32..=100,
            ) {
                let moved = add_yards(FieldPosition::new(side, yards), delta, advancing);
                prop_assert!(moved.yards >= 1);
                prop_assert!(moved.yards <= 50);
            }

            #[test]
            fn prop_coordinate_round_trip(x in -775.0f64..775.0) {
                let spot = yards_from_coordinate(x);
                let back = coordinate_from_yards(spot).x;
                prop_assert!((back - x).abs() <= 2.0 * YARD);
            }
        }
    }
}
