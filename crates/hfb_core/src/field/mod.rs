//! Field model
//!
//! Teams, physical coordinates and yard-line positions, plus the geometry
//! that converts between them.
//!
//! ## Coordinate System
//!
//! - X: -930 = back of the Red end zone, +930 = back of the Blue end zone
//! - Y: -266..266 between the sidelines, 0 = middle of the field
//! - Red defends the negative-x end zone and attacks toward +x
//!
//! A [`FieldPosition`] names a yard line from the point of view of the side
//! of the field it lies on: `Red 30` is thirty yards out of the Red end zone.

pub mod geometry;
pub mod math;
pub mod measures;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

pub use geometry::{
    add_yards, add_yards_unclamped, ball_within_goal_line, coordinate_from_yards,
    difference_in_yards, goal_line, has_passed_end_zone_line, is_in_red_zone, is_out_of_bounds,
    is_past_line, yard_gain_between_points, yards_from_coordinate, yards_to_goal,
};

/// Team affiliation of a player disc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    #[default]
    Spectators,
    Red,
    Blue,
}

impl Team {
    /// Red ⇄ Blue; spectators stay spectators.
    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
            Team::Spectators => Team::Spectators,
        }
    }

    pub fn is_playing(self) -> bool {
        !matches!(self, Team::Spectators)
    }

    /// +1.0 for Red (attacks toward +x), -1.0 for Blue, 0.0 for spectators.
    pub fn attack_sign(self) -> f64 {
        match self {
            Team::Red => 1.0,
            Team::Blue => -1.0,
            Team::Spectators => 0.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
            Team::Spectators => "spectators",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(Team::Red),
            "blue" => Ok(Team::Blue),
            "spectators" | "spec" => Ok(Team::Spectators),
            other => Err(other.to_string()),
        }
    }
}

/// Point or vector in field coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (self - other).length()
    }

    /// Unit vector in the same direction, `None` for the zero vector.
    pub fn normalized(self) -> Option<Vec2> {
        let len = self.length();
        if len <= f64::EPSILON {
            None
        } else {
            Some(Vec2::new(self.x / len, self.y / len))
        }
    }

    pub fn with_x(self, x: f64) -> Vec2 {
        Vec2::new(x, self.y)
    }

    pub fn with_y(self, y: f64) -> Vec2 {
        Vec2::new(self.x, y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Yard line named from the side of the field it lies on.
///
/// `yards` is 1..=50 for every position the referee stores; 50 is midfield
/// and is reachable from either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPosition {
    pub side: Team,
    pub yards: i32,
}

impl FieldPosition {
    pub const fn new(side: Team, yards: i32) -> Self {
        Self { side, yards }
    }

    pub const fn midfield() -> Self {
        Self::new(Team::Red, 50)
    }

    /// Position on a single 0..100 axis running from the Red goal line to
    /// the Blue goal line.
    pub fn unified(self) -> i32 {
        match self.side {
            Team::Blue => 100 - self.yards,
            _ => self.yards,
        }
    }
}

impl Default for FieldPosition {
    fn default() -> Self {
        Self::midfield()
    }
}

impl fmt::Display for FieldPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.side, self.yards)
    }
}
