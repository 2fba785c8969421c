//! Host interface
//!
//! The referee does not own the physics simulation. A host (the game room)
//! implements [`Room`] to expose its discs and accept the few mutations the
//! rules need: repositioning players and the ball, locking or freeing the
//! ball, toggling collision groups and drawing field markers.
//!
//! [`RoomExt`] layers the referee's recurring physics presets (lock the ball,
//! feather the players, block a team at midfield, ...) on top of the raw
//! setters and is implemented for every `Room`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::field::math::surface_gap;
use crate::field::measures::{ball, player};
use crate::field::{Team, Vec2};

/// Host-assigned player identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Collision group bit set of a disc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionMask(pub u32);

impl CollisionMask {
    pub const NONE: CollisionMask = CollisionMask(0);
    pub const BALL: CollisionMask = CollisionMask(1);
    pub const RED: CollisionMask = CollisionMask(1 << 1);
    pub const BLUE: CollisionMask = CollisionMask(1 << 2);
    pub const RED_KICKOFF: CollisionMask = CollisionMask(1 << 3);
    pub const BLUE_KICKOFF: CollisionMask = CollisionMask(1 << 4);
    pub const WALL: CollisionMask = CollisionMask(1 << 5);
    pub const KICK: CollisionMask = CollisionMask(1 << 6);
    pub const SCORE: CollisionMask = CollisionMask(1 << 7);
    /// Custom groups: C0/C1 block a whole team, C2/C3 block the midfield line
    pub const C0: CollisionMask = CollisionMask(1 << 28);
    pub const C1: CollisionMask = CollisionMask(1 << 29);
    pub const C2: CollisionMask = CollisionMask(1 << 30);
    pub const C3: CollisionMask = CollisionMask(1 << 31);

    pub const fn union(self, other: CollisionMask) -> CollisionMask {
        CollisionMask(self.0 | other.0)
    }

    pub const fn contains(self, other: CollisionMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Regular collision group of a team's players.
    pub fn for_team(team: Team) -> CollisionMask {
        match team {
            Team::Red => CollisionMask::RED,
            Team::Blue => CollisionMask::BLUE,
            Team::Spectators => CollisionMask::NONE,
        }
    }
}

/// Snapshot of a player disc as reported by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDisc {
    pub id: PlayerId,
    pub team: Team,
    pub position: Vec2,
    #[serde(default)]
    pub velocity: Vec2,
    #[serde(default = "default_player_radius")]
    pub radius: f64,
    #[serde(default)]
    pub collision_group: CollisionMask,
}

fn default_player_radius() -> f64 {
    player::RADIUS
}

impl PlayerDisc {
    pub fn new(id: u32, team: Team, position: Vec2) -> Self {
        Self {
            id: PlayerId(id),
            team,
            position,
            velocity: Vec2::ZERO,
            radius: player::RADIUS,
            collision_group: CollisionMask::for_team(team),
        }
    }

    /// Surface gap to another player.
    pub fn gap_to_player(&self, other: &PlayerDisc) -> f64 {
        surface_gap(self.position, self.radius, other.position, other.radius)
    }

    /// Surface gap to the ball.
    pub fn gap_to_ball(&self, ball: &BallDisc) -> f64 {
        surface_gap(self.position, self.radius, ball.position, ball.radius)
    }
}

/// Snapshot of the ball disc as reported by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallDisc {
    pub position: Vec2,
    #[serde(default)]
    pub velocity: Vec2,
    #[serde(default = "default_ball_radius")]
    pub radius: f64,
    #[serde(default = "default_ball_damping")]
    pub damping: f64,
    #[serde(default = "default_ball_inv_mass")]
    pub inv_mass: f64,
}

fn default_ball_radius() -> f64 {
    5.8
}

fn default_ball_damping() -> f64 {
    ball::DAMPING_DEFAULT
}

fn default_ball_inv_mass() -> f64 {
    ball::INV_MASS_FREE
}

impl BallDisc {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius: default_ball_radius(),
            damping: ball::DAMPING_DEFAULT,
            inv_mass: ball::INV_MASS_FREE,
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Surface gap between the ball and a point treated as a ball-sized disc.
    pub fn gap_to_spot(&self, spot: Vec2) -> f64 {
        surface_gap(self.position, self.radius, spot, self.radius)
    }
}

/// Field markers the referee draws through the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// Line to gain
    FirstDownLine,
    /// Line of scrimmage
    BallLine,
    /// One edge of the crowding zone outline (0 = top, 1 = bottom, 2 = front, 3 = back)
    CrowdingEdge(u8),
    /// One corner of the crowding zone outline
    CrowdingCorner(u8),
}

/// The physics host the referee officiates
pub trait Room {
    fn players(&self) -> Vec<PlayerDisc>;

    /// `None` while no game is running.
    fn ball(&self) -> Option<BallDisc>;

    fn set_player_position(&mut self, id: PlayerId, position: Vec2);
    fn set_player_velocity(&mut self, id: PlayerId, velocity: Vec2);
    fn set_player_inv_mass(&mut self, id: PlayerId, inv_mass: f64);
    fn set_player_collision_group(&mut self, id: PlayerId, group: CollisionMask);

    fn set_ball_position(&mut self, position: Vec2);
    fn set_ball_velocity(&mut self, velocity: Vec2);
    fn set_ball_inv_mass(&mut self, inv_mass: f64);
    fn set_ball_collision_group(&mut self, group: CollisionMask);
    fn set_ball_damping(&mut self, damping: f64);

    /// Draws `marker` as a segment from `from` to `to`.
    fn place_marker(&mut self, marker: Marker, from: Vec2, to: Vec2);

    /// Hides `marker`.
    fn clear_marker(&mut self, marker: Marker);

    /// Ends the match on the host.
    fn stop_game(&mut self);

    fn player(&self, id: PlayerId) -> Option<PlayerDisc> {
        self.players().into_iter().find(|p| p.id == id)
    }

    fn team_players(&self, team: Team) -> Vec<PlayerDisc> {
        self.players().into_iter().filter(|p| p.team == team).collect()
    }
}

/// Physics presets used by the rules
pub trait RoomExt: Room {
    /// Makes the ball (almost) immovable.
    fn lock_ball(&mut self) {
        self.set_ball_inv_mass(ball::INV_MASS_LOCKED);
    }

    fn unlock_ball(&mut self) {
        self.set_ball_inv_mass(ball::INV_MASS_FREE);
    }

    /// Ball inverse mass used as a kick-strength multiplier on kickoffs.
    fn set_ball_kick_force(&mut self, force: f64) {
        self.set_ball_inv_mass(force);
    }

    /// Players become feather-light so they bounce off the ball instead of
    /// pushing it.
    fn feather_players(&mut self) {
        for p in self.players() {
            self.set_player_inv_mass(p.id, player::INV_MASS_FEATHER);
        }
    }

    fn restore_player_mass(&mut self) {
        for p in self.players() {
            self.set_player_inv_mass(p.id, player::INV_MASS_DEFAULT);
        }
    }

    fn stop_ball(&mut self) {
        self.set_ball_velocity(Vec2::ZERO);
    }

    fn set_ball_kickable(&mut self) {
        self.set_ball_collision_group(CollisionMask::BALL.union(CollisionMask::KICK));
    }

    fn set_ball_unkickable(&mut self) {
        self.set_ball_collision_group(CollisionMask::WALL);
    }

    /// Keeps `team` behind the kickoff barrier.
    fn block_team(&mut self, team: Team) {
        let barrier = match team {
            Team::Red => CollisionMask::C0,
            Team::Blue => CollisionMask::C1,
            Team::Spectators => return,
        };
        for p in self.team_players(team) {
            self.set_player_collision_group(p.id, p.collision_group.union(barrier));
        }
    }

    /// Keeps `team` on its own side of midfield.
    fn block_midfield(&mut self, team: Team) {
        let barrier = match team {
            Team::Red => CollisionMask::C2,
            Team::Blue => CollisionMask::C3,
            Team::Spectators => return,
        };
        for p in self.team_players(team) {
            self.set_player_collision_group(p.id, p.collision_group.union(barrier));
        }
    }

    /// Restores the regular collision group of every player.
    fn unblock_teams(&mut self) {
        for p in self.players() {
            if p.team.is_playing() {
                self.set_player_collision_group(p.id, CollisionMask::for_team(p.team));
            }
        }
    }

    fn set_player_x(&mut self, id: PlayerId, x: f64) {
        if let Some(p) = self.player(id) {
            self.set_player_position(id, p.position.with_x(x));
        }
    }

    fn set_player_y(&mut self, id: PlayerId, y: f64) {
        if let Some(p) = self.player(id) {
            self.set_player_position(id, p.position.with_y(y));
        }
    }
}

impl<R: Room + ?Sized> RoomExt for R {}
