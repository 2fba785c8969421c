//! In-memory room
//!
//! [`ScriptedRoom`] stands in for the physics host in tests, scenario replays
//! and the CLI. It stores discs and markers verbatim and only integrates
//! velocities when told to with [`ScriptedRoom::advance`]; collisions are
//! not simulated.

use std::collections::BTreeMap;

use crate::field::{Team, Vec2};
use crate::room::{BallDisc, CollisionMask, Marker, PlayerDisc, PlayerId, Room};

/// Scriptable host
#[derive(Debug, Clone)]
pub struct ScriptedRoom {
    players: Vec<PlayerDisc>,
    ball: Option<BallDisc>,
    ball_collision_group: CollisionMask,
    inv_masses: BTreeMap<PlayerId, f64>,
    markers: BTreeMap<Marker, (Vec2, Vec2)>,
    stopped: bool,
}

impl Default for ScriptedRoom {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            ball: Some(BallDisc::at(Vec2::ZERO)),
            ball_collision_group: CollisionMask::BALL.union(CollisionMask::KICK),
            inv_masses: BTreeMap::new(),
            markers: BTreeMap::new(),
            stopped: false,
        }
    }
}

impl ScriptedRoom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players(players: Vec<PlayerDisc>) -> Self {
        Self {
            players,
            ..Self::default()
        }
    }

    /// Red players `red` and Blue players `blue`, all at the center spot.
    pub fn lineup(red: &[u32], blue: &[u32]) -> Self {
        let players = red
            .iter()
            .map(|&id| PlayerDisc::new(id, Team::Red, Vec2::ZERO))
            .chain(blue.iter().map(|&id| PlayerDisc::new(id, Team::Blue, Vec2::ZERO)))
            .collect();
        Self::with_players(players)
    }

    pub fn add_player(&mut self, player: PlayerDisc) {
        self.players.retain(|p| p.id != player.id);
        self.players.push(player);
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Option<PlayerDisc> {
        let index = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(index))
    }

    /// Moves a player to another team and returns its updated disc.
    pub fn change_team(&mut self, id: PlayerId, team: Team) -> Option<PlayerDisc> {
        let player = self.players.iter_mut().find(|p| p.id == id)?;
        player.team = team;
        player.collision_group = CollisionMask::for_team(team);
        Some(player.clone())
    }

    pub fn move_player(&mut self, id: PlayerId, position: Vec2) {
        self.set_player_position(id, position);
    }

    /// Places the ball with a velocity.
    pub fn place_ball(&mut self, position: Vec2, velocity: Vec2) {
        if let Some(ball) = self.ball.as_mut() {
            ball.position = position;
            ball.velocity = velocity;
        }
    }

    /// Player disc currently stored for `id`.
    pub fn disc(&self, id: PlayerId) -> Option<&PlayerDisc> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn ball_disc(&self) -> Option<&BallDisc> {
        self.ball.as_ref()
    }

    pub fn ball_collision_group(&self) -> CollisionMask {
        self.ball_collision_group
    }

    pub fn inv_mass(&self, id: PlayerId) -> Option<f64> {
        self.inv_masses.get(&id).copied()
    }

    pub fn marker(&self, marker: Marker) -> Option<(Vec2, Vec2)> {
        self.markers.get(&marker).copied()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Integrates one host tick: discs move by their velocity and the ball
    /// slows down by its damping.
    pub fn advance(&mut self) {
        for player in &mut self.players {
            player.position = player.position + player.velocity;
        }
        if let Some(ball) = self.ball.as_mut() {
            ball.position = ball.position + ball.velocity;
            ball.velocity = ball.velocity * ball.damping;
        }
    }
}

impl Room for ScriptedRoom {
    fn players(&self) -> Vec<PlayerDisc> {
        self.players.clone()
    }

    fn ball(&self) -> Option<BallDisc> {
        self.ball.clone()
    }

    fn set_player_position(&mut self, id: PlayerId, position: Vec2) {
        if let Some(p) = self.players.iter_mut().find(|p| p.id == id) {
            p.position = position;
        }
    }

    fn set_player_velocity(&mut self, id: PlayerId, velocity: Vec2) {
        if let Some(p) = self.players.iter_mut().find(|p| p.id == id) {
            p.velocity = velocity;
        }
    }

    fn set_player_inv_mass(&mut self, id: PlayerId, inv_mass: f64) {
        self.inv_masses.insert(id, inv_mass);
    }

    fn set_player_collision_group(&mut self, id: PlayerId, group: CollisionMask) {
        if let Some(p) = self.players.iter_mut().find(|p| p.id == id) {
            p.collision_group = group;
        }
    }

    fn set_ball_position(&mut self, position: Vec2) {
        if let Some(ball) = self.ball.as_mut() {
            ball.position = position;
        }
    }

    fn set_ball_velocity(&mut self, velocity: Vec2) {
        if let Some(ball) = self.ball.as_mut() {
            ball.velocity = velocity;
        }
    }

    fn set_ball_inv_mass(&mut self, inv_mass: f64) {
        if let Some(ball) = self.ball.as_mut() {
            ball.inv_mass = inv_mass;
        }
    }

    fn set_ball_collision_group(&mut self, group: CollisionMask) {
        self.ball_collision_group = group;
    }

    fn set_ball_damping(&mut self, damping: f64) {
        if let Some(ball) = self.ball.as_mut() {
            ball.damping = damping;
        }
    }

    fn place_marker(&mut self, marker: Marker, from: Vec2, to: Vec2) {
        self.markers.insert(marker, (from, to));
    }

    fn clear_marker(&mut self, marker: Marker) {
        self.markers.remove(&marker);
    }

    fn stop_game(&mut self) {
        self.stopped = true;
    }
}
