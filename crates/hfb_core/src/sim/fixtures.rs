//! Test fixtures: a three-on-three match on the scripted room

use crate::config::RefereeConfig;
use crate::field::{FieldPosition, Team, Vec2};
use crate::referee::{CarrierRole, DownSetup, DownState, Referee};
use crate::room::PlayerId;
use crate::ruling::Ruling;
use crate::sim::room::ScriptedRoom;

pub const RED_QB: u32 = 1;
pub const RED_2: u32 = 2;
pub const RED_3: u32 = 3;
pub const BLUE_1: u32 = 4;
pub const BLUE_2: u32 = 5;
pub const BLUE_3: u32 = 6;

/// Gap between disc centers that leaves the hiker touching the ball
const HIKE_SPACING: f64 = 21.0;

/// Game started with default rules, opening kickoff set.
pub fn started() -> (Referee, ScriptedRoom) {
    started_with(RefereeConfig::default())
}

pub fn started_with(config: RefereeConfig) -> (Referee, ScriptedRoom) {
    let mut room = ScriptedRoom::lineup(&[RED_QB, RED_2, RED_3], &[BLUE_1, BLUE_2, BLUE_3]);
    let mut referee = Referee::new(config);
    referee.on_game_start(&mut room);
    (referee, room)
}

/// First down for `team` at `at`, waiting for the hike.
pub fn spot(referee: &mut Referee, room: &mut ScriptedRoom, team: Team, at: FieldPosition) -> Vec<Ruling> {
    referee.drain();
    referee.state.down = DownState::new_series(referee.config.down.yards_to_gain);
    referee.set_down(
        room,
        DownSetup {
            count_distance: false,
            ..DownSetup::at(at, team)
        },
    );
    referee.drain()
}

/// Puts `quarterback` on the ball and asks for the hike.
pub fn snap(referee: &mut Referee, room: &mut ScriptedRoom, quarterback: u32) -> Vec<Ruling> {
    let sign = referee.team_with_ball().attack_sign();
    let ball = room.ball_disc().map(|b| b.position).unwrap_or(Vec2::ZERO);
    room.move_player(PlayerId(quarterback), Vec2::new(ball.x - sign * HIKE_SPACING, ball.y));
    referee.on_chat(room, PlayerId(quarterback), "hike")
}

pub fn tick(referee: &mut Referee, room: &mut ScriptedRoom) -> Vec<Ruling> {
    referee.on_tick(room)
}

pub fn ticks(referee: &mut Referee, room: &mut ScriptedRoom, count: u32) -> Vec<Ruling> {
    let mut rulings = Vec::new();
    for _ in 0..count {
        rulings.extend(referee.on_tick(room));
    }
    rulings
}

/// Ticks until `ms` of engine time have passed, plus one.
pub fn run_ms(referee: &mut Referee, room: &mut ScriptedRoom, ms: u64) -> Vec<Ruling> {
    let count = referee.config().ms_to_ticks(ms) + 1;
    ticks(referee, room, count)
}

/// Makes `player` the carrier. A receiver implies a thrown pass.
pub fn hand_to(referee: &mut Referee, room: &mut ScriptedRoom, player: u32, role: CarrierRole, running: bool) {
    let disc = room
        .disc(PlayerId(player))
        .cloned()
        .unwrap_or_else(|| panic!("player {} is not on the field", player));
    if role == CarrierRole::Receiver {
        referee.state.play.qb_kicked_ball = true;
    }
    referee.set_carrier(room, &disc, role, running);
    referee.drain();
}
