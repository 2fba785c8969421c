//! Match state owned by the referee

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::field::{FieldPosition, Team, Vec2};
use crate::room::PlayerId;

/// Active play variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Between plays (a delayed transition is pending or no game runs)
    #[default]
    None,
    WaitingForHike,
    Down,
    Kickoff,
    Punt,
    FieldGoal,
    ExtraPoint,
    Safety,
}

impl Mode {
    /// A play that must finish before the game can end.
    pub fn is_live(self) -> bool {
        matches!(self, Mode::Down | Mode::FieldGoal | Mode::ExtraPoint | Mode::Kickoff)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::None => "no play",
            Mode::WaitingForHike => "waiting for hike",
            Mode::Down => "down",
            Mode::Kickoff => "kickoff",
            Mode::Punt => "punt",
            Mode::FieldGoal => "field goal",
            Mode::ExtraPoint => "extra point",
            Mode::Safety => "safety kick",
        };
        f.write_str(name)
    }
}

/// How the current carrier got the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarrierRole {
    Receiver,
    Runner,
    QbRunner,
    QbRunnerSacking,
    PuntReturner,
    KickoffReturner,
    Intercepter,
    Sack,
}

/// When a gang tackle can knock the ball loose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FumbleExposure {
    /// Within the fumble window after gaining the ball
    Window,
    /// Only while a sack is in progress
    SackOnly,
    Never,
}

impl CarrierRole {
    pub fn fumble_exposure(self) -> FumbleExposure {
        match self {
            CarrierRole::Receiver
            | CarrierRole::Runner
            | CarrierRole::PuntReturner
            | CarrierRole::KickoffReturner => FumbleExposure::Window,
            CarrierRole::QbRunner | CarrierRole::QbRunnerSacking | CarrierRole::Sack => {
                FumbleExposure::SackOnly
            }
            CarrierRole::Intercepter => FumbleExposure::Never,
        }
    }

    pub fn is_returner(self) -> bool {
        matches!(self, CarrierRole::PuntReturner | CarrierRole::KickoffReturner)
    }

    pub fn is_rusher(self) -> bool {
        matches!(
            self,
            CarrierRole::Runner | CarrierRole::QbRunner | CarrierRole::QbRunnerSacking
        )
    }
}

/// Player holding the ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    pub player: PlayerId,
    pub team: Team,
    pub role: CarrierRole,
    pub initial_position: Vec2,
    /// Engine clock when the carrier gained the ball
    pub gained_at_ms: u64,
    /// Opponent touches since the carrier gained the ball
    pub tackle_count: u32,
}

/// Down and distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownState {
    /// 1..=4 during a series, 0 right after a possession change
    pub count: u8,
    pub distance: i32,
    /// Line to gain is the goal line
    pub goal_mode: bool,
    pub red_zone_penalties: u32,
    pub in_red_zone: bool,
}

impl DownState {
    pub fn new_series(yards_to_gain: i32) -> Self {
        Self {
            count: 0,
            distance: yards_to_gain,
            goal_mode: false,
            red_zone_penalties: 0,
            in_red_zone: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub red: u32,
    pub blue: u32,
}

impl Score {
    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red,
            Team::Blue => self.blue,
            Team::Spectators => 0,
        }
    }

    pub fn set(&mut self, team: Team, points: u32) {
        match team {
            Team::Red => self.red = points,
            Team::Blue => self.blue = points,
            Team::Spectators => {}
        }
    }

    pub fn add(&mut self, team: Team, points: u32) {
        self.set(team, self.get(team) + points);
    }

    pub fn is_tied(&self) -> bool {
        self.red == self.blue
    }

    pub fn leader(&self) -> Option<Team> {
        match self.red.cmp(&self.blue) {
            std::cmp::Ordering::Greater => Some(Team::Red),
            std::cmp::Ordering::Less => Some(Team::Blue),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Flags scoped to a single play, cleared on every reset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayFlags {
    pub quarterback: Option<PlayerId>,
    /// First kick of the play happened (pass thrown, kick taken)
    pub qb_kicked_ball: bool,
    pub hike_time_ms: Option<u64>,
    /// Carrier gained the ball with momentum; first contact does not tackle
    pub running: bool,
    pub conversion: bool,
    pub intercept: bool,
    pub intercept_attempt: Option<PlayerId>,
    pub intercept_player: Option<PlayerId>,
    pub intercept_left_end_zone: bool,
    pub blocked_pass: bool,
}

/// Match clock in engine time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchClock {
    pub ticks: u64,
    /// Regulation end (0 = unlimited)
    pub end_ms: u64,
    pub stoppage_ms: u64,
    pub is_stoppage_time: bool,
    pub overtime: bool,
    pub last_play_announced: bool,
    pub game_over: bool,
}

/// Complete referee state, serializable as a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub in_progress: bool,
    pub paused: bool,
    pub mode: Mode,
    pub team_with_ball: Team,
    pub ball_position: FieldPosition,
    pub down: DownState,
    pub score: Score,
    pub carrier: Option<Carrier>,
    pub play: PlayFlags,
    pub clock: MatchClock,
    /// Bumped on every play reset; timers armed in an older epoch are stale
    pub epoch: u64,
}

impl MatchState {
    pub fn new(yards_to_gain: i32) -> Self {
        Self {
            in_progress: false,
            paused: false,
            mode: Mode::None,
            team_with_ball: Team::Red,
            ball_position: FieldPosition::midfield(),
            down: DownState::new_series(yards_to_gain),
            score: Score::default(),
            carrier: None,
            play: PlayFlags::default(),
            clock: MatchClock::default(),
            epoch: 0,
        }
    }

    pub fn carrier_id(&self) -> Option<PlayerId> {
        self.carrier.as_ref().map(|c| c.player)
    }

    pub fn is_carrier(&self, player: PlayerId) -> bool {
        self.carrier_id() == Some(player)
    }

    pub fn is_quarterback(&self, player: PlayerId) -> bool {
        self.play.quarterback == Some(player)
    }
}
