//! Rulings
//!
//! Every decision the referee takes is announced as a [`Ruling`]. Event
//! handlers return the rulings they produced in order; hosts turn them into
//! chat messages, sounds or UI as they see fit.

use serde::Serialize;

use crate::field::{FieldPosition, Team};
use crate::referee::Mode;
use crate::room::PlayerId;

/// Fouls that cost yards or the play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Foul {
    /// Quarterback ran past the line before the hike clock expired
    QuarterbackCrossedLine,
    /// Defender touched the ball before the hike clock expired
    DefensiveIllegalTouch,
    /// Offensive player other than the quarterback touched the ball before the pass
    OffensiveIllegalTouch,
    /// Offensive player pulled a defender across the line
    OffensiveHolding,
    /// Defender crossed the line before the hike clock expired
    DefensiveOffside,
    /// Defender loitered in front of the ball
    Crowding,
}

/// Why a down ended without a spot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadBallReason {
    /// The ball crossed the line of scrimmage untouched
    BallCrossedLine,
    /// The ball left the field before a pass
    BallOutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGoalMiss {
    ClockExpired,
    KickerTackled,
    OffensiveTouch,
    BallCarried,
    KickerTooFar,
    WrongDirection,
    DoubleTouch,
    BallStopped,
    KickerLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraPointMiss {
    ClockExpired,
    WrongDirection,
    DoubleTouch,
    BallStopped,
}

/// A referee decision
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "ruling", rename_all = "snake_case")]
pub enum Ruling {
    // ===========================================
    // Play setup
    // ===========================================
    DownSet {
        team: Team,
        down: u8,
        distance: i32,
        goal: bool,
        spot: FieldPosition,
        first_down: bool,
    },
    ConversionSet {
        team: Team,
        spot: FieldPosition,
    },
    KickoffSet {
        team: Team,
        spot: FieldPosition,
    },
    PuntSet {
        team: Team,
        spot: FieldPosition,
    },
    SafetyKickSet {
        team: Team,
        spot: FieldPosition,
    },
    FieldGoalSet {
        team: Team,
        kicker: PlayerId,
        spot: FieldPosition,
        yards: i32,
    },
    ExtraPointSet {
        team: Team,
        spot: FieldPosition,
    },
    TurnoverOnDowns {
        team: Team,
        spot: FieldPosition,
    },

    // ===========================================
    // Snap
    // ===========================================
    Hiked {
        quarterback: PlayerId,
    },
    HikeRefused {
        team: Team,
        offenders: Vec<PlayerId>,
    },
    HikeClockExpired {
        team: Team,
    },

    // ===========================================
    // Live ball
    // ===========================================
    QuarterbackRun {
        quarterback: PlayerId,
    },
    Handoff {
        runner: PlayerId,
    },
    SackAttempt {
        defender: PlayerId,
        quarterback: PlayerId,
    },
    PassCaught {
        receiver: PlayerId,
    },
    PassIncomplete {
        blocked_by: Option<PlayerId>,
    },
    InterceptionAttempt {
        defender: PlayerId,
    },
    InterceptionFailed {
        defender: PlayerId,
    },
    Interception {
        defender: PlayerId,
        team: Team,
    },
    KickReturned {
        returner: PlayerId,
        play: Mode,
    },
    IllegalKickTouch {
        player: PlayerId,
        team_awarded: Team,
        spot: FieldPosition,
    },
    CoverageReset {
        player: PlayerId,
    },
    DeadBall {
        reason: DeadBallReason,
    },

    // ===========================================
    // End of play
    // ===========================================
    TackleBroken {
        carrier: PlayerId,
        tacklers: Vec<PlayerId>,
    },
    Tackled {
        carrier: PlayerId,
        tacklers: Vec<PlayerId>,
        spot: FieldPosition,
        sack: bool,
    },
    Fumble {
        carrier: PlayerId,
        tacklers: Vec<PlayerId>,
        recovering_team: Team,
        spot: FieldPosition,
    },
    OutOfBounds {
        carrier: PlayerId,
        spot: FieldPosition,
    },
    KickOutOfBounds {
        receiving_team: Team,
        spot: FieldPosition,
    },
    Touchback {
        team: Team,
        spot: FieldPosition,
    },
    CarrierLeft {
        carrier: PlayerId,
        team_awarded: Team,
    },
    QuarterbackLeft {
        quarterback: PlayerId,
    },

    // ===========================================
    // Fouls
    // ===========================================
    Penalty {
        foul: Foul,
        against: Team,
        offenders: Vec<PlayerId>,
        yards: i32,
        /// Defensive fouls inside the red zone count toward the automatic touchdown
        red_zone_penalties: Option<u32>,
    },

    // ===========================================
    // Scoring
    // ===========================================
    Touchdown {
        team: Team,
        scorer: Option<PlayerId>,
        points: u32,
        pick_six: bool,
        automatic: bool,
    },
    ConversionGood {
        team: Team,
        scorer: Option<PlayerId>,
        points: u32,
        defensive: bool,
    },
    ConversionFailed {
        team: Team,
    },
    Safety {
        conceding_team: Team,
        carrier: PlayerId,
        points: u32,
    },
    FieldGoalGood {
        team: Team,
        kicker: Option<PlayerId>,
        yards: i32,
        points: u32,
        defensive_touch: bool,
    },
    FieldGoalMissed {
        team: Team,
        kicker: Option<PlayerId>,
        reason: FieldGoalMiss,
    },
    ExtraPointGood {
        team: Team,
        points: u32,
        defensive_touch: bool,
    },
    ExtraPointMissed {
        team: Team,
        reason: ExtraPointMiss,
    },

    // ===========================================
    // Match clock
    // ===========================================
    StoppageAdded {
        added_ms: u64,
    },
    StoppageTime {
        stoppage_ms: u64,
        ends_at_ms: u64,
    },
    EndTimeExtended {
        ends_at_ms: u64,
    },
    LastPlay,
    Overtime,
    GameOver {
        winner: Team,
        red: u32,
        blue: u32,
    },
}

impl Ruling {
    /// Whether the ruling put points on the board.
    pub fn is_score(&self) -> bool {
        matches!(
            self,
            Ruling::Touchdown { .. }
                | Ruling::ConversionGood { .. }
                | Ruling::Safety { .. }
                | Ruling::FieldGoalGood { .. }
                | Ruling::ExtraPointGood { .. }
        )
    }
}
