//! Delayed referee decisions

use crate::field::{FieldPosition, Team, Vec2};
use crate::room::PlayerId;

/// How the next down is spotted and counted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownSetup {
    /// New line of scrimmage (`None` keeps the current spot)
    pub spot: Option<FieldPosition>,
    /// Offense of the new down (`None` keeps the team with the ball)
    pub for_team: Option<Team>,
    /// Yards to move the ball for the offense (penalties)
    pub increment: Option<i32>,
    pub count_down: bool,
    /// Subtract the gain from the old spot to the new spot from the distance
    pub count_distance: bool,
}

impl Default for DownSetup {
    fn default() -> Self {
        Self {
            spot: None,
            for_team: None,
            increment: None,
            count_down: true,
            count_distance: true,
        }
    }
}

impl DownSetup {
    /// Next down at the current spot.
    pub fn next() -> Self {
        Self::default()
    }

    /// Same down again.
    pub fn replay() -> Self {
        Self {
            count_down: false,
            count_distance: false,
            ..Self::default()
        }
    }

    pub fn at(spot: FieldPosition, team: Team) -> Self {
        Self {
            spot: Some(spot),
            for_team: Some(team),
            ..Self::default()
        }
    }

    pub fn at_counting(spot: FieldPosition, team: Team, count_distance: bool) -> Self {
        Self {
            count_distance,
            ..Self::at(spot, team)
        }
    }

    /// Possession to `team` at the current spot.
    pub fn turnover(team: Team) -> Self {
        Self {
            for_team: Some(team),
            count_distance: false,
            ..Self::default()
        }
    }

    pub fn turnover_at(spot: FieldPosition, team: Team) -> Self {
        Self {
            spot: Some(spot),
            ..Self::turnover(team)
        }
    }

    /// Yardage penalty for (positive) or against (negative) the offense.
    pub fn penalty(yards: i32, count_down: bool) -> Self {
        Self {
            increment: Some(yards),
            count_down,
            ..Self::default()
        }
    }
}

/// Result of a defensive foul once red-zone escalation is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenaltyOutcome {
    Yards(i32),
    AutomaticTouchdown,
}

/// Decision armed on the timer registry
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScheduledAction {
    SetDown(DownSetup),
    Kickoff { team: Team },
    ExtraPoint { team: Team },
    HikeClockExpired,
    ConfirmPassBlock { defender: PlayerId },
    CheckInterception { defender: PlayerId, origin: Vec2, velocity_x: f64 },
    CheckFieldGoalDirection { kicker: PlayerId, origin: Vec2 },
    CheckExtraPointDirection { kicking_team: Team, origin: Vec2 },
    KickoffStall,
    FieldGoalClockExpired,
    ExtraPointClockExpired { team: Team },
    EnforceCrowding { outcome: PenaltyOutcome, offenders: Vec<PlayerId> },
}
