//! Statistics hooks
//!
//! The referee credits players with typed statistic deltas as plays resolve.
//! Deltas go to a [`StatsSink`]; aggregation and reporting belong to the
//! sink. [`StatsLedger`] is the in-memory sink used by tests and the CLI.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::room::PlayerId;

/// Statistic kinds credited by the referee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    // Offense
    ReceivingYards,
    RushingYards,
    Receptions,
    Runs,
    ReceivingTouchdowns,
    RushingTouchdowns,
    Fumbles,

    // Special teams
    Returns,
    ReturnYards,
    ReturnTouchdowns,
    FieldGoalYards,
    FieldGoalsMade,
    FieldGoalsMissed,

    // Defense
    PassesBlocked,
    Tackles,
    Sacks,
    Interceptions,
    PickSixes,
    ForcedFumbles,

    // Quarterback
    QuarterbackRuns,
    PassingYards,
    PassesAttempted,
    PassesCompleted,
    TouchdownPasses,
    InterceptionsThrown,
    SackYardsLost,
    SacksTaken,
    StripSacksTaken,

    Fouls,
}

/// Grouping of statistic kinds for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatCategory {
    Offense,
    SpecialTeams,
    Defense,
    Quarterback,
    Discipline,
}

impl StatKind {
    pub fn category(self) -> StatCategory {
        use StatKind::*;
        match self {
            ReceivingYards | RushingYards | Receptions | Runs | ReceivingTouchdowns
            | RushingTouchdowns | Fumbles => StatCategory::Offense,
            Returns | ReturnYards | ReturnTouchdowns | FieldGoalYards | FieldGoalsMade
            | FieldGoalsMissed => StatCategory::SpecialTeams,
            PassesBlocked | Tackles | Sacks | Interceptions | PickSixes | ForcedFumbles => {
                StatCategory::Defense
            }
            QuarterbackRuns | PassingYards | PassesAttempted | PassesCompleted
            | TouchdownPasses | InterceptionsThrown | SackYardsLost | SacksTaken
            | StripSacksTaken => StatCategory::Quarterback,
            Fouls => StatCategory::Discipline,
        }
    }
}

/// One statistic credit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDelta {
    pub player: PlayerId,
    pub kind: StatKind,
    pub amount: i32,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Stats sink unavailable: {0}")]
    Unavailable(String),

    #[error("Stats sink rejected {kind:?} for player {player}")]
    Rejected { player: PlayerId, kind: StatKind },
}

/// Receiver of statistic credits
pub trait StatsSink {
    fn record(&mut self, delta: &StatDelta) -> Result<(), StatsError>;
}

impl<T: StatsSink + ?Sized> StatsSink for Box<T> {
    fn record(&mut self, delta: &StatDelta) -> Result<(), StatsError> {
        (**self).record(delta)
    }
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStats;

impl StatsSink for NullStats {
    fn record(&mut self, _delta: &StatDelta) -> Result<(), StatsError> {
        Ok(())
    }
}

/// In-memory per-player totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsLedger {
    totals: BTreeMap<PlayerId, BTreeMap<StatKind, i32>>,
}

impl StatsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total of `kind` for `player` (0 when never credited).
    pub fn get(&self, player: PlayerId, kind: StatKind) -> i32 {
        self.totals
            .get(&player)
            .and_then(|kinds| kinds.get(&kind))
            .copied()
            .unwrap_or(0)
    }

    pub fn player_totals(&self, player: PlayerId) -> Option<&BTreeMap<StatKind, i32>> {
        self.totals.get(&player)
    }

    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.totals.keys().copied()
    }

    /// Sum of `kind` over every player.
    pub fn total(&self, kind: StatKind) -> i32 {
        self.totals
            .values()
            .filter_map(|kinds| kinds.get(&kind))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn clear(&mut self) {
        self.totals.clear();
    }
}

impl StatsSink for StatsLedger {
    fn record(&mut self, delta: &StatDelta) -> Result<(), StatsError> {
        *self
            .totals
            .entry(delta.player)
            .or_default()
            .entry(delta.kind)
            .or_insert(0) += delta.amount;
        Ok(())
    }
}
