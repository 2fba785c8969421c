//! Play rules
//!
//! The referee runs exactly one play variant at a time. Each variant is a
//! set of `impl Referee` methods in its own module, and shares behavior with
//! the others through capabilities rather than a class hierarchy:
//!
//! ```text
//!              ┌────────────┬───────────┬──────────────┐
//!              │ tackles    │ land play │ kick return  │
//! ┌────────────┼────────────┼───────────┼──────────────┤
//! │ Down       │     ✓      │     ✓     │              │
//! │ Kickoff    │     ✓      │     ✓     │      ✓       │
//! │ Punt       │     ✓      │     ✓     │      ✓       │
//! │ Safety     │     ✓      │     ✓     │      ✓       │
//! │ FieldGoal  │     ✓      │           │              │
//! │ ExtraPoint │            │           │              │
//! └────────────┴────────────┴───────────┴──────────────┘
//! ```
//!
//! - **tackles**: opponent contact against a designated player is counted
//!   ([`tackle`])
//! - **land play**: the carrier lifecycle: touchdown, safety, out of bounds,
//!   tackle resolution, fumbles, failed passes and kicks ([`land_play`])
//! - **kick return**: first receiving-team touch makes a returner, kicking
//!   team touches after the kick are illegal ([`kicks`])
//!
//! The dispatcher in [`crate::referee`] routes host events to the active
//! variant only.

pub mod crowding;
pub mod down;
pub mod kicks;
pub mod land_play;
pub mod tackle;

use crate::referee::Mode;

/// Play variants the referee adjudicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayKind {
    Down,
    Kickoff,
    Punt,
    FieldGoal,
    ExtraPoint,
    Safety,
}

/// Shared behavior a play variant opts into. Land play includes tackling
/// the carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub land_play: bool,
    pub kick_return: bool,
}

impl PlayKind {
    /// Variant handling `mode`. Waiting for the hike belongs to the down.
    pub fn from_mode(mode: Mode) -> Option<PlayKind> {
        match mode {
            Mode::None => None,
            Mode::WaitingForHike | Mode::Down => Some(PlayKind::Down),
            Mode::Kickoff => Some(PlayKind::Kickoff),
            Mode::Punt => Some(PlayKind::Punt),
            Mode::FieldGoal => Some(PlayKind::FieldGoal),
            Mode::ExtraPoint => Some(PlayKind::ExtraPoint),
            Mode::Safety => Some(PlayKind::Safety),
        }
    }

    pub fn capabilities(self) -> Capabilities {
        match self {
            PlayKind::Down => Capabilities {
                land_play: true,
                kick_return: false,
            },
            PlayKind::Kickoff | PlayKind::Punt | PlayKind::Safety => Capabilities {
                land_play: true,
                kick_return: true,
            },
            PlayKind::FieldGoal | PlayKind::ExtraPoint => Capabilities::default(),
        }
    }

    /// Mode during which the variant's live-play rules run.
    pub fn live_mode(self) -> Mode {
        match self {
            PlayKind::Down => Mode::Down,
            PlayKind::Kickoff => Mode::Kickoff,
            PlayKind::Punt => Mode::Punt,
            PlayKind::FieldGoal => Mode::FieldGoal,
            PlayKind::ExtraPoint => Mode::ExtraPoint,
            PlayKind::Safety => Mode::Safety,
        }
    }
}
