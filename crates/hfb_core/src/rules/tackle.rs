//! Tackle detection
//!
//! Contact is purely geometric: every opponent whose disc surface is within
//! the contact radius of the target counts as a tackler this tick. Contact
//! against the carrier accumulates for the whole possession; contact against
//! any other player (the field-goal kicker) is counted per evaluation.

use crate::room::{PlayerDisc, PlayerId};
use crate::stats::StatsSink;

use crate::referee::Referee;

/// Opponent contact found in one evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tackle {
    /// Accumulated contact count
    pub count: u32,
    /// Opponents in contact this tick
    pub players: Vec<PlayerId>,
}

/// Opponents of `target` in contact with it.
pub fn contacts(target: &PlayerDisc, players: &[PlayerDisc], contact_radius: f64) -> Vec<PlayerId> {
    players
        .iter()
        .filter(|p| p.team.is_playing() && p.team != target.team && p.id != target.id)
        .filter(|p| p.gap_to_player(target) < contact_radius)
        .map(|p| p.id)
        .collect()
}

impl<S: StatsSink> Referee<S> {
    /// Contact against the carrier, added to the possession's counter.
    pub(crate) fn carrier_tackle(&mut self, carrier: &PlayerDisc, players: &[PlayerDisc]) -> Tackle {
        let tacklers = contacts(carrier, players, self.config.tackle.contact_radius);

        let Some(state) = self.state.carrier.as_mut() else {
            return Tackle::default();
        };
        state.tackle_count += tacklers.len() as u32;

        Tackle {
            count: state.tackle_count,
            players: tacklers,
        }
    }

    /// Contact against a player that does not hold the ball.
    pub(crate) fn player_tackle(&self, target: &PlayerDisc, players: &[PlayerDisc]) -> Tackle {
        let tacklers = contacts(target, players, self.config.tackle.contact_radius);
        Tackle {
            count: tacklers.len() as u32,
            players: tacklers,
        }
    }
}
