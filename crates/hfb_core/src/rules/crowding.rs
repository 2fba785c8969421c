//! Crowding rule
//!
//! Defenders may not park in the box in front of the ball for more than a
//! few seconds unless an attacker is in there with them. The box spans from
//! one player radius behind the ball spot to `zone_depth_yards` in front of
//! it (never past the red-zone edge), between the hashes. The quarterback
//! is ignored.
//!
//! Counting starts `grace_after_hike_ms` after the hike. Per-defender
//! streaks reset whenever the box is empty of defenders or an attacker is
//! in it; a separate history of every crowding tick this down is kept to
//! split the foul credit when several defenders are flagged together.

use std::collections::BTreeMap;

use crate::field::{measures, Vec2};
use crate::referee::{PenaltyOutcome, Referee, ScheduledAction};
use crate::room::{Marker, PlayerDisc, PlayerId, Room};
use crate::ruling::Foul;
use crate::stats::{StatKind, StatsSink};

/// Per-defender crowding counters
#[derive(Debug, Clone, Default)]
pub(crate) struct CrowdingTracker {
    /// Consecutive ticks in the box, in order of arrival
    streaks: Vec<(PlayerId, u32)>,
    /// Every crowding tick of the current down
    history: BTreeMap<PlayerId, u32>,
}

impl CrowdingTracker {
    pub(crate) fn clear(&mut self) {
        self.streaks.clear();
        self.history.clear();
    }

    pub(crate) fn reset_streaks(&mut self) {
        self.streaks.clear();
    }

    /// Records one tick with `defenders` in the box. Defenders that left
    /// lose their streak.
    pub(crate) fn observe(&mut self, defenders: &[PlayerId]) {
        self.streaks.retain(|(id, _)| defenders.contains(id));
        for &id in defenders {
            match self.streaks.iter_mut().find(|(p, _)| *p == id) {
                Some((_, ticks)) => *ticks += 1,
                None => self.streaks.push((id, 1)),
            }
            *self.history.entry(id).or_insert(0) += 1;
        }
    }

    pub(crate) fn streak(&self, player: PlayerId) -> u32 {
        self.streaks
            .iter()
            .find(|(id, _)| *id == player)
            .map_or(0, |(_, ticks)| *ticks)
    }

    pub(crate) fn longest_streak(&self) -> u32 {
        self.streaks.iter().map(|(_, ticks)| *ticks).max().unwrap_or(0)
    }

    /// Splits foul credit between `offenders` by their share of the
    /// recorded crowding ticks.
    ///
    /// One foul is handed out per `threshold_ticks` of crowding (rounded
    /// up, at least one). Shares are rounded with the largest-remainder
    /// method, then every offender that contributed gets at least one.
    pub(crate) fn apportion(&self, offenders: &[PlayerId], threshold_ticks: u32) -> Vec<(PlayerId, i32)> {
        let ticks: Vec<(PlayerId, u32)> = offenders
            .iter()
            .map(|&id| (id, self.history.get(&id).copied().unwrap_or(0)))
            .collect();
        let total: u32 = ticks.iter().map(|(_, t)| t).sum();
        if total == 0 {
            return offenders.iter().map(|&id| (id, 1)).collect();
        }

        let fouls = total.div_ceil(threshold_ticks.max(1)).max(1) as i32;

        let mut shares: Vec<(PlayerId, i32, f64)> = ticks
            .iter()
            .map(|&(id, t)| {
                let exact = fouls as f64 * t as f64 / total as f64;
                (id, exact.floor() as i32, exact - exact.floor())
            })
            .collect();

        let mut left = fouls - shares.iter().map(|(_, n, _)| n).sum::<i32>();
        let mut order: Vec<usize> = (0..shares.len()).collect();
        order.sort_by(|&a, &b| shares[b].2.total_cmp(&shares[a].2));
        for index in order {
            if left <= 0 {
                break;
            }
            shares[index].1 += 1;
            left -= 1;
        }

        shares
            .into_iter()
            .zip(ticks)
            .map(|((id, n, _), (_, t))| (id, if t > 0 { n.max(1) } else { n }))
            .collect()
    }
}

/// The box in front of the ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CrowdingZone {
    /// Edge behind the ball spot
    pub(crate) back_x: f64,
    /// Edge toward the defense
    pub(crate) front_x: f64,
    pub(crate) half_height: f64,
}

impl CrowdingZone {
    /// Strictly inside the box. A box squeezed shut contains nothing.
    pub(crate) fn contains(&self, point: Vec2) -> bool {
        let between = if self.front_x >= self.back_x {
            point.x > self.back_x && point.x < self.front_x
        } else {
            point.x < self.back_x && point.x > self.front_x
        };
        between && point.y.abs() < self.half_height
    }
}

impl<S: StatsSink> Referee<S> {
    pub(crate) fn crowding_zone(&self) -> CrowdingZone {
        let sign = self.state.team_with_ball.attack_sign();
        let start = self.ball_start();
        let rules = &self.config.crowding;

        let back_x = start.x - sign * rules.player_radius;
        let reach = start.x + sign * rules.zone_depth_yards * measures::YARD;
        let front_x = if sign > 0.0 {
            reach.min(measures::RED_ZONE_X)
        } else {
            reach.max(-measures::RED_ZONE_X)
        };

        CrowdingZone {
            back_x,
            front_x: if (front_x - back_x) * sign <= 0.0 { back_x } else { front_x },
            half_height: measures::HASH_Y,
        }
    }

    /// Runs the crowding rule for one tick. Returns whether a foul was called.
    pub(crate) fn crowding_tick(&mut self, room: &mut dyn Room, players: &[PlayerDisc]) -> bool {
        if !self.config.crowding.enabled {
            return false;
        }
        let Some(hiked_at) = self.state.play.hike_time_ms else {
            return false;
        };
        if self.now() < hiked_at + self.config.crowding.grace_after_hike_ms {
            return false;
        }

        let zone = self.crowding_zone();
        let team = self.state.team_with_ball;
        let quarterback = self.state.play.quarterback;

        let in_zone: Vec<&PlayerDisc> = players
            .iter()
            .filter(|p| p.team.is_playing() && Some(p.id) != quarterback && zone.contains(p.position))
            .collect();
        let defenders: Vec<&PlayerDisc> = in_zone.iter().copied().filter(|p| p.team != team).collect();
        let attackers_inside = in_zone.iter().any(|p| p.team == team);

        if defenders.is_empty() || attackers_inside {
            self.crowding.reset_streaks();
            return false;
        }

        let ids: Vec<PlayerId> = defenders.iter().map(|p| p.id).collect();
        self.crowding.observe(&ids);

        let threshold = self.config.ms_to_ticks(self.config.crowding.threshold_ms);
        if self.crowding.longest_streak() < threshold {
            return false;
        }

        let blocked_distance = self.config.crowding.blocked_distance;
        let blocked = defenders.iter().any(|d| {
            players
                .iter()
                .filter(|p| p.team == team)
                .any(|a| d.gap_to_player(a) < blocked_distance)
        });
        if blocked {
            return false;
        }

        log::info!("crowding by {:?}", ids);

        let outcome = self.escalate_defensive_penalty(self.config.penalties.crowding_yards);
        for (player, fouls) in self.crowding.apportion(&ids, threshold) {
            if fouls > 0 {
                self.credit(player, StatKind::Fouls, fouls);
            }
        }

        self.render_crowding_zone(room, &zone);
        self.halt_play();
        self.schedule(
            ScheduledAction::EnforceCrowding {
                outcome,
                offenders: ids,
            },
            self.config.crowding.display_ms,
        );
        true
    }

    pub(crate) fn enforce_crowding(&mut self, room: &mut dyn Room, outcome: PenaltyOutcome, offenders: Vec<PlayerId>) {
        self.clear_crowding_markers(room);
        self.enforce_defensive_penalty(room, Foul::Crowding, offenders, outcome);
    }

    fn render_crowding_zone(&mut self, room: &mut dyn Room, zone: &CrowdingZone) {
        let start_x = self.ball_start().x;
        let top = -zone.half_height;
        let bottom = zone.half_height;

        let corners = [
            Vec2::new(start_x, top),
            Vec2::new(zone.front_x, top),
            Vec2::new(zone.front_x, bottom),
            Vec2::new(start_x, bottom),
        ];

        room.place_marker(Marker::CrowdingEdge(0), corners[0], corners[1]);
        room.place_marker(Marker::CrowdingEdge(1), corners[3], corners[2]);
        room.place_marker(Marker::CrowdingEdge(2), corners[1], corners[2]);
        room.place_marker(Marker::CrowdingEdge(3), corners[0], corners[3]);
        for (index, corner) in corners.into_iter().enumerate() {
            room.place_marker(Marker::CrowdingCorner(index as u8), corner, corner);
        }
    }

    pub(crate) fn clear_crowding_markers(&mut self, room: &mut dyn Room) {
        for index in 0..4 {
            room.clear_marker(Marker::CrowdingEdge(index));
            room.clear_marker(Marker::CrowdingCorner(index));
        }
    }
}
