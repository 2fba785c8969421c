//! Rule sections of [`super::RefereeConfig`]
//!
//! Defaults are the values the rules were tuned with on live rooms.

use serde::{Deserialize, Serialize};

/// Match clock and play clocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockRules {
    /// Host tick rate (ticks per second)
    pub tick_rate_hz: u32,
    /// Regulation length in seconds (0 = no limit)
    pub time_limit_secs: u32,
    /// Defensive penalties inside this window extend regulation to this many
    /// seconds after the foul
    pub final_seconds: u32,
    /// Time the offense has to hike after a down is set
    pub hike_clock_ms: u64,
    /// Time the offense has to hike a conversion, and to kick an extra point
    pub extra_point_clock_ms: u64,
    /// After the hike, time before the defense may rush and the quarterback may run
    pub blitz_delay_ms: u64,
    /// Shortened rush delay once the quarterback moved the ball
    pub carried_ball_blitz_delay_ms: u64,
    /// Kickoff stall clock (not on the opening kickoff)
    pub kickoff_stall_ms: u64,
    /// Stoppage added when the kickoff stall clock runs out
    pub kickoff_stall_stoppage_ms: u64,
    /// Field-goal attempt clock
    pub field_goal_clock_ms: u64,
}

impl Default for ClockRules {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            time_limit_secs: 600,
            final_seconds: 10,
            hike_clock_ms: 15_000,
            extra_point_clock_ms: 8_000,
            blitz_delay_ms: 12_000,
            carried_ball_blitz_delay_ms: 4_000,
            kickoff_stall_ms: 10_000,
            kickoff_stall_stoppage_ms: 10_000,
            field_goal_clock_ms: 15_000,
        }
    }
}

/// Down-and-distance and scrimmage rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownRules {
    /// Yards to gain for a first down
    pub yards_to_gain: i32,
    /// Yards to go on a conversion attempt
    pub conversion_distance: i32,
    /// Yards the ball sits behind the line of scrimmage
    pub yards_ball_behind: i32,
    /// Yards each team lines up away from the ball
    pub formation_offset_yards: i32,
    /// Max gap between the hiker and the ball
    pub hike_max_distance: f64,
    /// Grace after a down is set before a defender kicking the ball is a foul
    pub defender_touch_grace_ms: u64,
    /// Ball movement (surface gap) that counts as the quarterback carrying it
    pub ball_moved_threshold: f64,
    /// Gap between quarterback and ball that counts as a scramble
    pub quarterback_run_distance: f64,
    /// Gap between quarterback and teammate that counts as a handoff
    pub handoff_distance: f64,
    /// Gap between an attacker and a defender that can be holding
    pub holding_distance: f64,
    /// Gap at which a player touches the ball
    pub touch_distance: f64,
    /// Gap at which a defender blocks a pass in the air
    pub pass_block_distance: f64,
    /// Gap at which a blocking defender is considered to have deflected the ball
    pub pass_block_release_distance: f64,
    /// Delay before a pass block is confirmed
    pub pass_block_confirm_ms: u64,
    /// Delay before the next down after a blocked pass
    pub blocked_pass_restart_ms: u64,
    /// Length of the projected ball path for interception checks
    pub interception_path_length: f64,
    /// Goal-line scale when the interceptor kicks toward its own goal
    pub interception_own_goal_scale: f64,
    /// Goal-line scale otherwise
    pub interception_goal_scale: f64,
    /// Ball speed under which an interception attempt dies
    pub interception_min_speed: f64,
    /// Ball speed under which an interception attempt gets the highest damping
    pub interception_slow_speed: f64,
    /// Ball speed above which the highest damping is relaxed
    pub interception_damping_relax_speed: f64,
}

impl Default for DownRules {
    fn default() -> Self {
        Self {
            yards_to_gain: 20,
            conversion_distance: 10,
            yards_ball_behind: 2,
            formation_offset_yards: 10,
            hike_max_distance: 50.0,
            defender_touch_grace_ms: 500,
            ball_moved_threshold: 1.0,
            quarterback_run_distance: 100.0,
            handoff_distance: 0.1,
            holding_distance: 1.5,
            touch_distance: 0.5,
            pass_block_distance: 0.2,
            pass_block_release_distance: 5.0,
            pass_block_confirm_ms: 100,
            blocked_pass_restart_ms: 1_500,
            interception_path_length: 2000.0,
            interception_own_goal_scale: 1.3,
            interception_goal_scale: 1.1,
            interception_min_speed: 0.1,
            interception_slow_speed: 3.0,
            interception_damping_relax_speed: 6.0,
        }
    }
}

/// Penalty yardage (positive = toward the defense's goal)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyRules {
    pub defensive_offside_yards: i32,
    pub defensive_illegal_touch_yards: i32,
    pub crowding_yards: i32,
    pub holding_yards: i32,
    pub quarterback_crossed_line_yards: i32,
    pub offensive_illegal_touch_yards: i32,
    /// Defensive red-zone fouls in a series that award a touchdown
    pub max_red_zone_penalties: u32,
}

impl Default for PenaltyRules {
    fn default() -> Self {
        Self {
            defensive_offside_yards: 10,
            defensive_illegal_touch_yards: 10,
            crowding_yards: 10,
            holding_yards: -5,
            quarterback_crossed_line_yards: -5,
            offensive_illegal_touch_yards: -5,
            max_red_zone_penalties: 3,
        }
    }
}

/// Tackles and fumbles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TackleRules {
    /// Surface gap at which an opponent touches the carrier
    pub contact_radius: f64,
    /// Touches that bring down a running carrier
    pub touches_to_tackle_runner: u32,
    /// Touches that bring down a scrambling quarterback
    pub touches_to_tackle_quarterback: u32,
    /// Window after gaining the ball during which a gang tackle can force a fumble
    pub fumble_window_ms: u64,
    /// Tacklers needed to force a fumble
    pub fumble_min_tacklers: usize,
    /// Probability that an eligible gang tackle forces a fumble (0.0 - 1.0)
    pub fumble_chance: f64,
}

impl Default for TackleRules {
    fn default() -> Self {
        Self {
            contact_radius: 0.5,
            touches_to_tackle_runner: 2,
            touches_to_tackle_quarterback: 1,
            fumble_window_ms: 1_000,
            fumble_min_tacklers: 2,
            fumble_chance: 1.0,
        }
    }
}

/// Anti-stalling crowding rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrowdingRules {
    pub enabled: bool,
    /// Continuous presence that draws the foul
    pub threshold_ms: u64,
    /// No crowding is counted this soon after the hike
    pub grace_after_hike_ms: u64,
    /// Depth of the zone beyond the ball
    pub zone_depth_yards: f64,
    /// Depth of the zone behind the ball
    pub player_radius: f64,
    /// A crowding defender this close to an attacker is being blocked
    pub blocked_distance: f64,
    /// Time the zone outline stays visible before the penalty is enforced
    pub display_ms: u64,
}

impl Default for CrowdingRules {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_ms: 3_000,
            grace_after_hike_ms: 1_000,
            zone_depth_yards: 10.0,
            player_radius: 15.0,
            blocked_distance: 1.0,
            display_ms: 1_000,
        }
    }
}

/// Kicking plays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KickRules {
    /// Ball kick force on kickoffs
    pub kickoff_kick_force: f64,
    /// Distance kicking-team players ahead of the ball are pushed back
    pub coverage_pushback: f64,
    /// Speed given to pushed-back coverage players
    pub coverage_push_speed: f64,
    /// Receiving team's yard line after a kickoff goes out of bounds
    pub kickoff_out_of_bounds_yard_line: i32,
    /// Touchback spot
    pub touchback_yard_line: i32,
    /// Free-kick spot after a safety
    pub safety_kick_yard_line: i32,
    /// Distance of the punting team behind the ball
    pub punt_formation_depth: f64,
    /// Max gap between the requester and the ball for punts and field goals
    pub request_max_distance: f64,
    /// Longest field goal (from the spot to the goal line)
    pub field_goal_max_yards: i32,
    /// Kicker's lateral offset
    pub field_goal_kicker_y: f64,
    pub field_goal_offense_back_yards: i32,
    pub field_goal_defense_back_yards: i32,
    pub field_goal_offense_max_x: f64,
    pub field_goal_defense_max_x: f64,
    /// Ball carried farther than this before the kick fails the attempt
    pub field_goal_max_ball_move: f64,
    /// Ball moved but not kicked within this time fails the attempt
    pub field_goal_move_grace_ms: u64,
    /// Kicker farther than this from the ball fails the attempt
    pub field_goal_kicker_max_yards: f64,
    /// Kicked ball slower than this is a miss
    pub field_goal_stop_speed: f64,
    /// Goal-line scale for wrong-direction detection
    pub kick_direction_goal_scale: f64,
    /// Extra-point spot (defense's yard line)
    pub extra_point_yard_line: i32,
    /// Distance of the kicking team behind the ball on extra points
    pub extra_point_formation_depth: f64,
    /// |x| of the defending team on extra points
    pub extra_point_defense_x: f64,
    /// Kicked ball slower than this is a missed extra point
    pub extra_point_stop_speed: f64,
}

impl Default for KickRules {
    fn default() -> Self {
        Self {
            kickoff_kick_force: 1.2,
            coverage_pushback: 80.0,
            coverage_push_speed: 5.0,
            kickoff_out_of_bounds_yard_line: 40,
            touchback_yard_line: 25,
            safety_kick_yard_line: 20,
            punt_formation_depth: 100.0,
            request_max_distance: 50.0,
            field_goal_max_yards: 57,
            field_goal_kicker_y: 30.0,
            field_goal_offense_back_yards: 10,
            field_goal_defense_back_yards: 15,
            field_goal_offense_max_x: 1000.0,
            field_goal_defense_max_x: 900.0,
            field_goal_max_ball_move: 8.5,
            field_goal_move_grace_ms: 1_000,
            field_goal_kicker_max_yards: 10.0,
            field_goal_stop_speed: 0.02,
            kick_direction_goal_scale: 1.1,
            extra_point_yard_line: 10,
            extra_point_formation_depth: 100.0,
            extra_point_defense_x: 900.0,
            extra_point_stop_speed: 0.5,
        }
    }
}

/// Points and post-score delays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub touchdown: u32,
    pub field_goal: u32,
    pub safety: u32,
    pub extra_point: u32,
    pub conversion: u32,
    pub defensive_conversion: u32,
    /// Delay between a touchdown and the extra point
    pub touchdown_to_extra_point_ms: u64,
    /// Delay before the kickoff after a conversion touchdown
    pub conversion_to_kickoff_ms: u64,
    /// Delay before the kickoff after any other score or failed conversion
    pub score_to_kickoff_ms: u64,
    /// Delay before a turnover after a failed field goal
    pub missed_field_goal_turnover_ms: u64,
    /// Delay before a turnover after a quick field-goal failure
    pub failed_field_goal_turnover_ms: u64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            touchdown: 6,
            field_goal: 3,
            safety: 2,
            extra_point: 1,
            conversion: 2,
            defensive_conversion: 2,
            touchdown_to_extra_point_ms: 2_000,
            conversion_to_kickoff_ms: 2_000,
            score_to_kickoff_ms: 3_000,
            missed_field_goal_turnover_ms: 2_000,
            failed_field_goal_turnover_ms: 1_000,
        }
    }
}
