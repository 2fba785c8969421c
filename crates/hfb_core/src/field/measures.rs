//! Stadium measures in physics units

// ============================================================
// Lengths
// ============================================================

/// One yard in physics units
pub const YARD: f64 = 15.5;

/// Yards between the 0 mark and the goal line, added to field-goal distances
pub const GOAL_DEPTH_YARDS: i32 = 10;

// ============================================================
// Field lines
// ============================================================

/// |x| of both end-zone lines (the 0-yard marks)
pub const END_ZONE_LINE_X: f64 = 775.0;

/// |x| of the back of the end zones, which is also the goal line segment
pub const FIELD_MAX_X: f64 = 930.0;

/// |y| of both sidelines
pub const FIELD_MAX_Y: f64 = 266.0;

/// |x| where a red zone begins (20 yards out of the end zone)
pub const RED_ZONE_X: f64 = 462.0;

/// |y| of the goal posts on the goal line
pub const GOAL_POST_Y: f64 = 60.0;

/// |y| of the hash marks
pub const HASH_Y: f64 = 80.0;

/// |x| of the receiving line for punts and safety kicks
pub const RETURN_LINE_X: f64 = 980.0;

// ============================================================
// Ball physics presets applied by the referee
// ============================================================

pub mod ball {
    /// Regular ball damping
    pub const DAMPING_DEFAULT: f64 = 0.99;

    /// Damping while an interception attempt is travelling
    pub const DAMPING_HIGH: f64 = 0.985;

    /// Damping for slow interception attempts
    pub const DAMPING_HIGHEST: f64 = 0.98;

    /// Inverse mass of a free ball
    pub const INV_MASS_FREE: f64 = 1.0;

    /// Inverse mass of a locked ball
    pub const INV_MASS_LOCKED: f64 = 0.000001;
}

pub mod player {
    /// Regular player inverse mass
    pub const INV_MASS_DEFAULT: f64 = 0.5;

    /// Player inverse mass while the ball must not be pushed around
    pub const INV_MASS_FEATHER: f64 = 1e26;

    /// Disc radius used when a host reports none
    pub const RADIUS: f64 = 15.0;
}
