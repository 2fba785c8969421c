//! Plane geometry helpers used by the rules

use rand::Rng;

use super::Vec2;

/// Maximum |y| jitter applied to a formation point that would sit exactly
/// on the field's center line.
const CENTER_LINE_JITTER: f64 = 5.0;

/// Gap between the surfaces of two discs, never negative.
pub fn surface_gap(a: Vec2, radius_a: f64, b: Vec2, radius_b: f64) -> f64 {
    (a.distance(b) - radius_a - radius_b).max(0.0)
}

/// Intersection point of segments `a1-a2` and `b1-b2`.
///
/// Degenerate (zero-length) and parallel segments never intersect.
pub fn segment_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    if a1 == a2 || b1 == b2 {
        return None;
    }

    let denominator = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denominator == 0.0 {
        return None;
    }

    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denominator;
    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denominator;

    if !(0.0..=1.0).contains(&ua) || !(0.0..=1.0).contains(&ub) {
        return None;
    }

    Some(Vec2::new(a1.x + ua * (a2.x - a1.x), a1.y + ua * (a2.y - a1.y)))
}

/// Whether a point lies inside (or on) a circle.
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f64) -> bool {
    radius > 0.0 && point.distance(center) <= radius
}

/// Whether segment `a-b` touches the circle at `center` with `radius`.
pub fn segment_touches_circle(a: Vec2, b: Vec2, center: Vec2, radius: f64) -> bool {
    if point_in_circle(a, center, radius) || point_in_circle(b, center, radius) {
        return true;
    }

    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq == 0.0 {
        return false;
    }

    // Closest point on the segment to the center
    let t = (((center.x - a.x) * ab.x + (center.y - a.y) * ab.y) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;

    point_in_circle(closest, center, radius)
}

/// Projected path of a ball that moved from `from` to `to`.
///
/// Returns the segment starting at `to` and extending `length` units further
/// along the direction of travel, or `None` when the ball did not move.
pub fn ball_path_from(from: Vec2, to: Vec2, length: f64) -> Option<(Vec2, Vec2)> {
    let direction = (to - from).normalized()?;
    Some((to, to + direction * length))
}

/// `count` evenly spaced points strictly between `start` and `end`.
///
/// A point that lands exactly on `y == 0` is nudged by a small random offset
/// so that two players are never stacked on the center line.
pub fn formation_points<R: Rng + ?Sized>(
    start: Vec2,
    end: Vec2,
    count: usize,
    rng: &mut R,
) -> Vec<Vec2> {
    let segments = (count + 1) as f64;
    let step = (end - start) * (1.0 / segments);

    (1..=count)
        .map(|i| {
            let mut point = start + step * i as f64;
            if point.y == 0.0 {
                point.y = rng.gen_range(-CENTER_LINE_JITTER..CENTER_LINE_JITTER);
            }
            point
        })
        .collect()
}
