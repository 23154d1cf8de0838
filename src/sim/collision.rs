//! Collision geometry
//!
//! Circle overlap for slow bodies and a swept segment test for shots, which
//! move far enough in one frame to skip over a small asteroid entirely.

use glam::Vec2;

pub use super::body::circles_overlap;

/// Closest point to `center` on the segment `p0 → p1`
#[inline]
pub fn closest_point_on_segment(p0: Vec2, p1: Vec2, center: Vec2) -> Vec2 {
    let v = p1 - p0;
    let len_sq = v.length_squared();
    if len_sq == 0.0 {
        // Stationary shot: the segment is a point
        return p0;
    }
    let t = ((center - p0).dot(v) / len_sq).clamp(0.0, 1.0);
    p0 + v * t
}

/// Whether the segment `p0 → p1` passes within `radius_sum` of `center`
#[inline]
pub fn segment_hits_circle(p0: Vec2, p1: Vec2, center: Vec2, radius_sum: f32) -> bool {
    let closest = closest_point_on_segment(p0, p1, center);
    closest.distance_squared(center) <= radius_sum * radius_sum
}
