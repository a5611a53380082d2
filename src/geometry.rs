//! Geometric helper functions for plan-view collision detection.
//!
//! This module provides the primitive tests the collision engine is composed
//! of: footprint overlap, vertical interval overlap and a few clamping helpers.

use crate::types::{Footprint, Placeable, Vec2};

/// Checks whether two footprints intersect.
///
/// Uses the separating axis test for AABBs. Two footprints do NOT overlap
/// when they are separated on at least one axis; touching edges count as
/// separated.
///
/// # Example
/// ```
/// use room_planner::geometry::aabb_overlap;
/// use room_planner::types::Footprint;
///
/// let a = Footprint::new(0.0, 0.0, 10.0, 10.0);
/// let b = Footprint::new(10.0, 0.0, 10.0, 10.0);
/// assert!(!aabb_overlap(&a, &b));
/// ```
pub fn aabb_overlap(a: &Footprint, b: &Footprint) -> bool {
    a.overlaps(b)
}

/// Checks whether the half-open height intervals `[base, top)` of two items
/// intersect.
///
/// Items that are no vertical obstacle (carpets) never overlap vertically.
pub fn vertical_overlap(a: &impl Placeable, b: &impl Placeable) -> bool {
    if !a.is_vertical_obstacle() || !b.is_vertical_obstacle() {
        return false;
    }
    let (a0, a1) = (a.base_z(), a.top_z());
    let (b0, b1) = (b.base_z(), b.top_z());
    !(a1 <= b0 || b1 <= a0)
}

/// Strict overlap of two open ranges `(a1, a2)` and `(b1, b2)`.
pub fn ranges_overlap(a1: f64, a2: f64, b1: f64, b2: f64) -> bool {
    !(a2 <= b1 || b2 <= a1)
}

/// Clamps `value` into `[lo, hi]`.
///
/// Unlike `f64::clamp` this never panics: when the range is inverted
/// (`lo > hi`, e.g. an item wider than the room) the lower bound wins.
#[inline]
pub fn clamp_range(value: f64, lo: f64, hi: f64) -> f64 {
    value.min(hi).max(lo)
}

/// Returns `value` if it is finite, otherwise `fallback`.
#[inline]
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Checks whether a circle touches or intersects a footprint.
pub fn circle_intersects_rect(center: &Vec2, radius: f64, rect: &Footprint) -> bool {
    let nearest = rect.closest_point(center);
    (*center - nearest).length_squared() <= radius * radius
}
