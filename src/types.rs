//! Common types and traits for 2D plan geometry.
//!
//! Everything in the planner is measured in centimetres on a plan whose origin
//! sits in the bottom-left corner of the room, X growing to the right and Y
//! growing towards the top wall.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Global numerical tolerance for floating-point comparisons.
pub const EPSILON_GENERAL: f64 = 1e-6;

/// Represents a 2D vector or point on the floor plan.
///
/// # Examples
/// ```
/// use room_planner::types::Vec2;
///
/// let hinge = Vec2::new(100.0, 0.0);
/// let tip = hinge + Vec2::new(90.0, 0.0);
/// assert_eq!(tip.x, 190.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Vec2 {
    #[serde(rename = "xCm")]
    pub x: f64,
    #[serde(rename = "yCm")]
    pub y: f64,
}

impl Vec2 {
    /// Creates a new 2D vector.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Creates a zero vector (origin).
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Dot product with another vector.
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Squared Euclidean length.
    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Rotates the vector by 90° clockwise.
    #[inline]
    pub const fn rotated_cw(&self) -> Self {
        Self::new(self.y, -self.x)
    }

    /// Rotates the vector by 90° counter-clockwise.
    #[inline]
    pub const fn rotated_ccw(&self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Checks if both components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self::Output {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

/// Rotation-adjusted plan footprint of an item (2D AABB).
///
/// `x`/`y` is the bottom-left corner, `w` the extent along X and `l` the
/// extent along Y. Height never takes part in the footprint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, ToSchema)]
pub struct Footprint {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub l: f64,
}

impl Footprint {
    #[inline]
    pub const fn new(x: f64, y: f64, w: f64, l: f64) -> Self {
        Self { x, y, w, l }
    }

    /// X coordinate of the right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Y coordinate of the top edge.
    #[inline]
    pub fn top(&self) -> f64 {
        self.y + self.l
    }

    /// Strict intersection; shared edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.top() <= other.y
            || other.top() <= self.y)
    }

    /// Checks if a point lies inside the footprint, edges included.
    #[inline]
    pub fn contains_point(&self, point: &Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.top()
    }

    /// Corners in the order bottom-left, bottom-right, top-left, top-right.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.right(), self.y),
            Vec2::new(self.x, self.top()),
            Vec2::new(self.right(), self.top()),
        ]
    }

    /// Closest point of the footprint to `point`.
    pub fn closest_point(&self, point: &Vec2) -> Vec2 {
        Vec2::new(
            crate::geometry::clamp_range(point.x, self.x, self.right()),
            crate::geometry::clamp_range(point.y, self.y, self.top()),
        )
    }
}

/// Common geometric interface shared by every item category.
pub trait Placeable {
    /// Rotation-adjusted plan footprint.
    fn footprint(&self) -> Footprint;

    /// Lower end of the vertical span (height above the floor).
    fn base_z(&self) -> f64;

    /// Upper end of the vertical span. Zero for items without vertical extent.
    fn top_z(&self) -> f64;

    /// Whether the item takes part in vertical stacking conflicts.
    fn is_vertical_obstacle(&self) -> bool;
}
