//! World-space point type.
//!
//! World coordinates are screen pixels: X to the right, Y downward.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// World coordinates (pixels, f32)
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate in pixels
    pub x: f32,
    /// Y coordinate in pixels (grows downward)
    pub y: f32,
}

impl Point2D {
    /// Create a new point
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Origin
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point at a given angle and distance from this point
    #[inline]
    pub fn point_at(&self, angle: f32, distance: f32) -> Point2D {
        let (sin, cos) = angle.sin_cos();
        Point2D::new(self.x + distance * cos, self.y + distance * sin)
    }

    /// 2D cross product of `(b - self)` and `(c - self)`
    #[inline]
    pub fn cross(&self, b: &Point2D, c: &Point2D) -> f32 {
        let ab = *b - *self;
        let ac = *c - *self;
        ab.x * ac.y - ab.y * ac.x
    }
}

impl Add for Point2D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Point2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Point2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Point2D {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Point2D::new(self.x * scalar, self.y * scalar)
    }
}
