//! Vehicle pose.

use super::point::Point2D;
use serde::{Deserialize, Serialize};

/// Position and heading of the vehicle.
///
/// The heading is never normalized; it accumulates across ticks exactly as
/// the bicycle model integrates it. Positive heading change rotates toward
/// +Y, which is clockwise on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in pixels
    pub x: f32,
    /// Y position in pixels
    pub y: f32,
    /// Heading angle in radians
    pub heading: f32,
}

impl Pose2D {
    /// Create a new pose
    #[inline]
    pub const fn new(x: f32, y: f32, heading: f32) -> Self {
        Self { x, y, heading }
    }

    /// Position as a point
    #[inline]
    pub fn position(self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Unit vector along the heading
    #[inline]
    pub fn forward(self) -> Point2D {
        let (sin, cos) = self.heading.sin_cos();
        Point2D::new(cos, sin)
    }

    /// Unit vector pointing out of the vehicle's right side
    #[inline]
    pub fn right(self) -> Point2D {
        let (sin, cos) = self.heading.sin_cos();
        Point2D::new(-sin, cos)
    }
}
