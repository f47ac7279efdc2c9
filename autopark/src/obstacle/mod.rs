//! Obstacle shapes and hit tests.
//!
//! The obstacle set is closed: circles, rectangular vehicle footprints and
//! painted line segments. Every query is an exhaustive match.

mod registry;

pub use registry::ObstacleRegistry;

use crate::config::positive;
use crate::core::Point2D;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default circle obstacle radius (pixels)
pub const DEFAULT_CIRCLE_RADIUS: f32 = 15.0;

/// Drawn thickness of line obstacles (pixels). Render hint only.
pub const LINE_THICKNESS: f32 = 7.0;

/// What a rectangular footprint represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FootprintKind {
    /// Parked car, 60x30 by default
    Car,
    /// Shopping cart, 40x20 by default
    Cart,
}

impl FootprintKind {
    /// Default (width, height) for this kind
    pub fn default_size(self) -> (f32, f32) {
        match self {
            FootprintKind::Car => (60.0, 30.0),
            FootprintKind::Cart => (40.0, 20.0),
        }
    }
}

fn default_footprint_width() -> f32 {
    FootprintKind::Car.default_size().0
}
fn default_footprint_height() -> f32 {
    FootprintKind::Car.default_size().1
}

/// A static obstacle in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Obstacle {
    /// Round obstacle
    Circle {
        /// Center point
        center: Point2D,
        /// Radius (pixels)
        #[serde(default = "default_circle_radius")]
        radius: f32,
    },

    /// Rectangular footprint of a vehicle or cart.
    ///
    /// `angle_deg` only affects rendering; hit tests use the axis-aligned
    /// rectangle.
    FootprintRect {
        /// Car or cart
        kind: FootprintKind,
        /// Center point
        center: Point2D,
        /// Render rotation (degrees, [0, 360))
        #[serde(default)]
        angle_deg: f32,
        /// Width along X (pixels)
        #[serde(default = "default_footprint_width")]
        width: f32,
        /// Height along Y (pixels)
        #[serde(default = "default_footprint_height")]
        height: f32,
    },

    /// Painted boundary line
    LineSegment {
        /// First endpoint
        start: Point2D,
        /// Second endpoint
        end: Point2D,
    },
}

fn default_circle_radius() -> f32 {
    DEFAULT_CIRCLE_RADIUS
}

impl Obstacle {
    /// Circle obstacle
    pub fn circle(center: Point2D, radius: f32) -> Self {
        Self::Circle { center, radius }
    }

    /// Car footprint with the default size
    pub fn car(center: Point2D) -> Self {
        Self::footprint(FootprintKind::Car, center)
    }

    /// Cart footprint with the default size
    pub fn cart(center: Point2D) -> Self {
        Self::footprint(FootprintKind::Cart, center)
    }

    /// Footprint of the given kind with its default size
    pub fn footprint(kind: FootprintKind, center: Point2D) -> Self {
        let (width, height) = kind.default_size();
        Self::FootprintRect {
            kind,
            center,
            angle_deg: 0.0,
            width,
            height,
        }
    }

    /// Line segment obstacle
    pub fn line(start: Point2D, end: Point2D) -> Self {
        Self::LineSegment { start, end }
    }

    /// Does a ray sample at `point`, cast from `origin`, hit this obstacle?
    ///
    /// Circles and footprints only look at the sample point. Lines test the
    /// whole segment from the ray origin to the sample, so a thin line can't
    /// slip between two samples.
    pub fn hits(&self, origin: Point2D, point: Point2D) -> bool {
        match self {
            Obstacle::Circle { center, radius } => point.distance(center) <= *radius,
            Obstacle::FootprintRect {
                center,
                width,
                height,
                ..
            } => in_rect(*center, *width, *height, point),
            Obstacle::LineSegment { start, end } => {
                segments_intersect(origin, point, *start, *end)
            }
        }
    }

    /// Pick test for editors. Lines are not pickable.
    pub fn contains(&self, point: Point2D) -> bool {
        match self {
            Obstacle::Circle { center, radius } => point.distance(center) <= *radius,
            Obstacle::FootprintRect {
                center,
                width,
                height,
                ..
            } => in_rect(*center, *width, *height, point),
            Obstacle::LineSegment { .. } => false,
        }
    }

    /// Center used for placement, or the midpoint for lines
    pub fn anchor(&self) -> Point2D {
        match self {
            Obstacle::Circle { center, .. } | Obstacle::FootprintRect { center, .. } => *center,
            Obstacle::LineSegment { start, end } => (*start + *end) * 0.5,
        }
    }

    /// Relocate the obstacle. Lines stay where they were drawn.
    pub fn move_to(&mut self, target: Point2D) {
        match self {
            Obstacle::Circle { center, .. } | Obstacle::FootprintRect { center, .. } => {
                *center = target;
            }
            Obstacle::LineSegment { .. } => {}
        }
    }

    /// Rotate a footprint by `amount_deg`, wrapping into [0, 360).
    /// Circles and lines ignore rotation.
    pub fn rotate(&mut self, amount_deg: f32) {
        if let Obstacle::FootprintRect { angle_deg, .. } = self {
            *angle_deg = (*angle_deg + amount_deg).rem_euclid(360.0);
        }
    }

    /// Reject non-positive or non-finite sizes
    pub fn validate(&self) -> Result<()> {
        match self {
            Obstacle::Circle { radius, .. } => positive("obstacle.radius", *radius),
            Obstacle::FootprintRect { width, height, .. } => {
                positive("obstacle.width", *width)?;
                positive("obstacle.height", *height)
            }
            Obstacle::LineSegment { start, end } => {
                if [start.x, start.y, end.x, end.y].iter().all(|v| v.is_finite()) {
                    Ok(())
                } else {
                    Err(Error::invalid("obstacle.line", "endpoints must be finite"))
                }
            }
        }
    }
}

fn in_rect(center: Point2D, width: f32, height: f32, point: Point2D) -> bool {
    let left = center.x - width / 2.0;
    let top = center.y - height / 2.0;
    point.x >= left && point.x < left + width && point.y >= top && point.y < top + height
}

/// Strict counter-clockwise orientation of (a, b, c)
#[inline]
fn ccw(a: Point2D, b: Point2D, c: Point2D) -> bool {
    a.cross(&b, &c) > 0.0
}

/// Do segments p1-p2 and q1-q2 properly cross?
///
/// Collinear or touching configurations report no intersection, and a
/// zero-length segment never matches.
pub fn segments_intersect(p1: Point2D, p2: Point2D, q1: Point2D, q2: Point2D) -> bool {
    if p1 == p2 || q1 == q2 {
        return false;
    }
    ccw(p1, q1, q2) != ccw(p2, q1, q2) && ccw(p1, p2, q1) != ccw(p1, p2, q2)
}
