//! Environment queries: world bounds and background color sampling.
//!
//! The background image is owned by a rendering/asset collaborator; the core
//! only needs to ask for the color under a pixel. Painted yellow markings on
//! that background delimit parking spots.

mod image_sampler;
mod marking;

pub use image_sampler::{BlankSampler, ImageSampler};
pub use marking::{AreaSample, MarkingDetector};

use crate::core::Point2D;
use image::Rgb;

/// Read-only color lookup over the world background.
///
/// Implementations must return `None` for pixels outside the image instead
/// of failing; callers treat those as "not a marking".
pub trait ColorSampler {
    /// Image width in pixels
    fn width(&self) -> u32;

    /// Image height in pixels
    fn height(&self) -> u32;

    /// Color of pixel (x, y), or `None` when out of bounds
    fn color_at(&self, x: i32, y: i32) -> Option<Rgb<u8>>;

    /// Color under a world point
    fn color_at_point(&self, point: Point2D) -> Option<Rgb<u8>> {
        self.color_at(point.x.floor() as i32, point.y.floor() as i32)
    }
}

/// Rectangular world extent [0, width] x [0, height]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl WorldBounds {
    /// Create bounds
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Is the point a valid sensing location? The far edges are exclusive.
    #[inline]
    pub fn contains(&self, point: Point2D) -> bool {
        point.x >= 0.0 && point.x < self.width && point.y >= 0.0 && point.y < self.height
    }

    /// Clamp a point into [0, width] x [0, height]
    #[inline]
    pub fn clamp(&self, point: Point2D) -> Point2D {
        Point2D::new(
            point.x.clamp(0.0, self.width),
            point.y.clamp(0.0, self.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains_is_half_open() {
        let bounds = WorldBounds::new(800.0, 600.0);
        assert!(bounds.contains(Point2D::new(0.0, 0.0)));
        assert!(bounds.contains(Point2D::new(799.9, 599.9)));
        assert!(!bounds.contains(Point2D::new(800.0, 10.0)));
        assert!(!bounds.contains(Point2D::new(10.0, -0.1)));
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = WorldBounds::new(800.0, 600.0);
        assert_eq!(
            bounds.clamp(Point2D::new(-5.0, 700.0)),
            Point2D::new(0.0, 600.0)
        );
        assert_eq!(
            bounds.clamp(Point2D::new(800.0, 600.0)),
            Point2D::new(800.0, 600.0)
        );
    }
}
