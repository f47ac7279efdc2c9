//! Yellow marking detection over the background.

use super::ColorSampler;
use crate::config::MarkingConfig;
use crate::core::{Point2D, Pose2D};
use image::Rgb;

/// Result of a disk-shaped area sample
#[derive(Clone, Debug, Default)]
pub struct AreaSample {
    /// Number of marking pixels found
    pub count: usize,
    /// Marking pixel coordinates, for overlay drawing
    pub points: Vec<(i32, i32)>,
}

impl AreaSample {
    /// True if at least `min_pixels` marking pixels were found
    #[inline]
    pub fn detected(&self, min_pixels: usize) -> bool {
        self.count >= min_pixels
    }
}

/// Classifies background pixels as parking markings
#[derive(Clone, Debug, Default)]
pub struct MarkingDetector {
    config: MarkingConfig,
}

impl MarkingDetector {
    /// Create a detector with the given color thresholds
    pub fn new(config: MarkingConfig) -> Self {
        Self { config }
    }

    /// High red, high green, low blue
    #[inline]
    pub fn is_marking(&self, color: Rgb<u8>) -> bool {
        let [r, g, b] = color.0;
        r > self.config.min_red && g > self.config.min_green && b < self.config.max_blue
    }

    /// Marking test at a world point; out of bounds is never a marking
    #[inline]
    pub fn is_marking_at<S: ColorSampler + ?Sized>(&self, sampler: &S, point: Point2D) -> bool {
        sampler
            .color_at_point(point)
            .is_some_and(|color| self.is_marking(color))
    }

    /// Count marking pixels inside a disk around `center`.
    ///
    /// Offsets cover `[-radius, radius)` on both axes, keeping those with
    /// `dx² + dy² <= radius²`. Offsets landing outside the image are never
    /// markings, so the loops only visit the part of the disk inside it.
    pub fn area_sample<S: ColorSampler + ?Sized>(
        &self,
        sampler: &S,
        center: Point2D,
        radius: i32,
    ) -> AreaSample {
        let mut sample = AreaSample::default();
        let radius = i64::from(radius);
        let radius_sq = radius * radius;
        let cx = center.x.floor() as i64;
        let cy = center.y.floor() as i64;
        let width = i64::from(sampler.width());
        let height = i64::from(sampler.height());

        for dx in (-radius).max(-cx)..radius.min(width - cx) {
            for dy in (-radius).max(-cy)..radius.min(height - cy) {
                if dx * dx + dy * dy > radius_sq {
                    continue;
                }
                // Inside the image, so both fit in i32
                let (sx, sy) = ((cx + dx) as i32, (cy + dy) as i32);
                if sampler
                    .color_at(sx, sy)
                    .is_some_and(|color| self.is_marking(color))
                {
                    sample.count += 1;
                    sample.points.push((sx, sy));
                }
            }
        }

        sample
    }

    /// Count marking pixels on a strip across the path ahead.
    ///
    /// The strip is centered `lookahead` pixels in front of the pose and
    /// spans `half_width` pixels to each side, perpendicular to the heading,
    /// sampled every pixel.
    pub fn strip_sample<S: ColorSampler + ?Sized>(
        &self,
        sampler: &S,
        pose: Pose2D,
        lookahead: f32,
        half_width: i32,
    ) -> usize {
        let center = pose.position() + pose.forward() * lookahead;
        let across = pose.right();

        (-half_width..=half_width)
            .filter(|&offset| self.is_marking_at(sampler, center + across * offset as f32))
            .count()
    }
}
