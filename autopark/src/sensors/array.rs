//! Stepped ray casting against obstacles and markings.

use super::{HitKind, Proximity, RayLabel, RayTrace, SensorReading, SensorScan};
use crate::config::SensorConfig;
use crate::core::{Point2D, Pose2D};
use crate::obstacle::Obstacle;
use crate::world::{ColorSampler, MarkingDetector, WorldBounds};
use log::debug;

/// Casts the eight labelled rays from the vehicle pose
#[derive(Clone, Debug)]
pub struct SensorArray {
    config: SensorConfig,
    detector: MarkingDetector,
    /// Cached `marking_rays` membership, indexed like [`RayLabel::ALL`]
    marking_mask: [bool; 8],
}

impl SensorArray {
    /// Create a sensor array
    pub fn new(config: &SensorConfig, detector: MarkingDetector) -> Self {
        let mut marking_mask = [false; 8];
        for (i, label) in RayLabel::ALL.iter().enumerate() {
            marking_mask[i] = config.marking_rays.contains(label);
        }
        Self {
            config: config.clone(),
            detector,
            marking_mask,
        }
    }

    /// Maximum reported distance
    pub fn max_range(&self) -> f32 {
        self.config.max_range
    }

    /// Cast every ray.
    ///
    /// Obstacles are tested in slice order and the first hit wins.
    pub fn cast<S: ColorSampler + ?Sized>(
        &self,
        pose: Pose2D,
        obstacles: &[Obstacle],
        sampler: &S,
        bounds: WorldBounds,
    ) -> SensorScan {
        let mut reading = SensorReading::clear(self.config.max_range);
        let mut traces = Vec::with_capacity(RayLabel::ALL.len());

        for (i, &label) in RayLabel::ALL.iter().enumerate() {
            let angle = pose.heading + label.offset();
            let (distance, hit) =
                self.cast_ray(pose, label, angle, self.marking_mask[i], obstacles, sampler, bounds);
            reading.set(label, distance);
            traces.push(RayTrace {
                label,
                angle,
                distance,
                end: pose.position().point_at(angle, distance),
                hit,
                proximity: self.proximity(distance),
            });
        }

        SensorScan { reading, traces }
    }

    #[allow(clippy::too_many_arguments)]
    fn cast_ray<S: ColorSampler + ?Sized>(
        &self,
        pose: Pose2D,
        label: RayLabel,
        angle: f32,
        sees_markings: bool,
        obstacles: &[Obstacle],
        sampler: &S,
        bounds: WorldBounds,
    ) -> (f32, HitKind) {
        let origin = pose.position();
        let max_range = self.config.max_range;

        let mut step = 0u32;
        loop {
            let distance = step as f32 * self.config.step;
            if distance >= max_range {
                return (max_range, HitKind::None);
            }

            let sample = origin.point_at(angle, distance);
            if !bounds.contains(sample) {
                debug!(
                    "[Sensors] {} left world at ({:.1}, {:.1}), reporting max range",
                    label.name(),
                    sample.x,
                    sample.y
                );
                return (max_range, HitKind::OutOfBounds);
            }

            if let Some(index) = first_hit(obstacles, origin, sample) {
                return (distance, HitKind::Obstacle(index));
            }
            if sees_markings && self.detector.is_marking_at(sampler, sample) {
                return (distance, HitKind::Marking);
            }

            step += 1;
        }
    }

    fn proximity(&self, distance: f32) -> Proximity {
        if distance < self.config.danger_band {
            Proximity::Danger
        } else if distance < self.config.caution_band {
            Proximity::Caution
        } else {
            Proximity::Clear
        }
    }
}

fn first_hit(obstacles: &[Obstacle], origin: Point2D, sample: Point2D) -> Option<usize> {
    obstacles
        .iter()
        .position(|obstacle| obstacle.hits(origin, sample))
}
