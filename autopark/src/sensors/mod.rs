//! Eight-ray proximity sensor array.
//!
//! Rays are fixed relative to the vehicle heading. Each tick produces a
//! fresh [`SensorScan`]: one distance per ray plus a trace for renderers.

mod array;

pub use array::SensorArray;

use crate::core::Point2D;
use serde::{Deserialize, Serialize};

/// Ray identity, ordered as stored in [`SensorReading`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RayLabel {
    FrontLeft,
    FrontCenter,
    FrontRight,
    RearLeft,
    RearCenter,
    RearRight,
    SideLeft,
    SideRight,
}

impl RayLabel {
    /// Every ray, in cast order
    pub const ALL: [RayLabel; 8] = [
        RayLabel::FrontLeft,
        RayLabel::FrontCenter,
        RayLabel::FrontRight,
        RayLabel::RearLeft,
        RayLabel::RearCenter,
        RayLabel::RearRight,
        RayLabel::SideLeft,
        RayLabel::SideRight,
    ];

    /// Offset from the heading in degrees. Positive rotates toward +Y.
    pub fn offset_deg(self) -> f32 {
        match self {
            RayLabel::FrontLeft => -30.0,
            RayLabel::FrontCenter => 0.0,
            RayLabel::FrontRight => 30.0,
            RayLabel::RearLeft => 150.0,
            RayLabel::RearCenter => 180.0,
            RayLabel::RearRight => 210.0,
            RayLabel::SideLeft => -90.0,
            RayLabel::SideRight => 90.0,
        }
    }

    /// Offset from the heading in radians
    #[inline]
    pub fn offset(self) -> f32 {
        self.offset_deg().to_radians()
    }

    /// Label name for logging and overlays
    pub fn name(self) -> &'static str {
        match self {
            RayLabel::FrontLeft => "front_left",
            RayLabel::FrontCenter => "front_center",
            RayLabel::FrontRight => "front_right",
            RayLabel::RearLeft => "rear_left",
            RayLabel::RearCenter => "rear_center",
            RayLabel::RearRight => "rear_right",
            RayLabel::SideLeft => "side_left",
            RayLabel::SideRight => "side_right",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Distance per ray, capped at the sensor range.
///
/// Every ray always has a value; a reading is never carried across ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorReading {
    distances: [f32; 8],
}

impl SensorReading {
    /// Reading with every ray at `max_range`
    pub fn clear(max_range: f32) -> Self {
        Self {
            distances: [max_range; 8],
        }
    }

    /// Distance reported by a ray
    #[inline]
    pub fn get(&self, label: RayLabel) -> f32 {
        self.distances[label.index()]
    }

    /// Overwrite one ray
    #[inline]
    pub fn set(&mut self, label: RayLabel, distance: f32) {
        self.distances[label.index()] = distance;
    }

    /// (label, distance) pairs in cast order
    pub fn iter(&self) -> impl Iterator<Item = (RayLabel, f32)> + '_ {
        RayLabel::ALL.iter().map(|&label| (label, self.get(label)))
    }
}

/// What stopped a ray
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    /// Obstacle at this registry index
    Obstacle(usize),
    /// Painted marking under the sample
    Marking,
    /// Sample left the world; distance reported as max range
    OutOfBounds,
    /// Nothing within range
    None,
}

/// Distance band used for coloring rays
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Proximity {
    Danger,
    Caution,
    Clear,
}

/// Debug record of a single ray
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayTrace {
    pub label: RayLabel,
    /// World angle of the ray (radians)
    pub angle: f32,
    /// Reported distance
    pub distance: f32,
    /// Where the ray was drawn to
    pub end: Point2D,
    pub hit: HitKind,
    pub proximity: Proximity,
}

/// Output of one cast: readings plus per-ray traces
#[derive(Clone, Debug, PartialEq)]
pub struct SensorScan {
    pub reading: SensorReading,
    pub traces: Vec<RayTrace>,
}

impl SensorScan {
    /// Shorthand for `self.reading.get(label)`
    #[inline]
    pub fn distance(&self, label: RayLabel) -> f32 {
        self.reading.get(label)
    }
}
