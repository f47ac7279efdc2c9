//! Autonomous controller configuration.

use serde::{Deserialize, Serialize};

use crate::config::{VehicleConfig, non_negative, positive, unit_interval};
use crate::error::{Error, Result};

/// Autonomous controller configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Spot search while cruising
    #[serde(default)]
    pub scanning: ScanningConfig,

    /// Reverse-in maneuver and recovery
    #[serde(default)]
    pub parking: ParkingConfig,
}

/// Thresholds used while searching for a spot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanningConfig {
    /// Forward speed while searching (pixels/tick).
    #[serde(default = "default_cruise_speed")]
    pub cruise_speed: f32,

    /// Forward speed once markings are seen ahead (pixels/tick).
    #[serde(default = "default_approach_speed")]
    pub approach_speed: f32,

    /// Area sample radius around the vehicle (pixels).
    #[serde(default = "default_spot_radius")]
    pub spot_radius: i32,

    /// Marking pixels in the area sample that mean "spot found".
    #[serde(default = "default_spot_min_pixels")]
    pub spot_min_pixels: usize,

    /// Distance ahead of the vehicle of the marking strip (pixels).
    #[serde(default = "default_strip_lookahead")]
    pub strip_lookahead: f32,

    /// Half-width of the marking strip (pixels).
    #[serde(default = "default_strip_half_width")]
    pub strip_half_width: i32,

    /// Marking pixels on the strip that trigger the approach speed.
    #[serde(default = "default_strip_min_pixels")]
    pub strip_min_pixels: usize,

    /// Front-center distance that stops the vehicle and turns it (pixels).
    #[serde(default = "default_front_near")]
    pub front_near: f32,

    /// Turn angle when blocked ahead (degrees).
    #[serde(default = "default_front_turn_deg")]
    pub front_turn_deg: f32,

    /// Both sides closer than this stops the vehicle (pixels).
    #[serde(default = "default_squeeze")]
    pub squeeze: f32,

    /// Turn angle when squeezed from both sides (degrees).
    #[serde(default = "default_squeeze_turn_deg")]
    pub squeeze_turn_deg: f32,

    /// One side closer than this steers away from it (pixels).
    #[serde(default = "default_side_near")]
    pub side_near: f32,

    /// Turn angle away from a single close side (degrees).
    #[serde(default = "default_side_turn_deg")]
    pub side_turn_deg: f32,

    /// Per-tick steering multiplier when nothing is close.
    #[serde(default = "default_steering_decay")]
    pub steering_decay: f32,
}

fn default_cruise_speed() -> f32 {
    2.0
}

fn default_approach_speed() -> f32 {
    1.0
}

fn default_spot_radius() -> i32 {
    80
}

fn default_spot_min_pixels() -> usize {
    20
}

fn default_strip_lookahead() -> f32 {
    40.0
}

fn default_strip_half_width() -> i32 {
    30
}

fn default_strip_min_pixels() -> usize {
    5
}

fn default_front_near() -> f32 {
    80.0
}

fn default_front_turn_deg() -> f32 {
    25.0
}

fn default_squeeze() -> f32 {
    40.0
}

fn default_squeeze_turn_deg() -> f32 {
    30.0
}

fn default_side_near() -> f32 {
    50.0
}

fn default_side_turn_deg() -> f32 {
    20.0
}

fn default_steering_decay() -> f32 {
    0.9
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            cruise_speed: default_cruise_speed(),
            approach_speed: default_approach_speed(),
            spot_radius: default_spot_radius(),
            spot_min_pixels: default_spot_min_pixels(),
            strip_lookahead: default_strip_lookahead(),
            strip_half_width: default_strip_half_width(),
            strip_min_pixels: default_strip_min_pixels(),
            front_near: default_front_near(),
            front_turn_deg: default_front_turn_deg(),
            squeeze: default_squeeze(),
            squeeze_turn_deg: default_squeeze_turn_deg(),
            side_near: default_side_near(),
            side_turn_deg: default_side_turn_deg(),
            steering_decay: default_steering_decay(),
        }
    }
}

/// Thresholds for the reverse-in maneuver
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParkingConfig {
    /// Reversing speed magnitude (pixels/tick).
    #[serde(default = "default_reverse_speed")]
    pub reverse_speed: f32,

    /// Forward speed while recovering (pixels/tick).
    #[serde(default = "default_recovery_speed")]
    pub recovery_speed: f32,

    /// Steering while reversing and recovering (degrees).
    #[serde(default = "default_parking_angle_deg")]
    pub parking_angle_deg: f32,

    /// Steering when both sides read the same (degrees).
    #[serde(default = "default_centering_angle_deg")]
    pub centering_angle_deg: f32,

    /// Area sample radius for the in-spot test (pixels).
    #[serde(default = "default_in_spot_radius")]
    pub in_spot_radius: i32,

    /// Marking pixels that count as "inside the spot".
    #[serde(default = "default_in_spot_min_pixels")]
    pub in_spot_min_pixels: usize,

    /// Rear distance below which the vehicle is deep enough (pixels).
    #[serde(default = "default_rear_clearance")]
    pub rear_clearance: f32,

    /// Both sides must read above this to hold (pixels).
    #[serde(default = "default_side_clearance")]
    pub side_clearance: f32,

    /// A side closer than this triggers recovery (pixels).
    #[serde(default = "default_line_danger")]
    pub line_danger: f32,

    /// Consecutive hold ticks needed to finish.
    #[serde(default = "default_hold_ticks")]
    pub hold_ticks: u32,

    /// Length of a recovery maneuver (ticks).
    #[serde(default = "default_recovery_frames")]
    pub recovery_frames: u32,
}

fn default_reverse_speed() -> f32 {
    1.5
}

fn default_recovery_speed() -> f32 {
    2.0
}

fn default_parking_angle_deg() -> f32 {
    28.0
}

fn default_centering_angle_deg() -> f32 {
    5.0
}

fn default_in_spot_radius() -> i32 {
    70
}

fn default_in_spot_min_pixels() -> usize {
    20
}

fn default_rear_clearance() -> f32 {
    30.0
}

fn default_side_clearance() -> f32 {
    40.0
}

fn default_line_danger() -> f32 {
    25.0
}

fn default_hold_ticks() -> u32 {
    40
}

fn default_recovery_frames() -> u32 {
    25
}

impl Default for ParkingConfig {
    fn default() -> Self {
        Self {
            reverse_speed: default_reverse_speed(),
            recovery_speed: default_recovery_speed(),
            parking_angle_deg: default_parking_angle_deg(),
            centering_angle_deg: default_centering_angle_deg(),
            in_spot_radius: default_in_spot_radius(),
            in_spot_min_pixels: default_in_spot_min_pixels(),
            rear_clearance: default_rear_clearance(),
            side_clearance: default_side_clearance(),
            line_danger: default_line_danger(),
            hold_ticks: default_hold_ticks(),
            recovery_frames: default_recovery_frames(),
        }
    }
}

impl ControllerConfig {
    /// Check thresholds, and that every commanded speed and angle fits the
    /// vehicle limits.
    pub fn validate(&self, vehicle: &VehicleConfig) -> Result<()> {
        let scan = &self.scanning;
        non_negative("controller.scanning.cruise_speed", scan.cruise_speed)?;
        non_negative("controller.scanning.approach_speed", scan.approach_speed)?;
        radius("controller.scanning.spot_radius", scan.spot_radius)?;
        non_negative("controller.scanning.strip_lookahead", scan.strip_lookahead)?;
        if scan.strip_half_width < 0 {
            return Err(Error::invalid(
                "controller.scanning.strip_half_width",
                format!("must be non-negative, got {}", scan.strip_half_width),
            ));
        }
        non_negative("controller.scanning.front_near", scan.front_near)?;
        non_negative("controller.scanning.squeeze", scan.squeeze)?;
        non_negative("controller.scanning.side_near", scan.side_near)?;
        unit_interval("controller.scanning.steering_decay", scan.steering_decay)?;

        let park = &self.parking;
        non_negative("controller.parking.reverse_speed", park.reverse_speed)?;
        non_negative("controller.parking.recovery_speed", park.recovery_speed)?;
        radius("controller.parking.in_spot_radius", park.in_spot_radius)?;
        non_negative("controller.parking.rear_clearance", park.rear_clearance)?;
        non_negative("controller.parking.side_clearance", park.side_clearance)?;
        non_negative("controller.parking.line_danger", park.line_danger)?;
        if park.hold_ticks == 0 {
            return Err(Error::invalid(
                "controller.parking.hold_ticks",
                "must be at least 1",
            ));
        }

        for (field, speed) in [
            ("controller.scanning.cruise_speed", scan.cruise_speed),
            ("controller.scanning.approach_speed", scan.approach_speed),
            ("controller.parking.recovery_speed", park.recovery_speed),
        ] {
            within(field, speed, vehicle.max_speed)?;
        }
        within(
            "controller.parking.reverse_speed",
            park.reverse_speed,
            vehicle.max_reverse_speed(),
        )?;

        for (field, angle) in [
            ("controller.scanning.front_turn_deg", scan.front_turn_deg),
            ("controller.scanning.squeeze_turn_deg", scan.squeeze_turn_deg),
            ("controller.scanning.side_turn_deg", scan.side_turn_deg),
            ("controller.parking.parking_angle_deg", park.parking_angle_deg),
            ("controller.parking.centering_angle_deg", park.centering_angle_deg),
        ] {
            non_negative(field, angle)?;
            within(field, angle, vehicle.max_steering_deg)?;
        }

        Ok(())
    }
}

fn radius(field: &'static str, value: i32) -> Result<()> {
    positive(field, value as f32)
}

fn within(field: &'static str, value: f32, limit: f32) -> Result<()> {
    if value <= limit {
        Ok(())
    } else {
        Err(Error::invalid(
            field,
            format!("{} exceeds vehicle limit {}", value, limit),
        ))
    }
}
