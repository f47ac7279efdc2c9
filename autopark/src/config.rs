//! Simulation configuration
//!
//! Every parameter has a default matching the reference parking scene, so an
//! empty TOML file is a valid configuration.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! SimConfig
//! ├── WorldConfig          # Bounds, background image, start pose, obstacles
//! ├── VehicleConfig        # Wheelbase, speed/steering limits, manual response
//! ├── SensorConfig         # Ray range, step, marking rays, proximity bands
//! ├── MarkingConfig        # Yellow marking color thresholds
//! ├── ControllerConfig     # Scanning and parking thresholds
//! └── LoggingConfig
//! ```
//!
//! # Units
//!
//! Distances are world pixels, speeds are pixels per tick and angles in the
//! file are degrees. Accessors convert angles to radians.

use crate::controller::ControllerConfig;
use crate::core::Pose2D;
use crate::error::{Error, Result};
use crate::obstacle::Obstacle;
use crate::sensors::RayLabel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// World
// ============================================================================

/// World bounds, background and initial scene
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorldConfig {
    /// World width (pixels)
    #[serde(default = "default_world_width")]
    pub width: f32,

    /// World height (pixels)
    #[serde(default = "default_world_height")]
    pub height: f32,

    /// Background image path, relative to the config file.
    /// Without one the world has no markings.
    #[serde(default)]
    pub background: Option<String>,

    /// Initial vehicle X position (pixels)
    #[serde(default = "default_start_x")]
    pub start_x: f32,

    /// Initial vehicle Y position (pixels)
    #[serde(default = "default_start_y")]
    pub start_y: f32,

    /// Initial heading (degrees, clockwise on screen)
    #[serde(default)]
    pub start_heading_deg: f32,

    /// Obstacles placed at startup, in registry order
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

fn default_world_width() -> f32 {
    800.0
}
fn default_world_height() -> f32 {
    600.0
}
fn default_start_x() -> f32 {
    400.0
}
fn default_start_y() -> f32 {
    300.0
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_world_width(),
            height: default_world_height(),
            background: None,
            start_x: default_start_x(),
            start_y: default_start_y(),
            start_heading_deg: 0.0,
            obstacles: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Initial vehicle pose
    pub fn start_pose(&self) -> Pose2D {
        Pose2D::new(self.start_x, self.start_y, self.start_heading_deg.to_radians())
    }
}

// ============================================================================
// Vehicle
// ============================================================================

/// Vehicle physical limits and manual-drive response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VehicleConfig {
    /// Distance between front and rear axles (pixels)
    #[serde(default = "default_wheelbase")]
    pub wheelbase: f32,

    /// Maximum forward speed (pixels/tick); reverse is limited to half
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,

    /// Maximum steering angle (degrees)
    #[serde(default = "default_max_steering_deg")]
    pub max_steering_deg: f32,

    /// Manual speed change per tick while accelerating or braking
    #[serde(default = "default_acceleration")]
    pub acceleration: f32,

    /// Manual speed multiplier per tick while coasting
    #[serde(default = "default_coast_decay")]
    pub coast_decay: f32,

    /// Manual steering change per tick (degrees)
    #[serde(default = "default_steer_rate_deg")]
    pub steer_rate_deg: f32,

    /// Manual steering multiplier per tick with no steering input
    #[serde(default = "default_steer_return")]
    pub steer_return: f32,
}

fn default_wheelbase() -> f32 {
    50.0
}
fn default_max_speed() -> f32 {
    5.0
}
fn default_max_steering_deg() -> f32 {
    30.0
}
fn default_acceleration() -> f32 {
    0.2
}
fn default_coast_decay() -> f32 {
    0.95
}
fn default_steer_rate_deg() -> f32 {
    2.0
}
fn default_steer_return() -> f32 {
    0.8
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            wheelbase: default_wheelbase(),
            max_speed: default_max_speed(),
            max_steering_deg: default_max_steering_deg(),
            acceleration: default_acceleration(),
            coast_decay: default_coast_decay(),
            steer_rate_deg: default_steer_rate_deg(),
            steer_return: default_steer_return(),
        }
    }
}

impl VehicleConfig {
    /// Maximum steering angle in radians
    pub fn max_steering(&self) -> f32 {
        self.max_steering_deg.to_radians()
    }

    /// Maximum reverse speed magnitude
    pub fn max_reverse_speed(&self) -> f32 {
        self.max_speed / 2.0
    }
}

// ============================================================================
// Sensors
// ============================================================================

/// Ray sensor configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SensorConfig {
    /// Maximum sensing distance (pixels)
    #[serde(default = "default_max_range")]
    pub max_range: f32,

    /// Distance between consecutive ray samples (pixels)
    #[serde(default = "default_ray_step")]
    pub step: f32,

    /// Rays that also stop on painted markings
    #[serde(default = "default_marking_rays")]
    pub marking_rays: Vec<RayLabel>,

    /// Hits closer than this are reported in the danger band
    #[serde(default = "default_danger_band")]
    pub danger_band: f32,

    /// Hits closer than this (but not danger) are reported in the caution band
    #[serde(default = "default_caution_band")]
    pub caution_band: f32,
}

fn default_max_range() -> f32 {
    150.0
}
fn default_ray_step() -> f32 {
    5.0
}
fn default_marking_rays() -> Vec<RayLabel> {
    vec![RayLabel::SideLeft, RayLabel::SideRight, RayLabel::RearCenter]
}
fn default_danger_band() -> f32 {
    80.0
}
fn default_caution_band() -> f32 {
    120.0
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            max_range: default_max_range(),
            step: default_ray_step(),
            marking_rays: default_marking_rays(),
            danger_band: default_danger_band(),
            caution_band: default_caution_band(),
        }
    }
}

// ============================================================================
// Markings
// ============================================================================

/// Per-channel thresholds classifying a pixel as a yellow marking
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarkingConfig {
    /// Red channel must exceed this
    #[serde(default = "default_min_channel")]
    pub min_red: u8,

    /// Green channel must exceed this
    #[serde(default = "default_min_channel")]
    pub min_green: u8,

    /// Blue channel must stay below this
    #[serde(default = "default_max_blue")]
    pub max_blue: u8,
}

fn default_min_channel() -> u8 {
    200
}
fn default_max_blue() -> u8 {
    100
}

impl Default for MarkingConfig {
    fn default() -> Self {
        Self {
            min_red: default_min_channel(),
            min_green: default_min_channel(),
            max_blue: default_max_blue(),
        }
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================================================
// Root
// ============================================================================

/// Root simulation configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SimConfig {
    /// World and scene
    #[serde(default)]
    pub world: WorldConfig,

    /// Vehicle parameters
    #[serde(default)]
    pub vehicle: VehicleConfig,

    /// Ray sensors
    #[serde(default)]
    pub sensors: SensorConfig,

    /// Marking classification
    #[serde(default)]
    pub markings: MarkingConfig,

    /// Autonomous controller thresholds
    #[serde(default)]
    pub controller: ControllerConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimConfig {
    /// Load configuration from a TOML file
    ///
    /// The result is validated before it is returned.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: SimConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject configurations the simulation cannot run with.
    ///
    /// Controller speeds and angles must also fit inside the vehicle limits,
    /// otherwise the controller could command an out-of-range state.
    pub fn validate(&self) -> Result<()> {
        let world = &self.world;
        positive("world.width", world.width)?;
        positive("world.height", world.height)?;
        if world.start_x < 0.0
            || world.start_x > world.width
            || world.start_y < 0.0
            || world.start_y > world.height
        {
            return Err(Error::invalid(
                "world.start",
                format!(
                    "({}, {}) outside {}x{} world",
                    world.start_x, world.start_y, world.width, world.height
                ),
            ));
        }
        for obstacle in &world.obstacles {
            obstacle.validate()?;
        }

        let vehicle = &self.vehicle;
        positive("vehicle.wheelbase", vehicle.wheelbase)?;
        positive("vehicle.max_speed", vehicle.max_speed)?;
        positive("vehicle.max_steering_deg", vehicle.max_steering_deg)?;
        if vehicle.max_steering_deg >= 90.0 {
            return Err(Error::invalid(
                "vehicle.max_steering_deg",
                format!("must be below 90, got {}", vehicle.max_steering_deg),
            ));
        }
        non_negative("vehicle.acceleration", vehicle.acceleration)?;
        non_negative("vehicle.steer_rate_deg", vehicle.steer_rate_deg)?;
        unit_interval("vehicle.coast_decay", vehicle.coast_decay)?;
        unit_interval("vehicle.steer_return", vehicle.steer_return)?;

        let sensors = &self.sensors;
        positive("sensors.max_range", sensors.max_range)?;
        positive("sensors.step", sensors.step)?;
        non_negative("sensors.danger_band", sensors.danger_band)?;
        non_negative("sensors.caution_band", sensors.caution_band)?;

        self.controller.validate(vehicle)
    }
}

pub(crate) fn positive(field: &'static str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(field, format!("must be positive, got {}", value)))
    }
}

pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(
            field,
            format!("must be non-negative, got {}", value),
        ))
    }
}

pub(crate) fn unit_interval(field: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid(
            field,
            format!("must be within [0, 1], got {}", value),
        ))
    }
}
