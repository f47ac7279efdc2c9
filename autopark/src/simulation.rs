//! Simulation context: world, obstacles, vehicle and controller.
//!
//! One [`Simulation`] owns everything a tick touches. Obstacle editing goes
//! through `&mut self`, so it can only happen between ticks.
//!
//! # Tick Order
//!
//! ```text
//! Autonomous:  cast sensors ─▶ controller decides ─▶ integrate
//! Manual:      apply driver input ─▶ integrate
//! ```

use std::fmt;
use std::path::Path;

use log::{info, warn};

use crate::config::SimConfig;
use crate::controller::{AutonomousController, AutonomousState};
use crate::core::Pose2D;
use crate::error::Result;
use crate::obstacle::ObstacleRegistry;
use crate::sensors::{SensorArray, SensorScan};
use crate::vehicle::{ManualInput, Vehicle};
use crate::world::{BlankSampler, ColorSampler, ImageSampler, MarkingDetector, WorldBounds};

/// Who drives the vehicle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriveMode {
    /// Driver input each tick
    Manual,
    /// Sensors and the parking controller
    #[default]
    Autonomous,
}

impl DriveMode {
    pub fn name(self) -> &'static str {
        match self {
            DriveMode::Manual => "manual",
            DriveMode::Autonomous => "autonomous",
        }
    }
}

/// Snapshot for UIs and the CLI
#[derive(Clone, Debug, PartialEq)]
pub struct SimStatus {
    pub tick: u64,
    pub mode: DriveMode,
    pub state: &'static str,
    pub pose: Pose2D,
    pub speed: f32,
    /// Steering angle (radians)
    pub steering: f32,
    pub parked_timer: u32,
    /// Set only while recovering
    pub recovery_frames: Option<u32>,
}

impl fmt::Display for SimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick={} mode={} state={} pos=({:.1},{:.1}) heading={:.1}° speed={:.2} steer={:.1}° hold={}",
            self.tick,
            self.mode.name(),
            self.state,
            self.pose.x,
            self.pose.y,
            self.pose.heading.to_degrees(),
            self.speed,
            self.steering.to_degrees(),
            self.parked_timer
        )?;
        if let Some(frames) = self.recovery_frames {
            write!(f, " recovery={}", frames)?;
        }
        Ok(())
    }
}

/// The self-parking simulation
pub struct Simulation {
    config: SimConfig,
    bounds: WorldBounds,
    sampler: Box<dyn ColorSampler>,
    obstacles: ObstacleRegistry,
    sensors: SensorArray,
    vehicle: Vehicle,
    controller: AutonomousController,
    mode: DriveMode,
    last_scan: Option<SensorScan>,
    tick: u64,
}

impl Simulation {
    /// Build a simulation over `sampler`.
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: SimConfig, sampler: Box<dyn ColorSampler>) -> Result<Self> {
        config.validate()?;

        let world = &config.world;
        let bounds = WorldBounds::new(world.width, world.height);
        if sampler.width() as f32 != world.width || sampler.height() as f32 != world.height {
            warn!(
                "[Sim] Background is {}x{} but world is {}x{}",
                sampler.width(),
                sampler.height(),
                world.width,
                world.height
            );
        }

        let detector = MarkingDetector::new(config.markings.clone());
        let sensors = SensorArray::new(&config.sensors, detector.clone());
        let controller = AutonomousController::new(config.controller.clone(), detector);
        let obstacles = ObstacleRegistry::from(world.obstacles.clone());
        let vehicle = Vehicle::new(world.start_pose());

        info!(
            "[Sim] World {}x{}, {} obstacles, start ({:.1},{:.1})",
            world.width,
            world.height,
            obstacles.len(),
            vehicle.pose.x,
            vehicle.pose.y
        );

        Ok(Self {
            config,
            bounds,
            sampler,
            obstacles,
            sensors,
            vehicle,
            controller,
            mode: DriveMode::default(),
            last_scan: None,
            tick: 0,
        })
    }

    /// Load a configuration file and its background image.
    ///
    /// A relative `world.background` path is resolved against the
    /// configuration file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = SimConfig::from_file(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_config(config, base_dir)
    }

    /// Build the background sampler named by `config` and the simulation.
    ///
    /// Without a background the world is blank.
    pub fn from_config(config: SimConfig, base_dir: &Path) -> Result<Self> {
        let width = config.world.width.round() as u32;
        let height = config.world.height.round() as u32;

        let sampler: Box<dyn ColorSampler> = match &config.world.background {
            Some(background) => {
                let image_path = base_dir.join(background);
                info!("[Sim] Loading background {}", image_path.display());
                Box::new(ImageSampler::load(image_path, width, height)?)
            }
            None => Box::new(BlankSampler::new(width, height)),
        };

        Self::new(config, sampler)
    }

    /// Advance one tick in the current mode
    pub fn step(&mut self, input: &ManualInput) {
        match self.mode {
            DriveMode::Manual => self.step_manual(input),
            DriveMode::Autonomous => self.step_autonomous(),
        }
    }

    /// Advance one tick from driver input. Sensors are not cast.
    pub fn step_manual(&mut self, input: &ManualInput) {
        self.vehicle.apply_manual(*input, &self.config.vehicle);
        self.vehicle.advance(self.config.vehicle.wheelbase, self.bounds);
        self.last_scan = None;
        self.tick += 1;
    }

    /// Advance one tick under the parking controller
    pub fn step_autonomous(&mut self) {
        let scan = self.sensors.cast(
            self.vehicle.pose,
            self.obstacles.as_slice(),
            self.sampler.as_ref(),
            self.bounds,
        );
        let command = self.controller.update(
            self.vehicle.pose,
            self.vehicle.steering,
            &scan,
            self.sampler.as_ref(),
        );

        self.vehicle
            .command(command.speed, command.steering, &self.config.vehicle);
        self.vehicle
            .advance(self.config.vehicle.wheelbase, self.bounds);
        self.last_scan = Some(scan);
        self.tick += 1;
    }

    /// Switch between manual and autonomous driving.
    ///
    /// The controller keeps its state across switches.
    pub fn set_mode(&mut self, mode: DriveMode) {
        if mode != self.mode {
            info!("[Sim] Mode {} -> {}", self.mode.name(), mode.name());
            self.mode = mode;
        }
    }

    /// Put the vehicle back at the start pose and restart scanning
    pub fn reset(&mut self) {
        self.vehicle = Vehicle::new(self.config.world.start_pose());
        self.controller.reset();
        self.last_scan = None;
        self.tick = 0;
        info!("[Sim] Reset to start pose");
    }

    /// Current status snapshot
    pub fn status(&self) -> SimStatus {
        let state = self.controller.state();
        SimStatus {
            tick: self.tick,
            mode: self.mode,
            state: state.name(),
            pose: self.vehicle.pose,
            speed: self.vehicle.speed,
            steering: self.vehicle.steering,
            parked_timer: self.controller.parked_timer(),
            recovery_frames: state.recovery_frames(),
        }
    }

    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn state(&self) -> &AutonomousState {
        self.controller.state()
    }

    pub fn controller(&self) -> &AutonomousController {
        &self.controller
    }

    /// Scan from the latest autonomous tick; `None` after a manual tick
    pub fn last_scan(&self) -> Option<&SensorScan> {
        self.last_scan.as_ref()
    }

    pub fn obstacles(&self) -> &ObstacleRegistry {
        &self.obstacles
    }

    /// Editor access between ticks
    pub fn obstacles_mut(&mut self) -> &mut ObstacleRegistry {
        &mut self.obstacles
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }
}
