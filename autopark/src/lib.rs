//! # AutoPark: Self-Parking Vehicle Simulation
//!
//! Simulation core for a car that finds a painted parking spot and reverses
//! into it. Rendering and input capture live outside this crate; the core
//! advances one fixed tick at a time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use autopark::{ManualInput, SimConfig, Simulation};
//! use autopark::world::BlankSampler;
//!
//! let config = SimConfig::default();
//! let sampler = BlankSampler::new(800, 600);
//! let mut sim = Simulation::new(config, Box::new(sampler)).unwrap();
//!
//! while !sim.state().is_terminal() && sim.tick() < 1000 {
//!     sim.step(&ManualInput::default());
//! }
//! println!("{}", sim.status());
//! ```
//!
//! ## Coordinate Frame
//!
//! World coordinates are screen pixels:
//! - **X**: grows to the right
//! - **Y**: grows downward
//! - **Heading**: radians, positive change turns clockwise on screen
//!
//! ## Architecture
//!
//! - [`core`]: Point and pose types
//! - [`world`]: Background color sampling, marking detection, world bounds
//! - [`obstacle`]: Obstacle geometry and the editable registry
//! - [`sensors`]: Eight-ray sensor array
//! - [`kinematics`]: Bicycle-model integration
//! - [`vehicle`]: Vehicle state and manual driving
//! - [`controller`]: Scanning / Parking / Recovering / Parked state machine
//! - [`simulation`]: Tick driver owning all of the above
//!
//! ## Per-Tick Flow
//!
//! ```text
//!   ┌──────────────┐   SensorScan   ┌──────────────┐  DriveCommand  ┌──────────────┐
//!   │ SensorArray  │──────────────▶│  Controller  │──────────────▶│  Kinematics  │
//!   │ (obstacles + │                │ (area/strip  │                │  (bicycle)   │
//!   │  markings)   │                │   samples)   │                │              │
//!   └──────────────┘                └──────────────┘                └──────────────┘
//! ```

pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod kinematics;
pub mod obstacle;
pub mod sensors;
pub mod simulation;
pub mod vehicle;
pub mod world;

pub use crate::core::{Point2D, Pose2D};
pub use config::SimConfig;
pub use controller::{AutonomousController, AutonomousState, DriveCommand};
pub use error::{Error, Result};
pub use obstacle::{FootprintKind, Obstacle, ObstacleRegistry};
pub use sensors::{RayLabel, SensorReading, SensorScan};
pub use simulation::{DriveMode, SimStatus, Simulation};
pub use vehicle::{ManualInput, Steer, Throttle, Vehicle};
pub use world::{ColorSampler, WorldBounds};
