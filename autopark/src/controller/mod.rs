//! Autonomous parking controller.
//!
//! A four-state machine decides speed and steering each tick from the
//! latest sensor scan and marking samples:
//!
//! ```text
//! Scanning ──spot found──▶ Parking ──held long enough──▶ Parked
//!                           │   ▲
//!              line too close   countdown done
//!                           ▼   │
//!                         Recovering
//! ```

mod config;
mod machine;
mod state;

pub use config::{ControllerConfig, ParkingConfig, ScanningConfig};
pub use machine::AutonomousController;
pub use state::{AutonomousState, DriveCommand, RecoveryContext};
