//! AutoPark headless runner
//!
//! Runs the simulation without a window and logs the vehicle status.
//!
//! Usage:
//!   autopark --config configs/autopark.toml
//!   autopark --mode manual --throttle accelerate --steer right --ticks 200

use autopark::{DriveMode, ManualInput, Result, SimConfig, Simulation, Steer, Throttle};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Headless self-parking simulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of ticks to run
    #[arg(short, long, default_value_t = 3000)]
    ticks: u64,

    /// Who drives
    #[arg(short, long, value_enum, default_value_t = ModeArg::Autonomous)]
    mode: ModeArg,

    /// Log status every N ticks (0 = only at the end)
    #[arg(short, long, default_value_t = 50)]
    report_every: u64,

    /// Held throttle key in manual mode
    #[arg(long, value_enum, default_value_t = ThrottleArg::Coast)]
    throttle: ThrottleArg,

    /// Held steering key in manual mode
    #[arg(long, value_enum, default_value_t = SteerArg::Center)]
    steer: SteerArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Manual,
    Autonomous,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThrottleArg {
    Accelerate,
    Brake,
    Coast,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SteerArg {
    Left,
    Right,
    Center,
}

impl From<ModeArg> for DriveMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Manual => DriveMode::Manual,
            ModeArg::Autonomous => DriveMode::Autonomous,
        }
    }
}

impl From<ThrottleArg> for Throttle {
    fn from(throttle: ThrottleArg) -> Self {
        match throttle {
            ThrottleArg::Accelerate => Throttle::Accelerate,
            ThrottleArg::Brake => Throttle::Brake,
            ThrottleArg::Coast => Throttle::Coast,
        }
    }
}

impl From<SteerArg> for Steer {
    fn from(steer: SteerArg) -> Self {
        match steer {
            SteerArg::Left => Steer::Left,
            SteerArg::Right => Steer::Right,
            SteerArg::Center => Steer::Center,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };

    // RUST_LOG overrides the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("AutoPark v{} starting...", env!("CARGO_PKG_VERSION"));

    let base_dir = match &args.config {
        Some(path) => {
            log::info!("Using config: {}", path.display());
            path.parent().map(Path::to_path_buf).unwrap_or_default()
        }
        None => {
            log::info!("No config given, using defaults");
            PathBuf::new()
        }
    };
    let mut sim = Simulation::from_config(config, &base_dir)?;

    sim.set_mode(args.mode.into());
    let input = ManualInput::new(args.throttle.into(), args.steer.into());

    for _ in 0..args.ticks {
        sim.step(&input);

        if args.report_every > 0 && sim.tick() % args.report_every == 0 {
            log::info!("{}", sim.status());
        }
        if sim.mode() == DriveMode::Autonomous && sim.state().is_terminal() {
            log::info!("Parked after {} ticks", sim.tick());
            break;
        }
    }

    log::info!("Final: {}", sim.status());
    Ok(())
}
