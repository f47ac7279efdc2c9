//! Autonomous parking states.

/// Countdown carried by [`AutonomousState::Recovering`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecoveryContext {
    /// Ticks of recovery driving still to do
    pub frames_remaining: u32,
    /// Steering held for the whole maneuver (radians)
    pub steering: f32,
}

/// Autonomous parking state
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum AutonomousState {
    /// Cruising and looking for a marked spot
    #[default]
    Scanning,

    /// Reversing into the spot
    Parking,

    /// Pulling forward, away from a line that got too close
    Recovering(RecoveryContext),

    /// Done; the vehicle stays stopped
    Parked,
}

impl AutonomousState {
    /// Is this a terminal state?
    pub fn is_terminal(&self) -> bool {
        matches!(self, AutonomousState::Parked)
    }

    /// State name for logging
    pub fn name(&self) -> &'static str {
        match self {
            AutonomousState::Scanning => "Scanning",
            AutonomousState::Parking => "Parking",
            AutonomousState::Recovering(_) => "Recovering",
            AutonomousState::Parked => "Parked",
        }
    }

    /// Remaining recovery ticks, if recovering
    pub fn recovery_frames(&self) -> Option<u32> {
        match self {
            AutonomousState::Recovering(ctx) => Some(ctx.frames_remaining),
            _ => None,
        }
    }
}

/// Speed and steering decided for one tick
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct DriveCommand {
    /// Signed speed (pixels/tick)
    pub speed: f32,
    /// Steering angle (radians)
    pub steering: f32,
}

impl DriveCommand {
    pub const STOP: DriveCommand = DriveCommand {
        speed: 0.0,
        steering: 0.0,
    };

    pub const fn new(speed: f32, steering: f32) -> Self {
        Self { speed, steering }
    }
}
