//! Vehicle state and the manual driving model.

use crate::config::VehicleConfig;
use crate::core::Pose2D;
use crate::kinematics;
use crate::world::WorldBounds;

/// Throttle key state for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Throttle {
    Accelerate,
    /// Brakes, then reverses
    Brake,
    #[default]
    Coast,
}

/// Steering key state for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
    /// Wheel returns toward straight
    #[default]
    Center,
}

/// Driver input sampled once per tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManualInput {
    pub throttle: Throttle,
    pub steer: Steer,
}

impl ManualInput {
    pub const fn new(throttle: Throttle, steer: Steer) -> Self {
        Self { throttle, steer }
    }
}

/// Kinematic vehicle state.
///
/// Speed stays within `[-max_speed / 2, max_speed]` and steering within
/// `[-max_steering, max_steering]` whenever it is changed through this type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vehicle {
    pub pose: Pose2D,
    /// Signed speed (pixels per tick)
    pub speed: f32,
    /// Front wheel angle (radians)
    pub steering: f32,
}

impl Vehicle {
    /// Vehicle at rest
    pub fn new(pose: Pose2D) -> Self {
        Self {
            pose,
            speed: 0.0,
            steering: 0.0,
        }
    }

    /// Set speed and steering, clamped to the vehicle limits
    pub fn command(&mut self, speed: f32, steering: f32, config: &VehicleConfig) {
        self.speed = speed.clamp(-config.max_reverse_speed(), config.max_speed);
        let max_steering = config.max_steering();
        self.steering = steering.clamp(-max_steering, max_steering);
    }

    /// Update speed and steering from driver input
    pub fn apply_manual(&mut self, input: ManualInput, config: &VehicleConfig) {
        self.speed = match input.throttle {
            Throttle::Accelerate => (self.speed + config.acceleration).min(config.max_speed),
            Throttle::Brake => (self.speed - config.acceleration).max(-config.max_reverse_speed()),
            Throttle::Coast => self.speed * config.coast_decay,
        };

        let max_steering = config.max_steering();
        let rate = config.steer_rate_deg.to_radians();
        self.steering = match input.steer {
            Steer::Left => (self.steering - rate).max(-max_steering),
            Steer::Right => (self.steering + rate).min(max_steering),
            Steer::Center => self.steering * config.steer_return,
        };
    }

    /// Integrate one tick with the current speed and steering
    pub fn advance(&mut self, wheelbase: f32, bounds: WorldBounds) {
        self.pose = kinematics::integrate(self.pose, self.speed, self.steering, wheelbase, bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn at_rest() -> Vehicle {
        Vehicle::new(Pose2D::new(400.0, 300.0, 0.0))
    }

    #[test]
    fn test_accelerate_caps_at_max_speed() {
        let config = VehicleConfig::default();
        let mut vehicle = at_rest();
        let input = ManualInput::new(Throttle::Accelerate, Steer::Center);
        for _ in 0..100 {
            vehicle.apply_manual(input, &config);
        }
        assert_relative_eq!(vehicle.speed, 5.0);
    }

    #[test]
    fn test_brake_reverses_to_half_max() {
        let config = VehicleConfig::default();
        let mut vehicle = at_rest();
        vehicle.apply_manual(ManualInput::new(Throttle::Brake, Steer::Center), &config);
        assert_relative_eq!(vehicle.speed, -0.2);
        for _ in 0..100 {
            vehicle.apply_manual(ManualInput::new(Throttle::Brake, Steer::Center), &config);
        }
        assert_relative_eq!(vehicle.speed, -2.5);
    }

    #[test]
    fn test_coast_decays() {
        let config = VehicleConfig::default();
        let mut vehicle = at_rest();
        vehicle.speed = 4.0;
        vehicle.apply_manual(ManualInput::default(), &config);
        assert_relative_eq!(vehicle.speed, 3.8, epsilon = 1e-6);
    }

    #[test]
    fn test_steering_rate_and_limits() {
        let config = VehicleConfig::default();
        let mut vehicle = at_rest();

        vehicle.apply_manual(ManualInput::new(Throttle::Coast, Steer::Left), &config);
        assert_relative_eq!(vehicle.steering, -2f32.to_radians());

        for _ in 0..50 {
            vehicle.apply_manual(ManualInput::new(Throttle::Coast, Steer::Right), &config);
        }
        assert_relative_eq!(vehicle.steering, 30f32.to_radians());

        vehicle.apply_manual(ManualInput::default(), &config);
        assert_relative_eq!(vehicle.steering, 24f32.to_radians(), epsilon = 1e-6);
    }

    #[test]
    fn test_command_clamps() {
        let config = VehicleConfig::default();
        let mut vehicle = at_rest();
        vehicle.command(-9.0, 1.5, &config);
        assert_relative_eq!(vehicle.speed, -2.5);
        assert_relative_eq!(vehicle.steering, 30f32.to_radians());
    }
}
