//! Bicycle-model kinematics.
//!
//! One call advances the vehicle by a single tick. Speed is in pixels per
//! tick, so there is no time step.

use crate::core::Pose2D;
use crate::world::WorldBounds;

/// Steering magnitudes below this drive straight
pub const STEERING_EPSILON: f32 = 1e-6;

/// Yaw change for one tick
#[inline]
pub fn angular_velocity(speed: f32, steering: f32, wheelbase: f32) -> f32 {
    if steering.abs() < STEERING_EPSILON {
        0.0
    } else {
        let turning_radius = wheelbase / steering.tan();
        speed / turning_radius
    }
}

/// Advance `pose` by one tick.
///
/// The heading is updated first and the step is taken along the new
/// heading. The resulting position is clamped into `bounds`; the caller's
/// speed is left untouched.
pub fn integrate(
    pose: Pose2D,
    speed: f32,
    steering: f32,
    wheelbase: f32,
    bounds: WorldBounds,
) -> Pose2D {
    let heading = pose.heading + angular_velocity(speed, steering, wheelbase);
    let moved = Pose2D::new(pose.x, pose.y, heading);
    let position = bounds.clamp(moved.position() + moved.forward() * speed);
    Pose2D::new(position.x, position.y, heading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BOUNDS: WorldBounds = WorldBounds::new(800.0, 600.0);

    #[test]
    fn test_heading_change_grid() {
        let wheelbase = 50.0;
        for speed in [-2.5, -1.5, 0.0, 1.0, 2.0, 5.0] {
            for steering_deg in [-30.0f32, -28.0, -5.0, 0.0, 5.0, 20.0, 30.0] {
                let steering = steering_deg.to_radians();
                let pose = Pose2D::new(400.0, 300.0, 0.3);
                let next = integrate(pose, speed, steering, wheelbase, BOUNDS);

                let expected = speed / wheelbase * steering.tan();
                assert_relative_eq!(next.heading - pose.heading, expected, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_straight_line_uses_heading() {
        let pose = Pose2D::new(100.0, 100.0, std::f32::consts::FRAC_PI_2);
        let next = integrate(pose, 3.0, 0.0, 50.0, BOUNDS);
        assert_relative_eq!(next.x, 100.0, epsilon = 1e-5);
        assert_relative_eq!(next.y, 103.0, epsilon = 1e-5);
        assert_relative_eq!(next.heading, pose.heading);
    }

    #[test]
    fn test_tiny_steering_is_straight() {
        assert_eq!(angular_velocity(5.0, 1e-7, 50.0), 0.0);
        assert!(angular_velocity(5.0, 1e-3, 50.0) > 0.0);
    }

    #[test]
    fn test_step_follows_new_heading() {
        let steering = 30f32.to_radians();
        let pose = Pose2D::new(400.0, 300.0, 0.0);
        let next = integrate(pose, 5.0, steering, 50.0, BOUNDS);
        assert_relative_eq!(next.x, 400.0 + 5.0 * next.heading.cos(), epsilon = 1e-4);
        assert_relative_eq!(next.y, 300.0 + 5.0 * next.heading.sin(), epsilon = 1e-4);
        // Positive steering turns toward +Y
        assert!(next.y > 300.0);
    }

    #[test]
    fn test_position_clamped_into_world() {
        let cases = [
            (Pose2D::new(798.0, 300.0, 0.0), 5.0),
            (Pose2D::new(2.0, 300.0, 0.0), -5.0),
            (Pose2D::new(400.0, 1.0, -std::f32::consts::FRAC_PI_2), 4.0),
            (Pose2D::new(400.0, 599.0, std::f32::consts::FRAC_PI_2), 4.0),
        ];
        for (pose, speed) in cases {
            let mut current = pose;
            for _ in 0..20 {
                current = integrate(current, speed, 0.2, 50.0, BOUNDS);
                assert!((0.0..=800.0).contains(&current.x));
                assert!((0.0..=600.0).contains(&current.y));
            }
        }
    }
}
