//! Autonomous parking controller implementation.

use log::{debug, info, warn};

use super::config::ControllerConfig;
use super::state::{AutonomousState, DriveCommand, RecoveryContext};
use crate::core::Pose2D;
use crate::sensors::{RayLabel, SensorScan};
use crate::world::{AreaSample, ColorSampler, MarkingDetector};

/// Autonomous parking controller
///
/// Owns the state machine and the parked-hold counter. The caller supplies
/// one fresh sensor scan per tick and applies the returned command.
#[derive(Clone, Debug)]
pub struct AutonomousController {
    /// Current state
    state: AutonomousState,
    /// Configuration
    config: ControllerConfig,
    /// Marking classifier for area and strip samples
    detector: MarkingDetector,
    /// Consecutive well-parked ticks
    parked_timer: u32,
    /// Most recent area sample, kept for overlays
    last_area: AreaSample,
}

impl AutonomousController {
    /// Create a controller in `Scanning`
    pub fn new(config: ControllerConfig, detector: MarkingDetector) -> Self {
        Self {
            state: AutonomousState::Scanning,
            config,
            detector,
            parked_timer: 0,
            last_area: AreaSample::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> &AutonomousState {
        &self.state
    }

    /// Configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Consecutive ticks the vehicle has held a parked position
    pub fn parked_timer(&self) -> u32 {
        self.parked_timer
    }

    /// Marking pixels found by the latest area sample
    pub fn last_area_sample(&self) -> &AreaSample {
        &self.last_area
    }

    /// Back to `Scanning` with a cleared hold counter
    pub fn reset(&mut self) {
        self.state = AutonomousState::Scanning;
        self.parked_timer = 0;
        self.last_area = AreaSample::default();
    }

    /// Decide speed and steering for this tick.
    ///
    /// `steering` is the vehicle's current wheel angle, which `Scanning`
    /// lets decay when nothing is close.
    pub fn update<S: ColorSampler + ?Sized>(
        &mut self,
        pose: Pose2D,
        steering: f32,
        scan: &SensorScan,
        sampler: &S,
    ) -> DriveCommand {
        match self.state {
            AutonomousState::Scanning => self.handle_scanning(pose, steering, scan, sampler),
            AutonomousState::Parking => self.handle_parking(pose, scan, sampler),
            AutonomousState::Recovering(ctx) => self.handle_recovery(ctx, pose, scan, sampler),
            AutonomousState::Parked => DriveCommand::STOP,
        }
    }

    // Private state handlers

    fn handle_scanning<S: ColorSampler + ?Sized>(
        &mut self,
        pose: Pose2D,
        steering: f32,
        scan: &SensorScan,
        sampler: &S,
    ) -> DriveCommand {
        let cfg = &self.config.scanning;

        let area = self
            .detector
            .area_sample(sampler, pose.position(), cfg.spot_radius);
        let found = area.detected(cfg.spot_min_pixels);
        let count = area.count;
        self.last_area = area;

        if found {
            info!(
                "[AutoPark] Spot found at ({:.1},{:.1}): {} marking pixels, parking",
                pose.x, pose.y, count
            );
            self.state = AutonomousState::Parking;
            self.parked_timer = 0;
            return DriveCommand::new(0.0, steering);
        }

        let ahead = self.detector.strip_sample(
            sampler,
            pose,
            cfg.strip_lookahead,
            cfg.strip_half_width,
        );
        let mut speed = if ahead >= cfg.strip_min_pixels {
            debug!("[AutoPark] Markings ahead ({} px), slowing", ahead);
            cfg.approach_speed
        } else {
            cfg.cruise_speed
        };

        let front = scan.distance(RayLabel::FrontCenter);
        let front_left = scan.distance(RayLabel::FrontLeft);
        let front_right = scan.distance(RayLabel::FrontRight);
        let side_left = scan.distance(RayLabel::SideLeft);
        let side_right = scan.distance(RayLabel::SideRight);

        let steering = if front < cfg.front_near {
            speed = 0.0;
            let turn = cfg.front_turn_deg.to_radians();
            debug!(
                "[AutoPark] Blocked ahead ({:.0}), front L/R {:.0}/{:.0}",
                front, front_left, front_right
            );
            if front_left > front_right { -turn } else { turn }
        } else if side_left < cfg.squeeze && side_right < cfg.squeeze {
            speed = 0.0;
            let turn = cfg.squeeze_turn_deg.to_radians();
            debug!(
                "[AutoPark] Squeezed, sides L/R {:.0}/{:.0}",
                side_left, side_right
            );
            if side_left > side_right { -turn } else { turn }
        } else if side_left < cfg.side_near || front_left < cfg.side_near {
            cfg.side_turn_deg.to_radians()
        } else if side_right < cfg.side_near || front_right < cfg.side_near {
            -cfg.side_turn_deg.to_radians()
        } else {
            steering * cfg.steering_decay
        };

        DriveCommand::new(speed, steering)
    }

    fn handle_parking<S: ColorSampler + ?Sized>(
        &mut self,
        pose: Pose2D,
        scan: &SensorScan,
        sampler: &S,
    ) -> DriveCommand {
        let cfg = &self.config.parking;
        let rear = scan.distance(RayLabel::RearCenter);
        let left = scan.distance(RayLabel::SideLeft);
        let right = scan.distance(RayLabel::SideRight);
        let angle = cfg.parking_angle_deg.to_radians();

        // Line danger always wins over holding
        if left < cfg.line_danger || right < cfg.line_danger {
            let steering = if left < right { angle } else { -angle };
            warn!(
                "[AutoPark] Too close to line (L={:.0}, R={:.0}), recovering for {} ticks",
                left, right, cfg.recovery_frames
            );
            self.state = AutonomousState::Recovering(RecoveryContext {
                frames_remaining: cfg.recovery_frames,
                steering,
            });
            self.parked_timer = 0;
            return DriveCommand::new(0.0, steering);
        }

        let area = self
            .detector
            .area_sample(sampler, pose.position(), cfg.in_spot_radius);
        let in_spot = area.detected(cfg.in_spot_min_pixels);
        self.last_area = area;

        let command = if in_spot
            && rear < cfg.rear_clearance
            && left > cfg.side_clearance
            && right > cfg.side_clearance
        {
            self.parked_timer += 1;
            debug!(
                "[AutoPark] Holding, timer {}/{}",
                self.parked_timer, cfg.hold_ticks
            );
            DriveCommand::STOP
        } else {
            self.parked_timer = 0;
            // Reversing: positive steering swings the vehicle toward +Y (right)
            let steering = if left < right {
                angle
            } else if right < left {
                -angle
            } else {
                cfg.centering_angle_deg.to_radians()
            };
            DriveCommand::new(-cfg.reverse_speed, steering)
        };

        if self.parked_timer >= cfg.hold_ticks {
            info!(
                "[AutoPark] Parked at ({:.1},{:.1}) after holding {} ticks",
                pose.x, pose.y, self.parked_timer
            );
            self.state = AutonomousState::Parked;
            return DriveCommand::STOP;
        }

        command
    }

    fn handle_recovery<S: ColorSampler + ?Sized>(
        &mut self,
        ctx: RecoveryContext,
        pose: Pose2D,
        scan: &SensorScan,
        sampler: &S,
    ) -> DriveCommand {
        if ctx.frames_remaining == 0 {
            info!("[AutoPark] Recovery complete, resuming parking");
            self.state = AutonomousState::Parking;
            return self.handle_parking(pose, scan, sampler);
        }

        let frames_remaining = ctx.frames_remaining - 1;
        debug!("[AutoPark] Recovering, {} ticks left", frames_remaining);
        self.state = AutonomousState::Recovering(RecoveryContext {
            frames_remaining,
            steering: ctx.steering,
        });
        self.parked_timer = 0;
        DriveCommand::new(self.config.parking.recovery_speed, ctx.steering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarkingConfig;
    use crate::sensors::SensorReading;
    use crate::kinematics;
    use crate::world::{BlankSampler, ImageSampler, WorldBounds};
    use approx::assert_relative_eq;
    use image::{Rgb, RgbImage};

    const YELLOW: Rgb<u8> = Rgb([250, 220, 40]);
    const ASPHALT: Rgb<u8> = Rgb([60, 60, 60]);

    fn controller() -> AutonomousController {
        AutonomousController::new(
            ControllerConfig::default(),
            MarkingDetector::new(MarkingConfig::default()),
        )
    }

    fn scan_with(values: &[(RayLabel, f32)]) -> SensorScan {
        let mut reading = SensorReading::clear(150.0);
        for &(label, distance) in values {
            reading.set(label, distance);
        }
        SensorScan {
            reading,
            traces: Vec::new(),
        }
    }

    fn all_yellow() -> ImageSampler {
        ImageSampler::from_image(RgbImage::from_pixel(800, 600, YELLOW))
    }

    fn pose() -> Pose2D {
        Pose2D::new(400.0, 300.0, 0.0)
    }

    /// Controller already switched to Parking
    fn parking_controller() -> AutonomousController {
        let mut ctrl = controller();
        ctrl.update(pose(), 0.0, &scan_with(&[]), &all_yellow());
        assert_eq!(ctrl.state(), &AutonomousState::Parking);
        ctrl
    }

    #[test]
    fn test_scanning_cruises_and_decays_steering() {
        let mut ctrl = controller();
        let blank = BlankSampler::new(800, 600);
        let cmd = ctrl.update(pose(), 0.2, &scan_with(&[]), &blank);

        assert_eq!(ctrl.state(), &AutonomousState::Scanning);
        assert_relative_eq!(cmd.speed, 2.0);
        assert_relative_eq!(cmd.steering, 0.18, epsilon = 1e-6);
    }

    #[test]
    fn test_scanning_blocked_ahead_turns_to_clearer_front() {
        let mut ctrl = controller();
        let blank = BlankSampler::new(800, 600);
        let scan = scan_with(&[
            (RayLabel::FrontCenter, 60.0),
            (RayLabel::FrontLeft, 100.0),
            (RayLabel::FrontRight, 55.0),
        ]);
        let cmd = ctrl.update(pose(), 0.0, &scan, &blank);
        assert_eq!(cmd.speed, 0.0);
        assert_relative_eq!(cmd.steering, -25f32.to_radians());

        let scan = scan_with(&[(RayLabel::FrontCenter, 60.0), (RayLabel::FrontLeft, 55.0)]);
        let cmd = ctrl.update(pose(), 0.0, &scan, &blank);
        assert_relative_eq!(cmd.steering, 25f32.to_radians());
    }

    #[test]
    fn test_scanning_squeezed_turns_to_clearer_side() {
        let mut ctrl = controller();
        let blank = BlankSampler::new(800, 600);
        let scan = scan_with(&[(RayLabel::SideLeft, 30.0), (RayLabel::SideRight, 35.0)]);
        let cmd = ctrl.update(pose(), 0.0, &scan, &blank);
        assert_eq!(cmd.speed, 0.0);
        assert_relative_eq!(cmd.steering, 30f32.to_radians());
    }

    #[test]
    fn test_scanning_steers_away_from_single_close_side() {
        let mut ctrl = controller();
        let blank = BlankSampler::new(800, 600);

        let cmd = ctrl.update(pose(), 0.0, &scan_with(&[(RayLabel::SideLeft, 45.0)]), &blank);
        assert_relative_eq!(cmd.speed, 2.0);
        assert_relative_eq!(cmd.steering, 20f32.to_radians());

        let cmd = ctrl.update(pose(), 0.0, &scan_with(&[(RayLabel::FrontRight, 45.0)]), &blank);
        assert_relative_eq!(cmd.steering, -20f32.to_radians());
    }

    #[test]
    fn test_scanning_slows_for_markings_ahead() {
        // 3x5 patch: enough for the strip, too small for a spot
        let img = RgbImage::from_fn(800, 600, |x, y| {
            if (440..443).contains(&x) && (298..303).contains(&y) {
                YELLOW
            } else {
                ASPHALT
            }
        });
        let sampler = ImageSampler::from_image(img);
        let mut ctrl = controller();
        let cmd = ctrl.update(pose(), 0.0, &scan_with(&[]), &sampler);

        assert_eq!(ctrl.state(), &AutonomousState::Scanning);
        assert_eq!(ctrl.last_area_sample().count, 15);
        assert_relative_eq!(cmd.speed, 1.0);
    }

    #[test]
    fn test_spot_found_enters_parking() {
        let mut ctrl = controller();
        let cmd = ctrl.update(pose(), 0.1, &scan_with(&[]), &all_yellow());
        assert_eq!(ctrl.state(), &AutonomousState::Parking);
        assert_eq!(cmd.speed, 0.0);
        assert!(ctrl.last_area_sample().detected(20));
    }

    #[test]
    fn test_reverse_steering_follows_clearance() {
        let mut ctrl = parking_controller();
        let sampler = all_yellow();

        let scan = scan_with(&[(RayLabel::SideLeft, 30.0), (RayLabel::SideRight, 60.0)]);
        let cmd = ctrl.update(pose(), 0.0, &scan, &sampler);
        assert_relative_eq!(cmd.speed, -1.5);
        assert_relative_eq!(cmd.steering, 28f32.to_radians());

        let scan = scan_with(&[(RayLabel::SideLeft, 60.0), (RayLabel::SideRight, 30.0)]);
        let cmd = ctrl.update(pose(), 0.0, &scan, &sampler);
        assert_relative_eq!(cmd.steering, -28f32.to_radians());

        let scan = scan_with(&[(RayLabel::SideLeft, 60.0), (RayLabel::SideRight, 60.0)]);
        let cmd = ctrl.update(pose(), 0.0, &scan, &sampler);
        assert_relative_eq!(cmd.steering, 5f32.to_radians());
    }

    #[test]
    fn test_reversing_moves_away_from_closer_line() {
        let mut ctrl = parking_controller();
        let sampler = all_yellow();
        let bounds = WorldBounds::new(800.0, 600.0);
        // Left line closer; SideLeft looks toward -Y
        let scan = scan_with(&[(RayLabel::SideLeft, 30.0), (RayLabel::SideRight, 60.0)]);

        let mut current = pose();
        for _ in 0..20 {
            let cmd = ctrl.update(current, 0.0, &scan, &sampler);
            current = kinematics::integrate(current, cmd.speed, cmd.steering, 50.0, bounds);
        }
        assert_eq!(ctrl.state(), &AutonomousState::Parking);
        assert!(current.x < 400.0);
        assert!(current.y > 300.0, "drifted toward the left line: y={}", current.y);

        // Mirrored: right line closer drifts toward -Y
        let mut ctrl = parking_controller();
        let scan = scan_with(&[(RayLabel::SideLeft, 60.0), (RayLabel::SideRight, 30.0)]);
        let mut current = pose();
        for _ in 0..20 {
            let cmd = ctrl.update(current, 0.0, &scan, &sampler);
            current = kinematics::integrate(current, cmd.speed, cmd.steering, 50.0, bounds);
        }
        assert!(current.y < 300.0, "drifted toward the right line: y={}", current.y);
    }

    #[test]
    fn test_line_danger_latches_recovery() {
        let mut ctrl = parking_controller();
        let sampler = all_yellow();
        let danger = scan_with(&[(RayLabel::SideLeft, 20.0), (RayLabel::RearCenter, 10.0)]);

        let cmd = ctrl.update(pose(), 0.0, &danger, &sampler);
        assert_eq!(cmd.speed, 0.0);
        let steering = 28f32.to_radians();
        assert_eq!(
            ctrl.state(),
            &AutonomousState::Recovering(RecoveryContext {
                frames_remaining: 25,
                steering,
            })
        );

        // Exactly 25 ticks of forward recovery, whatever the sensors say
        for remaining in (0..25).rev() {
            let cmd = ctrl.update(pose(), 0.0, &danger, &sampler);
            assert_relative_eq!(cmd.speed, 2.0);
            assert_relative_eq!(cmd.steering, steering);
            assert_eq!(ctrl.state().recovery_frames(), Some(remaining));
        }

        // Countdown at zero: parking logic runs on this same tick
        let clear = scan_with(&[(RayLabel::SideLeft, 60.0), (RayLabel::SideRight, 90.0)]);
        let cmd = ctrl.update(pose(), 0.0, &clear, &sampler);
        assert_eq!(ctrl.state(), &AutonomousState::Parking);
        assert_relative_eq!(cmd.speed, -1.5);
    }

    #[test]
    fn test_right_line_danger_steers_left() {
        let mut ctrl = parking_controller();
        let scan = scan_with(&[(RayLabel::SideLeft, 80.0), (RayLabel::SideRight, 10.0)]);
        ctrl.update(pose(), 0.0, &scan, &all_yellow());
        let ctx = match ctrl.state() {
            AutonomousState::Recovering(ctx) => *ctx,
            other => panic!("expected Recovering, got {}", other.name()),
        };
        assert_relative_eq!(ctx.steering, -28f32.to_radians());
    }

    #[test]
    fn test_hold_resets_then_parks() {
        let mut ctrl = parking_controller();
        let sampler = all_yellow();
        let good = scan_with(&[
            (RayLabel::RearCenter, 20.0),
            (RayLabel::SideLeft, 50.0),
            (RayLabel::SideRight, 50.0),
        ]);
        let shallow = scan_with(&[
            (RayLabel::RearCenter, 35.0),
            (RayLabel::SideLeft, 50.0),
            (RayLabel::SideRight, 50.0),
        ]);

        for i in 1..=10 {
            let cmd = ctrl.update(pose(), 0.0, &good, &sampler);
            assert_eq!(cmd, DriveCommand::STOP);
            assert_eq!(ctrl.parked_timer(), i);
        }
        ctrl.update(pose(), 0.0, &shallow, &sampler);
        assert_eq!(ctrl.parked_timer(), 0);

        for _ in 0..39 {
            ctrl.update(pose(), 0.0, &good, &sampler);
        }
        assert_eq!(ctrl.state(), &AutonomousState::Parking);
        ctrl.update(pose(), 0.0, &good, &sampler);
        assert_eq!(ctrl.state(), &AutonomousState::Parked);
        assert!(ctrl.state().is_terminal());

        // Terminal: nothing moves it again
        let danger = scan_with(&[(RayLabel::SideLeft, 5.0)]);
        for _ in 0..10 {
            assert_eq!(ctrl.update(pose(), 0.3, &danger, &sampler), DriveCommand::STOP);
        }
        assert_eq!(ctrl.state(), &AutonomousState::Parked);
    }

    #[test]
    fn test_hold_needs_markings_under_vehicle() {
        let mut ctrl = parking_controller();
        let good = scan_with(&[
            (RayLabel::RearCenter, 20.0),
            (RayLabel::SideLeft, 50.0),
            (RayLabel::SideRight, 50.0),
        ]);
        let cmd = ctrl.update(pose(), 0.0, &good, &BlankSampler::new(800, 600));
        assert_eq!(ctrl.parked_timer(), 0);
        assert_relative_eq!(cmd.speed, -1.5);
    }

    #[test]
    fn test_reset_returns_to_scanning() {
        let mut ctrl = parking_controller();
        ctrl.reset();
        assert_eq!(ctrl.state(), &AutonomousState::Scanning);
        assert_eq!(ctrl.parked_timer(), 0);
    }
}
