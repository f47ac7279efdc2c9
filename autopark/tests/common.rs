//! Test utilities for AutoPark scenarios.
//!
//! Builds synthetic parking-lot backgrounds and runs simulations headless.

#![allow(dead_code)]

use autopark::world::ImageSampler;
use autopark::{ManualInput, SimConfig, SimStatus, Simulation};
use image::{Rgb, RgbImage};

pub const YELLOW: Rgb<u8> = Rgb([250, 220, 40]);
pub const ASPHALT: Rgb<u8> = Rgb([60, 60, 60]);

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;

/// Background painted yellow wherever `is_marking(x, y)` holds.
pub fn lot(is_marking: impl Fn(u32, u32) -> bool) -> ImageSampler {
    ImageSampler::from_image(RgbImage::from_fn(WIDTH, HEIGHT, |x, y| {
        if is_marking(x, y) { YELLOW } else { ASPHALT }
    }))
}

/// Background without markings.
pub fn empty_lot() -> ImageSampler {
    lot(|_, _| false)
}

/// Open-ended spot ahead of the default start pose: two side lines and a
/// back line, 70 px wide, starting 160 px in front of the vehicle.
pub fn spot_ahead() -> ImageSampler {
    lot(|x, y| {
        let side = (560..640).contains(&x) && ((262..266).contains(&y) || (334..338).contains(&y));
        let back = (636..640).contains(&x) && (262..338).contains(&y);
        side || back
    })
}

/// Simulation over `sampler` with `config`.
pub fn simulation(config: SimConfig, sampler: ImageSampler) -> Simulation {
    Simulation::new(config, Box::new(sampler)).expect("valid test configuration")
}

/// Run autonomous ticks, returning the status after each one.
pub fn run_autonomous(sim: &mut Simulation, ticks: usize) -> Vec<SimStatus> {
    (0..ticks)
        .map(|_| {
            sim.step_autonomous();
            sim.status()
        })
        .collect()
}

/// Run manual ticks with a scripted input sequence.
pub fn run_manual(sim: &mut Simulation, inputs: &[ManualInput]) -> Vec<SimStatus> {
    inputs
        .iter()
        .map(|input| {
            sim.step_manual(input);
            sim.status()
        })
        .collect()
}
