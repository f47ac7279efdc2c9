//! Background image samplers.

use super::ColorSampler;
use crate::error::Result;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use std::path::Path;

/// Color sampler backed by an RGB image
pub struct ImageSampler {
    pixels: RgbImage,
}

impl ImageSampler {
    /// Wrap an already decoded image
    pub fn from_image(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    /// Load a background image and scale it to the world size.
    ///
    /// Nearest-neighbor scaling keeps painted markings at their exact
    /// colors; smoothing would blend their edges below the yellow threshold.
    pub fn load<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)?.into_rgb8();
        let (src_w, src_h) = img.dimensions();

        let pixels = if (src_w, src_h) == (width, height) {
            img
        } else {
            log::info!(
                "[World] Scaling background {} from {}x{} to {}x{}",
                path.display(),
                src_w,
                src_h,
                width,
                height
            );
            imageops::resize(&img, width, height, FilterType::Nearest)
        };

        Ok(Self { pixels })
    }
}

impl ColorSampler for ImageSampler {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn color_at(&self, x: i32, y: i32) -> Option<Rgb<u8>> {
        if x < 0 || y < 0 {
            return None;
        }
        self.pixels.get_pixel_checked(x as u32, y as u32).copied()
    }
}

/// Uniform background with no markings, used when no image is configured
pub struct BlankSampler {
    width: u32,
    height: u32,
    color: Rgb<u8>,
}

impl BlankSampler {
    /// Dark asphalt-colored world of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            color: Rgb([60, 60, 60]),
        }
    }
}

impl ColorSampler for BlankSampler {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color_at(&self, x: i32, y: i32) -> Option<Rgb<u8>> {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            Some(self.color)
        } else {
            None
        }
    }
}
