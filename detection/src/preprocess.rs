//! Image preprocessing: raw upload bytes to classifier input.
//!
//! Decode, force three RGB channels, resize to the model resolution and lay
//! the pixels out as an NHWC tensor with batch size 1. Values stay in their
//! native 0-255 range; the classifier was trained on unscaled pixels.

use crate::error::Result;
use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;

/// Spatial resolution the classifier expects.
pub const MODEL_INPUT_SIZE: u32 = 256;

/// Converts uploaded images into classifier tensors.
#[derive(Debug, Clone, Copy)]
pub struct ImagePreprocessor {
    width: u32,
    height: u32,
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(MODEL_INPUT_SIZE, MODEL_INPUT_SIZE)
    }
}

impl ImagePreprocessor {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Decode and convert in one step.
    pub fn prepare(&self, raw_bytes: &[u8]) -> Result<Array4<f32>> {
        let image = self.decode(raw_bytes)?;
        Ok(self.to_tensor(&image))
    }

    /// Decode to an 8-bit RGB pixel grid.
    ///
    /// Grayscale, alpha and 16-bit variants are converted; undecodable input
    /// surfaces as `DetectionError::ImageDecode`.
    pub fn decode(&self, raw_bytes: &[u8]) -> Result<RgbImage> {
        let image = image::load_from_memory(raw_bytes)?;
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "Decoded upload"
        );
        Ok(image.to_rgb8())
    }

    /// Resize (bilinear) and lay out as `[1, height, width, 3]`.
    pub fn to_tensor(&self, image: &RgbImage) -> Array4<f32> {
        let resized = imageops::resize(image, self.width, self.height, FilterType::Triangle);
        let shape = (1, self.height as usize, self.width as usize, 3);
        Array4::from_shape_fn(shape, |(_, y, x, c)| {
            resized.get_pixel(x as u32, y as u32)[c] as f32
        })
    }
}
