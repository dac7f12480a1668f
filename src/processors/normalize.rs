//! Image normalization for model input.
//!
//! This module converts an arbitrary decoded image into the exact tensor the
//! pretrained classifier expects: 224x224, 3-channel RGB, float32 scaled to
//! `[-1, 1]`, with a leading batch dimension. The steps are deterministic
//! and must match the training-side normalization exactly for prediction
//! fidelity.

use crate::core::constants::{INPUT_CHANNELS, PIXEL_MIDPOINT};
use crate::core::errors::ClassifierError;
use crate::core::tensor::Tensor4D;
use image::{DynamicImage, imageops};

/// Normalizes decoded images into fixed-shape model input tensors.
///
/// The resize is a plain stretch to the target dimensions: aspect ratio is
/// NOT preserved. This mirrors the normalization the model was trained
/// with, so it must not be "fixed" to a crop-preserving policy without
/// retraining.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
}

impl ImageNormalizer {
    /// Creates a normalizer targeting the given (width, height).
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Converts a decoded image into a `(1, height, width, 3)` f32 tensor
    /// with every value in `[-1, 1]`.
    ///
    /// Steps, in order:
    /// 1. Force 3-channel RGB (drop alpha, expand grayscale).
    /// 2. Resize to exactly `width` x `height`.
    /// 3. Scale each byte as `(value / 127.5) - 1.0`.
    /// 4. Add a leading batch dimension of 1.
    ///
    /// Pure function of the input pixels; identical inputs produce
    /// bit-identical tensors.
    pub fn normalize(&self, img: &DynamicImage) -> Result<Tensor4D, ClassifierError> {
        let rgb = img.to_rgb8();
        // Bicubic resample, same as the training pipeline
        let resized = imageops::resize(
            &rgb,
            self.width,
            self.height,
            imageops::FilterType::CatmullRom,
        );

        let (width, height) = resized.dimensions();
        let mut data = vec![0.0f32; (height * width) as usize * INPUT_CHANNELS];

        for y in 0..height {
            for x in 0..width {
                let pixel = resized.get_pixel(x, y);
                let base = ((y * width + x) as usize) * INPUT_CHANNELS;
                for c in 0..INPUT_CHANNELS {
                    data[base + c] = f32::from(pixel[c]) / PIXEL_MIDPOINT - 1.0;
                }
            }
        }

        ndarray::Array4::from_shape_vec(
            (1, height as usize, width as usize, INPUT_CHANNELS),
            data,
        )
        .map_err(|e| {
            ClassifierError::normalization(
                &format!(
                    "failed to create HWC tensor for {}x{} image",
                    width, height
                ),
                e,
            )
        })
    }
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        use crate::core::constants::{DEFAULT_INPUT_HEIGHT, DEFAULT_INPUT_WIDTH};
        Self::new(DEFAULT_INPUT_WIDTH, DEFAULT_INPUT_HEIGHT)
    }
}
