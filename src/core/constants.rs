//! Constants used throughout the classification pipeline.

/// Default model input width in pixels.
pub const DEFAULT_INPUT_WIDTH: u32 = 224;

/// Default model input height in pixels.
pub const DEFAULT_INPUT_HEIGHT: u32 = 224;

/// Midpoint of the 8-bit pixel range used for normalization.
///
/// Pixel values are mapped to `[-1, 1]` as `(value / 127.5) - 1.0`, matching
/// the Teachable-Machine-style normalization the model was trained with.
pub const PIXEL_MIDPOINT: f32 = 127.5;

/// Number of color channels the model expects.
pub const INPUT_CHANNELS: usize = 3;

/// Threshold above which batch image loading switches to parallel mode.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 8;
