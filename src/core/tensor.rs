//! Tensor type aliases used across the pipeline.

/// 2D tensor of f32 values, typically `(batch, classes)` model output.
pub type Tensor2D = ndarray::Array2<f32>;

/// 4D tensor of f32 values, typically `(batch, height, width, channels)`
/// model input.
pub type Tensor4D = ndarray::Array4<f32>;
