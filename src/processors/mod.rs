//! Image and score processors for the classification pipeline.

pub mod argmax;
pub mod normalize;

pub use argmax::ArgMax;
pub use normalize::ImageNormalizer;
