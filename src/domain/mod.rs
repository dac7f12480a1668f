//! Domain types for fracture classification.

pub mod labels;
pub mod prediction;

pub use labels::{LabelSet, default_fracture_labels};
pub use prediction::Prediction;
