//! # Fracture Detect
//!
//! An image-to-prediction inference pipeline for bone fracture X-ray
//! classification.
//!
//! The crate accepts arbitrary user-supplied image bytes (file upload or
//! camera capture), normalizes them into the fixed tensor shape a pretrained
//! convolutional classifier expects, invokes the model once, and interprets
//! the output as a labeled, confidence-scored result. The model itself is an
//! opaque external artifact consumed through ONNX Runtime; this crate does
//! not train or evaluate it.
//!
//! ## Modules
//!
//! * [`core`] - Error handling, configuration, tensor aliases, and the
//!   inference engine
//! * [`domain`] - Label sets and prediction results
//! * [`processors`] - Image normalization and score interpretation
//! * [`pipeline`] - The high-level classifier and its builder
//! * [`utils`] - Image decoding and loading helpers

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    // Error handling
    pub use crate::core::{ClassifierError, ClassifyResult};

    // Domain types
    pub use crate::domain::{LabelSet, Prediction, default_fracture_labels};

    // Inference seam
    pub use crate::core::inference::{ModelBackend, ModelOutput, OrtModel};

    // Image utilities
    pub use crate::utils::{decode_image, load_image};

    // High-level API
    pub use crate::pipeline::{FractureClassifier, FractureClassifierBuilder};
}
