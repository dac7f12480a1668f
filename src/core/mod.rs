//! The core module of the classification pipeline.
//!
//! This module contains the fundamental components of the pipeline, including:
//! - Error handling
//! - Configuration management
//! - Constants used throughout the pipeline
//! - Tensor type aliases
//! - Inference engine integration
//!
//! It also provides re-exports of commonly used types and functions for
//! convenience.

pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;
pub mod tensor;

pub use config::ClassifierConfig;
pub use constants::*;
pub use errors::{ClassifierError, ClassifyResult, ProcessingStage};
pub use inference::{ModelBackend, ModelInvoker, ModelOutput, OrtModel};
pub use tensor::{Tensor2D, Tensor4D};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and
/// formatting layer. It's typically called at the start of an application to
/// enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
