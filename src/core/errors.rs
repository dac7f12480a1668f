//! Error types for the classification pipeline.
//!
//! This module defines the errors that can occur between receiving raw image
//! bytes and producing a labeled prediction: image decoding errors,
//! processing errors, model invocation errors, and configuration errors. It
//! also provides utility functions for creating these errors with
//! appropriate context.
//!
//! The taxonomy follows the request lifecycle: decode failures are
//! recoverable per request (the user can retry with a different image),
//! invocation failures end the current request without retry, and
//! configuration failures block startup entirely rather than risk a silently
//! mislabeled result.

use thiserror::Error;

/// Convenient result alias for pipeline operations.
pub type ClassifyResult<T> = Result<T, ClassifierError>;

/// Enum representing different stages of processing in the pipeline.
///
/// This enum is used to identify which stage of the pipeline an error
/// occurred in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingStage {
    /// Error occurred during tensor operations.
    TensorOperation,
    /// Error occurred during image normalization.
    Normalization,
    /// Error occurred during image resizing.
    Resize,
    /// Error occurred while interpreting model output.
    PostProcessing,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::TensorOperation => write!(f, "tensor operation"),
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::Resize => write!(f, "resize"),
            ProcessingStage::PostProcessing => write!(f, "post-processing"),
        }
    }
}

/// Enum representing various errors that can occur in the pipeline.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// The input bytes could not be decoded as an image.
    ///
    /// Recoverable per request: the process stays usable and the caller may
    /// retry with different input.
    #[error("image decode")]
    ImageDecode(#[source] image::ImageError),

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The model failed to execute or returned malformed output.
    ///
    /// Ends the current request; there is no transient-failure model for a
    /// local in-process call, so no retry is attempted.
    #[error("inference failed for model '{model_name}': {context}")]
    Inference {
        /// The name of the model where inference failed.
        model_name: String,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The model did not answer within the configured bounded wait.
    ///
    /// The hung invocation is abandoned, not cancelled; the request ends and
    /// the process stays usable.
    #[error("model '{model_name}' did not answer within {waited_ms} ms")]
    ModelTimeout {
        /// The name of the model that timed out.
        model_name: String,
        /// How long the caller waited before giving up, in milliseconds.
        waited_ms: u64,
    },

    /// The model artifact could not be loaded at startup.
    #[error("model load failed for '{model_path}': {reason}{suggestion}")]
    ModelLoad {
        /// Path to the model file.
        model_path: String,
        /// Short reason description.
        reason: String,
        /// Optional suggestion, pre-formatted with a leading separator.
        suggestion: String,
        /// The underlying error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating mismatched deployment artifacts or an invalid
    /// configuration. Treated as startup-blocking: the pipeline refuses to
    /// serve predictions rather than guess a label.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Implementation of ClassifierError with utility functions for creating
/// errors.
impl ClassifierError {
    /// Creates a ClassifierError for normalization operations.
    ///
    /// # Arguments
    ///
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn normalization(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind: ProcessingStage::Normalization,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a ClassifierError for post-processing operations.
    ///
    /// # Arguments
    ///
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn post_processing(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind: ProcessingStage::PostProcessing,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a ClassifierError for inference operations with model context.
    ///
    /// # Arguments
    ///
    /// * `model_name` - The name of the model where inference failed.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn inference_error(
        model_name: &str,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.to_string(),
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a ClassifierError for inference failures described only by a
    /// message, with no underlying error to chain.
    pub fn inference_message(model_name: &str, context: impl Into<String>) -> Self {
        Self::Inference {
            model_name: model_name.to_string(),
            context: context.into(),
            source: Box::new(OpaqueError("model invocation failed".to_string())),
        }
    }

    /// Creates a ClassifierError for invalid input.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a ClassifierError for configuration errors.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a ClassifierError for model load failures with contextual
    /// suggestions.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path to the model file
    /// * `reason` - Short reason description
    /// * `suggestion` - Optional suggestion message (without punctuation)
    /// * `source` - Optional underlying error
    pub fn model_load_error(
        model_path: impl AsRef<std::path::Path>,
        reason: impl Into<String>,
        suggestion: Option<&str>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        let suggestion = suggestion
            .map(|s| format!("; suggested fix: {}", s))
            .unwrap_or_default();
        Self::ModelLoad {
            model_path: model_path.as_ref().display().to_string(),
            reason: reason.into(),
            suggestion,
            source: source.map(|e| Box::new(e) as _),
        }
    }

    /// Returns true if the caller can recover by retrying with different
    /// input, false if the failure indicates a broken deployment.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Config { .. } | Self::ModelLoad { .. }
        )
    }
}

/// Implementation of From<image::ImageError> for ClassifierError.
///
/// This allows image::ImageError to be automatically converted to
/// ClassifierError.
impl From<image::ImageError> for ClassifierError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageDecode(error)
    }
}

/// A string-only error used when no underlying error exists to chain.
#[derive(Debug)]
pub struct OpaqueError(pub String);

impl std::fmt::Display for OpaqueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for OpaqueError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_not_recoverable() {
        let error = ClassifierError::config_error("label count mismatch");
        assert!(!error.is_recoverable());

        let error = ClassifierError::model_load_error(
            "model.onnx",
            "file missing",
            Some("check the path"),
            None::<std::io::Error>,
        );
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_request_errors_are_recoverable() {
        let error = ClassifierError::invalid_input("empty upload");
        assert!(error.is_recoverable());

        let error = ClassifierError::ModelTimeout {
            model_name: "fracture".to_string(),
            waited_ms: 500,
        };
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_model_load_error_message_includes_suggestion() {
        let error = ClassifierError::model_load_error(
            "model.onnx",
            "failed to create ONNX session",
            Some("verify model file exists and is readable"),
            None::<std::io::Error>,
        );
        let message = error.to_string();
        assert!(message.contains("model.onnx"));
        assert!(message.contains("suggested fix"));
    }
}
