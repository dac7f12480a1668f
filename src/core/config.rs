//! Configuration for the classification pipeline.
//!
//! The configuration is static startup input: the model artifact path, the
//! ordered label list, and tuning knobs for the inference session. It can be
//! assembled in code with the builder-style setters or deserialized from a
//! JSON file.

use crate::core::constants::{DEFAULT_INPUT_HEIGHT, DEFAULT_INPUT_WIDTH};
use crate::core::errors::ClassifierError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the fracture classifier.
///
/// All fields are optional; `None` falls back to the documented default.
/// The ordered label list must match the model's output width, index for
/// index. That invariant is checked at build time when the model declares a
/// static output width, and on every prediction otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// The path to the ONNX model file (optional at construction, required
    /// to build unless a custom backend is supplied).
    pub model_path: Option<PathBuf>,
    /// The name of the model (optional, defaults to the file stem).
    pub model_name: Option<String>,
    /// Ordered label list; index i names class i of the model output.
    /// Defaults to the two-class fracture label set.
    pub labels: Option<Vec<String>>,
    /// Input shape for the model as (width, height). Defaults to 224x224.
    pub input_shape: Option<(u32, u32)>,
    /// Explicit output tensor name to read predictions from.
    ///
    /// When the model exposes multiple named outputs and no name is
    /// configured, the first output in the model's declared order is used.
    /// That ordering is an assumption about the export tooling, not a
    /// guarantee; configure a name to make selection deterministic.
    #[serde(default)]
    pub output_name: Option<String>,
    /// Bounded wait for a single model invocation, in milliseconds.
    ///
    /// If None, no timeout is imposed and a hung model call blocks the
    /// request indefinitely.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Size of the session pool to allow concurrent predictions (>=1).
    /// If None, defaults to 1 (single session).
    #[serde(default)]
    pub session_pool_size: Option<usize>,
}

impl ClassifierConfig {
    /// Creates a new ClassifierConfig with default values.
    pub fn new() -> Self {
        Self {
            model_path: None,
            model_name: None,
            labels: None,
            input_shape: None,
            output_name: None,
            timeout_ms: None,
            session_pool_size: Some(1),
        }
    }

    /// Sets the model path for the configuration.
    pub fn model_path(mut self, model_path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(model_path.into());
        self
    }

    /// Sets the model name for the configuration.
    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    /// Sets the ordered label list for the configuration.
    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Sets the model input shape as (width, height).
    pub fn input_shape(mut self, input_shape: (u32, u32)) -> Self {
        self.input_shape = Some(input_shape);
        self
    }

    /// Sets the explicit output tensor name to read predictions from.
    pub fn output_name(mut self, output_name: impl Into<String>) -> Self {
        self.output_name = Some(output_name.into());
        self
    }

    /// Sets the bounded wait for a single model invocation.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Sets the session pool size used for concurrent predictions (>=1).
    pub fn session_pool_size(mut self, size: usize) -> Self {
        self.session_pool_size = Some(size);
        self
    }

    /// Gets the effective input shape as (width, height).
    pub fn get_input_shape(&self) -> (u32, u32) {
        self.input_shape
            .unwrap_or((DEFAULT_INPUT_WIDTH, DEFAULT_INPUT_HEIGHT))
    }

    /// Gets the effective session pool size.
    pub fn get_session_pool_size(&self) -> usize {
        self.session_pool_size.unwrap_or(1)
    }

    /// Gets the effective invocation timeout, if one is configured.
    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&content).map_err(|e| {
            ClassifierError::config_error(format!(
                "failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// Ok if the configuration is valid, or a ClassifierError if validation
    /// fails.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if let Some(labels) = &self.labels {
            if labels.is_empty() {
                return Err(ClassifierError::config_error(
                    "label list must not be empty",
                ));
            }
            if labels.iter().any(|l| l.trim().is_empty()) {
                return Err(ClassifierError::config_error(
                    "label names must not be blank",
                ));
            }
        }

        if let Some((width, height)) = self.input_shape
            && (width == 0 || height == 0)
        {
            return Err(ClassifierError::config_error(format!(
                "input shape dimensions must be greater than 0, got {}x{}",
                width, height
            )));
        }

        if let Some(timeout_ms) = self.timeout_ms
            && timeout_ms == 0
        {
            return Err(ClassifierError::config_error(
                "timeout_ms must be greater than 0 when set",
            ));
        }

        if let Some(pool) = self.session_pool_size
            && pool == 0
        {
            return Err(ClassifierError::config_error(
                "session_pool_size must be >= 1",
            ));
        }

        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_pattern() {
        let config = ClassifierConfig::new()
            .model_path("model.onnx")
            .model_name("fracture")
            .labels(vec!["fractured".to_string(), "not fractured".to_string()])
            .input_shape((224, 224))
            .output_name("sequential/dense/Softmax")
            .timeout(Duration::from_millis(750))
            .session_pool_size(2);

        assert_eq!(config.model_name, Some("fracture".to_string()));
        assert_eq!(config.get_input_shape(), (224, 224));
        assert_eq!(config.get_timeout(), Some(Duration::from_millis(750)));
        assert_eq!(config.get_session_pool_size(), 2);
    }

    #[test]
    fn test_validation_rejects_empty_labels() {
        let config = ClassifierConfig::new().labels(vec![]);
        assert!(config.validate().is_err());

        let config = ClassifierConfig::new().labels(vec!["".to_string()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_values() {
        assert!(ClassifierConfig::new().input_shape((0, 224)).validate().is_err());
        assert!(ClassifierConfig::new().session_pool_size(0).validate().is_err());
        assert!(
            ClassifierConfig {
                timeout_ms: Some(0),
                ..ClassifierConfig::new()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_defaults() {
        let config = ClassifierConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.get_input_shape(), (224, 224));
        assert_eq!(config.get_session_pool_size(), 1);
        assert!(config.get_timeout().is_none());
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"{
            "model_path": "model.onnx",
            "model_name": "fracture",
            "labels": ["fractured", "not fractured"],
            "input_shape": [224, 224],
            "output_name": "output_0",
            "timeout_ms": 1000,
            "session_pool_size": 1
        }"#;

        let config: ClassifierConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.output_name, Some("output_0".to_string()));
        assert_eq!(config.labels.as_ref().map(|l| l.len()), Some(2));
        assert!(config.validate().is_ok());
    }
}
