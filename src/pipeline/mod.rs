//! The end-to-end fracture classification pipeline.
//!
//! [`FractureClassifier`] is the crate's main entry point. It wires the
//! stages together: decode the image bytes, normalize them into the model's
//! input tensor, invoke the model once, and interpret the score vector into
//! a labeled [`Prediction`]. The classifier is stateless between requests
//! and safe to share across threads.

use crate::core::config::ClassifierConfig;
use crate::core::errors::{ClassifierError, ClassifyResult};
use crate::core::inference::{ModelBackend, ModelInvoker, OrtModel};
use crate::domain::{LabelSet, Prediction, default_fracture_labels};
use crate::processors::{ArgMax, ImageNormalizer};
use crate::utils::image::{decode_image, load_image, load_images_batch};
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, instrument};

#[cfg(test)]
#[path = "tests.rs"]
mod tests;

/// Classifies bone X-ray images as fractured or healthy.
///
/// Build one with [`FractureClassifierBuilder`] at startup and reuse it for
/// every request. Each classify call invokes the model exactly once.
#[derive(Debug)]
pub struct FractureClassifier {
    model_name: String,
    normalizer: ImageNormalizer,
    invoker: ModelInvoker,
    interpreter: ArgMax,
}

impl FractureClassifier {
    /// Creates a builder for configuring a classifier.
    pub fn builder() -> FractureClassifierBuilder {
        FractureClassifierBuilder::new()
    }

    /// Loads a classifier from a model file with default settings.
    pub fn new(model_path: impl AsRef<Path>) -> ClassifyResult<Self> {
        Self::builder().model_path(model_path.as_ref()).build()
    }

    /// Returns the name of the underlying model.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Classifies an image from its raw encoded bytes.
    ///
    /// Decoding happens first, so corrupt or unsupported bytes fail before
    /// any model work.
    pub fn classify_bytes(&self, bytes: &[u8]) -> ClassifyResult<Prediction> {
        let img = decode_image(bytes)?;
        self.classify_image(&img)
    }

    /// Classifies an already-decoded image.
    #[instrument(skip_all, fields(model = %self.model_name))]
    pub fn classify_image(&self, img: &DynamicImage) -> ClassifyResult<Prediction> {
        let input = self.normalizer.normalize(img)?;
        let scores = self.invoker.invoke(input)?;
        let prediction = self.interpreter.process(&scores)?;
        debug!(
            class_id = prediction.class_id,
            label = %prediction.label,
            confidence = prediction.confidence,
            "classified image"
        );
        Ok(prediction)
    }

    /// Reads, decodes, and classifies an image file.
    pub fn classify_path(&self, path: impl AsRef<Path>) -> ClassifyResult<Prediction> {
        let img = load_image(path)?;
        self.classify_image(&img)
    }

    /// Classifies a batch of image files.
    ///
    /// File loading is parallelized for large batches; the model is still
    /// invoked once per image, in order. The first failure aborts the batch.
    pub fn classify_paths(
        &self,
        paths: &[impl AsRef<Path> + Sync],
    ) -> ClassifyResult<Vec<Prediction>> {
        let images = load_images_batch(paths)?;
        images.iter().map(|img| self.classify_image(img)).collect()
    }
}

/// Builder for [`FractureClassifier`].
///
/// Wraps a [`ClassifierConfig`] and optionally a custom [`ModelBackend`]
/// standing in for the default ONNX Runtime one.
#[derive(Debug, Default)]
pub struct FractureClassifierBuilder {
    config: ClassifierConfig,
    backend: Option<Arc<dyn ModelBackend>>,
}

impl FractureClassifierBuilder {
    /// Creates a builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::new(),
            backend: None,
        }
    }

    /// Starts from an existing configuration, e.g. one read from JSON.
    pub fn from_config(config: ClassifierConfig) -> Self {
        Self {
            config,
            backend: None,
        }
    }

    /// Sets the path to the ONNX model file.
    pub fn model_path(mut self, model_path: impl Into<std::path::PathBuf>) -> Self {
        self.config = self.config.model_path(model_path);
        self
    }

    /// Sets the model name used in errors and logs.
    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.config = self.config.model_name(model_name);
        self
    }

    /// Sets the ordered label list. Index i names class i of the model
    /// output.
    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.config = self.config.labels(labels);
        self
    }

    /// Sets the model input shape as (width, height).
    pub fn input_shape(mut self, input_shape: (u32, u32)) -> Self {
        self.config = self.config.input_shape(input_shape);
        self
    }

    /// Sets the explicit output tensor name to read predictions from.
    pub fn output_name(mut self, output_name: impl Into<String>) -> Self {
        self.config = self.config.output_name(output_name);
        self
    }

    /// Sets the bounded wait for a single model invocation.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Sets the session pool size for concurrent predictions.
    pub fn session_pool_size(mut self, size: usize) -> Self {
        self.config = self.config.session_pool_size(size);
        self
    }

    /// Substitutes a custom model backend for the default ONNX Runtime one.
    ///
    /// When set, `model_path` is not required.
    pub fn backend(mut self, backend: Arc<dyn ModelBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Builds the classifier, loading the model if needed.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::Config` if the configuration is invalid or
    /// the label count disagrees with the model's declared output width, and
    /// `ClassifierError::ModelLoad` if the model artifact cannot be loaded.
    pub fn build(self) -> ClassifyResult<FractureClassifier> {
        self.config.validate()?;

        let backend: Arc<dyn ModelBackend> = match self.backend {
            Some(backend) => backend,
            None => {
                let model_path = self.config.model_path.as_ref().ok_or_else(|| {
                    ClassifierError::config_error(
                        "model_path is required unless a custom backend is supplied",
                    )
                })?;
                Arc::new(OrtModel::load(
                    model_path,
                    self.config.model_name.as_deref(),
                    self.config.output_name.as_deref(),
                    self.config.get_session_pool_size(),
                )?)
            }
        };

        let labels = LabelSet::new(
            self.config
                .labels
                .clone()
                .unwrap_or_else(default_fracture_labels),
        )?;

        // Models with dynamic output dims defer this check to per-call
        // interpretation
        if let Some(width) = backend.output_width() {
            labels.validate_width(width)?;
        }

        let model_name = backend.name().to_string();
        let (width, height) = self.config.get_input_shape();
        let invoker = ModelInvoker::new(
            backend,
            self.config.output_name.clone(),
            self.config.get_timeout(),
        );

        debug!(
            model = %model_name,
            classes = labels.len(),
            input = %format!("{}x{}", width, height),
            "classifier ready"
        );

        Ok(FractureClassifier {
            model_name,
            normalizer: ImageNormalizer::new(width, height),
            invoker,
            interpreter: ArgMax::from_class_names(labels.into_labels()),
        })
    }
}
