//! Model invocation for the classification pipeline.
//!
//! The pretrained classifier is an opaque external artifact. This module
//! defines the narrow seam the pipeline consumes it through: a
//! [`ModelBackend`] maps a fixed-shape input tensor to either a bare score
//! vector or a mapping of named output tensors, and the [`ModelInvoker`]
//! normalizes that into the single 1-D score vector downstream code expects.
//! Any trained-artifact format can be substituted behind the trait without
//! touching the rest of the pipeline.

use crate::core::errors::ClassifierError;
use crate::core::tensor::{Tensor2D, Tensor4D};
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;
use tracing::debug;

#[path = "ort_model.rs"]
mod ort_model;

pub use ort_model::OrtModel;

/// Raw output of one model invocation.
///
/// Depending on export tooling, a model may produce a bare score tensor or a
/// set of named output tensors. Both carry a leading batch dimension.
#[derive(Debug, Clone)]
pub enum ModelOutput {
    /// A single unnamed score tensor of shape `(batch, classes)`.
    Vector(Tensor2D),
    /// Named output tensors in the model's declared order.
    Named(Vec<(String, Tensor2D)>),
}

/// An opaque, inference-time-stateless model.
///
/// Implementations must be safe to invoke repeatedly and concurrently; the
/// pipeline loads one backend at startup and shares it read-only for the
/// process lifetime.
pub trait ModelBackend: Send + Sync + std::fmt::Debug {
    /// Returns the model's name, used in error and log messages.
    fn name(&self) -> &str;

    /// Returns the model's declared output width (class count), if static.
    ///
    /// Models exported with dynamic output dimensions return None; the label
    /// count check then happens on every prediction instead of at startup.
    fn output_width(&self) -> Option<usize>;

    /// Runs the model's single inference entry point exactly once.
    fn run(&self, input: &Tensor4D) -> Result<ModelOutput, ClassifierError>;
}

/// Wraps a [`ModelBackend`] behind a uniform calling convention.
///
/// The invoker owns the two policies the raw backend leaves open: which
/// named output to read predictions from, and how long to wait for an
/// answer. Each call invokes the backend exactly once; there is no batching
/// across requests and no caching of results.
#[derive(Debug)]
pub struct ModelInvoker {
    backend: Arc<dyn ModelBackend>,
    output_name: Option<String>,
    timeout: Option<Duration>,
}

impl ModelInvoker {
    /// Creates a new invoker around the given backend.
    ///
    /// # Arguments
    ///
    /// * `backend` - The model to invoke.
    /// * `output_name` - Explicit output tensor to read predictions from.
    ///   With None, the first output in the model's declared order is used.
    /// * `timeout` - Bounded wait per invocation. With None the caller
    ///   blocks until the model answers.
    pub fn new(
        backend: Arc<dyn ModelBackend>,
        output_name: Option<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            backend,
            output_name,
            timeout,
        }
    }

    /// Returns the name of the wrapped model.
    pub fn model_name(&self) -> &str {
        self.backend.name()
    }

    /// Returns the wrapped model's declared output width, if static.
    pub fn output_width(&self) -> Option<usize> {
        self.backend.output_width()
    }

    /// Invokes the model once and returns the selected score vector with the
    /// batch dimension removed.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::Inference` if the model fails or returns a
    /// malformed shape, `ClassifierError::ModelTimeout` if a bounded wait is
    /// configured and elapses, and `ClassifierError::Config` if a configured
    /// output name is absent from the model's outputs.
    pub fn invoke(&self, input: Tensor4D) -> Result<Vec<f32>, ClassifierError> {
        let output = match self.timeout {
            Some(limit) => self.run_bounded(input, limit)?,
            None => self.backend.run(&input)?,
        };
        self.select_vector(output)
    }

    /// Runs the backend on a worker thread and waits at most `limit`.
    ///
    /// On timeout the worker is abandoned, not cancelled: it may still be
    /// executing inside the model when this returns. The send into the
    /// disconnected channel is discarded.
    fn run_bounded(
        &self,
        input: Tensor4D,
        limit: Duration,
    ) -> Result<ModelOutput, ClassifierError> {
        let (tx, rx) = mpsc::channel();
        let backend = Arc::clone(&self.backend);
        std::thread::Builder::new()
            .name("model-invoke".to_string())
            .spawn(move || {
                let _ = tx.send(backend.run(&input));
            })?;

        match rx.recv_timeout(limit) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(ClassifierError::ModelTimeout {
                model_name: self.backend.name().to_string(),
                waited_ms: limit.as_millis() as u64,
            }),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(ClassifierError::inference_message(
                self.backend.name(),
                "model invocation thread exited without producing a result",
            )),
        }
    }

    /// Reduces a raw model output to a single 1-D score vector.
    fn select_vector(&self, output: ModelOutput) -> Result<Vec<f32>, ClassifierError> {
        let tensor = match output {
            ModelOutput::Vector(tensor) => tensor,
            ModelOutput::Named(entries) => {
                if entries.is_empty() {
                    return Err(ClassifierError::inference_message(
                        self.backend.name(),
                        "model produced no score outputs",
                    ));
                }
                match &self.output_name {
                    Some(name) => {
                        entries
                            .into_iter()
                            .find(|(n, _)| n == name)
                            .ok_or_else(|| {
                                ClassifierError::config_error(format!(
                                    "configured output '{}' not found among model outputs",
                                    name
                                ))
                            })?
                            .1
                    }
                    None => {
                        if entries.len() > 1 {
                            debug!(
                                model = self.backend.name(),
                                outputs = entries.len(),
                                selected = %entries[0].0,
                                "multiple named outputs; taking first in declared order"
                            );
                        }
                        let mut entries = entries;
                        entries.swap_remove(0).1
                    }
                }
            }
        };

        if tensor.nrows() != 1 {
            return Err(ClassifierError::inference_message(
                self.backend.name(),
                format!(
                    "expected a single-item batch in model output, got batch size {}",
                    tensor.nrows()
                ),
            ));
        }

        Ok(tensor.row(0).to_vec())
    }
}
