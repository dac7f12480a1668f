//! ONNX Runtime backend with support for pooled, configurable sessions.

use super::{ModelBackend, ModelOutput};
use crate::core::errors::ClassifierError;
use crate::core::tensor::{Tensor2D, Tensor4D};
use ndarray::ArrayView2;
use ort::logging::LogLevel;
use ort::session::Session;
use ort::value::{TensorRef, ValueType};
use std::path::Path;
use std::sync::Mutex;

/// ONNX Runtime implementation of [`ModelBackend`].
///
/// Holds a small pool of sessions dispatched round-robin so the shared,
/// read-only model can be invoked from multiple threads without serializing
/// every request on a single session lock.
pub struct OrtModel {
    sessions: Vec<Mutex<Session>>,
    next_idx: std::sync::atomic::AtomicUsize,
    input_name: String,
    preferred_output: Option<String>,
    model_path: std::path::PathBuf,
    model_name: String,
}

impl std::fmt::Debug for OrtModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtModel")
            .field("sessions", &self.sessions.len())
            .field("input_name", &self.input_name)
            .field("preferred_output", &self.preferred_output)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtModel {
    /// Loads a model with default ONNX Runtime settings and a single session.
    pub fn new(model_path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        Self::load(model_path, None, None, 1)
    }

    /// Loads a model with the given output preference and session pool size.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path to the ONNX model file.
    /// * `model_name` - Name used in errors and logs; defaults to the file
    ///   stem.
    /// * `preferred_output` - Output tensor consulted when reporting the
    ///   model's declared output width.
    /// * `pool_size` - Number of pooled sessions (minimum 1).
    pub fn load(
        model_path: impl AsRef<Path>,
        model_name: Option<&str>,
        preferred_output: Option<&str>,
        pool_size: usize,
    ) -> Result<Self, ClassifierError> {
        let path = model_path.as_ref();
        let pool_size = pool_size.max(1);
        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            // Error log level suppresses ORT's own chatter
            let session = Session::builder()?
                .with_log_level(LogLevel::Error)?
                .commit_from_file(path)
                .map_err(|e| {
                    ClassifierError::model_load_error(
                        path,
                        "failed to create ONNX session",
                        Some("verify model file exists and is readable"),
                        Some(e),
                    )
                })?;
            sessions.push(Mutex::new(session));
        }

        let model_name = model_name
            .map(|s| s.to_string())
            .or_else(|| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or_else(|| "unknown_model".to_string());

        let input_name = {
            let session = sessions[0].lock().map_err(|_| {
                ClassifierError::invalid_input("failed to acquire session lock")
            })?;
            session
                .inputs
                .first()
                .map(|input| input.name.clone())
                .ok_or_else(|| {
                    ClassifierError::model_load_error(
                        path,
                        "model declares no inputs",
                        Some("verify the export produced a valid inference graph"),
                        None::<std::io::Error>,
                    )
                })?
        };

        Ok(OrtModel {
            sessions,
            next_idx: std::sync::atomic::AtomicUsize::new(0),
            input_name,
            preferred_output: preferred_output.map(|s| s.to_string()),
            model_path: path.to_path_buf(),
            model_name,
        })
    }

    /// Returns the model path associated with this backend.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Returns the names of the model's declared outputs, in order.
    pub fn declared_output_names(&self) -> Result<Vec<String>, ClassifierError> {
        let session = self.sessions[0]
            .lock()
            .map_err(|_| ClassifierError::invalid_input("failed to acquire session lock"))?;
        Ok(session.outputs.iter().map(|o| o.name.clone()).collect())
    }

    /// Reads the static last dimension of an output's declared tensor shape.
    ///
    /// Dynamic dimensions (e.g. -1) yield None.
    fn declared_width_of(&self, output_name: Option<&str>) -> Option<usize> {
        let session = self.sessions.first()?.lock().ok()?;
        let output = match output_name {
            Some(name) => session.outputs.iter().find(|o| o.name == name)?,
            None => session.outputs.first()?,
        };
        match &output.output_type {
            ValueType::Tensor { shape, .. } => {
                let last = shape.iter().copied().last()?;
                usize::try_from(last).ok()
            }
            _ => None,
        }
    }

    /// Builds a `(1, classes)` tensor from a raw output, accepting either a
    /// bare vector or a single-item batch.
    fn vector_from_raw(shape: &[i64], data: &[f32]) -> Option<Tensor2D> {
        let dims: Vec<usize> = shape.iter().map(|&d| d.max(0) as usize).collect();
        match dims.as_slice() {
            [n] if data.len() == *n => {
                ArrayView2::from_shape((1, *n), data).ok().map(|v| v.to_owned())
            }
            [batch, n] if data.len() == batch * n => {
                ArrayView2::from_shape((*batch, *n), data)
                    .ok()
                    .map(|v| v.to_owned())
            }
            _ => None,
        }
    }
}

impl ModelBackend for OrtModel {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn output_width(&self) -> Option<usize> {
        self.declared_width_of(self.preferred_output.as_deref())
    }

    fn run(&self, input: &Tensor4D) -> Result<ModelOutput, ClassifierError> {
        let input_shape = input.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(input.view()).map_err(|e| {
            ClassifierError::inference_error(
                &self.model_name,
                &format!(
                    "failed to convert input tensor with shape {:?}",
                    input_shape
                ),
                e,
            )
        })?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let idx = self
            .next_idx
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            % self.sessions.len();
        let mut session_guard = self.sessions[idx].lock().map_err(|_| {
            ClassifierError::invalid_input(format!(
                "failed to acquire session lock for session {}/{}",
                idx,
                self.sessions.len()
            ))
        })?;

        // Collect declared output names before running (avoid borrow conflicts later)
        let output_names: Vec<String> = session_guard
            .outputs
            .iter()
            .map(|o| o.name.clone())
            .collect();

        let outputs = session_guard.run(inputs).map_err(|e| {
            ClassifierError::inference_error(
                &self.model_name,
                &format!(
                    "ONNX Runtime inference failed with input '{}' and shape {:?}",
                    self.input_name, input_shape
                ),
                e,
            )
        })?;

        let mut entries: Vec<(String, Tensor2D)> = Vec::with_capacity(output_names.len());
        for name in &output_names {
            // Non-f32 or non-vector outputs are skipped; the score head is
            // always an f32 vector.
            let Ok((shape, data)) = outputs[name.as_str()].try_extract_tensor::<f32>() else {
                continue;
            };
            if let Some(tensor) = Self::vector_from_raw(shape, data) {
                entries.push((name.clone(), tensor));
            }
        }

        if entries.is_empty() {
            return Err(ClassifierError::inference_message(
                &self.model_name,
                format!(
                    "no f32 score vector among outputs {:?}",
                    output_names
                ),
            ));
        }

        Ok(ModelOutput::Named(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_model_fails() {
        let result = OrtModel::new("does_not_exist.onnx");
        assert!(result.is_err());
    }

    #[test]
    fn test_vector_from_raw_accepts_bare_and_batched() {
        let bare = OrtModel::vector_from_raw(&[2], &[0.1, 0.9]).unwrap();
        assert_eq!(bare.shape(), &[1, 2]);

        let batched = OrtModel::vector_from_raw(&[1, 2], &[0.1, 0.9]).unwrap();
        assert_eq!(batched.shape(), &[1, 2]);

        assert!(OrtModel::vector_from_raw(&[1, 2, 2], &[0.0; 4]).is_none());
        assert!(OrtModel::vector_from_raw(&[3], &[0.0; 2]).is_none());
    }
}
