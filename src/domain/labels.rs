//! Ordered class label lists.

use crate::core::errors::ClassifierError;

/// Returns the label list the bundled fracture model was trained with.
///
/// The order matches the model's output vector: index 0 is the fractured
/// class, index 1 the healthy one.
pub fn default_fracture_labels() -> Vec<String> {
    vec!["fractured".to_string(), "not fractured".to_string()]
}

/// An ordered, non-empty list of class labels.
///
/// The position of each label is its class ID, so the list must line up
/// one-to-one with the model's score vector.
#[derive(Debug, Clone)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Creates a label set from an ordered list.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::Config` if the list is empty or contains a
    /// blank label.
    pub fn new(labels: Vec<String>) -> Result<Self, ClassifierError> {
        if labels.is_empty() {
            return Err(ClassifierError::config_error("label list cannot be empty"));
        }
        if let Some(idx) = labels.iter().position(|l| l.trim().is_empty()) {
            return Err(ClassifierError::config_error(format!(
                "label at index {} is blank",
                idx
            )));
        }
        Ok(Self { labels })
    }

    /// Gets the number of classes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if the set holds no labels. Construction forbids this,
    /// so it only exists to satisfy the `len` convention.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Checks that the label count matches the model's output width.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::Config` on a mismatch so the problem
    /// surfaces as a deployment error, not a mislabeled prediction.
    pub fn validate_width(&self, output_width: usize) -> Result<(), ClassifierError> {
        if self.labels.len() != output_width {
            return Err(ClassifierError::config_error(format!(
                "model produces {} classes but {} labels were configured",
                output_width,
                self.labels.len()
            )));
        }
        Ok(())
    }

    /// Consumes the set, returning the ordered labels.
    pub fn into_labels(self) -> Vec<String> {
        self.labels
    }
}
