//! Arg-max interpretation of classification scores.

use crate::core::errors::ClassifierError;
use crate::domain::Prediction;
use std::sync::Arc;

/// Turns a probability-like score vector into a labeled prediction.
///
/// The scores are trusted to produce a usable ranking, not necessarily a
/// normalized distribution: the maximum entry is reported as the confidence
/// without renormalization. Ties break toward the lowest index, matching
/// standard arg-max semantics.
#[derive(Debug, Clone)]
pub struct ArgMax {
    class_names: Vec<Arc<str>>,
}

impl ArgMax {
    /// Creates an interpreter from an ordered label list.
    ///
    /// The vector index corresponds to the class ID.
    pub fn from_class_names(class_names: Vec<String>) -> Self {
        Self {
            class_names: class_names.into_iter().map(Arc::from).collect(),
        }
    }

    /// Gets the number of classes in the label list.
    pub fn num_classes(&self) -> usize {
        self.class_names.len()
    }

    /// Selects the highest-scoring class and maps it to its label.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::Config` if the vector is empty or its
    /// length does not match the label list; that indicates mismatched
    /// deployment artifacts and must not silently mislabel.
    pub fn process(&self, scores: &[f32]) -> Result<Prediction, ClassifierError> {
        if scores.is_empty() {
            return Err(ClassifierError::config_error(
                "model returned an empty score vector",
            ));
        }
        if scores.len() != self.class_names.len() {
            return Err(ClassifierError::config_error(format!(
                "score vector length {} does not match label count {}",
                scores.len(),
                self.class_names.len()
            )));
        }

        let mut best = 0usize;
        for (idx, &score) in scores.iter().enumerate().skip(1) {
            // Strict comparison keeps the first occurrence on ties
            if score > scores[best] {
                best = idx;
            }
        }

        Ok(Prediction {
            class_id: best,
            label: Arc::clone(&self.class_names[best]),
            confidence: scores[best],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_labels() -> ArgMax {
        ArgMax::from_class_names(vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
        ])
    }

    #[test]
    fn test_argmax_selects_maximum() {
        let prediction = three_labels().process(&[0.1, 0.2, 0.7]).unwrap();
        assert_eq!(prediction.class_id, 2);
        assert_eq!(&*prediction.label, "c");
        assert_eq!(prediction.confidence, 0.7);
    }

    #[test]
    fn test_ties_break_toward_first_occurrence() {
        let prediction = three_labels().process(&[0.2, 0.9, 0.9]).unwrap();
        assert_eq!(prediction.class_id, 1);
        assert_eq!(&*prediction.label, "b");
    }

    #[test]
    fn test_confidence_is_not_renormalized() {
        // Entries do not sum to 1; the raw maximum is reported as-is
        let prediction = three_labels().process(&[3.0, 10.0, 5.0]).unwrap();
        assert_eq!(prediction.confidence, 10.0);
    }

    #[test]
    fn test_length_mismatch_is_config_error() {
        let result = three_labels().process(&[0.5, 0.5]);
        assert!(matches!(result, Err(ClassifierError::Config { .. })));
    }

    #[test]
    fn test_empty_vector_is_config_error() {
        let result = three_labels().process(&[]);
        assert!(matches!(result, Err(ClassifierError::Config { .. })));
    }
}
