//! Classification results.

use std::sync::Arc;

/// The outcome of classifying one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Index of the winning class in the model's output vector.
    pub class_id: usize,
    /// Human-readable label for the winning class.
    pub label: Arc<str>,
    /// Raw score of the winning class, as the model produced it.
    pub confidence: f32,
}

impl Prediction {
    /// Returns the confidence scaled to a percentage.
    pub fn confidence_percent(&self) -> f32 {
        self.confidence * 100.0
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.1}%)", self.label, self.confidence_percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_label_and_percent() {
        let prediction = Prediction {
            class_id: 1,
            label: Arc::from("not fractured"),
            confidence: 0.925,
        };
        assert_eq!(prediction.to_string(), "not fractured (92.5%)");
    }
}
