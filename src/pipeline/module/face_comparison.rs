use ndarray::ArrayView1;
use crate::pipeline::model_config::config::FaceComparisonConfig;

#[derive(Debug, Clone, Copy)]
pub struct FaceComparison {
    tolerance: f64,
}

impl FaceComparison {
    pub fn new(cfg: FaceComparisonConfig) -> Self {
        FaceComparison {
            tolerance: cfg.tolerance,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// True when both encodings have the same length and lie within tolerance.
    pub fn compare(&self, known: &[f64], candidate: &[f64]) -> bool {
        match face_distance(known, candidate) {
            Some(distance) => distance <= self.tolerance,
            None => false,
        }
    }

    /// Index of the first known encoding matching `candidate`. Input order decides, not distance.
    pub fn find_first_match(&self, known_encodings: &[Vec<f64>], candidate: &[f64]) -> Option<usize> {
        known_encodings
            .iter()
            .position(|known| self.compare(known, candidate))
    }
}

/// Euclidean distance between two encodings, `None` when their lengths differ.
pub fn face_distance(known: &[f64], candidate: &[f64]) -> Option<f64> {
    if known.len() != candidate.len() || known.is_empty() {
        return None
    }

    let diff = &ArrayView1::from(known) - &ArrayView1::from(candidate);
    Some(diff.dot(&diff).sqrt())
}
