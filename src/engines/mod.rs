pub mod face_bridge;
pub mod pdf;
pub mod tesseract;

pub use face_bridge::FaceBridge;
pub use tesseract::TesseractBridge;

use anyhow::Result;
use image::DynamicImage;

/// A face feature vector (128 dimensions with the default model).
pub type FaceEncoding = Vec<f64>;

/// Text-from-image collaborator. Output is best effort: it may be empty or
/// noisy and carries no structural guarantees.
pub trait TextEngine: Send + Sync {
    fn extract_text(&self, image: &DynamicImage) -> Result<String>;
}

/// Face encode/compare collaborator.
pub trait FaceEngine: Send + Sync {
    /// Extract a feature vector, or `None` when no face is detected.
    fn encode(&self, image: &DynamicImage) -> Result<Option<FaceEncoding>>;

    /// Whether two encodings are the same person. Lower tolerance is
    /// stricter.
    fn compare(&self, reference: &FaceEncoding, candidate: &FaceEncoding, tolerance: f64) -> bool {
        euclidean_distance(reference, candidate) <= tolerance
    }
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_of_identical_vectors_is_zero() {
        let v = vec![0.25; 128];
        assert_eq!(euclidean_distance(&v, &v), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = vec![0.0, 1.0, 2.0];
        let b = vec![1.0, 1.0, 0.0];
        assert_eq!(euclidean_distance(&a, &b), euclidean_distance(&b, &a));
        assert!((euclidean_distance(&a, &b) - 5.0_f64.sqrt()).abs() < 1e-12);
    }
}
