//! Unsupervised outlier scoring over normalized engine features
//!
//! A distance-based detector calibrated against the training corpus: the
//! decision threshold is the (1 - contamination) quantile of the training
//! distances from the origin of the standardized feature space. Scores
//! follow the usual detector convention: lower is more anomalous, negative
//! means past the threshold. By construction roughly `CONTAMINATION` of the
//! training corpus scores negative.

use crate::error::FitError;

/// Expected fraction of outliers in the training corpus.
pub const CONTAMINATION: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    threshold: f64,
}

impl AnomalyDetector {
    /// Calibrate against standardized training rows.
    pub fn fit(rows: &[[f64; 3]]) -> Result<Self, FitError> {
        if rows.is_empty() {
            return Err(FitError::EmptyCorpus);
        }

        let mut distances: Vec<f64> = rows.iter().map(|r| norm3(*r)).collect();
        if distances.iter().any(|d| !d.is_finite()) {
            return Err(FitError::NonFinite);
        }
        distances.sort_by(|a, b| a.total_cmp(b));

        let idx = (((1.0 - CONTAMINATION) * distances.len() as f64) as usize)
            .min(distances.len() - 1);
        let threshold = distances[idx].max(f64::EPSILON);

        Ok(Self { threshold })
    }

    /// Score a standardized feature vector. Zero at the decision boundary,
    /// positive toward the center of mass, negative for outliers.
    pub fn score(&self, z: [f64; 3]) -> f64 {
        (self.threshold - norm3(z)) / self.threshold
    }
}

fn norm3(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}
