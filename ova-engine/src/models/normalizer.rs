//! Feature standardization (mean/std fitted once over the training corpus)

use crate::error::FitError;

/// Names of the three core engine features, in vector order.
pub const CORE_FEATURES: [&str; 3] = ["engine_temp", "oil_temp", "rpm"];

/// Standardizes the (engine_temp, oil_temp, rpm) feature vector.
#[derive(Debug, Clone)]
pub struct FeatureNormalizer {
    mean: [f64; 3],
    std: [f64; 3],
}

impl FeatureNormalizer {
    pub fn fit(rows: &[[f64; 3]]) -> Result<Self, FitError> {
        if rows.is_empty() {
            return Err(FitError::EmptyCorpus);
        }

        let n = rows.len() as f64;
        let mut mean = [0.0; 3];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut std = [0.0; 3];
        for row in rows {
            for ((s, v), m) in std.iter_mut().zip(row).zip(&mean) {
                let d = v - m;
                *s += d * d;
            }
        }
        for (i, s) in std.iter_mut().enumerate() {
            *s = (*s / n).sqrt();
            if !s.is_finite() {
                return Err(FitError::NonFinite);
            }
            if *s == 0.0 {
                return Err(FitError::ZeroVariance(CORE_FEATURES[i]));
            }
        }

        Ok(Self { mean, std })
    }

    pub fn transform(&self, x: [f64; 3]) -> [f64; 3] {
        [
            (x[0] - self.mean[0]) / self.std[0],
            (x[1] - self.mean[1]) / self.std[1],
            (x[2] - self.mean[2]) / self.std[2],
        ]
    }
}
