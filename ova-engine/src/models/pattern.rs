//! Driving pattern clustering
//!
//! Seeded 3-means over (rpm, speed, throttle_pos). Features are standardized
//! internally so RPM's scale does not dominate the distance metric. Cluster
//! labels are assigned from the centroids themselves, ordered by intensity
//! (mean of the standardized RPM and throttle coordinates): the calmest
//! cluster is "economic", the hottest "aggressive". Cluster index order
//! carries no meaning and is never exposed.

use crate::error::FitError;
use ova_core::model::DrivingPattern;
use rand::{rngs::StdRng, Rng, SeedableRng};

const K: usize = 3;
const MAX_ITERATIONS: usize = 100;

#[derive(Debug, Clone)]
pub struct DrivingPatternModel {
    mean: [f64; 3],
    std: [f64; 3],
    /// Standardized centroids, each tagged with its derived label.
    centroids: [([f64; 3], DrivingPattern); K],
}

impl DrivingPatternModel {
    pub fn fit(rows: &[[f64; 3]], seed: u64) -> Result<Self, FitError> {
        if rows.len() < K {
            return Err(FitError::EmptyCorpus);
        }

        let (mean, std) = column_stats(rows)?;
        let scaled: Vec<[f64; 3]> = rows.iter().map(|r| standardize(*r, &mean, &std)).collect();

        let mut rng = StdRng::seed_from_u64(seed);
        let mut centroids = init_centroids(&scaled, &mut rng);
        let mut assignment = vec![0usize; scaled.len()];

        for _ in 0..MAX_ITERATIONS {
            let mut changed = false;
            for (i, point) in scaled.iter().enumerate() {
                let nearest = nearest_centroid(*point, &centroids);
                if assignment[i] != nearest {
                    assignment[i] = nearest;
                    changed = true;
                }
            }

            let mut sums = [[0.0; 3]; K];
            let mut counts = [0usize; K];
            for (point, &cluster) in scaled.iter().zip(&assignment) {
                for (s, v) in sums[cluster].iter_mut().zip(point) {
                    *s += v;
                }
                counts[cluster] += 1;
            }
            for c in 0..K {
                if counts[c] == 0 {
                    // Reseed a starved cluster onto a random point.
                    centroids[c] = scaled[rng.gen_range(0..scaled.len())];
                    changed = true;
                } else {
                    for (dim, s) in sums[c].iter().enumerate() {
                        centroids[c][dim] = s / counts[c] as f64;
                    }
                }
            }

            if !changed {
                break;
            }
        }

        // Intensity: how far the cluster sits above average RPM and throttle.
        let mut labeled: Vec<([f64; 3], f64)> = centroids
            .iter()
            .map(|c| (*c, (c[0] + c[2]) / 2.0))
            .collect();
        labeled.sort_by(|a, b| a.1.total_cmp(&b.1));

        Ok(Self {
            mean,
            std,
            centroids: [
                (labeled[0].0, DrivingPattern::Economic),
                (labeled[1].0, DrivingPattern::Normal),
                (labeled[2].0, DrivingPattern::Aggressive),
            ],
        })
    }

    /// Classify a raw (rpm, speed, throttle_pos) vector.
    pub fn classify(&self, x: [f64; 3]) -> DrivingPattern {
        let z = standardize(x, &self.mean, &self.std);
        let mut best = self.centroids[0].1;
        let mut best_dist = f64::INFINITY;
        for (centroid, label) in &self.centroids {
            let d = dist2(z, *centroid);
            if d < best_dist {
                best_dist = d;
                best = *label;
            }
        }
        best
    }
}

fn column_stats(rows: &[[f64; 3]]) -> Result<([f64; 3], [f64; 3]), FitError> {
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
    for s in &mut std {
        *s = (*s / n).sqrt();
        if !s.is_finite() {
            return Err(FitError::NonFinite);
        }
        // Degenerate columns still cluster; just skip the scaling.
        if *s == 0.0 {
            *s = 1.0;
        }
    }
    Ok((mean, std))
}

fn standardize(x: [f64; 3], mean: &[f64; 3], std: &[f64; 3]) -> [f64; 3] {
    [
        (x[0] - mean[0]) / std[0],
        (x[1] - mean[1]) / std[1],
        (x[2] - mean[2]) / std[2],
    ]
}

fn init_centroids(points: &[[f64; 3]], rng: &mut StdRng) -> [[f64; 3]; K] {
    // Farthest-point seeding from a random start: cheap and stable.
    let first = points[rng.gen_range(0..points.len())];
    let mut centroids = [first; K];
    for c in 1..K {
        let mut best = points[0];
        let mut best_dist = -1.0;
        for p in points {
            let d = (0..c).map(|i| dist2(*p, centroids[i])).fold(f64::INFINITY, f64::min);
            if d > best_dist {
                best_dist = d;
                best = *p;
            }
        }
        centroids[c] = best;
    }
    centroids
}

fn nearest_centroid(point: [f64; 3], centroids: &[[f64; 3]; K]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = dist2(point, *c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

fn dist2(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three well-separated blobs shaped like driving styles.
    fn styled_rows() -> Vec<[f64; 3]> {
        let mut rows = Vec::new();
        for i in 0..40 {
            let j = (i % 5) as f64;
            rows.push([1100.0 + j * 10.0, 35.0 + j, 8.0 + j * 0.5]); // gentle
            rows.push([1900.0 + j * 10.0, 60.0 + j, 25.0 + j * 0.5]); // typical
            rows.push([3500.0 + j * 20.0, 110.0 + j, 70.0 + j]); // hard
        }
        rows
    }

    #[test]
    fn fit_rejects_undersized_corpus() {
        let rows = vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        assert_eq!(
            DrivingPatternModel::fit(&rows, 42).unwrap_err(),
            FitError::EmptyCorpus
        );
    }

    #[test]
    fn labels_follow_centroid_intensity_not_index() {
        let model = DrivingPatternModel::fit(&styled_rows(), 42).unwrap();

        assert_eq!(model.classify([1100.0, 36.0, 9.0]), DrivingPattern::Economic);
        assert_eq!(model.classify([1900.0, 62.0, 26.0]), DrivingPattern::Normal);
        assert_eq!(
            model.classify([3600.0, 112.0, 72.0]),
            DrivingPattern::Aggressive
        );
    }

    #[test]
    fn labeling_is_stable_across_seeds() {
        // Different seeds shuffle cluster indexes; the semantic labels must not move.
        for seed in [1, 7, 42, 1234] {
            let model = DrivingPatternModel::fit(&styled_rows(), seed).unwrap();
            assert_eq!(
                model.classify([1100.0, 36.0, 9.0]),
                DrivingPattern::Economic,
                "seed {}",
                seed
            );
            assert_eq!(
                model.classify([3600.0, 112.0, 72.0]),
                DrivingPattern::Aggressive,
                "seed {}",
                seed
            );
        }
    }

    #[test]
    fn same_seed_is_reproducible() {
        let a = DrivingPatternModel::fit(&styled_rows(), 42).unwrap();
        let b = DrivingPatternModel::fit(&styled_rows(), 42).unwrap();
        for probe in [[1500.0, 50.0, 20.0], [2500.0, 80.0, 45.0], [1000.0, 30.0, 5.0]] {
            assert_eq!(a.classify(probe), b.classify(probe));
        }
    }
}
