//! Fitted model bundle
//!
//! All five models are fitted together, in order, from one synthetic
//! corpus. The bundle is immutable once built; a retrain constructs a
//! complete replacement which the engine swaps in as a unit, so scoring
//! never observes a mix of old and new models.

pub mod anomaly;
pub mod normalizer;
pub mod pattern;
pub mod regression;

pub use anomaly::AnomalyDetector;
pub use normalizer::FeatureNormalizer;
pub use pattern::DrivingPatternModel;
pub use regression::LinearRegressor;

use crate::error::FitError;
use crate::training;
use ova_core::profile::VehicleProfile;
use tracing::info;

/// Fixed seed for reproducible fits.
pub const FIT_SEED: u64 = 42;
/// Synthetic corpus size for both telemetry and price training data.
pub const TRAINING_SAMPLES: usize = 1000;

pub struct ModelBundle {
    pub normalizer: FeatureNormalizer,
    pub anomaly: AnomalyDetector,
    pub maintenance: LinearRegressor,
    pub pattern: DrivingPatternModel,
    pub price: LinearRegressor,
}

impl ModelBundle {
    /// Synthesize a training corpus and fit every model against it.
    pub fn fit(profile: Option<&VehicleProfile>) -> Result<Self, FitError> {
        let corpus = training::synthesize_telemetry(profile, TRAINING_SAMPLES, FIT_SEED);

        let core_features: Vec<[f64; 3]> = corpus
            .readings
            .iter()
            .map(|r| [r.engine_temp, r.oil_temp, r.rpm])
            .collect();

        let normalizer = FeatureNormalizer::fit(&core_features)?;

        let standardized: Vec<[f64; 3]> = core_features
            .iter()
            .map(|f| normalizer.transform(*f))
            .collect();
        let anomaly = AnomalyDetector::fit(&standardized)?;

        // Maintenance features include the anomaly score the detector would
        // assign to each training row.
        let maintenance_rows: Vec<Vec<f64>> = corpus
            .readings
            .iter()
            .zip(&standardized)
            .map(|(r, z)| {
                vec![
                    r.engine_temp,
                    r.oil_temp,
                    r.rpm,
                    r.timing_advance,
                    anomaly.score(*z),
                ]
            })
            .collect();
        let maintenance = LinearRegressor::fit(&maintenance_rows, &corpus.maintenance_labels)?;

        let pattern_rows: Vec<[f64; 3]> = corpus
            .readings
            .iter()
            .map(|r| [r.rpm, r.speed, r.throttle_pos])
            .collect();
        let pattern = DrivingPatternModel::fit(&pattern_rows, FIT_SEED)?;

        let price_corpus = training::synthesize_prices(TRAINING_SAMPLES, FIT_SEED);
        let price_rows: Vec<Vec<f64>> = price_corpus
            .iter()
            .map(|s| vec![s.year, s.mileage, s.condition])
            .collect();
        let price_targets: Vec<f64> = price_corpus.iter().map(|s| s.price).collect();
        let price = LinearRegressor::fit(&price_rows, &price_targets)?;

        info!(
            samples = TRAINING_SAMPLES,
            profiled = profile.is_some(),
            "model bundle fitted"
        );

        Ok(Self {
            normalizer,
            anomaly,
            maintenance,
            pattern,
            price,
        })
    }
}
