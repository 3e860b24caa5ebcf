//! Synthetic training corpus generation
//!
//! Applies the same generative law as the live source, but vectorized across
//! a simulated time axis instead of wall-clock time. The corpus exists only
//! long enough to fit the model bundle.

use crate::simulator::gauss;
use chrono::{Duration, Utc};
use ova_core::{model::TelemetryReading, profile::VehicleProfile};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// One telemetry sample plus the synthetic maintenance label.
pub struct TrainingCorpus {
    pub readings: Vec<TelemetryReading>,
    /// Binary "maintenance performed" labels, class-imbalanced 90/10.
    pub maintenance_labels: Vec<f64>,
}

/// One row of the price training corpus.
pub struct PriceSample {
    pub year: f64,
    pub mileage: f64,
    pub condition: f64,
    pub price: f64,
}

/// Synthesize `n` telemetry samples spaced one minute apart, ending now.
pub fn synthesize_telemetry(
    profile: Option<&VehicleProfile>,
    n: usize,
    seed: u64,
) -> TrainingCorpus {
    let mut rng = StdRng::seed_from_u64(seed);

    let (optimal_temp, optimal_rpm, idle_rpm) = match profile {
        Some(p) => (
            p.parameters.optimal_temp,
            p.parameters.optimal_rpm,
            p.parameters.idle_rpm,
        ),
        None => (90.0, 1500.0, 800.0),
    };

    let end = Utc::now();
    let mut readings = Vec::with_capacity(n);
    let mut maintenance_labels = Vec::with_capacity(n);

    for i in 0..n {
        // Simulated phase axes, matching the live sinusoids in shape: the
        // temperature cycle is the slowest, throttle in between.
        let frac = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
        let base_temp = optimal_temp + (frac * 10.0).sin() * 5.0;
        let base_rpm = optimal_rpm + (frac * 20.0).sin() * 300.0;
        let base_throttle = 20.0 + (frac * 15.0).sin() * 15.0;

        let timestamp = end - Duration::minutes((n - 1 - i) as i64);
        readings.push(TelemetryReading {
            timestamp,
            engine_temp: base_temp + gauss(&mut rng, 0.0, 2.0),
            oil_temp: base_temp + 10.0 + gauss(&mut rng, 0.0, 3.0),
            rpm: base_rpm + gauss(&mut rng, 0.0, 100.0),
            speed: ((base_rpm - idle_rpm) / 50.0 + gauss(&mut rng, 0.0, 5.0)).clamp(0.0, 200.0),
            throttle_pos: (base_throttle + gauss(&mut rng, 0.0, 2.0)).clamp(0.0, 100.0),
            fuel_level: (75.0 + gauss(&mut rng, 0.0, 1.0)).clamp(0.0, 100.0),
            timing_advance: 12.0 + gauss(&mut rng, 0.0, 1.0),
            maf: 15.0 + gauss(&mut rng, 0.0, 1.0),
            o2_voltage: (0.9 + gauss(&mut rng, 0.0, 0.05)).clamp(0.0, 1.1),
        });
        maintenance_labels.push(if rng.gen_bool(0.1) { 1.0 } else { 0.0 });
    }

    TrainingCorpus {
        readings,
        maintenance_labels,
    }
}

/// Synthesize `n` price samples with an exponential age-depreciation law.
pub fn synthesize_prices(n: usize, seed: u64) -> Vec<PriceSample> {
    // Age is measured from 2024; 30k is the new-vehicle list price the
    // depreciation curve starts from.
    const REFERENCE_YEAR: f64 = 2024.0;
    const BASE_PRICE: f64 = 30_000.0;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(n);

    for _ in 0..n {
        let year = rng.gen_range(2010..2024) as f64;
        let age = REFERENCE_YEAR - year;
        let mileage = gauss(&mut rng, 12_000.0 * age, 5_000.0);
        let condition = gauss(&mut rng, 90.0 - age * 2.0, 5.0);

        let base = BASE_PRICE * (-0.1 * age).exp();
        let price = base * (1.0 - mileage / 200_000.0) * (condition / 100.0);

        samples.push(PriceSample {
            year,
            mileage,
            condition,
            price,
        });
    }

    samples
}
