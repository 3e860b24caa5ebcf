//! Synthetic OBD telemetry source
//!
//! Produces one reading per call: a slow sinusoid of wall-clock time per
//! channel (period ~300s for temperature, ~60s for RPM, ~120s for throttle),
//! anchored at the profile's optimal values when one is set, plus
//! independent Gaussian noise. Bounded channels are clamped to their
//! physical range after noise is applied.

use chrono::Utc;
use ova_core::{model::TelemetryReading, profile::VehicleProfile, source::TelemetrySource};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Sinusoid periods in seconds.
const TEMP_PERIOD: f64 = 300.0;
const RPM_PERIOD: f64 = 60.0;
const THROTTLE_PERIOD: f64 = 120.0;

/// Anchors used when no vehicle profile is configured.
const DEFAULT_OPTIMAL_TEMP: f64 = 90.0;
const DEFAULT_OPTIMAL_RPM: f64 = 1500.0;
const DEFAULT_IDLE_RPM: f64 = 800.0;

/// Gaussian sample with a graceful fallback for a degenerate deviation.
pub(crate) fn gauss(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    Normal::new(mean, std_dev)
        .map(|d| d.sample(rng))
        .unwrap_or(mean)
}

/// Synthetic telemetry source standing in for an OBD-II interface.
pub struct SyntheticObdSource;

impl SyntheticObdSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SyntheticObdSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySource for SyntheticObdSource {
    fn name(&self) -> &str {
        "Synthetic OBD"
    }

    fn is_hardware(&self) -> bool {
        false
    }

    fn sample(&mut self, profile: Option<&VehicleProfile>) -> TelemetryReading {
        let now = Utc::now();
        let t = now.timestamp_millis() as f64 / 1000.0;
        let mut rng = rand::thread_rng();

        let (optimal_temp, optimal_rpm, idle_rpm) = match profile {
            Some(p) => (
                p.parameters.optimal_temp,
                p.parameters.optimal_rpm,
                p.parameters.idle_rpm,
            ),
            None => (DEFAULT_OPTIMAL_TEMP, DEFAULT_OPTIMAL_RPM, DEFAULT_IDLE_RPM),
        };

        let base_temp = optimal_temp + (t / TEMP_PERIOD).sin() * 5.0;
        let base_rpm = optimal_rpm + (t / RPM_PERIOD).sin() * 300.0;
        let base_throttle = 20.0 + (t / THROTTLE_PERIOD).sin() * 15.0;

        TelemetryReading {
            timestamp: now,
            engine_temp: base_temp + gauss(&mut rng, 0.0, 2.0),
            oil_temp: base_temp + 10.0 + gauss(&mut rng, 0.0, 3.0),
            rpm: base_rpm + gauss(&mut rng, 0.0, 100.0),
            speed: ((base_rpm - idle_rpm) / 50.0 + gauss(&mut rng, 0.0, 5.0)).max(0.0),
            throttle_pos: base_throttle.clamp(0.0, 100.0),
            fuel_level: (75.0 + gauss(&mut rng, 0.0, 1.0)).clamp(0.0, 100.0),
            timing_advance: 12.0 + gauss(&mut rng, 0.0, 1.0),
            maf: 15.0 + gauss(&mut rng, 0.0, 1.0),
            o2_voltage: (0.9 + gauss(&mut rng, 0.0, 0.05)).clamp(0.0, 1.1),
        }
    }
}
