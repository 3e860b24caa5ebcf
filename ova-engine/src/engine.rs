//! The analytics engine context object
//!
//! Owns the telemetry source, the active vehicle profile, the fitted model
//! bundle, the historical store, and the market cache. Callers hold one
//! engine and pass it by reference into every operation; there is no hidden
//! process-wide state.

use crate::error::EngineError;
use crate::history::HistoricalStore;
use crate::market::MarketCache;
use crate::models::ModelBundle;
use crate::scoring;
use crate::simulator::SyntheticObdSource;
use ova_core::model::{
    ComponentAlert, DegradeCause, HistoricalRecord, MaintenancePrediction, MarketData,
    ProcessOutcome, ProcessedReading, DrivingPattern, SensorChannel, ServiceItem,
    TelemetryReading, TrendAnalysis,
};
use ova_core::profile::{VehicleConfig, VehicleProfile};
use ova_core::source::TelemetrySource;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{info, warn};

pub struct AnalyticsEngine {
    source: Box<dyn TelemetrySource>,
    profile: Option<VehicleProfile>,
    models: ModelBundle,
    history: HistoricalStore,
    market: MarketCache,
}

impl AnalyticsEngine {
    /// Build an engine backed by the synthetic OBD source.
    ///
    /// Fails only if the initial model fit fails; the engine never serves
    /// scoring requests against partially fitted models.
    pub fn new() -> Result<Self, EngineError> {
        Self::with_source(Box::new(SyntheticObdSource::new()))
    }

    pub fn with_source(source: Box<dyn TelemetrySource>) -> Result<Self, EngineError> {
        let models = ModelBundle::fit(None)?;
        Ok(Self {
            source,
            profile: None,
            models,
            history: HistoricalStore::new(),
            market: MarketCache::new(),
        })
    }

    /// Replace the vehicle profile and retrain the full model bundle.
    ///
    /// The retrain is copy-and-swap: the new bundle is fitted completely
    /// before either the profile or the models change, so concurrent readers
    /// (serialized by the caller's lock) observe the old set or the new set,
    /// never a mix. On failure the previous state is untouched.
    pub fn set_vehicle_config(&mut self, config: VehicleConfig) -> Result<(), EngineError> {
        let profile = VehicleProfile::new(config);
        let models = ModelBundle::fit(Some(&profile))?;

        info!(
            make = %profile.config.make,
            model = %profile.config.model,
            year = profile.config.year,
            "vehicle profile set, models retrained"
        );
        self.profile = Some(profile);
        self.models = models;
        Ok(())
    }

    pub fn profile(&self) -> Option<&VehicleProfile> {
        self.profile.as_ref()
    }

    /// Connectivity probe. The synthetic source reports no hardware.
    pub fn is_obd_connected(&self) -> bool {
        self.source.is_hardware()
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Sample the source and run the full processing pipeline.
    pub fn get_real_time_data(&mut self) -> ProcessOutcome {
        let raw = self.source.sample(self.profile.as_ref());
        self.process(raw)
    }

    /// Enrich a raw reading with every derived field and record it.
    ///
    /// Never fails: on any internal error the reading is returned with the
    /// fixed default derived set and tagged as degraded.
    pub fn process(&mut self, raw: TelemetryReading) -> ProcessOutcome {
        match self.try_process(&raw) {
            Ok(processed) => {
                self.history
                    .push(HistoricalRecord::from_processed(&processed));
                ProcessOutcome::Ok(processed)
            }
            Err(cause) => {
                warn!(%cause, "processing degraded to default derived values");
                ProcessOutcome::Degraded(degraded_reading(raw), cause)
            }
        }
    }

    fn try_process(&self, raw: &TelemetryReading) -> Result<ProcessedReading, DegradeCause> {
        for channel in SensorChannel::ALL {
            if !raw.channel(channel).is_finite() {
                return Err(DegradeCause::NonFiniteInput(channel));
            }
        }

        let z = self
            .models
            .normalizer
            .transform([raw.engine_temp, raw.oil_temp, raw.rpm]);
        let anomaly_score = self.models.anomaly.score(z);

        let mut rng = rand::thread_rng();
        let fuel_efficiency = scoring::fuel_efficiency(raw, &mut rng);
        let engine_health = scoring::engine_health(raw);
        let driving_pattern = self
            .models
            .pattern
            .classify([raw.rpm, raw.speed, raw.throttle_pos]);
        let performance_score = scoring::performance_score(raw, self.profile.as_ref());
        let efficiency_score =
            scoring::efficiency_score(raw, fuel_efficiency, self.profile.as_ref());

        for (name, value) in [
            ("anomaly_score", anomaly_score),
            ("fuel_efficiency", fuel_efficiency),
            ("engine_health", engine_health),
            ("performance_score", performance_score),
            ("efficiency_score", efficiency_score),
        ] {
            if !value.is_finite() {
                return Err(DegradeCause::NonFiniteOutput(name));
            }
        }

        Ok(ProcessedReading {
            raw: raw.clone(),
            anomaly_score,
            fuel_efficiency,
            engine_health,
            driving_pattern,
            performance_score,
            efficiency_score,
        })
    }

    /// Predict maintenance needs from a fresh reading.
    pub fn predict_maintenance(&mut self) -> MaintenancePrediction {
        let reading = self.get_real_time_data().into_reading();

        let features = [
            reading.raw.engine_temp,
            reading.raw.oil_temp,
            reading.raw.rpm,
            reading.raw.timing_advance,
            reading.anomaly_score,
        ];
        let maintenance_score = self.models.maintenance.predict(&features);

        MaintenancePrediction {
            maintenance_score,
            next_service_days: service_interval_days(maintenance_score, &mut rand::thread_rng()),
            critical_components: scoring::identify_critical_components(&reading.raw),
            estimated_costs: scoring::estimate_maintenance_costs(&reading.raw),
        }
    }

    /// Regression estimate of resale price from (year, mileage, condition).
    pub fn estimate_price(&self, year: i32, mileage: f64, condition: f64) -> f64 {
        self.models
            .price
            .predict(&[year as f64, mileage, condition])
    }

    /// Cached market valuation for (make, model, year).
    pub fn get_market_data(&mut self, make: &str, model: &str, year: i32) -> MarketData {
        self.market.lookup(make, model, year)
    }

    /// Drop a cached market valuation.
    pub fn invalidate_market_entry(&mut self, make: &str, model: &str, year: i32) -> bool {
        self.market.invalidate(make, model, year)
    }

    /// Trend analysis; `None` when no readings have been processed yet.
    pub fn get_historical_analysis(&self) -> Option<TrendAnalysis> {
        self.history.analyze()
    }

    pub fn history(&self) -> &HistoricalStore {
        &self.history
    }

    /// Threshold alerts for a reading.
    pub fn identify_critical_components(&self, reading: &TelemetryReading) -> Vec<ComponentAlert> {
        scoring::identify_critical_components(reading)
    }

    /// Wear-scaled service cost estimates for a reading.
    pub fn estimate_maintenance_costs(
        &self,
        reading: &TelemetryReading,
    ) -> BTreeMap<ServiceItem, f64> {
        scoring::estimate_maintenance_costs(reading)
    }
}

/// Days until the next recommended service, randomized within the band for
/// the score. Bands are discrete and monotonic: a lower score never maps to
/// a later band.
pub fn service_interval_days(maintenance_score: f64, rng: &mut impl Rng) -> u32 {
    if maintenance_score > 90.0 {
        rng.gen_range(60..90)
    } else if maintenance_score > 70.0 {
        rng.gen_range(30..60)
    } else {
        rng.gen_range(0..30)
    }
}

/// Fixed fallback derived values merged into the raw reading.
fn degraded_reading(raw: TelemetryReading) -> ProcessedReading {
    ProcessedReading {
        raw,
        anomaly_score: 0.0,
        fuel_efficiency: 25.0,
        engine_health: 50.0,
        driving_pattern: DrivingPattern::Normal,
        performance_score: 50.0,
        efficiency_score: 50.0,
    }
}
