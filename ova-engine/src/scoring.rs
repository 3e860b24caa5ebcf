//! Deterministic scoring formulas
//!
//! Pure functions over a reading and the current vehicle profile. The weight
//! and threshold tables are const arrays over the closed sensor-channel
//! enum; adding a channel without updating them is a compile-time decision,
//! not a runtime surprise.

use ova_core::model::{
    ComponentAlert, SensorChannel, ServiceItem, TelemetryReading, Urgency,
};
use ova_core::profile::VehicleProfile;
use rand::Rng;
use std::collections::BTreeMap;

use crate::simulator::gauss;

/// (channel, weight, normal operating range). Weights sum to 1.0.
const HEALTH_WEIGHTS: [(SensorChannel, f64, (f64, f64)); 6] = [
    (SensorChannel::EngineTemp, 0.20, (75.0, 105.0)),
    (SensorChannel::OilTemp, 0.20, (82.0, 115.0)),
    (SensorChannel::Rpm, 0.15, (600.0, 2500.0)),
    (SensorChannel::ThrottlePos, 0.15, (0.0, 100.0)),
    (SensorChannel::TimingAdvance, 0.15, (5.0, 20.0)),
    (SensorChannel::O2Voltage, 0.15, (0.6, 1.1)),
];

/// (channel, alert threshold, message). Alerts fire on strictly-greater.
const ALERT_THRESHOLDS: [(SensorChannel, f64, &str); 4] = [
    (SensorChannel::EngineTemp, 110.0, "Engine Temperature High"),
    (SensorChannel::OilTemp, 120.0, "Oil Temperature High"),
    (SensorChannel::TimingAdvance, 25.0, "Timing Advance Issue"),
    (SensorChannel::O2Voltage, 1.2, "O2 Sensor Issue"),
];

/// Multiplier above the threshold at which urgency escalates to high.
const HIGH_URGENCY_FACTOR: f64 = 1.1;

const BASE_COSTS: [(ServiceItem, f64); 5] = [
    (ServiceItem::OilChange, 50.0),
    (ServiceItem::AirFilter, 20.0),
    (ServiceItem::BrakePads, 150.0),
    (ServiceItem::TimingBelt, 500.0),
    (ServiceItem::SparkPlugs, 100.0),
];

/// Estimated MPG: base 25 scaled by RPM, throttle, and temperature factors,
/// plus unit Gaussian noise, clamped to [15, 35].
pub fn fuel_efficiency(reading: &TelemetryReading, rng: &mut impl Rng) -> f64 {
    const BASE_MPG: f64 = 25.0;

    let rpm_factor = 1.0 - (reading.rpm - 1500.0).abs() / 3000.0;
    let throttle_factor = 1.0 - reading.throttle_pos / 200.0;
    let temp_factor = 1.0 - (reading.engine_temp - 90.0).abs() / 100.0;

    let efficiency = BASE_MPG * rpm_factor * throttle_factor * temp_factor;
    (efficiency + gauss(rng, 0.0, 1.0)).clamp(15.0, 35.0)
}

/// Composite health score starting at 100. Each monitored channel outside
/// its normal range costs its entire weight allotment; there is no partial
/// credit for near misses.
pub fn engine_health(reading: &TelemetryReading) -> f64 {
    let mut score = 100.0;
    for (channel, weight, (min, max)) in HEALTH_WEIGHTS {
        let value = reading.channel(channel);
        if value < min || value > max {
            score -= weight * 100.0;
        }
    }
    score.clamp(0.0, 100.0)
}

/// Weighted blend of RPM proximity, temperature proximity, and throttle
/// response. Neutral 50.0 without a profile.
pub fn performance_score(reading: &TelemetryReading, profile: Option<&VehicleProfile>) -> f64 {
    let Some(profile) = profile else {
        return 50.0;
    };
    let p = &profile.parameters;

    let rpm_efficiency = 1.0 - (reading.rpm - p.optimal_rpm).abs() / p.max_rpm;
    let temp_efficiency = 1.0 - (reading.engine_temp - p.optimal_temp).abs() / p.max_temp;
    let throttle_response = reading.throttle_pos / 100.0;

    let score = (rpm_efficiency * 0.4 + temp_efficiency * 0.3 + throttle_response * 0.3) * 100.0;
    score.clamp(0.0, 100.0)
}

/// Weighted blend of the fuel ratio against the profile baseline plus
/// temperature and RPM proximity. Neutral 50.0 without a profile.
pub fn efficiency_score(
    reading: &TelemetryReading,
    fuel_efficiency: f64,
    profile: Option<&VehicleProfile>,
) -> f64 {
    let Some(profile) = profile else {
        return 50.0;
    };
    let p = &profile.parameters;

    let fuel_factor = fuel_efficiency / p.base_fuel_efficiency;
    let temp_factor = 1.0 - (reading.engine_temp - p.optimal_temp).abs() / p.max_temp;
    let rpm_factor = 1.0 - (reading.rpm - p.optimal_rpm).abs() / p.max_rpm;

    let score = (fuel_factor * 0.4 + temp_factor * 0.3 + rpm_factor * 0.3) * 100.0;
    score.clamp(0.0, 100.0)
}

/// One alert per channel strictly above its threshold, in table order.
/// Urgency is high past 1.1x the threshold, medium otherwise.
pub fn identify_critical_components(reading: &TelemetryReading) -> Vec<ComponentAlert> {
    let mut alerts = Vec::new();
    for (channel, threshold, message) in ALERT_THRESHOLDS {
        let value = reading.channel(channel);
        if value > threshold {
            let urgency = if value > threshold * HIGH_URGENCY_FACTOR {
                Urgency::High
            } else {
                Urgency::Medium
            };
            alerts.push(ComponentAlert {
                component: channel,
                message: message.to_string(),
                urgency,
            });
        }
    }
    alerts
}

/// Base service costs scaled by engine wear: cost * (1 + (100 - health)/100).
pub fn estimate_maintenance_costs(reading: &TelemetryReading) -> BTreeMap<ServiceItem, f64> {
    let wear_factor = (100.0 - engine_health(reading)) / 100.0;
    BASE_COSTS
        .iter()
        .map(|(item, base)| (*item, base * (1.0 + wear_factor)))
        .collect()
}
