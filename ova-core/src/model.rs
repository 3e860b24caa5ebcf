//! Unified vehicle telemetry data model
//!
//! A reading is a fixed record over a closed set of sensor channels rather
//! than a string-keyed map, so scoring and alert tables can be checked for
//! exhaustiveness at compile time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Closed enumeration of the raw sensor channels a reading carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorChannel {
    EngineTemp,
    OilTemp,
    Rpm,
    Speed,
    ThrottlePos,
    FuelLevel,
    TimingAdvance,
    Maf,
    O2Voltage,
}

impl SensorChannel {
    pub const ALL: [SensorChannel; 9] = [
        SensorChannel::EngineTemp,
        SensorChannel::OilTemp,
        SensorChannel::Rpm,
        SensorChannel::Speed,
        SensorChannel::ThrottlePos,
        SensorChannel::FuelLevel,
        SensorChannel::TimingAdvance,
        SensorChannel::Maf,
        SensorChannel::O2Voltage,
    ];

    /// Wire name of the channel, matching the reading's JSON field names.
    pub fn key(&self) -> &'static str {
        match self {
            SensorChannel::EngineTemp => "engine_temp",
            SensorChannel::OilTemp => "oil_temp",
            SensorChannel::Rpm => "rpm",
            SensorChannel::Speed => "speed",
            SensorChannel::ThrottlePos => "throttle_pos",
            SensorChannel::FuelLevel => "fuel_level",
            SensorChannel::TimingAdvance => "timing_advance",
            SensorChannel::Maf => "maf",
            SensorChannel::O2Voltage => "o2_voltage",
        }
    }
}

/// One timestamped snapshot of raw sensor values.
///
/// Temperatures are Celsius, speed is km/h, throttle and fuel level are
/// percentages (0-100), timing advance is degrees, MAF is g/s, O2 voltage
/// is volts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReading {
    pub timestamp: DateTime<Utc>,
    pub engine_temp: f64,
    pub oil_temp: f64,
    pub rpm: f64,
    pub speed: f64,
    pub throttle_pos: f64,
    pub fuel_level: f64,
    pub timing_advance: f64,
    pub maf: f64,
    pub o2_voltage: f64,
}

impl TelemetryReading {
    /// Value of a single channel.
    pub fn channel(&self, channel: SensorChannel) -> f64 {
        match channel {
            SensorChannel::EngineTemp => self.engine_temp,
            SensorChannel::OilTemp => self.oil_temp,
            SensorChannel::Rpm => self.rpm,
            SensorChannel::Speed => self.speed,
            SensorChannel::ThrottlePos => self.throttle_pos,
            SensorChannel::FuelLevel => self.fuel_level,
            SensorChannel::TimingAdvance => self.timing_advance,
            SensorChannel::Maf => self.maf,
            SensorChannel::O2Voltage => self.o2_voltage,
        }
    }

    /// True when every channel holds a finite value.
    pub fn is_finite(&self) -> bool {
        SensorChannel::ALL
            .iter()
            .all(|ch| self.channel(*ch).is_finite())
    }
}

/// Driving style assigned by the pattern model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrivingPattern {
    Economic,
    Normal,
    Aggressive,
}

impl std::fmt::Display for DrivingPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DrivingPattern::Economic => "economic",
            DrivingPattern::Normal => "normal",
            DrivingPattern::Aggressive => "aggressive",
        };
        f.write_str(s)
    }
}

/// A raw reading enriched with the derived analytics fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedReading {
    #[serde(flatten)]
    pub raw: TelemetryReading,
    pub anomaly_score: f64,
    pub fuel_efficiency: f64,
    pub engine_health: f64,
    pub driving_pattern: DrivingPattern,
    pub performance_score: f64,
    pub efficiency_score: f64,
}

/// Why a pipeline run fell back to default derived values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DegradeCause {
    #[error("non-finite value on channel {}", .0.key())]
    NonFiniteInput(SensorChannel),
    #[error("model evaluation produced a non-finite {0}")]
    NonFiniteOutput(&'static str),
}

/// Result of the per-reading processing pipeline.
///
/// Processing never fails outright: on any internal error the caller still
/// receives a displayable reading, filled with fixed defaults and tagged
/// with the cause.
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    Ok(ProcessedReading),
    Degraded(ProcessedReading, DegradeCause),
}

impl ProcessOutcome {
    pub fn reading(&self) -> &ProcessedReading {
        match self {
            ProcessOutcome::Ok(r) | ProcessOutcome::Degraded(r, _) => r,
        }
    }

    pub fn into_reading(self) -> ProcessedReading {
        match self {
            ProcessOutcome::Ok(r) | ProcessOutcome::Degraded(r, _) => r,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ProcessOutcome::Degraded(..))
    }
}

/// Urgency of a component alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    Medium,
}

/// Alert for a component whose reading breached its threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentAlert {
    pub component: SensorChannel,
    pub message: String,
    pub urgency: Urgency,
}

/// Serviceable items with fixed base costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceItem {
    OilChange,
    AirFilter,
    BrakePads,
    TimingBelt,
    SparkPlugs,
}

/// Outcome of a maintenance prediction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenancePrediction {
    /// Unconstrained regression output; larger means less urgent service.
    pub maintenance_score: f64,
    /// Days until the next recommended service.
    pub next_service_days: u32,
    pub critical_components: Vec<ComponentAlert>,
    pub estimated_costs: BTreeMap<ServiceItem, f64>,
}

/// Market trend direction for a valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketTrend {
    Up,
    Down,
    Stable,
}

/// Synthesized market valuation for a (make, model, year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub current_value: f64,
    pub market_trend: MarketTrend,
    pub similar_listings: u32,
    pub price_prediction: f64,
}

/// Subset of a processed reading retained for trend analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub timestamp: DateTime<Utc>,
    pub engine_temp: f64,
    pub oil_temp: f64,
    pub rpm: f64,
    pub speed: f64,
    pub throttle_pos: f64,
    pub fuel_efficiency: f64,
    pub engine_health: f64,
    pub driving_pattern: DrivingPattern,
}

impl HistoricalRecord {
    pub fn from_processed(reading: &ProcessedReading) -> Self {
        Self {
            timestamp: reading.raw.timestamp,
            engine_temp: reading.raw.engine_temp,
            oil_temp: reading.raw.oil_temp,
            rpm: reading.raw.rpm,
            speed: reading.raw.speed,
            throttle_pos: reading.raw.throttle_pos,
            fuel_efficiency: reading.fuel_efficiency,
            engine_health: reading.engine_health,
            driving_pattern: reading.driving_pattern,
        }
    }
}

/// Direction of a linear trend over the historical window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Degrading,
    Stable,
}

/// Linear trend: direction plus absolute slope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub magnitude: f64,
}

/// Aggregate analysis over the historical store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub efficiency_trend: Trend,
    pub health_trend: Trend,
    pub driving_patterns: BTreeMap<DrivingPattern, usize>,
    pub avg_efficiency: f64,
    pub avg_health: f64,
}
