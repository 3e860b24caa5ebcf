//! Vehicle configuration and derived engine parameters
//!
//! Parameter derivation is pure: the same (engine_type, year) always yields
//! the same parameter set, so a profile can be rebuilt at any time without
//! drifting from the one the models were trained against.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Fuel efficiency loss per year of vehicle age.
const AGE_EFFICIENCY_RATE: f64 = 0.02;
/// Floor on the age scaling factor.
const AGE_EFFICIENCY_FLOOR: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    #[default]
    Gasoline,
    Hybrid,
    Diesel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transmission {
    #[default]
    Automatic,
    Manual,
    Cvt,
}

/// Caller-supplied vehicle identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleConfig {
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub engine_type: EngineType,
    #[serde(default)]
    pub transmission: Transmission,
}

/// Operating parameters derived from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineParameters {
    pub idle_rpm: f64,
    pub max_rpm: f64,
    pub optimal_rpm: f64,
    pub optimal_temp: f64,
    pub max_temp: f64,
    pub optimal_oil_temp: f64,
    pub max_oil_temp: f64,
    pub base_fuel_efficiency: f64,
}

impl EngineParameters {
    /// Baseline gasoline parameter set.
    fn base() -> Self {
        Self {
            idle_rpm: 800.0,
            max_rpm: 6500.0,
            optimal_rpm: 1500.0,
            optimal_temp: 90.0,
            max_temp: 120.0,
            optimal_oil_temp: 100.0,
            max_oil_temp: 130.0,
            base_fuel_efficiency: 25.0,
        }
    }

    /// Derive parameters for an engine type and model year.
    ///
    /// `current_year` is passed explicitly so derivation stays deterministic
    /// under test.
    pub fn derive(engine_type: EngineType, year: i32, current_year: i32) -> Self {
        let mut params = Self::base();

        match engine_type {
            EngineType::Gasoline => {}
            EngineType::Hybrid => {
                params.idle_rpm = 0.0;
                params.optimal_rpm = 1200.0;
                params.base_fuel_efficiency = 45.0;
            }
            EngineType::Diesel => {
                params.idle_rpm = 700.0;
                params.optimal_rpm = 2000.0;
                params.optimal_temp = 85.0;
                params.base_fuel_efficiency = 30.0;
            }
        }

        let age = (current_year - year).max(0) as f64;
        let age_factor = (1.0 - age * AGE_EFFICIENCY_RATE).max(AGE_EFFICIENCY_FLOOR);
        params.base_fuel_efficiency *= age_factor;

        params
    }
}

/// A configured vehicle plus its derived parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub config: VehicleConfig,
    pub parameters: EngineParameters,
}

impl VehicleProfile {
    pub fn new(config: VehicleConfig) -> Self {
        let parameters =
            EngineParameters::derive(config.engine_type, config.year, Utc::now().year());
        Self { config, parameters }
    }
}
