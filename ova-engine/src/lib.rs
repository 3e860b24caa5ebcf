//! Telemetry analytics engine for OpenVehicleAnalytics
//!
//! Owns the synthetic telemetry source, the fitted model bundle, the scoring
//! formulas, the bounded historical store, and the market valuation cache.
//! The presentation layer drives everything through [`AnalyticsEngine`].

pub mod engine;
pub mod error;
pub mod history;
pub mod market;
pub mod models;
pub mod scoring;
pub mod simulator;
pub mod training;

pub use engine::AnalyticsEngine;
pub use error::{EngineError, FitError};
pub use simulator::SyntheticObdSource;
