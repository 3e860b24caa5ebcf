//! OpenVehicleAnalytics Core Library
//!
//! This crate provides the telemetry data model, vehicle profile derivation,
//! and the source trait that analytics components build on.

pub mod model;
pub mod profile;
pub mod source;

pub use model::{ProcessOutcome, ProcessedReading, SensorChannel, TelemetryReading};
pub use profile::{VehicleConfig, VehicleProfile};
pub use source::TelemetrySource;
