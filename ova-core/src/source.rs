//! Telemetry source trait definition

use crate::model::TelemetryReading;
use crate::profile::VehicleProfile;

/// Trait for telemetry acquisition sources
///
/// Each source is responsible for producing one raw reading per call,
/// shaped by the active vehicle profile when one is set.
pub trait TelemetrySource: Send + Sync {
    /// Human-readable name of this source (e.g. "Synthetic OBD").
    fn name(&self) -> &str;

    /// Whether this source reads from real acquisition hardware.
    ///
    /// Synthetic sources return false; the engine reports this through its
    /// connectivity probe.
    fn is_hardware(&self) -> bool;

    /// Produce the next raw reading.
    ///
    /// Must always succeed: sources are expected to synthesize or buffer
    /// rather than fail, and derived-field failures are handled downstream
    /// by the processing pipeline.
    fn sample(&mut self, profile: Option<&VehicleProfile>) -> TelemetryReading;
}
