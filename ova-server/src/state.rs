//! Application state management

use ova_core::model::ProcessedReading;
use ova_engine::{AnalyticsEngine, EngineError};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Shared application state
///
/// All engine access goes through one RwLock. Writers (config changes, live
/// sampling, market lookups) take the write lock, which also serializes the
/// history append-and-evict sequence; readers only need the lock for
/// snapshot queries like trends.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<AnalyticsEngine>>,

    /// Broadcast channel for processed readings produced by the sampler.
    pub telemetry_tx: broadcast::Sender<ProcessedReading>,
}

impl AppState {
    /// Build state around a freshly constructed engine. Fails only if the
    /// initial model fit fails.
    pub fn new() -> Result<Self, EngineError> {
        Ok(Self::with_engine(AnalyticsEngine::new()?))
    }

    pub fn with_engine(engine: AnalyticsEngine) -> Self {
        // Capacity for 100 readings; slow subscribers drop the oldest.
        let (telemetry_tx, _) = broadcast::channel(100);
        Self {
            engine: Arc::new(RwLock::new(engine)),
            telemetry_tx,
        }
    }

    /// Subscribe to the processed telemetry stream.
    pub fn subscribe(&self) -> broadcast::Receiver<ProcessedReading> {
        self.telemetry_tx.subscribe()
    }
}
