//! Background telemetry sampler
//!
//! Polls the engine once per second and broadcasts each processed reading
//! to stream subscribers. Degraded readings are broadcast too; clients see
//! the same defaults the REST endpoint reports.

use crate::state::AppState;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Main sampler loop. Never returns.
pub async fn run(state: AppState) {
    info!("telemetry sampler started");

    loop {
        let outcome = {
            let mut engine = state.engine.write().await;
            engine.get_real_time_data()
        };

        if outcome.is_degraded() {
            debug!("broadcasting degraded reading");
        }

        // Send failure just means no subscribers right now.
        let _ = state.telemetry_tx.send(outcome.into_reading());

        sleep(SAMPLE_INTERVAL).await;
    }
}
