use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report `ok`, or `degraded` while no generative backend is installed.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if state.is_degraded().await {
        warn!("quiz generation unavailable (degraded mode)");
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}
