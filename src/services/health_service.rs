use tracing::warn;

use crate::{dao::quiz_store::QuizStore, dto::health::HealthResponse, state::SharedState};

/// Respond with the backend health, probing the quiz store on the way.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if let Err(err) = state.quiz_store().health_check().await {
        warn!(error = %err, "quiz store health check failed");
        return HealthResponse::degraded();
    }

    HealthResponse::ok()
}
