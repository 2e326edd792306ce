use axum::Json;

use crate::dto::HealthResponse;

/// Liveness probe. Reports process health only; database connectivity
/// is already verified by the migration run at startup.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
