use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{Value, json};
use tracing::warn;

use super::AppState;

/// Liveness probe
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness probe: the store and the media storage must both answer
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database = match state.store.health.health_check().await {
        Ok(()) => "ok",
        Err(e) => {
            warn!(error = %e, "Store readiness check failed");
            "unavailable"
        }
    };
    let storage = match state.media.health_check().await {
        Ok(()) => "ok",
        Err(e) => {
            warn!(error = %e, "Storage readiness check failed");
            "unavailable"
        }
    };

    let ready = database == "ok" && storage == "ok";
    let status = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (
        status,
        Json(json!({
            "status": if ready { "ready" } else { "not_ready" },
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "checks": {
                "database": database,
                "storage": storage,
            }
        })),
    )
}
