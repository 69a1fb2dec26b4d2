//! Health check endpoint

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::state::AppState;

/// GET /health/
///
/// The store status sits under `mongodb` because the frontend reads that key.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let timestamp = chrono::Utc::now().to_rfc3339();

    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "message": "API is running",
                "version": env!("CARGO_PKG_VERSION"),
                "mongodb": {"connected": true, "message": "Connected successfully"},
                "timestamp": timestamp,
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check store ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "message": "Database unavailable",
                    "mongodb": {"connected": false, "message": "Connection failed"},
                    "timestamp": timestamp,
                })),
            )
        }
    }
}
