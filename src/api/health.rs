use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use super::ApiState;

/// Liveness: static service identity.
pub async fn root(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "status": "online",
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Always 200 while the process is up; `model_status` says whether a model
/// is currently published.
pub async fn health_check(State(state): State<ApiState>) -> (StatusCode, Json<Value>) {
    let model_status = if state.manager.is_loaded() {
        "loaded"
    } else {
        "not_loaded"
    };

    let response = json!({
        "status": "healthy",
        "model_status": model_status,
        "model_path": state.manager.model_path().display().to_string(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    (StatusCode::OK, Json(response))
}
