use axum::{extract::State, response::Json};
use serde::Serialize;

use super::ApiState;
use crate::errors::AppError;
use crate::models::ReloadStats;

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub model_path: String,
    pub model_version: Option<String>,
    pub model_type: Option<String>,
    pub status: String,
    pub loaded_at: Option<String>,
    pub feature_names: Vec<String>,
    pub size_bytes: Option<u64>,
    pub reload_stats: ReloadStats,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub status: String,
    pub message: String,
    pub model_version: String,
    pub previous_version: Option<String>,
    pub reload_duration_ms: u64,
}

/// Metadata of the artifact currently in effect.
pub async fn model_info(State(state): State<ApiState>) -> Json<ModelInfoResponse> {
    let reload_stats = state.manager.reload_stats().await;

    let response = match state.manager.current_artifact() {
        Some(artifact) => {
            let info = artifact.info();
            ModelInfoResponse {
                model_path: info.model_path,
                model_version: Some(info.model_version),
                model_type: Some(info.model_type),
                status: "loaded".to_string(),
                loaded_at: Some(info.loaded_at),
                feature_names: info.feature_names,
                size_bytes: Some(info.size_bytes),
                reload_stats,
            }
        }
        None => ModelInfoResponse {
            model_path: state.manager.model_path().display().to_string(),
            model_version: None,
            model_type: None,
            status: "not_loaded".to_string(),
            loaded_at: None,
            feature_names: Vec::new(),
            size_bytes: None,
            reload_stats,
        },
    };

    Json(response)
}

/// Re-read the configured model path and publish it.
pub async fn reload_model(State(state): State<ApiState>) -> Result<Json<ReloadResponse>, AppError> {
    tracing::info!("Reload requested via API");

    let outcome = state.manager.reload().await?;

    Ok(Json(ReloadResponse {
        status: "success".to_string(),
        message: "Model reloaded successfully".to_string(),
        model_version: outcome.artifact.version().to_string(),
        previous_version: outcome.previous_version,
        reload_duration_ms: outcome.duration_ms,
    }))
}
