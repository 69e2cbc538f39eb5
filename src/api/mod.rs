// ARCHITECTURE: API Module - HTTP Boundary
//
// Handlers only marshal requests and responses. Validation lives in
// `validation`, inference in `inference`, model state in
// `models::lifecycle`; errors are translated to status codes by `AppError`.
//
// ROUTES:
// - GET  /               liveness / service identity   (health.rs)
// - GET  /health         model loaded or not           (health.rs)
// - POST /predict        single-record prediction      (predict.rs)
// - POST /predict/batch  multi-record prediction       (predict.rs)
// - GET  /model/info     artifact metadata             (models.rs)
// - POST /model/reload   hot reload from disk          (models.rs)

pub mod health;
pub mod models;
pub mod predict;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::inference::PredictionEngine;
use crate::models::ModelLifecycleManager;

/// Shared handler state. The lifecycle manager is the only stateful piece.
pub struct AppState {
    pub manager: Arc<ModelLifecycleManager>,
    pub engine: PredictionEngine,
    pub service_name: String,
}

impl AppState {
    pub fn new(manager: Arc<ModelLifecycleManager>, service_name: impl Into<String>) -> Self {
        Self {
            manager,
            engine: PredictionEngine::new(),
            service_name: service_name.into(),
        }
    }
}

pub type ApiState = Arc<AppState>;

/// Build the full service router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/predict", post(predict::predict))
        .route("/predict/batch", post(predict::predict_batch))
        .route("/model/info", get(models::model_info))
        .route("/model/reload", post(models::reload_model))
        .with_state(state)
}
