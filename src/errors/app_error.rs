use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::{InferenceError, LoadError, ReloadError, ValidationError};

// HTTP BOUNDARY: the only place component errors become status codes.
// Every non-200 response carries a human-readable `detail` string.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid request body: {0}")]
    BadPayload(String),

    /// Body rejected before JSON parsing (size limit, content type).
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },

    #[error("Prediction error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Model not loaded")]
    ModelNotLoaded,

    #[error("Model reload error: {0}")]
    ReloadInProgress(String),

    #[error("Model reload error: {0}")]
    Reload(#[from] LoadError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ReloadError> for AppError {
    fn from(err: ReloadError) -> Self {
        match err {
            ReloadError::InProgress => AppError::ReloadInProgress(err.to_string()),
            ReloadError::Load(e) => AppError::Reload(e),
        }
    }
}

// Only bodies that fail to parse or fail to fit the request type are 422;
// other rejections keep the status the extractor chose.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let detail = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => AppError::BadPayload(detail),
            other => AppError::Rejected {
                status: other.status(),
                detail,
            },
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Rejected { status, .. } => *status,
            AppError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ModelNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ReloadInProgress(_) => StatusCode::CONFLICT,
            AppError::Reload(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("❌ {}", self);
        } else {
            tracing::warn!("⚠️  {}", self);
        }

        let body = Json(json!({
            "detail": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
