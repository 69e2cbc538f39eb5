use std::time::Instant;

use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::ApiState;
use crate::errors::AppError;
use crate::validation::RequestValidator;

// API DESIGN: request bodies keep feature values untyped so the validator,
// not the JSON extractor, decides what a bad feature looks like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionInput {
    pub features: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPredictionInput {
    pub data: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: f64,
    pub model_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPredictionResponse {
    pub predictions: Vec<f64>,
    pub model_version: String,
    pub count: usize,
}

/// Single prediction: validate → one-row matrix → predict.
pub async fn predict(
    State(state): State<ApiState>,
    payload: Result<Json<PredictionInput>, JsonRejection>,
) -> Result<Json<PredictionResponse>, AppError> {
    let Json(input) = payload?;
    let request_id = Uuid::new_v4();
    let start = Instant::now();

    // One snapshot for the whole request, so the reported version is the one
    // that actually produced the prediction.
    let artifact = state
        .manager
        .current_artifact()
        .ok_or(AppError::ModelNotLoaded)?;

    let matrix = RequestValidator::new(artifact.schema()).single_matrix(&input.features)?;
    let predictions = state.engine.predict(&artifact, &matrix)?;
    let prediction = predictions
        .first()
        .copied()
        .ok_or_else(|| AppError::Internal("predictor returned no value".to_string()))?;

    tracing::info!(
        request_id = %request_id,
        model_version = %artifact.version(),
        "Prediction served in {}µs",
        start.elapsed().as_micros()
    );

    Ok(Json(PredictionResponse {
        prediction,
        model_version: artifact.version().to_string(),
    }))
}

/// Batch prediction: results are positionally aligned with `data`.
pub async fn predict_batch(
    State(state): State<ApiState>,
    payload: Result<Json<BatchPredictionInput>, JsonRejection>,
) -> Result<Json<BatchPredictionResponse>, AppError> {
    let Json(input) = payload?;
    let request_id = Uuid::new_v4();
    let start = Instant::now();

    let artifact = state
        .manager
        .current_artifact()
        .ok_or(AppError::ModelNotLoaded)?;

    let matrix = RequestValidator::new(artifact.schema()).batch_matrix(&input.data)?;
    let predictions = state.engine.predict(&artifact, &matrix)?;

    tracing::info!(
        request_id = %request_id,
        model_version = %artifact.version(),
        rows = predictions.len(),
        "Batch prediction served in {}µs",
        start.elapsed().as_micros()
    );

    Ok(Json(BatchPredictionResponse {
        count: predictions.len(),
        predictions,
        model_version: artifact.version().to_string(),
    }))
}
