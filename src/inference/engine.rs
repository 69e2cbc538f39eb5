use crate::error::InferenceError;
use crate::models::ModelArtifact;

use super::matrix::FeatureMatrix;

/// Stateless inference over a published artifact.
///
/// The engine holds no data of its own; it is safe to call concurrently from
/// any number of requests against the same artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictionEngine;

impl PredictionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run the artifact's predictor over every row of `matrix`.
    ///
    /// The returned vector is positionally aligned with the matrix rows.
    pub fn predict(&self, artifact: &ModelArtifact, matrix: &FeatureMatrix) -> Result<Vec<f64>, InferenceError> {
        let predictor = artifact.predictor();
        let expected_cols = predictor.n_features();

        if matrix.n_rows() == 0 || matrix.n_cols() != expected_cols {
            return Err(InferenceError::ShapeMismatch {
                expected_cols,
                rows: matrix.n_rows(),
                cols: matrix.n_cols(),
            });
        }

        let predictions = matrix
            .iter_rows()
            .map(|row| predictor.predict_row(row))
            .collect::<Result<Vec<f64>, _>>()?;

        if let Some(index) = predictions.iter().position(|p| !p.is_finite()) {
            return Err(InferenceError::EngineFailure(format!(
                "non-finite prediction for row {index}"
            )));
        }

        Ok(predictions)
    }
}
