// ARCHITECTURE: Trait-Based Predictor Abstraction
//
// Every artifact format deserializes into something implementing `Predictor`.
// The lifecycle manager and the prediction engine only ever see the trait
// object, so adding a new regressor type touches the loader and nothing else.

use std::fmt::Debug;

use crate::error::InferenceError;

/// A fitted regression function over a fixed number of numeric features.
///
/// Implementations must be immutable after construction: one instance is
/// shared by every in-flight request against the artifact that owns it.
pub trait Predictor: Send + Sync + Debug {
    /// Predict a single row. `row.len()` is guaranteed by the engine to equal
    /// `n_features()`.
    fn predict_row(&self, row: &[f64]) -> Result<f64, InferenceError>;

    /// Number of input columns the predictor was trained on.
    fn n_features(&self) -> usize;

    /// Type name reported by `/model/info` (e.g. `RandomForestRegressor`).
    fn model_type(&self) -> &'static str;
}

/// Type alias for boxed predictor trait objects
pub type BoxedPredictor = Box<dyn Predictor>;
