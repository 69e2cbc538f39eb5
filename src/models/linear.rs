use super::traits::Predictor;
use crate::error::InferenceError;

/// Ordinary least-squares model: `intercept + Σ coefficients[i] * row[i]`.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64, n_features: usize) -> Result<Self, String> {
        if coefficients.len() != n_features {
            return Err(format!(
                "{} coefficients for {} features",
                coefficients.len(),
                n_features
            ));
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err("coefficients must be finite".to_string());
        }
        Ok(Self {
            coefficients,
            intercept,
        })
    }
}

impl Predictor for LinearRegression {
    fn predict_row(&self, row: &[f64]) -> Result<f64, InferenceError> {
        Ok(self
            .coefficients
            .iter()
            .zip(row)
            .fold(self.intercept, |acc, (c, x)| acc + c * x))
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn model_type(&self) -> &'static str {
        "LinearRegression"
    }
}
