pub mod engine;
pub mod matrix;

pub use engine::PredictionEngine;
pub use matrix::FeatureMatrix;
