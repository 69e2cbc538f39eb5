// LOADER: Artifact File → ModelArtifact
//
// Reading and deserializing happens here with no shared state involved; the
// caller decides whether and when to publish the result. The on-disk format is
// a JSON document tagged by `model_type`, as exported by the training job.

use std::fs;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::artifact::{version_from_mtime, FeatureSchema, ModelArtifact};
use super::forest::{DecisionTreeRegressor, RandomForestRegressor, TreeNode};
use super::linear::LinearRegression;
use super::traits::BoxedPredictor;
use crate::error::LoadError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeDocument {
    pub nodes: Vec<TreeNode>,
}

/// Serialized predictor as written by the training collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model_type")]
pub enum ArtifactDocument {
    RandomForestRegressor {
        feature_names: Vec<String>,
        trees: Vec<TreeDocument>,
    },
    DecisionTreeRegressor {
        feature_names: Vec<String>,
        nodes: Vec<TreeNode>,
    },
    LinearRegression {
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    },
}

impl ArtifactDocument {
    pub fn feature_names(&self) -> &[String] {
        match self {
            ArtifactDocument::RandomForestRegressor { feature_names, .. }
            | ArtifactDocument::DecisionTreeRegressor { feature_names, .. }
            | ArtifactDocument::LinearRegression { feature_names, .. } => feature_names,
        }
    }

    /// Validate structure and build the predictor plus its feature schema.
    pub fn into_predictor(self) -> Result<(BoxedPredictor, FeatureSchema), String> {
        let schema = FeatureSchema::new(self.feature_names().to_vec())?;
        let n_features = schema.n_features();

        let predictor: BoxedPredictor = match self {
            ArtifactDocument::RandomForestRegressor { trees, .. } => Box::new(RandomForestRegressor::new(
                trees.into_iter().map(|t| t.nodes).collect(),
                n_features,
            )?),
            ArtifactDocument::DecisionTreeRegressor { nodes, .. } => {
                Box::new(DecisionTreeRegressor::new(nodes, n_features)?)
            }
            ArtifactDocument::LinearRegression {
                coefficients,
                intercept,
                ..
            } => Box::new(LinearRegression::new(coefficients, intercept, n_features)?),
        };

        Ok((predictor, schema))
    }
}

/// Load and validate the artifact at `path`.
///
/// The version is taken from the file's mtime as observed here, at load time.
/// Contents and mtime are read through the same open handle, so a file
/// replaced at `path` mid-load cannot pair one file's version with another's
/// contents.
pub fn load(path: &Path) -> Result<ModelArtifact, LoadError> {
    let start = Instant::now();
    tracing::info!("📦 Loading model from {}...", path.display());

    let mut file = fs::File::open(path).map_err(|e| io_error(path, e))?;
    let metadata = file.metadata().map_err(|e| io_error(path, e))?;
    let mtime = metadata.modified().map_err(|e| io_error(path, e))?;

    let mut bytes = Vec::with_capacity(metadata.len() as usize);
    file.read_to_end(&mut bytes).map_err(|e| io_error(path, e))?;

    let document: ArtifactDocument =
        serde_json::from_slice(&bytes).map_err(|e| LoadError::corrupt(path, e.to_string()))?;

    let (predictor, schema) = document
        .into_predictor()
        .map_err(|reason| LoadError::corrupt(path, reason))?;

    let artifact = ModelArtifact::new(
        predictor,
        schema,
        path.to_path_buf(),
        version_from_mtime(mtime),
        bytes.len() as u64,
    );

    tracing::info!(
        model_version = %artifact.version(),
        model_type = artifact.model_type(),
        features = artifact.schema().n_features(),
        "✅ Model loaded in {:?}",
        start.elapsed()
    );

    Ok(artifact)
}

fn io_error(path: &Path, source: std::io::Error) -> LoadError {
    if source.kind() == ErrorKind::NotFound {
        LoadError::NotFound(path.to_path_buf())
    } else {
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
