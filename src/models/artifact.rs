// DATA STRUCTURE: ModelArtifact - One Immutable Loaded Snapshot
//
// An artifact bundles the fitted predictor with everything needed to serve
// and attribute it: where it came from, its mtime-derived version, when it
// was loaded, and the feature schema captured at load time. Fields are private
// and there are no setters; a reload builds a new artifact instead.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use super::traits::{BoxedPredictor, Predictor};

/// Format of the version tag derived from the artifact file's mtime.
pub const VERSION_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Render a file modification time as a version tag (`YYYYMMDD_HHMMSS`,
/// local time).
pub fn version_from_mtime(mtime: SystemTime) -> String {
    DateTime::<Local>::from(mtime).format(VERSION_FORMAT).to_string()
}

/// Ordered list of trained feature names.
///
/// `names()` is the column order used for every feature matrix built against
/// this schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Rejects empty schemas and duplicate names.
    pub fn new(names: Vec<String>) -> Result<Self, String> {
        if names.is_empty() {
            return Err("feature_names must not be empty".to_string());
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if name.is_empty() {
                return Err("feature names must not be empty strings".to_string());
            }
            if !seen.insert(name.as_str()) {
                return Err(format!("duplicate feature name '{name}'"));
            }
        }
        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn n_features(&self) -> usize {
        self.names.len()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Names in lexicographic order, used when reporting mismatches.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut sorted = self.names.clone();
        sorted.sort();
        sorted
    }
}

#[derive(Debug)]
pub struct ModelArtifact {
    predictor: BoxedPredictor,
    schema: FeatureSchema,
    source_path: PathBuf,
    version: String,
    loaded_at: DateTime<Utc>,
    size_bytes: u64,
}

impl ModelArtifact {
    pub fn new(
        predictor: BoxedPredictor,
        schema: FeatureSchema,
        source_path: PathBuf,
        version: String,
        size_bytes: u64,
    ) -> Self {
        Self {
            predictor,
            schema,
            source_path,
            version,
            loaded_at: Utc::now(),
            size_bytes,
        }
    }

    pub fn predictor(&self) -> &dyn Predictor {
        self.predictor.as_ref()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn model_type(&self) -> &'static str {
        self.predictor.model_type()
    }

    pub fn info(&self) -> ArtifactInfo {
        ArtifactInfo {
            model_path: self.source_path.display().to_string(),
            model_version: self.version.clone(),
            model_type: self.model_type().to_string(),
            loaded_at: self.loaded_at.to_rfc3339(),
            feature_names: self.schema.names().to_vec(),
            size_bytes: self.size_bytes,
        }
    }
}

/// Serializable summary of an artifact for `/model/info`.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactInfo {
    pub model_path: String,
    pub model_version: String,
    pub model_type: String,
    pub loaded_at: String,
    pub feature_names: Vec<String>,
    pub size_bytes: u64,
}
