pub mod artifact;
pub mod forest;
pub mod lifecycle;
pub mod linear;
pub mod loader;
pub mod traits;

pub use artifact::{version_from_mtime, ArtifactInfo, FeatureSchema, ModelArtifact};
pub use forest::{DecisionTreeRegressor, RandomForestRegressor, TreeNode};
pub use lifecycle::{ModelLifecycleManager, ReloadOutcome, ReloadStats};
pub use linear::LinearRegression;
pub use loader::{load, ArtifactDocument, TreeDocument};
pub use traits::{BoxedPredictor, Predictor};
