// Shared fixtures for the integration suites: artifact files on disk and a
// ready-to-use handler state.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use prediction_server::api::{AppState, ApiState};
use prediction_server::models::{ArtifactDocument, ModelLifecycleManager, TreeDocument, TreeNode};

/// Absolute tolerance for the `2.5*feature1 + 1.8*feature2` grid forest.
///
/// Each tree is piecewise constant on 5x5 cells, so a single tree can miss by
/// up to 2.5*2.5 + 1.8*2.5 = 10.75. Averaging offset grids shrinks that, but
/// the forest is still not linear; 15.0 covers the worst case.
pub const FOREST_TOLERANCE: f64 = 15.0;

pub fn feature_names() -> Vec<String> {
    vec!["feature1".to_string(), "feature2".to_string()]
}

pub fn linear_document(coefficients: [f64; 2], intercept: f64) -> ArtifactDocument {
    ArtifactDocument::LinearRegression {
        feature_names: feature_names(),
        coefficients: coefficients.to_vec(),
        intercept,
    }
}

/// Forest approximating `target = 2.5*feature1 + 1.8*feature2` over
/// feature1 ∈ [10, 90], feature2 ∈ [20, 140], the way a fitted regressor
/// would: piecewise-constant trees on shifted grids, averaged.
pub fn grid_forest_document() -> ArtifactDocument {
    let trees = (0..5)
        .map(|k| TreeDocument {
            nodes: grid_tree(k as f64),
        })
        .collect();

    ArtifactDocument::RandomForestRegressor {
        feature_names: feature_names(),
        trees,
    }
}

fn grid_tree(offset: f64) -> Vec<TreeNode> {
    let f1_edges: Vec<f64> = (0..=16).map(|i| 10.0 + offset + 5.0 * i as f64).collect();
    let f2_edges: Vec<f64> = (0..=24).map(|i| 20.0 + offset + 5.0 * i as f64).collect();

    let mut nodes = Vec::new();
    let f2 = &f2_edges;
    build_axis(&mut nodes, 0, &f1_edges, 0, f1_edges.len() - 1, &|nodes: &mut Vec<TreeNode>, c1: f64| {
        build_axis(nodes, 1, f2, 0, f2.len() - 1, &|nodes: &mut Vec<TreeNode>, c2: f64| {
            let index = nodes.len();
            nodes.push(TreeNode::Leaf {
                value: 2.5 * c1 + 1.8 * c2,
            });
            index
        })
    });
    nodes
}

// Balanced binary partition of the cells between `edges[lo]` and `edges[hi]`,
// emitted in preorder so every child index is greater than its parent's.
fn build_axis<F>(nodes: &mut Vec<TreeNode>, feature: usize, edges: &[f64], lo: usize, hi: usize, cell: &F) -> usize
where
    F: Fn(&mut Vec<TreeNode>, f64) -> usize,
{
    if hi - lo == 1 {
        return cell(nodes, (edges[lo] + edges[lo + 1]) / 2.0);
    }

    let mid = (lo + hi) / 2;
    let index = nodes.len();
    nodes.push(TreeNode::Leaf { value: 0.0 });
    let left = build_axis(nodes, feature, edges, lo, mid, cell);
    let right = build_axis(nodes, feature, edges, mid, hi, cell);
    nodes[index] = TreeNode::Split {
        feature,
        threshold: edges[mid],
        left,
        right,
    };
    index
}

pub fn write_document(path: &Path, document: &ArtifactDocument) {
    let json = serde_json::to_vec(document).expect("serialize artifact");
    fs::write(path, json).expect("write artifact");
}

/// Pin the artifact's mtime so its version string is predictable.
pub fn set_mtime(path: &Path, secs_since_epoch: u64) -> SystemTime {
    let mtime = UNIX_EPOCH + Duration::from_secs(secs_since_epoch);
    let file = fs::OpenOptions::new().write(true).open(path).expect("open artifact");
    file.set_modified(mtime).expect("set mtime");
    mtime
}

pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub path: PathBuf,
    pub manager: Arc<ModelLifecycleManager>,
    pub state: ApiState,
}

pub async fn fixture_with(document: &ArtifactDocument) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("saved_model.json");
    write_document(&path, document);
    set_mtime(&path, 1_700_000_000);

    let manager = Arc::new(
        ModelLifecycleManager::initialize(&path)
            .await
            .expect("initial load"),
    );
    let state = Arc::new(AppState::new(manager.clone(), "Test Prediction API"));

    Fixture {
        dir,
        path,
        manager,
        state,
    }
}

pub async fn forest_fixture() -> Fixture {
    fixture_with(&grid_forest_document()).await
}

/// State over a manager that never loaded anything.
pub fn unloaded_state(path: &Path) -> ApiState {
    let manager = Arc::new(ModelLifecycleManager::new(path));
    Arc::new(AppState::new(manager, "Test Prediction API"))
}
