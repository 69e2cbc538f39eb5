// Tree ensemble regressors.
//
// Trees are stored as flat node arrays in the order the training collaborator
// exported them. Node 0 is the root; a split sends a row left when
// `row[feature] <= threshold`, matching the exporter's convention.

use serde::{Deserialize, Serialize};

use super::traits::Predictor;
use crate::error::InferenceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone)]
pub struct DecisionTreeRegressor {
    nodes: Vec<TreeNode>,
    n_features: usize,
}

impl DecisionTreeRegressor {
    /// Structural validation happens here, once, so traversal at request time
    /// can assume a well-formed tree. Child indices must point strictly forward,
    /// which rules out cycles.
    pub fn new(nodes: Vec<TreeNode>, n_features: usize) -> Result<Self, String> {
        if nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        let len = nodes.len();
        for (index, node) in nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(format!(
                            "node {index} splits on feature {feature} but the model has {n_features} features"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {index} has a non-finite threshold"));
                    }
                    for child in [left, right] {
                        if child <= index || child >= len {
                            return Err(format!("node {index} has invalid child index {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {index} has a non-finite value"));
                    }
                }
            }
        }

        Ok(Self { nodes, n_features })
    }

    fn evaluate(&self, row: &[f64]) -> Result<f64, InferenceError> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = row.get(*feature).copied().ok_or_else(|| {
                        InferenceError::EngineFailure(format!("row has no column {feature}"))
                    })?;
                    index = if x <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(InferenceError::EngineFailure(format!(
                        "tree traversal reached missing node {index}"
                    )));
                }
            }
        }
    }
}

impl Predictor for DecisionTreeRegressor {
    fn predict_row(&self, row: &[f64]) -> Result<f64, InferenceError> {
        self.evaluate(row)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn model_type(&self) -> &'static str {
        "DecisionTreeRegressor"
    }
}

/// Bagged ensemble: the prediction is the mean of its trees' outputs.
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTreeRegressor>,
    n_features: usize,
}

impl RandomForestRegressor {
    pub fn new(trees: Vec<Vec<TreeNode>>, n_features: usize) -> Result<Self, String> {
        if trees.is_empty() {
            return Err("forest has no trees".to_string());
        }

        let trees = trees
            .into_iter()
            .enumerate()
            .map(|(i, nodes)| {
                DecisionTreeRegressor::new(nodes, n_features).map_err(|e| format!("tree {i}: {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { trees, n_features })
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }
}

impl Predictor for RandomForestRegressor {
    fn predict_row(&self, row: &[f64]) -> Result<f64, InferenceError> {
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.evaluate(row)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn model_type(&self) -> &'static str {
        "RandomForestRegressor"
    }
}
