// gbm.rs - Gradient-boosted regression tree scorer loaded from JSON

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{PythiaError, Result};
use crate::features::{FeatureSchema, FeatureVector};

use super::traits::{check_features, Attribution, DifficultyScorer};

/// Node of a regression tree. Leaves have no feature and no children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbmNode {
    /// Index into the schema's feature list
    #[serde(default)]
    pub feature: Option<usize>,
    /// Samples with `value <= threshold` go left
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub left: Option<usize>,
    #[serde(default)]
    pub right: Option<usize>,
    /// Leaf output
    #[serde(default)]
    pub value: f64,
    /// Training samples reaching the node, used to weight attributions
    #[serde(default = "default_cover")]
    pub cover: f64,
}

fn default_cover() -> f64 {
    1.0
}

fn default_learning_rate() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbmTree {
    pub nodes: Vec<GbmNode>,
}

impl GbmTree {
    fn check(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match (node.feature, node.left, node.right) {
                (None, None, None) => {}
                (Some(f), Some(l), Some(r)) => {
                    if f >= n_features {
                        return Err(format!("node {} splits on feature {} of {}", i, f, n_features));
                    }
                    // children after their parent rules out cycles
                    if l <= i || r <= i || l >= self.nodes.len() || r >= self.nodes.len() {
                        return Err(format!("node {} has invalid children ({}, {})", i, l, r));
                    }
                    if !node.threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", i));
                    }
                }
                _ => return Err(format!("node {} is neither a leaf nor a full split", i)),
            }
            if node.cover < 0.0 {
                return Err(format!("node {} has negative cover", i));
            }
        }
        Ok(())
    }

    /// Leaf value reached by `x`
    pub fn predict(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            let node = &self.nodes[idx];
            match (node.feature, node.left, node.right) {
                (Some(f), Some(l), Some(r)) => idx = if x[f] <= node.threshold { l } else { r },
                _ => return node.value,
            }
        }
    }

    /// Cover-weighted mean output of every subtree
    fn expected_values(&self) -> Vec<f64> {
        let mut expected = vec![0.0; self.nodes.len()];
        for idx in (0..self.nodes.len()).rev() {
            let node = &self.nodes[idx];
            expected[idx] = match (node.left, node.right) {
                (Some(l), Some(r)) => {
                    let (wl, wr) = (self.nodes[l].cover, self.nodes[r].cover);
                    if wl + wr > 0.0 {
                        (wl * expected[l] + wr * expected[r]) / (wl + wr)
                    } else {
                        (expected[l] + expected[r]) / 2.0
                    }
                }
                _ => node.value,
            };
        }
        expected
    }
}

/// Serialized model: schema, base score and trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbmModel {
    pub schema: FeatureSchema,
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    pub trees: Vec<GbmTree>,
}

/// Boosted-tree scorer; evaluation is single-threaded
#[derive(Debug, Clone)]
pub struct GradientBoostedScorer {
    model: GbmModel,
    expected: Vec<Vec<f64>>,
    fingerprint: String,
}

impl GradientBoostedScorer {
    pub fn from_model(model: GbmModel, fingerprint: String) -> Result<Self> {
        if model.trees.is_empty() {
            return Err(PythiaError::Scorer("model contains no trees".to_string()));
        }
        if model.schema.is_empty() {
            return Err(PythiaError::Scorer("model declares no features".to_string()));
        }
        let n_features = model.schema.len();
        for (i, tree) in model.trees.iter().enumerate() {
            tree.check(n_features)
                .map_err(|e| PythiaError::Scorer(format!("tree {}: {}", i, e)))?;
        }
        let expected = model.trees.iter().map(GbmTree::expected_values).collect();
        Ok(Self {
            model,
            expected,
            fingerprint,
        })
    }

    /// Parse a JSON model; the fingerprint is the SHA-256 of the text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let model: GbmModel = serde_json::from_str(text)
            .map_err(|e| PythiaError::Scorer(format!("invalid model JSON: {}", e)))?;
        Self::from_model(model, sha256_hex(text.as_bytes()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| PythiaError::io(path, e))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| PythiaError::Scorer(format!("{} is not UTF-8: {}", path.display(), e)))?;
        let scorer = Self::from_json_str(&text)?;
        info!(
            path = %path.display(),
            trees = scorer.n_trees(),
            schema = %scorer.model.schema.version,
            sha256 = %scorer.fingerprint,
            "predictor loaded"
        );
        Ok(scorer)
    }

    pub fn n_trees(&self) -> usize {
        self.model.trees.len()
    }

    pub fn model(&self) -> &GbmModel {
        &self.model
    }

    fn raw_score(&self, x: &[f64]) -> f64 {
        self.model.base_score
            + self
                .model
                .trees
                .iter()
                .map(|t| self.model.learning_rate * t.predict(x))
                .sum::<f64>()
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

impl DifficultyScorer for GradientBoostedScorer {
    fn schema(&self) -> &FeatureSchema {
        &self.model.schema
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        check_features(&self.model.schema, features)?;
        let x = features.values();
        if let Some((name, _)) = features.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PythiaError::Scorer(format!("feature '{}' is not finite", name)));
        }
        Ok(self.raw_score(&x).clamp(0.0, 1.0))
    }

    /// Path attribution: each split credits its feature with the change in
    /// expected output along the decision path
    fn explain(&self, features: &FeatureVector) -> Result<Option<Attribution>> {
        check_features(&self.model.schema, features)?;
        let x = features.values();
        let lr = self.model.learning_rate;
        let mut contributions = vec![0.0; x.len()];
        let mut bias = self.model.base_score;

        for (tree, expected) in self.model.trees.iter().zip(&self.expected) {
            bias += lr * expected[0];
            let mut idx = 0;
            while let (Some(f), Some(l), Some(r)) =
                (tree.nodes[idx].feature, tree.nodes[idx].left, tree.nodes[idx].right)
            {
                let next = if x[f] <= tree.nodes[idx].threshold { l } else { r };
                contributions[f] += lr * (expected[next] - expected[idx]);
                idx = next;
            }
        }

        Ok(Some(Attribution {
            bias,
            contributions: self
                .model
                .schema
                .features
                .iter()
                .cloned()
                .zip(contributions)
                .collect(),
        }))
    }

    fn fingerprint(&self) -> Option<&str> {
        Some(&self.fingerprint)
    }
}
