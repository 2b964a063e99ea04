// traits.rs - Difficulty scorer interface

use serde::Serialize;

use crate::error::{PythiaError, Result};
use crate::features::{FeatureSchema, FeatureVector};

/// Per-feature contributions to one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribution {
    /// Expected model output before any feature is observed
    pub bias: f64,
    /// Contribution of each feature, in schema order
    pub contributions: Vec<(String, f64)>,
}

impl Attribution {
    pub fn total(&self) -> f64 {
        self.bias + self.contributions.iter().map(|(_, c)| c).sum::<f64>()
    }
}

/// A trained model mapping feature vectors to difficulty in `[0, 1]`
pub trait DifficultyScorer: Send + Sync {
    /// Features the model was trained against, in order
    fn schema(&self) -> &FeatureSchema;

    fn predict(&self, features: &FeatureVector) -> Result<f64>;

    /// Attribution of a prediction to features, when the model supports it
    fn explain(&self, _features: &FeatureVector) -> Result<Option<Attribution>> {
        Ok(None)
    }

    /// Content hash of the model, for provenance
    fn fingerprint(&self) -> Option<&str> {
        None
    }
}

/// Reject vectors whose names or order differ from the schema
pub fn check_features(schema: &FeatureSchema, features: &FeatureVector) -> Result<()> {
    if features.matches(schema) {
        return Ok(());
    }
    let got: Vec<&str> = features.names().collect();
    Err(PythiaError::FeatureSchemaMismatch {
        schema_version: schema.version.clone(),
        reason: format!(
            "feature vector '{}' [{}] does not match model features [{}]",
            features.schema_version(),
            got.join(", "),
            schema.features.join(", ")
        ),
    })
}
