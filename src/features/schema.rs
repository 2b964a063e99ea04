// schema.rs - Versioned feature lists shared between assembler and scorer

use serde::{Deserialize, Serialize};

/// Version tag of the built-in feature list
pub const DEFAULT_SCHEMA_VERSION: &str = "pythia-1.0";

/// Ordered feature names a scorer was trained against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: String,
    pub features: Vec<String>,
}

impl FeatureSchema {
    pub fn new<S: Into<String>>(version: impl Into<String>, features: impl IntoIterator<Item = S>) -> Self {
        Self {
            version: version.into(),
            features: features.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::new(
            DEFAULT_SCHEMA_VERSION,
            [
                "num_patterns/num_taxa",
                "num_sites/num_taxa",
                "proportion_gaps",
                "proportion_invariant",
                "entropy",
                "bollback",
                "pattern_entropy",
                "avg_rfdist_parsimony",
                "proportion_unique_topos_parsimony",
            ],
        )
    }
}

/// Feature list used when a model does not declare its own
pub fn default_schema() -> FeatureSchema {
    FeatureSchema::default()
}
