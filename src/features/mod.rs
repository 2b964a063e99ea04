// mod.rs - Feature assembly from alignment and tree-set statistics

pub mod schema;

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::core::{ParsimonyTreeSet, TopologyStats};
use crate::data::Alignment;
use crate::error::{PythiaError, Result};

// Re-export main types for convenience
pub use schema::{default_schema, FeatureSchema, DEFAULT_SCHEMA_VERSION};

/// Every feature the assembler knows how to compute
pub const COMPUTABLE_FEATURES: &[&str] = &[
    "num_taxa",
    "num_sites",
    "num_patterns",
    "num_patterns/num_taxa",
    "num_sites/num_taxa",
    "proportion_gaps",
    "proportion_invariant",
    "entropy",
    "bollback",
    "pattern_entropy",
    "treelikeness",
    "data_type",
    "avg_rfdist_parsimony",
    "max_rfdist_parsimony",
    "min_rfdist_parsimony",
    "avg_abs_rfdist_parsimony",
    "num_topos_parsimony",
    "proportion_unique_topos_parsimony",
    "mean_parsimony_score",
];

/// Feature values in schema order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    schema_version: String,
    entries: Vec<(String, f64)>,
}

impl FeatureVector {
    /// Pair precomputed values with the schema's names
    pub fn from_parts(schema: &FeatureSchema, values: Vec<f64>) -> Result<Self> {
        if values.len() != schema.len() {
            return Err(mismatch(
                schema,
                format!("{} values given for {} features", values.len(), schema.len()),
            ));
        }
        Ok(Self {
            schema_version: schema.version.clone(),
            entries: schema.features.iter().cloned().zip(values).collect(),
        })
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Whether names and order match `schema` exactly
    pub fn matches(&self, schema: &FeatureSchema) -> bool {
        self.schema_version == schema.version && self.names().eq(schema.features.iter().map(String::as_str))
    }
}

fn mismatch(schema: &FeatureSchema, reason: String) -> PythiaError {
    PythiaError::FeatureSchemaMismatch {
        schema_version: schema.version.clone(),
        reason,
    }
}

/// Check that every name is known and appears once
pub fn validate_schema(schema: &FeatureSchema) -> Result<()> {
    if schema.is_empty() {
        return Err(mismatch(schema, "schema lists no features".to_string()));
    }
    let mut seen = HashSet::new();
    for name in &schema.features {
        if !seen.insert(name.as_str()) {
            return Err(mismatch(schema, format!("feature '{}' is listed twice", name)));
        }
    }
    let unknown: Vec<&str> = schema
        .features
        .iter()
        .map(String::as_str)
        .filter(|n| !COMPUTABLE_FEATURES.contains(n))
        .collect();
    if !unknown.is_empty() {
        return Err(mismatch(
            schema,
            format!("cannot compute feature(s): {}", unknown.join(", ")),
        ));
    }
    Ok(())
}

/// Build the feature vector the scorer expects.
///
/// Fails rather than padding when the schema names a feature this
/// assembler cannot compute.
pub fn assemble(
    alignment: &Alignment,
    tree_set: &ParsimonyTreeSet,
    stats: &TopologyStats,
    schema: &FeatureSchema,
) -> Result<FeatureVector> {
    validate_schema(schema)?;

    let a = alignment.stats();
    let taxa = a.num_taxa as f64;
    let scores = tree_set.scores();
    let mean_score = scores.iter().sum::<u64>() as f64 / scores.len().max(1) as f64;

    let mut entries = Vec::with_capacity(schema.len());
    for name in &schema.features {
        let value = match name.as_str() {
            "num_taxa" => taxa,
            "num_sites" => a.num_sites as f64,
            "num_patterns" => a.num_patterns as f64,
            "num_patterns/num_taxa" => a.num_patterns as f64 / taxa,
            "num_sites/num_taxa" => a.num_sites as f64 / taxa,
            "proportion_gaps" => a.proportion_gaps,
            "proportion_invariant" => a.proportion_invariant,
            "entropy" => a.entropy,
            "bollback" => a.bollback,
            "pattern_entropy" => a.pattern_entropy,
            "treelikeness" => alignment.treelikeness(),
            "data_type" => alignment.data_type().code(),
            "avg_rfdist_parsimony" => stats.mean_distance,
            "max_rfdist_parsimony" => stats.max_distance,
            "min_rfdist_parsimony" => stats.min_distance,
            "avg_abs_rfdist_parsimony" => stats.mean_absolute_distance,
            "num_topos_parsimony" => stats.num_unique_topologies as f64,
            "proportion_unique_topos_parsimony" => stats.proportion_unique_topologies,
            "mean_parsimony_score" => mean_score,
            other => return Err(mismatch(schema, format!("cannot compute feature '{}'", other))),
        };
        entries.push((name.clone(), value));
    }

    debug!(schema = %schema.version, features = entries.len(), "feature vector assembled");
    Ok(FeatureVector {
        schema_version: schema.version.clone(),
        entries,
    })
}
