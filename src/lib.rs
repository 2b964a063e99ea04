// lib.rs - pythia library root

//! # pythia - Predict the difficulty of phylogenetic analyses on an MSA
//!
//! Before running an expensive maximum-likelihood tree search, pythia estimates
//! how hard the alignment will be to analyse. It loads and reduces the MSA,
//! asks RAxML-NG for a set of maximum-parsimony starting trees, measures how
//! much those trees disagree (Robinson-Foulds distances) and feeds these and
//! alignment statistics into a gradient-boosted regression model.
//!
//! ## Features
//!
//! - **FASTA and relaxed PHYLIP** input with content-based format detection
//! - **DNA, amino-acid and morphological** data
//! - **Duplicate / full-gap reduction** with explicit override flags
//! - **Parallel RF distances** over bitset bipartitions
//! - **Versioned feature schemas** checked against the predictor
//! - **Attribution** of each prediction to its features
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use pythia::prelude::*;
//!
//! let config = PipelineConfig::new("alignment.phy");
//! let pipeline = Pipeline::from_paths(
//!     config,
//!     std::path::Path::new("raxml-ng"),
//!     std::path::Path::new("predictor.json"),
//! )?;
//! let result = pipeline.run()?;
//! println!("difficulty: {:.2}", result.difficulty);
//! # Ok::<(), PythiaError>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod features;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod scorer;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{topology_stats, DistanceMatrix, ParsimonyTreeSet, PhyloTree, TopologyStats};
    pub use crate::data::{load, reduce, Alignment, DataType, ReductionPolicy, ReductionReport};
    pub use crate::error::{PythiaError, Result};
    pub use crate::features::{assemble, default_schema, FeatureSchema, FeatureVector};
    pub use crate::inference::{
        infer_parsimony_trees, CancellationToken, InferenceOptions, InferenceRequest, RaxmlNg,
        TreeInferenceProvider,
    };
    pub use crate::pipeline::{Pipeline, PipelineConfig, PipelineResult};
    pub use crate::scorer::{Attribution, DifficultyScorer, GradientBoostedScorer};
    pub use crate::{get_info, VERSION};
}

// Re-export main types at the root level for convenience
pub use error::{PythiaError, Result};
pub use pipeline::{Pipeline, PipelineConfig, PipelineResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "pythia v{} - Difficulty prediction for phylogenetic analyses",
        VERSION
    )
}
