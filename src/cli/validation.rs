// validation.rs - Input validation utilities

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::args::Args;
use crate::data::ReductionPolicy;
use crate::error::{PythiaError, Result};
use crate::inference::{InferenceOptions, DEFAULT_NUM_TREES};
use crate::output::ArtifactPaths;
use crate::pipeline::PipelineConfig;

/// Default executable name searched in PATH
pub const DEFAULT_RAXMLNG: &str = "raxml-ng";

pub struct ValidationResult {
    pub pipeline: PipelineConfig,
    pub raxmlng: PathBuf,
    pub predictor: PathBuf,
    /// `None` in no-file mode
    pub artifacts: Option<ArtifactPaths>,
    pub threads: Option<usize>,
}

fn invalid(message: impl Into<String>) -> PythiaError {
    PythiaError::Config(message.into())
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult> {
    let msa = args
        .msa
        .as_deref()
        .map(PathBuf::from)
        .ok_or_else(|| invalid("--msa is required"))?;
    if !msa.is_file() {
        return Err(invalid(format!("MSA file '{}' does not exist", msa.display())));
    }

    // no default model: the predictor must always be named explicitly
    let predictor = args
        .predictor
        .as_deref()
        .map(PathBuf::from)
        .ok_or_else(|| invalid("--predictor is required (path to a JSON model)"))?;
    if !predictor.is_file() {
        return Err(invalid(format!("predictor file '{}' does not exist", predictor.display())));
    }

    let num_trees = args.num_trees.unwrap_or(DEFAULT_NUM_TREES);
    if num_trees == 0 {
        return Err(invalid("--num-trees must be at least 1"));
    }
    if args.threads == Some(0) {
        return Err(invalid("--threads must be at least 1"));
    }
    let timeout = match args.timeout {
        Some(t) if !t.is_finite() || t <= 0.0 => {
            return Err(invalid("--timeout must be a positive number of seconds"))
        }
        Some(t) => Some(Duration::from_secs_f64(t)),
        None => None,
    };

    let raxmlng = PathBuf::from(args.raxmlng.as_deref().unwrap_or(DEFAULT_RAXMLNG));

    let artifacts = if args.nofiles {
        None
    } else {
        let prefix = args.prefix.as_deref().map(Path::new).unwrap_or(msa.as_path());
        Some(ArtifactPaths::from_prefix(prefix))
    };

    let pipeline = PipelineConfig {
        msa,
        reduction: ReductionPolicy {
            force_duplicates: args.force_duplicates,
            force_full_gaps: args.force_full_gaps,
        },
        inference: InferenceOptions {
            seed: args.seed.unwrap_or(0),
            num_trees,
            threads: args.threads,
            timeout,
            cancel: None,
        },
        write_reduced: !args.nofiles,
        explain: args.shap,
    };

    Ok(ValidationResult {
        pipeline,
        raxmlng,
        predictor,
        artifacts,
        threads: args.threads,
    })
}
