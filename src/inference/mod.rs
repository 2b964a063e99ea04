// mod.rs - External tree-search adapter

pub mod log_parser;
pub mod process;
pub mod raxmlng;
pub mod traits;

use std::time::Duration;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::core::{parsimony_score, ParsimonyTreeSet, TaxonIndex};
use crate::data::Alignment;
use crate::error::{PythiaError, Result};

// Re-export main types for convenience
pub use log_parser::{parse_raxml_log, InferenceLog, RfLogSummary};
pub use process::CancellationToken;
pub use raxmlng::RaxmlNg;
pub use traits::{InferenceRequest, RawInference, TreeInferenceProvider};

/// Default number of parsimony starting trees
pub const DEFAULT_NUM_TREES: usize = 24;

/// Tunables of one tree-search run
#[derive(Debug, Clone)]
pub struct InferenceOptions {
    pub seed: u64,
    pub num_trees: usize,
    pub threads: Option<usize>,
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            num_trees: DEFAULT_NUM_TREES,
            threads: None,
            timeout: None,
            cancel: None,
        }
    }
}

/// Generate and validate parsimony starting trees for `alignment`.
///
/// Returns the scored tree set and the raw tool log. Every tree must span
/// exactly the alignment taxa and exactly `num_trees` trees must come back.
pub fn infer_parsimony_trees(
    provider: &dyn TreeInferenceProvider,
    alignment: &Alignment,
    options: &InferenceOptions,
) -> Result<(ParsimonyTreeSet, String)> {
    if options.num_trees == 0 {
        return Err(PythiaError::Config("number of parsimony trees must be at least 1".to_string()));
    }
    if options.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
        return Err(PythiaError::Cancelled);
    }

    let request = InferenceRequest {
        alignment,
        model: alignment.default_model(),
        seed: options.seed,
        num_trees: options.num_trees,
        threads: options.threads,
        timeout: options.timeout,
        cancel: options.cancel.clone(),
    };
    let raw = provider.infer(&request)?;

    if raw.tool_reduced_alignment {
        warn!(
            tool = provider.name(),
            "the tool found identical sequences and wrote its own reduced alignment"
        );
    }

    let taxa = TaxonIndex::new(alignment.names());
    let tree_set = ParsimonyTreeSet::from_newick_lines(&raw.trees, Some(taxa), None)
        .map_err(PythiaError::ExternalToolOutputParse)?;
    if tree_set.len() != options.num_trees {
        return Err(PythiaError::ExternalToolOutputParse(format!(
            "expected {} trees, got {}",
            options.num_trees,
            tree_set.len()
        )));
    }

    let log = provider.parse_log(&raw.log);
    compare_log_stats(&log, alignment);

    let scores = if log.parsimony_scores.len() == tree_set.len() {
        log.parsimony_scores.clone()
    } else {
        debug!(
            logged = log.parsimony_scores.len(),
            trees = tree_set.len(),
            "parsimony scores not in log, computing locally"
        );
        tree_set
            .trees()
            .par_iter()
            .map(|t| parsimony_score(&t.tree, alignment))
            .collect::<std::result::Result<Vec<_>, String>>()
            .map_err(PythiaError::ExternalToolOutputParse)?
    };
    let tree_set = tree_set
        .with_scores(&scores)
        .map_err(PythiaError::ExternalToolOutputParse)?;

    info!(
        tool = provider.name(),
        trees = tree_set.len(),
        best_score = scores.iter().min().copied().unwrap_or(0),
        "parsimony trees ready"
    );
    Ok((tree_set, raw.log))
}

fn compare_log_stats(log: &InferenceLog, alignment: &Alignment) {
    let stats = alignment.stats();
    if let Some(sites) = log.num_sites {
        if sites != stats.num_sites {
            warn!(log = sites, local = stats.num_sites, "site count differs from tool log");
        }
    }
    if let Some(patterns) = log.num_patterns {
        if patterns != stats.num_patterns {
            warn!(log = patterns, local = stats.num_patterns, "pattern count differs from tool log");
        }
    }
    if let Some(gaps) = log.proportion_gaps {
        // the log rounds to two decimals of a percent
        if (gaps - stats.proportion_gaps).abs() > 1e-4 {
            warn!(log = gaps, local = stats.proportion_gaps, "gap proportion differs from tool log");
        }
    }
    if let Some(inv) = log.proportion_invariant {
        if (inv - stats.proportion_invariant).abs() > 1e-4 {
            warn!(log = inv, local = stats.proportion_invariant, "invariant proportion differs from tool log");
        }
    }
}
