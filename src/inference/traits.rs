// traits.rs - Tree-search provider interface

use std::time::Duration;

use crate::data::Alignment;
use crate::error::Result;

use super::log_parser::{parse_raxml_log, InferenceLog};
use super::process::CancellationToken;

/// Everything a provider needs for one parsimony tree-search run
#[derive(Debug, Clone)]
pub struct InferenceRequest<'a> {
    pub alignment: &'a Alignment,
    /// Substitution model string understood by the tool
    pub model: String,
    pub seed: u64,
    pub num_trees: usize,
    pub threads: Option<usize>,
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

/// Unvalidated output of a provider run
#[derive(Debug, Clone, Default)]
pub struct RawInference {
    /// One Newick tree per line
    pub trees: String,
    pub log: String,
    /// The tool wrote its own reduced alignment (it found duplicates we kept)
    pub tool_reduced_alignment: bool,
}

/// Source of parsimony starting trees.
///
/// The production implementation shells out to RAxML-NG; tests substitute
/// deterministic in-process fakes.
pub trait TreeInferenceProvider: Send + Sync {
    /// Human-readable tool name for logs
    fn name(&self) -> &str;

    /// Run the tree search. Must not return partial results.
    fn infer(&self, request: &InferenceRequest<'_>) -> Result<RawInference>;

    /// Extract statistics from the run log
    fn parse_log(&self, log: &str) -> InferenceLog {
        parse_raxml_log(log)
    }
}
