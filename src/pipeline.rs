// pipeline.rs - End-to-end difficulty prediction for one alignment

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::core::{topology_stats, DistanceMatrix, ParsimonyTreeSet, TopologyStats};
use crate::data::{load, reduce, Alignment, AlignmentStats, ReductionPolicy, ReductionReport};
use crate::error::{PythiaError, Result};
use crate::features::{assemble, validate_schema, FeatureVector};
use crate::inference::{infer_parsimony_trees, InferenceOptions, RaxmlNg, TreeInferenceProvider};
use crate::output;
use crate::scorer::{Attribution, DifficultyScorer, GradientBoostedScorer};

/// Suffix appended to the input path for the reduced alignment
pub const REDUCED_SUFFIX: &str = ".pythia.reduced.phy";

/// Everything one run needs besides its collaborators
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub msa: PathBuf,
    pub reduction: ReductionPolicy,
    pub inference: InferenceOptions,
    /// Persist the reduced alignment next to the input when sequences were dropped
    pub write_reduced: bool,
    /// Ask the scorer for per-feature attributions
    pub explain: bool,
}

impl PipelineConfig {
    pub fn new(msa: impl Into<PathBuf>) -> Self {
        Self {
            msa: msa.into(),
            reduction: ReductionPolicy::default(),
            inference: InferenceOptions::default(),
            write_reduced: true,
            explain: false,
        }
    }
}

/// Wall-clock time spent per stage
#[derive(Debug, Clone, Copy, Default)]
pub struct StageTimings {
    pub load: Duration,
    pub inference: Duration,
    pub features: Duration,
    pub prediction: Duration,
}

impl StageTimings {
    pub fn total(&self) -> Duration {
        self.load + self.inference + self.features + self.prediction
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Alignment the features were computed on (after reduction)
    pub alignment: Alignment,
    pub alignment_stats: AlignmentStats,
    pub reduction: ReductionReport,
    pub reduced_alignment_path: Option<PathBuf>,
    pub tree_set: ParsimonyTreeSet,
    pub distances: DistanceMatrix,
    pub topology: TopologyStats,
    pub features: FeatureVector,
    pub difficulty: f64,
    pub attribution: Option<Attribution>,
    pub inference_log: String,
    pub predictor_fingerprint: Option<String>,
    pub timings: StageTimings,
}

/// Path of the reduced alignment written for `msa`
pub fn reduced_alignment_path(msa: &Path) -> PathBuf {
    let mut name = OsString::from(msa.as_os_str());
    name.push(REDUCED_SUFFIX);
    PathBuf::from(name)
}

/// Loader, tree search, distance engine, assembler and scorer wired together.
///
/// A run is synchronous and only blocks on the tree-search subprocess.
/// Callers are responsible for two things when running many alignments:
///
/// - no two runs may share an MSA path or output prefix in the same
///   directory, since the reduced alignment and result files would collide;
/// - when batches are parallelised across processes, the scorer must
///   evaluate single-threaded. [`GradientBoostedScorer`] always does; a
///   custom [`DifficultyScorer`] has to guarantee it itself.
pub struct Pipeline {
    config: PipelineConfig,
    provider: Box<dyn TreeInferenceProvider>,
    scorer: Box<dyn DifficultyScorer>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        provider: Box<dyn TreeInferenceProvider>,
        scorer: Box<dyn DifficultyScorer>,
    ) -> Self {
        Self {
            config,
            provider,
            scorer,
        }
    }

    /// RAxML-NG provider and a JSON boosted-tree model from explicit paths
    pub fn from_paths(config: PipelineConfig, raxmlng: &Path, predictor: &Path) -> Result<Self> {
        let provider = RaxmlNg::new(raxmlng)?;
        let scorer = GradientBoostedScorer::from_file(predictor)?;
        Ok(Self::new(config, Box::new(provider), Box::new(scorer)))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn scorer(&self) -> &dyn DifficultyScorer {
        self.scorer.as_ref()
    }

    /// Run every stage; the first failure is returned unchanged
    pub fn run(&self) -> Result<PipelineResult> {
        let mut timings = StageTimings::default();
        let config = &self.config;

        // fail before spawning anything if the model wants features we lack
        validate_schema(self.scorer.schema())?;

        let start = Instant::now();
        let alignment = load(&config.msa)?;
        let (alignment, reduction) = reduce(&alignment, config.reduction)?;
        let reduced_alignment_path = if reduction.is_reduced() && config.write_reduced {
            let path = reduced_alignment_path(&config.msa);
            output::write_reduced_alignment(&path, &alignment)?;
            Some(path)
        } else {
            None
        };
        timings.load = start.elapsed();

        let start = Instant::now();
        let (tree_set, inference_log) =
            infer_parsimony_trees(self.provider.as_ref(), &alignment, &config.inference)?;
        timings.inference = start.elapsed();

        let start = Instant::now();
        let (distances, topology) =
            topology_stats(&tree_set).map_err(PythiaError::ExternalToolOutputParse)?;
        let features = assemble(&alignment, &tree_set, &topology, self.scorer.schema())?;
        timings.features = start.elapsed();

        let start = Instant::now();
        let difficulty = self.scorer.predict(&features)?;
        let attribution = if config.explain {
            let attribution = self.scorer.explain(&features)?;
            if attribution.is_none() {
                warn!("predictor does not support feature attribution");
            }
            attribution
        } else {
            None
        };
        timings.prediction = start.elapsed();

        info!(
            msa = %config.msa.display(),
            difficulty,
            taxa = alignment.num_taxa(),
            elapsed_ms = timings.total().as_millis() as u64,
            "difficulty predicted"
        );

        Ok(PipelineResult {
            alignment_stats: alignment.stats(),
            alignment,
            reduction,
            reduced_alignment_path,
            tree_set,
            distances,
            topology,
            features,
            difficulty,
            attribution,
            inference_log,
            predictor_fingerprint: self.scorer.fingerprint().map(str::to_string),
            timings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_path_appends_suffix() {
        assert_eq!(
            reduced_alignment_path(Path::new("data/msa.fasta")),
            PathBuf::from("data/msa.fasta.pythia.reduced.phy")
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = PipelineConfig::new("msa.phy");
        assert_eq!(config.inference.num_trees, 24);
        assert_eq!(config.inference.seed, 0);
        assert!(config.write_reduced);
        assert!(!config.explain);
        assert!(!config.reduction.force_duplicates);
    }

    #[test]
    fn test_stage_timings_total() {
        let t = StageTimings {
            load: Duration::from_millis(1),
            inference: Duration::from_millis(2),
            features: Duration::from_millis(3),
            prediction: Duration::from_millis(4),
        };
        assert_eq!(t.total(), Duration::from_millis(10));
    }
}
