// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};
use crate::error::Result;
use crate::inference::DEFAULT_NUM_TREES;

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.msa.is_none() {
            self.msa = config.msa;
        }
        if self.prefix.is_none() {
            self.prefix = config.prefix;
        }

        // Collaborators
        if self.raxmlng.is_none() {
            self.raxmlng = config.raxmlng;
        }
        if self.predictor.is_none() {
            self.predictor = config.predictor;
        }

        // Tree search (an explicit CLI value wins even when it equals the default)
        if self.threads.is_none() {
            self.threads = config.threads;
        }
        if self.seed.is_none() {
            self.seed = config.seed;
        }
        if self.num_trees.is_none() {
            self.num_trees = config.num_trees;
        }
        if self.timeout.is_none() {
            self.timeout = config.timeout;
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        self.shap |= config.shap.unwrap_or(false);
        self.force_duplicates |= config.force_duplicates.unwrap_or(false);
        self.force_full_gaps |= config.force_full_gaps.unwrap_or(false);
        self.nofiles |= config.nofiles.unwrap_or(false);

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}
