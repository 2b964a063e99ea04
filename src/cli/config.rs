// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{PythiaError, Result};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub msa: Option<String>,
    pub prefix: Option<String>,

    // Collaborators
    pub raxmlng: Option<String>,
    pub predictor: Option<String>,

    // Tree search
    pub threads: Option<usize>,
    pub seed: Option<u64>,
    pub num_trees: Option<usize>,
    pub timeout: Option<f64>,

    // Flags
    pub shap: Option<bool>,
    pub force_duplicates: Option<bool>,
    pub force_full_gaps: Option<bool>,
    pub nofiles: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| PythiaError::io(path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| PythiaError::Config(format!("failed to parse '{}': {}", path.display(), e)))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| PythiaError::Config(format!("failed to serialize config: {}", e)))?;

        fs::write(path, content).map_err(|e| PythiaError::io(path, e))?;

        println!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# pythia.toml - Configuration file for pythia
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Multiple sequence alignment (FASTA or relaxed PHYLIP)
msa = "/path/to/alignment.phy"

# Prefix for the .pythia.trees / .pythia.csv / .pythia.log files
# (omit to use the MSA path)
# prefix = "results/run1"

# =============================================================================
# COLLABORATORS
# =============================================================================

# RAxML-NG executable (omit to search PATH for raxml-ng)
raxmlng = "/usr/local/bin/raxml-ng"

# Difficulty predictor model (JSON)
predictor = "/path/to/predictor.json"

# =============================================================================
# TREE SEARCH
# =============================================================================

# Number of threads (omit for auto-detection)
threads = 4

# Seed for the parsimony tree search
seed = 0

# Number of parsimony starting trees
num_trees = 24

# Kill RAxML-NG after this many seconds
# timeout = 600.0

# =============================================================================
# FLAGS
# =============================================================================

# Write per-feature attributions (.pythia.shap.csv)
shap = false

# Keep duplicate sequences instead of removing them
force_duplicates = false

# Keep sequences consisting only of gaps instead of removing them
force_full_gaps = false

# Do not write any output files
nofiles = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(&Config::generate_sample()).unwrap();
        assert_eq!(config.num_trees, Some(24));
        assert_eq!(config.seed, Some(0));
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.timeout, None);
        assert_eq!(config.shap, Some(false));
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pythia.toml");
        let config = Config {
            msa: Some("a.phy".to_string()),
            timeout: Some(2.5),
            ..Config::new()
        };
        config.to_file(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "seed = \"zero\"").unwrap();
        assert!(matches!(Config::from_file(&path), Err(PythiaError::Config(_))));
    }
}
