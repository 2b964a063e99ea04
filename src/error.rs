// error.rs - Error taxonomy shared by every pipeline stage

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PythiaError>;

/// Every failure the difficulty pipeline can report.
///
/// Stages never swallow or rewrap these: whatever the loader, the tree-search
/// adapter or the feature assembler raises reaches the caller unchanged.
#[derive(Debug, Error)]
pub enum PythiaError {
    #[error("malformed alignment {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("unsupported data type in {}: characters {chars:?} are neither DNA, amino acid nor morphological states", path.display())]
    UnsupportedDataType { path: PathBuf, chars: Vec<char> },

    #[error("alignment has only {remaining} taxa left after reduction ({removed} removed); at least 4 are required")]
    InsufficientTaxa { remaining: usize, removed: usize },

    #[error("tree-search executable not found or not executable: {} ({reason})", path.display())]
    ExternalToolNotFound { path: PathBuf, reason: String },

    #[error("tree-search tool failed with exit code {}: `{command}`\n{details}", exit_code.map_or_else(|| "none (killed by signal)".to_string(), |c| c.to_string()))]
    ExternalToolExecution {
        command: String,
        exit_code: Option<i32>,
        details: String,
    },

    #[error("tree-search tool succeeded but its output is unusable: {0}")]
    ExternalToolOutputParse(String),

    #[error("tree-search tool exceeded the timeout of {seconds:.1}s and was killed: `{command}`\n{details}")]
    ExternalToolTimeout {
        command: String,
        seconds: f64,
        details: String,
    },

    #[error("feature schema '{schema_version}' cannot be satisfied: {reason}")]
    FeatureSchemaMismatch {
        schema_version: String,
        reason: String,
    },

    #[error("predictor model error: {0}")]
    Scorer(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("run cancelled before completion")]
    Cancelled,
}

impl PythiaError {
    /// Build an `Io` variant for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PythiaError::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a `Parse` variant for a path
    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        PythiaError::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code reported by the command line front-end
    pub fn exit_code(&self) -> i32 {
        match self {
            PythiaError::Parse { .. } => 2,
            PythiaError::UnsupportedDataType { .. } => 3,
            PythiaError::InsufficientTaxa { .. } => 4,
            PythiaError::ExternalToolNotFound { .. } => 5,
            PythiaError::ExternalToolExecution { .. } => 6,
            PythiaError::ExternalToolOutputParse(_) => 7,
            PythiaError::ExternalToolTimeout { .. } => 8,
            PythiaError::FeatureSchemaMismatch { .. } => 9,
            PythiaError::Scorer(_) => 10,
            PythiaError::Config(_) => 11,
            PythiaError::Io { .. } => 12,
            PythiaError::Cancelled => 130,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = vec![
            PythiaError::parse("a.phy", "x"),
            PythiaError::UnsupportedDataType {
                path: "a".into(),
                chars: vec!['&'],
            },
            PythiaError::InsufficientTaxa {
                remaining: 3,
                removed: 1,
            },
            PythiaError::ExternalToolNotFound {
                path: "raxml-ng".into(),
                reason: "missing".into(),
            },
            PythiaError::ExternalToolExecution {
                command: "raxml-ng".into(),
                exit_code: Some(1),
                details: String::new(),
            },
            PythiaError::ExternalToolOutputParse("x".into()),
            PythiaError::ExternalToolTimeout {
                command: "raxml-ng".into(),
                seconds: 1.0,
                details: String::new(),
            },
            PythiaError::FeatureSchemaMismatch {
                schema_version: "v".into(),
                reason: "x".into(),
            },
            PythiaError::Scorer("x".into()),
            PythiaError::Config("x".into()),
            PythiaError::io("f", std::io::Error::other("x")),
            PythiaError::Cancelled,
        ];

        let mut codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|&c| c != 0));
    }

    #[test]
    fn test_messages_name_the_precondition() {
        let err = PythiaError::InsufficientTaxa {
            remaining: 3,
            removed: 2,
        };
        assert!(err.to_string().contains("at least 4"));

        let err = PythiaError::ExternalToolExecution {
            command: "raxml-ng --start".into(),
            exit_code: None,
            details: "ERROR: boom".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("killed by signal"));
        assert!(msg.contains("ERROR: boom"));
    }
}
