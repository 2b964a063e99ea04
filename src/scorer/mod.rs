// mod.rs - Difficulty scorer module

pub mod gbm;
pub mod traits;

// Re-export main types for convenience
pub use gbm::{GbmModel, GbmNode, GbmTree, GradientBoostedScorer};
pub use traits::{check_features, Attribution, DifficultyScorer};
