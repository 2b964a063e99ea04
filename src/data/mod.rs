// mod.rs - Alignment data module

pub mod alignment;
pub mod loaders;
pub mod reduction;

// Re-export main types for convenience
pub use alignment::{Alignment, AlignmentStats, DataType, SitePatterns};
pub use loaders::{load, AlignmentFormat};
pub use reduction::{reduce, ReductionPolicy, ReductionReport, MIN_TAXA};
