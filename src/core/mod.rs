// mod.rs - Core logic module

pub mod bipartition;
pub mod distance;
pub mod parsimony;
pub mod tree;
pub mod tree_set;

// Re-export main types for convenience
pub use bipartition::{max_rf, rf_distance, splits, Bipartition, TaxonIndex};
pub use distance::{aggregate, pairwise_distances, topology_stats, DistanceMatrix, TopologyStats};
pub use parsimony::parsimony_score;
pub use tree::{PhyloTree, TreeNode};
pub use tree_set::{ParsimonyTreeSet, ScoredTree};
