// bipartition.rs - Non-trivial splits of unrooted trees as canonical bitsets

use std::collections::{HashMap, HashSet};

use super::tree::PhyloTree;

/// Sorted taxon list shared by every tree in a set; maps labels to bit positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl TaxonIndex {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort_unstable();
        names.dedup();
        let positions = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Self { names, positions }
    }

    /// Taxon set taken from the leaves of a tree
    pub fn from_tree(tree: &PhyloTree) -> Self {
        Self::new(tree.leaf_labels())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    fn words(&self) -> usize {
        self.names.len().div_ceil(64)
    }
}

/// One side of a split, canonicalised so that taxon 0 is never a member
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bipartition(Vec<u64>);

impl Bipartition {
    fn canonical(mut bits: Vec<u64>, n_taxa: usize) -> Self {
        if bits.first().is_some_and(|w| w & 1 == 1) {
            for w in bits.iter_mut() {
                *w = !*w;
            }
            let tail = n_taxa % 64;
            if tail != 0 {
                if let Some(last) = bits.last_mut() {
                    *last &= (1u64 << tail) - 1;
                }
            }
        }
        Bipartition(bits)
    }

    /// Number of taxa on the canonical side
    pub fn size(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// Set of non-trivial splits of a tree over `taxa`.
///
/// Fails when the tree's leaf set differs from the taxon index.
pub fn splits(tree: &PhyloTree, taxa: &TaxonIndex) -> Result<HashSet<Bipartition>, String> {
    let n = taxa.len();
    let words = taxa.words();
    let mut masks = vec![vec![0u64; words]; tree.nodes.len()];
    let mut leaf_count = 0usize;

    for (idx, node) in tree.nodes.iter().enumerate() {
        if node.is_leaf() {
            let pos = taxa
                .position(&node.label)
                .ok_or_else(|| format!("leaf '{}' is not part of the taxon set", node.label))?;
            masks[idx][pos / 64] |= 1u64 << (pos % 64);
            leaf_count += 1;
        }
    }
    if leaf_count != n {
        return Err(format!("tree has {} leaves but the taxon set has {}", leaf_count, n));
    }

    // children always sit after their parent in the arena
    for idx in (0..tree.nodes.len()).rev() {
        if let Some(parent) = tree.nodes[idx].parent {
            let child = std::mem::take(&mut masks[idx]);
            for (w, c) in masks[parent].iter_mut().zip(child.iter()) {
                *w |= *c;
            }
            masks[idx] = child;
        }
    }

    let mut result = HashSet::new();
    for (idx, mask) in masks.into_iter().enumerate() {
        if idx == tree.root || tree.nodes[idx].is_leaf() {
            continue;
        }
        let size: usize = mask.iter().map(|w| w.count_ones() as usize).sum();
        if size < 2 || size + 2 > n {
            continue;
        }
        result.insert(Bipartition::canonical(mask, n));
    }
    Ok(result)
}

/// Unweighted Robinson-Foulds distance between two split sets
pub fn rf_distance(a: &HashSet<Bipartition>, b: &HashSet<Bipartition>) -> usize {
    a.symmetric_difference(b).count()
}

/// Largest possible RF distance between unrooted binary trees on `n` taxa
pub fn max_rf(n_taxa: usize) -> usize {
    if n_taxa <= 3 {
        0
    } else {
        2 * (n_taxa - 3)
    }
}
