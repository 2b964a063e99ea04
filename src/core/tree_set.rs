// tree_set.rs - Ordered set of parsimony starting trees over one taxon set

use super::bipartition::TaxonIndex;
use super::tree::PhyloTree;

/// A single inferred tree with its parsimony score
#[derive(Debug, Clone)]
pub struct ScoredTree {
    /// Position in the inference output (0-based, deterministic)
    pub index: usize,
    /// Newick string exactly as produced by the inference tool
    pub newick: String,
    pub tree: PhyloTree,
    pub parsimony_score: u64,
}

/// Trees sharing exactly the same leaf set, in inference order
#[derive(Debug, Clone)]
pub struct ParsimonyTreeSet {
    trees: Vec<ScoredTree>,
    taxa: TaxonIndex,
}

impl ParsimonyTreeSet {
    /// Build a set and check that every tree spans exactly `taxa`
    pub fn new(trees: Vec<ScoredTree>, taxa: TaxonIndex) -> Result<Self, String> {
        if trees.is_empty() {
            return Err("tree set is empty".to_string());
        }
        for scored in &trees {
            let leaves = TaxonIndex::from_tree(&scored.tree);
            if leaves != taxa {
                let missing: Vec<&str> = taxa
                    .names()
                    .iter()
                    .filter(|n| leaves.position(n).is_none())
                    .map(String::as_str)
                    .collect();
                let extra: Vec<&str> = leaves
                    .names()
                    .iter()
                    .filter(|n| taxa.position(n).is_none())
                    .map(String::as_str)
                    .collect();
                return Err(format!(
                    "tree {} does not span the alignment taxa (missing: [{}], unexpected: [{}])",
                    scored.index + 1,
                    missing.join(", "),
                    extra.join(", ")
                ));
            }
        }
        Ok(Self { trees, taxa })
    }

    /// Parse one Newick tree per non-blank line.
    ///
    /// The taxon set is taken from `taxa` when given, otherwise from the first
    /// tree. Scores are `scores[i]` when provided, else 0.
    pub fn from_newick_lines(
        text: &str,
        taxa: Option<TaxonIndex>,
        scores: Option<&[u64]>,
    ) -> Result<Self, String> {
        let mut trees = Vec::new();
        for (line_num, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let tree = PhyloTree::from_newick(line)
                .map_err(|e| format!("malformed Newick on line {}: {}", line_num + 1, e))?;
            let index = trees.len();
            let parsimony_score = scores.and_then(|s| s.get(index).copied()).unwrap_or(0);
            trees.push(ScoredTree {
                index,
                newick: line.to_string(),
                tree,
                parsimony_score,
            });
        }

        let taxa = match taxa {
            Some(t) => t,
            None => trees
                .first()
                .map(|t| TaxonIndex::from_tree(&t.tree))
                .ok_or("no trees found")?,
        };
        Self::new(trees, taxa)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn trees(&self) -> &[ScoredTree] {
        &self.trees
    }

    pub fn taxa(&self) -> &TaxonIndex {
        &self.taxa
    }

    pub fn scores(&self) -> Vec<u64> {
        self.trees.iter().map(|t| t.parsimony_score).collect()
    }

    /// Replace the parsimony scores, one per tree in order
    pub fn with_scores(mut self, scores: &[u64]) -> Result<Self, String> {
        if scores.len() != self.trees.len() {
            return Err(format!(
                "{} scores given for {} trees",
                scores.len(),
                self.trees.len()
            ));
        }
        for (tree, &score) in self.trees.iter_mut().zip(scores) {
            tree.parsimony_score = score;
        }
        Ok(self)
    }

    /// Concatenated Newick strings, one per line
    pub fn to_newick_lines(&self) -> String {
        let mut out = String::new();
        for t in &self.trees {
            out.push_str(&t.newick);
            out.push('\n');
        }
        out
    }
}
