// distance.rs - Pairwise Robinson-Foulds distances and topology statistics

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use super::bipartition::{max_rf, rf_distance, splits, Bipartition};
use super::tree_set::ParsimonyTreeSet;

/// Pair count above which a progress bar is shown
const PROGRESS_THRESHOLD: usize = 50_000;

/// Square, symmetric matrix of RF distances with a zero diagonal.
///
/// Absolute distances are stored; [`DistanceMatrix::get`] returns them
/// normalised by `2(n-3)`, the maximum for unrooted binary trees.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    n_taxa: usize,
    absolute: Vec<usize>,
}

impl DistanceMatrix {
    fn zeros(size: usize, n_taxa: usize) -> Self {
        Self {
            size,
            n_taxa,
            absolute: vec![0; size * size],
        }
    }

    /// Number of trees (rows / columns)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Absolute RF distance between trees `i` and `j`
    pub fn absolute(&self, i: usize, j: usize) -> usize {
        self.absolute[i * self.size + j]
    }

    /// Normalised RF distance in `[0, 1]`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let max = max_rf(self.n_taxa);
        if max == 0 {
            0.0
        } else {
            self.absolute(i, j) as f64 / max as f64
        }
    }

    /// Row of normalised distances
    pub fn row(&self, i: usize) -> Vec<f64> {
        (0..self.size).map(|j| self.get(i, j)).collect()
    }

    fn set(&mut self, i: usize, j: usize, value: usize) {
        self.absolute[i * self.size + j] = value;
        self.absolute[j * self.size + i] = value;
    }
}

/// Aggregate topological statistics of a tree set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TopologyStats {
    pub num_trees: usize,
    pub num_unique_topologies: usize,
    pub proportion_unique_topologies: f64,
    /// Mean normalised RF distance over all unordered pairs
    pub mean_distance: f64,
    pub max_distance: f64,
    pub min_distance: f64,
    /// Mean absolute RF distance over all unordered pairs
    pub mean_absolute_distance: f64,
}

/// Compute all pairwise normalised RF distances
pub fn pairwise_distances(tree_set: &ParsimonyTreeSet) -> Result<DistanceMatrix, String> {
    let n_trees = tree_set.len();
    let taxa = tree_set.taxa();
    let mut matrix = DistanceMatrix::zeros(n_trees, taxa.len());

    let split_sets: Vec<HashSet<Bipartition>> = tree_set
        .trees()
        .par_iter()
        .map(|t| splits(&t.tree, taxa))
        .collect::<Result<Vec<_>, String>>()?;

    let total_comparisons = n_trees * n_trees.saturating_sub(1) / 2;
    if total_comparisons == 0 {
        return Ok(matrix);
    }

    let start = Instant::now();
    let pb = if total_comparisons >= PROGRESS_THRESHOLD {
        let pb = ProgressBar::new(total_comparisons as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {per_sec} ETA: {eta}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    // Progress tracking with reduced contention
    let update_interval = std::cmp::max(1, total_comparisons / 100);
    let progress_counter = Arc::new(AtomicUsize::new(0));

    let upper_triangle: Vec<(usize, usize, usize)> = (0..n_trees)
        .into_par_iter()
        .flat_map(|i| {
            let progress = progress_counter.clone();
            let pb = pb.clone();
            let split_sets = &split_sets;
            (i + 1..n_trees).into_par_iter().map(move |j| {
                let d = rf_distance(&split_sets[i], &split_sets[j]);
                let count = progress.fetch_add(1, Ordering::Relaxed) + 1;
                if count % update_interval == 0 {
                    pb.set_position(count as u64);
                }
                (i, j, d)
            })
        })
        .collect();

    pb.finish_and_clear();

    for (i, j, d) in upper_triangle {
        matrix.set(i, j, d);
    }

    debug!(
        trees = n_trees,
        comparisons = total_comparisons,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "pairwise RF distances computed"
    );
    Ok(matrix)
}

/// Summarise a tree set and its distance matrix
pub fn aggregate(tree_set: &ParsimonyTreeSet, matrix: &DistanceMatrix) -> TopologyStats {
    let n = tree_set.len();

    // RF = 0 is an equivalence relation on trees over one taxon set
    let mut class: Vec<Option<usize>> = vec![None; n];
    let mut num_unique = 0;
    for i in 0..n {
        if class[i].is_some() {
            continue;
        }
        class[i] = Some(num_unique);
        for j in i + 1..n {
            if class[j].is_none() && matrix.absolute(i, j) == 0 {
                class[j] = Some(num_unique);
            }
        }
        num_unique += 1;
    }

    let pairs = n * n.saturating_sub(1) / 2;
    let (mut sum, mut sum_abs, mut max, mut min) = (0.0, 0.0, 0.0f64, f64::INFINITY);
    for i in 0..n {
        for j in i + 1..n {
            let d = matrix.get(i, j);
            sum += d;
            sum_abs += matrix.absolute(i, j) as f64;
            max = max.max(d);
            min = min.min(d);
        }
    }

    let stats = if pairs == 0 {
        TopologyStats {
            num_trees: n,
            num_unique_topologies: num_unique,
            proportion_unique_topologies: if n == 0 { 0.0 } else { num_unique as f64 / n as f64 },
            mean_distance: 0.0,
            max_distance: 0.0,
            min_distance: 0.0,
            mean_absolute_distance: 0.0,
        }
    } else {
        TopologyStats {
            num_trees: n,
            num_unique_topologies: num_unique,
            proportion_unique_topologies: num_unique as f64 / n as f64,
            mean_distance: sum / pairs as f64,
            max_distance: max,
            min_distance: min,
            mean_absolute_distance: sum_abs / pairs as f64,
        }
    };

    info!(
        trees = stats.num_trees,
        unique_topologies = stats.num_unique_topologies,
        mean_rf = stats.mean_distance,
        "topology statistics"
    );
    stats
}

/// Distance matrix and statistics in one call
pub fn topology_stats(tree_set: &ParsimonyTreeSet) -> Result<(DistanceMatrix, TopologyStats), String> {
    let matrix = pairwise_distances(tree_set)?;
    let stats = aggregate(tree_set, &matrix);
    Ok((matrix, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(lines: &[&str]) -> ParsimonyTreeSet {
        ParsimonyTreeSet::from_newick_lines(&lines.join("\n"), None, None).unwrap()
    }

    #[test]
    fn test_matrix_symmetric_zero_diagonal() {
        let s = set(&[
            "(((A,B),C),(D,E),F);",
            "(((A,C),B),(D,E),F);",
            "((A,(B,C)),(D,(E,F)));",
            "(((A,B),C),(D,E),F);",
        ]);
        let m = pairwise_distances(&s).unwrap();
        assert_eq!(m.size(), 4);
        for i in 0..4 {
            assert_eq!(m.get(i, i), 0.0);
            for j in 0..4 {
                assert_eq!(m.get(i, j), m.get(j, i));
                assert!((0.0..=1.0).contains(&m.get(i, j)));
            }
        }
        assert_eq!(m.absolute(0, 3), 0);
    }

    #[test]
    fn test_aggregate_counts_topologies() {
        let s = set(&[
            "((A,B),(C,D));",
            "((A,C),(B,D));",
            "(A,B,(C,D));",
            "((A,D),(B,C));",
        ]);
        let (m, stats) = topology_stats(&s).unwrap();
        assert_eq!(stats.num_trees, 4);
        assert_eq!(stats.num_unique_topologies, 3);
        assert!((stats.proportion_unique_topologies - 0.75).abs() < 1e-12);
        // 6 pairs: one identical pair, five at the maximum (2 = 2(n-3))
        assert_eq!(m.absolute(0, 2), 0);
        assert!((stats.mean_distance - 5.0 / 6.0).abs() < 1e-12);
        assert!((stats.mean_absolute_distance - 10.0 / 6.0).abs() < 1e-12);
        assert_eq!(stats.max_distance, 1.0);
        assert_eq!(stats.min_distance, 0.0);
    }

    #[test]
    fn test_single_tree_degenerate() {
        let s = set(&["((A,B),(C,D));"]);
        let (m, stats) = topology_stats(&s).unwrap();
        assert_eq!(m.size(), 1);
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(stats.num_unique_topologies, 1);
        assert_eq!(stats.proportion_unique_topologies, 1.0);
        assert_eq!(stats.mean_distance, 0.0);
        assert_eq!(stats.max_distance, 0.0);
    }

    #[test]
    fn test_all_identical_topologies() {
        let s = set(&["((A,B),(C,D),E);"; 5]);
        let (_, stats) = topology_stats(&s).unwrap();
        assert_eq!(stats.num_unique_topologies, 1);
        assert!((stats.proportion_unique_topologies - 0.2).abs() < 1e-12);
        assert_eq!(stats.mean_distance, 0.0);
    }

    #[test]
    fn test_row_matches_get() {
        let s = set(&["((A,B),(C,D),E);", "((A,C),(B,D),E);"]);
        let m = pairwise_distances(&s).unwrap();
        assert_eq!(m.row(0), vec![0.0, m.get(0, 1)]);
    }
}
