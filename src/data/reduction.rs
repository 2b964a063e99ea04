// reduction.rs - Duplicate and full-gap sequence policy

use serde::Serialize;
use tracing::{info, warn};

use crate::data::alignment::Alignment;
use crate::error::{PythiaError, Result};

/// Smallest alignment RAxML-NG builds an unrooted tree for
pub const MIN_TAXA: usize = 4;

/// What to do with degenerate sequences before feature extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReductionPolicy {
    /// Keep duplicate sequences instead of removing them (warn only)
    pub force_duplicates: bool,
    /// Keep sequences made only of gaps instead of removing them (warn only)
    pub force_full_gaps: bool,
}

/// Record of what the reduction step did
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReductionReport {
    /// Duplicates removed (every occurrence but the first of each group)
    pub removed_duplicates: Vec<String>,
    /// Full-gap sequences removed
    pub removed_full_gaps: Vec<String>,
    /// Duplicate groups left in place because of `force_duplicates`
    pub kept_duplicate_groups: Vec<Vec<String>>,
    /// Full-gap sequences left in place because of `force_full_gaps`
    pub kept_full_gaps: Vec<String>,
}

impl ReductionReport {
    /// Whether the returned alignment differs from the input
    pub fn is_reduced(&self) -> bool {
        !self.removed_duplicates.is_empty() || !self.removed_full_gaps.is_empty()
    }

    pub fn removed_count(&self) -> usize {
        self.removed_duplicates.len() + self.removed_full_gaps.len()
    }
}

/// Apply the policy and enforce the minimum taxon count.
///
/// Duplicates go first, keeping the first occurrence of each group; full-gap
/// sequences are removed from what remains. The input is never modified.
pub fn reduce(alignment: &Alignment, policy: ReductionPolicy) -> Result<(Alignment, ReductionReport)> {
    let mut report = ReductionReport::default();
    let names = alignment.names();
    let mut keep = vec![true; alignment.num_taxa()];

    for group in alignment.duplicate_groups() {
        if policy.force_duplicates {
            let group_names: Vec<String> = group.iter().map(|&i| names[i].clone()).collect();
            warn!(
                "duplicate sequences kept as requested: {}",
                group_names.join(", ")
            );
            report.kept_duplicate_groups.push(group_names);
        } else {
            for &dup in &group[1..] {
                keep[dup] = false;
                report.removed_duplicates.push(names[dup].clone());
            }
        }
    }

    for &idx in alignment.full_gap_sequences() {
        if !keep[idx] {
            continue;
        }
        if policy.force_full_gaps {
            warn!("full-gap sequence kept as requested: {}", names[idx]);
            report.kept_full_gaps.push(names[idx].clone());
        } else {
            keep[idx] = false;
            report.removed_full_gaps.push(names[idx].clone());
        }
    }

    let reduced = if report.is_reduced() {
        let rows: Vec<usize> = (0..keep.len()).filter(|&i| keep[i]).collect();
        info!(
            removed_duplicates = report.removed_duplicates.len(),
            removed_full_gaps = report.removed_full_gaps.len(),
            remaining = rows.len(),
            "reduced alignment"
        );
        alignment.subset(&rows)
    } else {
        alignment.clone()
    };

    if reduced.num_taxa() < MIN_TAXA {
        return Err(PythiaError::InsufficientTaxa {
            remaining: reduced.num_taxa(),
            removed: report.removed_count(),
        });
    }

    Ok((reduced, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aln(rows: &[(&str, &str)]) -> Alignment {
        Alignment::new(
            rows.iter()
                .map(|(n, s)| (n.to_string(), s.as_bytes().to_vec()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_duplicates_removed_keeping_first() {
        let a = aln(&[
            ("t1", "ACGTA"),
            ("t2", "ACGTT"),
            ("t3", "ACGTA"),
            ("t4", "CCGTA"),
            ("t5", "GCGTA"),
            ("t6", "ACGTT"),
        ]);
        let (r, report) = reduce(&a, ReductionPolicy::default()).unwrap();
        assert_eq!(r.num_taxa(), a.num_taxa() - 2);
        assert_eq!(report.removed_duplicates, vec!["t3".to_string(), "t6".to_string()]);
        assert_eq!(r.names(), &["t1", "t2", "t4", "t5"].map(String::from));
        assert!(!r.has_duplicates());
    }

    #[test]
    fn test_force_duplicates_keeps_input() {
        let a = aln(&[("t1", "ACGT"), ("t2", "ACGT"), ("t3", "CCGT"), ("t4", "GCGT")]);
        let policy = ReductionPolicy {
            force_duplicates: true,
            ..Default::default()
        };
        let (r, report) = reduce(&a, policy).unwrap();
        assert_eq!(r.num_taxa(), 4);
        assert!(!report.is_reduced());
        assert_eq!(report.kept_duplicate_groups.len(), 1);
    }

    #[test]
    fn test_full_gaps_removed() {
        let a = aln(&[
            ("t1", "ACGT"),
            ("t2", "----"),
            ("t3", "CCGT"),
            ("t4", "GCGT"),
            ("t5", "TCGA"),
        ]);
        let (r, report) = reduce(&a, ReductionPolicy::default()).unwrap();
        assert_eq!(report.removed_full_gaps, vec!["t2".to_string()]);
        assert_eq!(r.num_taxa(), 4);

        let policy = ReductionPolicy {
            force_full_gaps: true,
            ..Default::default()
        };
        let (r, report) = reduce(&a, policy).unwrap();
        assert_eq!(r.num_taxa(), 5);
        assert_eq!(report.kept_full_gaps, vec!["t2".to_string()]);
    }

    #[test]
    fn test_duplicate_full_gaps_counted_once() {
        let a = aln(&[
            ("t1", "ACGT"),
            ("t2", "----"),
            ("t3", "----"),
            ("t4", "GCGT"),
            ("t5", "TCGA"),
            ("t6", "CCGA"),
        ]);
        let (r, report) = reduce(&a, ReductionPolicy::default()).unwrap();
        assert_eq!(report.removed_duplicates, vec!["t3".to_string()]);
        assert_eq!(report.removed_full_gaps, vec!["t2".to_string()]);
        assert_eq!(r.num_taxa(), 4);
    }

    #[test]
    fn test_insufficient_taxa() {
        let a = aln(&[("t1", "ACGT"), ("t2", "ACGT"), ("t3", "CCGT"), ("t4", "GCGT")]);
        match reduce(&a, ReductionPolicy::default()) {
            Err(PythiaError::InsufficientTaxa { remaining, removed }) => {
                assert_eq!(remaining, 3);
                assert_eq!(removed, 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let small = aln(&[("t1", "ACGT"), ("t2", "CCGT"), ("t3", "GCGT")]);
        assert!(matches!(
            reduce(&small, ReductionPolicy::default()),
            Err(PythiaError::InsufficientTaxa { .. })
        ));
    }
}
