// alignment.rs - Validated multiple sequence alignment with lazily derived statistics

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::{PythiaError, Result};

/// Characters accepted as morphological states (RAxML-NG MULTI alphabet order)
pub const STATE_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ!\"#$%&'()*+,/:;<=>@[\\]^_{|}~";
/// Nucleotides including IUPAC ambiguity codes
pub const DNA_CHARS: &[u8] = b"ATUCGMRWSYKVHDBN";
/// Amino acids including ambiguity and rare residues
pub const AA_CHARS: &[u8] = b"ACDEFGHIKLMNPQRSTVWYBZJUOX*";
/// Gap symbols valid for every data type
pub const GAP_CHARS: &[u8] = b"-?.";

/// Rows sampled at most when computing [`Alignment::treelikeness`]
pub const TREELIKENESS_SAMPLES: usize = 100;

/// Characters that may not appear in a taxon name (Newick / PHYLIP delimiters)
const FORBIDDEN_NAME_CHARS: &[char] = &[' ', '\t', '\n', '\r', ',', ':', ';', '(', ')'];

/// Sequence data type of an alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Dna,
    AminoAcid,
    Morphological,
}

impl DataType {
    /// Guess the data type from the set of (upper-cased) characters present
    pub fn detect(chars: &BTreeSet<u8>) -> std::result::Result<Self, Vec<char>> {
        let within = |alphabet: &[u8]| {
            chars
                .iter()
                .all(|c| alphabet.contains(c) || GAP_CHARS.contains(c))
        };

        if within(DNA_CHARS) {
            Ok(DataType::Dna)
        } else if within(AA_CHARS) {
            Ok(DataType::AminoAcid)
        } else if within(STATE_CHARS) {
            Ok(DataType::Morphological)
        } else {
            Err(chars
                .iter()
                .filter(|c| !STATE_CHARS.contains(c) && !AA_CHARS.contains(c) && !GAP_CHARS.contains(c))
                .map(|&c| c as char)
                .collect())
        }
    }

    /// Whether a character carries no information for this data type
    pub fn is_undetermined(&self, c: u8) -> bool {
        match self {
            DataType::Dna => matches!(c, b'-' | b'?' | b'.' | b'N' | b'X'),
            DataType::AminoAcid => matches!(c, b'-' | b'?' | b'.' | b'X'),
            DataType::Morphological => matches!(c, b'-' | b'?' | b'.'),
        }
    }

    /// Numeric code used when the data type enters the feature vector
    pub fn code(&self) -> f64 {
        match self {
            DataType::Dna => 0.0,
            DataType::AminoAcid => 1.0,
            DataType::Morphological => 2.0,
        }
    }

    /// Short label used in logs and result files
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Dna => "DNA",
            DataType::AminoAcid => "AA",
            DataType::Morphological => "MORPH",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distinct site patterns (columns) with their multiplicities, in order of first occurrence
#[derive(Debug, Clone)]
pub struct SitePatterns {
    /// One entry per distinct column, one byte per taxon
    pub columns: Vec<Vec<u8>>,
    /// Number of sites sharing each pattern
    pub weights: Vec<usize>,
}

impl SitePatterns {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Summary statistics of an alignment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignmentStats {
    pub num_taxa: usize,
    pub num_sites: usize,
    pub num_patterns: usize,
    pub proportion_gaps: f64,
    pub proportion_invariant: f64,
    pub entropy: f64,
    pub bollback: f64,
    pub pattern_entropy: f64,
}

#[derive(Debug, Clone)]
struct SiteSummary {
    gap_fractions: Vec<f64>,
    invariant: Vec<bool>,
    entropies: Vec<f64>,
}

/// Validated alignment: unique well-formed names, equal-length non-empty sequences.
///
/// Immutable once built. Derived data is computed on first access and cached;
/// reductions produce a fresh instance through [`Alignment::subset`].
#[derive(Debug, Clone)]
pub struct Alignment {
    names: Vec<String>,
    sequences: Vec<Vec<u8>>,
    data_type: DataType,
    sites: OnceLock<SiteSummary>,
    patterns: OnceLock<SitePatterns>,
    stats: OnceLock<AlignmentStats>,
    duplicates: OnceLock<Vec<Vec<usize>>>,
    full_gaps: OnceLock<Vec<usize>>,
    num_states: OnceLock<usize>,
    treelikeness: OnceLock<f64>,
}

impl Alignment {
    /// Build an alignment that did not come from a file
    pub fn new(records: Vec<(String, Vec<u8>)>) -> Result<Self> {
        Self::from_records(Path::new("<in-memory>"), records)
    }

    /// Validate records read from `source` and detect their data type.
    ///
    /// Sequences are upper-cased; RAxML-NG treats both cases identically.
    pub fn from_records(source: &Path, records: Vec<(String, Vec<u8>)>) -> Result<Self> {
        if records.is_empty() {
            return Err(PythiaError::parse(source, "alignment contains no sequences"));
        }

        let mut names = Vec::with_capacity(records.len());
        let mut sequences = Vec::with_capacity(records.len());
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut alphabet = BTreeSet::new();
        let expected_len = records[0].1.len();

        for (idx, (name, mut sequence)) in records.into_iter().enumerate() {
            validate_taxon_name(source, &name)?;
            if let Some(first) = seen.insert(name.clone(), idx) {
                return Err(PythiaError::parse(
                    source,
                    format!("taxon name '{}' appears twice (records {} and {})", name, first + 1, idx + 1),
                ));
            }
            if sequence.is_empty() {
                return Err(PythiaError::parse(
                    source,
                    format!("sequence of taxon '{}' is empty", name),
                ));
            }
            if sequence.len() != expected_len {
                return Err(PythiaError::parse(
                    source,
                    format!(
                        "sequences have different lengths: '{}' has {} sites, expected {}",
                        name,
                        sequence.len(),
                        expected_len
                    ),
                ));
            }

            sequence.make_ascii_uppercase();
            alphabet.extend(sequence.iter().copied());
            names.push(name);
            sequences.push(sequence);
        }

        let data_type = DataType::detect(&alphabet).map_err(|chars| PythiaError::UnsupportedDataType {
            path: source.to_path_buf(),
            chars,
        })?;

        Ok(Self::assemble(names, sequences, data_type))
    }

    fn assemble(names: Vec<String>, sequences: Vec<Vec<u8>>, data_type: DataType) -> Self {
        Self {
            names,
            sequences,
            data_type,
            sites: OnceLock::new(),
            patterns: OnceLock::new(),
            stats: OnceLock::new(),
            duplicates: OnceLock::new(),
            full_gaps: OnceLock::new(),
            num_states: OnceLock::new(),
            treelikeness: OnceLock::new(),
        }
    }

    /// New alignment holding only the given rows, in the given order
    pub fn subset(&self, keep: &[usize]) -> Self {
        let names = keep.iter().map(|&i| self.names[i].clone()).collect();
        let sequences = keep.iter().map(|&i| self.sequences[i].clone()).collect();
        Self::assemble(names, sequences, self.data_type)
    }

    pub fn num_taxa(&self) -> usize {
        self.names.len()
    }

    pub fn num_sites(&self) -> usize {
        self.sequences.first().map_or(0, Vec::len)
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn sequences(&self) -> &[Vec<u8>] {
        &self.sequences
    }

    /// Iterate over `(name, sequence)` rows
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.sequences.iter().map(Vec::as_slice))
    }

    /// Size of the MULTI state alphabet needed to cover every observed state.
    ///
    /// RAxML-NG reads `MULTIk` as the first `k` characters of the state
    /// alphabet, so this is the highest observed position plus one rather than
    /// the number of distinct states.
    pub fn num_states(&self) -> usize {
        *self.num_states.get_or_init(|| {
            let mut seen = [false; 256];
            for seq in &self.sequences {
                for &c in seq {
                    seen[c as usize] = true;
                }
            }
            STATE_CHARS
                .iter()
                .rposition(|&c| seen[c as usize] && !self.data_type.is_undetermined(c))
                .map_or(0, |pos| pos + 1)
        })
    }

    /// Substitution model handed to RAxML-NG for this alignment
    pub fn default_model(&self) -> String {
        match self.data_type {
            DataType::Dna => "GTR+G".to_string(),
            DataType::AminoAcid => "LG+G".to_string(),
            DataType::Morphological => format!("MULTI{}_GTR", self.num_states().max(2)),
        }
    }

    /// Treelikeness of the alignment from the delta plot (Holland et al. 2002).
    ///
    /// Averages the delta value over all quartets drawn from four disjoint
    /// blocks of at most [`TREELIKENESS_SAMPLES`] evenly spaced rows, using
    /// p-distances. In `[0, 1]`; lower means a stronger tree-like signal.
    /// Alignments with fewer than four rows score 0.
    pub fn treelikeness(&self) -> f64 {
        *self.treelikeness.get_or_init(|| {
            let n = self.num_taxa();
            let k = n.min(TREELIKENESS_SAMPLES);
            if k < 4 {
                return 0.0;
            }
            let rows: Vec<usize> = (0..k).map(|i| i * n / k).collect();
            let mut dm = vec![0.0; k * k];
            for i in 0..k {
                for j in i + 1..k {
                    let d = self.p_distance(rows[i], rows[j]);
                    dm[i * k + j] = d;
                    dm[j * k + i] = d;
                }
            }
            let d = |a: usize, b: usize| dm[a * k + b];

            let frac = k / 4;
            let (xs, ys, us, vs) = (0..frac, frac..2 * frac, 2 * frac..3 * frac, 3 * frac..k);
            let mut sum = 0.0;
            let mut count = 0usize;
            for x in xs {
                for y in ys.clone() {
                    for u in us.clone() {
                        for v in vs.clone() {
                            let mut sums = [
                                d(x, v) + d(y, u),
                                d(x, u) + d(y, v),
                                d(x, y) + d(u, v),
                            ];
                            sums.sort_by(f64::total_cmp);
                            let [smallest, intermediate, largest] = sums;
                            let denominator = largest - smallest;
                            if denominator > 0.0 {
                                sum += (largest - intermediate) / denominator;
                            }
                            count += 1;
                        }
                    }
                }
            }
            sum / count as f64
        })
    }

    /// Proportion of differing sites among those determined in both rows
    fn p_distance(&self, a: usize, b: usize) -> f64 {
        let mut compared = 0usize;
        let mut differ = 0usize;
        for (&x, &y) in self.sequences[a].iter().zip(&self.sequences[b]) {
            if self.data_type.is_undetermined(x) || self.data_type.is_undetermined(y) {
                continue;
            }
            compared += 1;
            if self.normalize(x) != self.normalize(y) {
                differ += 1;
            }
        }
        if compared == 0 {
            0.0
        } else {
            differ as f64 / compared as f64
        }
    }

    fn site_summary(&self) -> &SiteSummary {
        self.sites.get_or_init(|| {
            let n_taxa = self.num_taxa();
            let n_sites = self.num_sites();
            let mut gap_fractions = Vec::with_capacity(n_sites);
            let mut invariant = Vec::with_capacity(n_sites);
            let mut entropies = Vec::with_capacity(n_sites);
            let mut counts: HashMap<u8, usize> = HashMap::new();

            for site in 0..n_sites {
                counts.clear();
                let mut gaps = 0usize;
                for seq in &self.sequences {
                    let c = seq[site];
                    if self.data_type.is_undetermined(c) {
                        gaps += 1;
                    } else {
                        *counts.entry(c).or_insert(0) += 1;
                    }
                }

                gap_fractions.push(gaps as f64 / n_taxa as f64);
                invariant.push(counts.len() <= 1);

                let determined = (n_taxa - gaps) as f64;
                let entropy = if determined > 0.0 {
                    -counts
                        .values()
                        .map(|&k| {
                            let p = k as f64 / determined;
                            p * p.log2()
                        })
                        .sum::<f64>()
                } else {
                    0.0
                };
                entropies.push(entropy.max(0.0));
            }

            SiteSummary {
                gap_fractions,
                invariant,
                entropies,
            }
        })
    }

    /// Fraction of undetermined characters per site
    pub fn site_gap_fractions(&self) -> &[f64] {
        &self.site_summary().gap_fractions
    }

    /// Per-site flag: at most one distinct determined state
    pub fn invariant_sites(&self) -> &[bool] {
        &self.site_summary().invariant
    }

    /// Shannon entropy (bits) per site, undetermined characters excluded
    pub fn site_entropies(&self) -> &[f64] {
        &self.site_summary().entropies
    }

    /// Distinct columns with multiplicities.
    ///
    /// Undetermined characters are collapsed to `-` (and `U` to `T` for DNA)
    /// so that equivalent columns count as one pattern.
    pub fn site_patterns(&self) -> &SitePatterns {
        self.patterns.get_or_init(|| {
            let mut index: HashMap<Vec<u8>, usize> = HashMap::new();
            let mut columns = Vec::new();
            let mut weights = Vec::new();

            for site in 0..self.num_sites() {
                let column: Vec<u8> = self
                    .sequences
                    .iter()
                    .map(|seq| self.normalize(seq[site]))
                    .collect();
                match index.get(&column) {
                    Some(&p) => weights[p] += 1,
                    None => {
                        index.insert(column.clone(), columns.len());
                        columns.push(column);
                        weights.push(1);
                    }
                }
            }

            SitePatterns { columns, weights }
        })
    }

    fn normalize(&self, c: u8) -> u8 {
        if self.data_type.is_undetermined(c) {
            b'-'
        } else if self.data_type == DataType::Dna && c == b'U' {
            b'T'
        } else {
            c
        }
    }

    /// Aggregate statistics used as difficulty features
    pub fn stats(&self) -> AlignmentStats {
        *self.stats.get_or_init(|| {
            let n_sites = self.num_sites();
            let sites = self.site_summary();
            let patterns = self.site_patterns();
            let total = n_sites as f64;

            let proportion_gaps = sites.gap_fractions.iter().sum::<f64>() / total;
            let proportion_invariant =
                sites.invariant.iter().filter(|&&inv| inv).count() as f64 / total;
            let entropy = sites.entropies.iter().sum::<f64>() / total;

            let bollback = patterns
                .weights
                .iter()
                .map(|&w| w as f64 * (w as f64).ln())
                .sum::<f64>()
                - total * total.ln();

            let pattern_entropy = -patterns
                .weights
                .iter()
                .map(|&w| {
                    let p = w as f64 / total;
                    p * p.log2()
                })
                .sum::<f64>();

            AlignmentStats {
                num_taxa: self.num_taxa(),
                num_sites: n_sites,
                num_patterns: patterns.len(),
                proportion_gaps,
                proportion_invariant,
                entropy,
                bollback,
                pattern_entropy: pattern_entropy.max(0.0),
            }
        })
    }

    /// Groups of byte-identical sequences (size > 1), each group in input order
    pub fn duplicate_groups(&self) -> &[Vec<usize>] {
        self.duplicates.get_or_init(|| {
            // CRC32 buckets first, then exact comparison inside a bucket
            let mut buckets: HashMap<u32, Vec<Vec<usize>>> = HashMap::new();
            let mut order: Vec<(u32, usize)> = Vec::new();

            for (idx, seq) in self.sequences.iter().enumerate() {
                let crc = compute_crc32(seq);
                let groups = buckets.entry(crc).or_default();
                match groups
                    .iter_mut()
                    .find(|g| self.sequences[g[0]] == *seq)
                {
                    Some(group) => group.push(idx),
                    None => {
                        order.push((crc, groups.len()));
                        groups.push(vec![idx]);
                    }
                }
            }

            order
                .into_iter()
                .filter_map(|(crc, slot)| {
                    let group = &buckets[&crc][slot];
                    (group.len() > 1).then(|| group.clone())
                })
                .collect()
        })
    }

    /// Indices of sequences made only of undetermined characters
    pub fn full_gap_sequences(&self) -> &[usize] {
        self.full_gaps.get_or_init(|| {
            self.sequences
                .iter()
                .enumerate()
                .filter(|(_, seq)| seq.iter().all(|&c| self.data_type.is_undetermined(c)))
                .map(|(idx, _)| idx)
                .collect()
        })
    }

    pub fn has_duplicates(&self) -> bool {
        !self.duplicate_groups().is_empty()
    }

    pub fn has_full_gap_sequences(&self) -> bool {
        !self.full_gap_sequences().is_empty()
    }
}

/// Compute CRC32 hash of a sequence
fn compute_crc32(sequence: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(sequence);
    hasher.finalize()
}

fn validate_taxon_name(source: &Path, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PythiaError::parse(source, "empty taxon name"));
    }
    if let Some(bad) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(PythiaError::parse(
            source,
            format!(
                "taxon name '{}' contains the forbidden character {:?} (names may not contain whitespace, commas, colons, semicolons or parentheses)",
                name, bad
            ),
        ));
    }
    Ok(())
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
    fn test_data_type_detection() {
        assert_eq!(aln(&[("a", "ACGT"), ("b", "acgn")]).data_type(), DataType::Dna);
        assert_eq!(aln(&[("a", "MKLV"), ("b", "AC-E")]).data_type(), DataType::AminoAcid);
        assert_eq!(aln(&[("a", "0102"), ("b", "1?20")]).data_type(), DataType::Morphological);

        let err = Alignment::new(vec![("a".into(), b"AC~T".to_vec()), ("b".into(), b"AC\x01T".to_vec())])
            .unwrap_err();
        match err {
            PythiaError::UnsupportedDataType { chars, .. } => assert_eq!(chars, vec!['\x01']),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_models() {
        assert_eq!(aln(&[("a", "ACGT"), ("b", "ACGA")]).default_model(), "GTR+G");
        assert_eq!(aln(&[("a", "MKLV"), ("b", "MKLE")]).default_model(), "LG+G");
        assert_eq!(aln(&[("a", "0102"), ("b", "1-20")]).default_model(), "MULTI3_GTR");
    }

    #[test]
    fn test_morph_model_covers_highest_state() {
        // only states 0 and 2 occur, yet the tool needs an alphabet reaching 2
        let a = aln(&[("a", "02"), ("b", "20"), ("c", "00"), ("d", "22")]);
        assert_eq!(a.num_states(), 3);
        assert_eq!(a.default_model(), "MULTI3_GTR");

        let letters = aln(&[("a", "0A"), ("b", "A0"), ("c", "?0"), ("d", "00")]);
        assert_eq!(letters.data_type(), DataType::Morphological);
        assert_eq!(letters.default_model(), "MULTI11_GTR");
    }

    #[test]
    fn test_treelikeness() {
        // additive distances on the tree ((A,B),(C,D)) give a perfect delta of 0
        let tree_like = aln(&[
            ("A", "AAAAAAAAAA"),
            ("B", "AAAAAAAACC"),
            ("C", "CCCCAAAAAA"),
            ("D", "CCCCAAGGAA"),
        ]);
        assert!(tree_like.treelikeness() < 1e-12);

        // star-like: every pair differs at exactly two sites, all quartet sums tie
        let star = aln(&[
            ("A", "AAAA"),
            ("B", "CCAA"),
            ("C", "AACC"),
            ("D", "CACA"),
        ]);
        let p = star.treelikeness();
        assert!((0.0..=1.0).contains(&p));

        // conflicting signal: the middle sum sits halfway
        let noisy = aln(&[
            ("A", "AAAAAAAAAA"),
            ("B", "AAAAAACCCC"),
            ("C", "CCCCAACCAA"),
            ("D", "CCCCCCAAAA"),
        ]);
        assert!((noisy.treelikeness() - 0.5).abs() < 1e-12);

        let small = aln(&[("A", "AC"), ("B", "AG"), ("C", "AT")]);
        assert_eq!(small.treelikeness(), 0.0);
    }

    #[test]
    fn test_invalid_names_rejected() {
        for bad in ["tax,1", "tax 1", "tax:1", "tax;1", "tax(1", "tax)1", ""] {
            let res = Alignment::new(vec![(bad.to_string(), b"ACGT".to_vec())]);
            assert!(matches!(res, Err(PythiaError::Parse { .. })), "name {bad:?} accepted");
        }
    }

    #[test]
    fn test_duplicate_names_and_lengths_rejected() {
        let dup = Alignment::new(vec![("a".into(), b"AC".to_vec()), ("a".into(), b"AG".to_vec())]);
        assert!(matches!(dup, Err(PythiaError::Parse { .. })));

        let ragged = Alignment::new(vec![("a".into(), b"AC".to_vec()), ("b".into(), b"AGT".to_vec())]);
        assert!(matches!(ragged, Err(PythiaError::Parse { .. })));

        let empty = Alignment::new(vec![("a".into(), Vec::new())]);
        assert!(matches!(empty, Err(PythiaError::Parse { .. })));
    }

    #[test]
    fn test_basic_stats() {
        let a = aln(&[("t1", "AAC-"), ("t2", "AGC-"), ("t3", "ATCA"), ("t4", "ACCA")]);
        let stats = a.stats();
        assert_eq!(stats.num_taxa, 4);
        assert_eq!(stats.num_sites, 4);
        assert_eq!(stats.num_patterns, 4);
        assert!((stats.proportion_gaps - 2.0 / 16.0).abs() < 1e-12);
        // columns 0, 2 and 3 are invariant
        assert!((stats.proportion_invariant - 0.75).abs() < 1e-12);
        // only column 1 is variable: four equiprobable states = 2 bits
        assert!((stats.entropy - 0.5).abs() < 1e-12);
        // all patterns distinct: bollback = -4 ln 4
        assert!((stats.bollback + 4.0 * 4f64.ln()).abs() < 1e-12);
        assert!((stats.pattern_entropy - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_patterns_collapse_equivalent_columns() {
        let a = aln(&[("t1", "AANA"), ("t2", "CC-C"), ("t3", "GG?G"), ("t4", "UTTT")]);
        let patterns = a.site_patterns();
        // columns 0, 1 and 3 collapse once U->T is applied
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns.weights, vec![3usize, 1]);
    }

    #[test]
    fn test_all_gap_column_has_zero_entropy() {
        let a = aln(&[("t1", "A-"), ("t2", "C-"), ("t3", "G-"), ("t4", "T-")]);
        assert_eq!(a.site_entropies()[1], 0.0);
        assert!(a.invariant_sites()[1]);
        assert_eq!(a.site_gap_fractions()[1], 1.0);
    }

    #[test]
    fn test_duplicate_groups_and_full_gaps() {
        let a = aln(&[
            ("t1", "ACGT"),
            ("t2", "acgt"),
            ("t3", "----"),
            ("t4", "AC-T"),
            ("t5", "ACGT"),
            ("t6", "N?-."),
        ]);
        assert_eq!(a.duplicate_groups().to_vec(), vec![vec![0usize, 1, 4]]);
        assert_eq!(a.full_gap_sequences().to_vec(), vec![2usize, 5]);
    }

    #[test]
    fn test_subset_keeps_order_and_type() {
        let a = aln(&[("t1", "ACGT"), ("t2", "ACGA"), ("t3", "ACCA")]);
        let s = a.subset(&[2, 0]);
        assert_eq!(s.names(), &["t3".to_string(), "t1".to_string()]);
        assert_eq!(s.data_type(), DataType::Dna);
        assert_eq!(s.stats().num_taxa, 2);
    }
}
