// parsimony.rs - Parsimony scores of trees under an alignment

use std::collections::HashMap;

use crate::data::alignment::{Alignment, DataType, STATE_CHARS};

use super::tree::PhyloTree;

const AA_ORDER: &[u8] = b"ARNDCQEGHILKMFPSTWYV";

/// State set of a character as a bitmask
fn state_mask(data_type: DataType, c: u8) -> u64 {
    match data_type {
        DataType::Dna => {
            const A: u64 = 1;
            const C: u64 = 2;
            const G: u64 = 4;
            const T: u64 = 8;
            match c {
                b'A' => A,
                b'C' => C,
                b'G' => G,
                b'T' | b'U' => T,
                b'R' => A | G,
                b'Y' => C | T,
                b'S' => C | G,
                b'W' => A | T,
                b'K' => G | T,
                b'M' => A | C,
                b'B' => C | G | T,
                b'D' => A | G | T,
                b'H' => A | C | T,
                b'V' => A | C | G,
                _ => A | C | G | T,
            }
        }
        DataType::AminoAcid => {
            let bit = |r: u8| {
                AA_ORDER
                    .iter()
                    .position(|&x| x == r)
                    .map_or(0, |p| 1u64 << p)
            };
            match c {
                b'B' => bit(b'D') | bit(b'N'),
                b'Z' => bit(b'E') | bit(b'Q'),
                b'J' => bit(b'I') | bit(b'L'),
                _ => match bit(c) {
                    0 => (1u64 << AA_ORDER.len()) - 1,
                    m => m,
                },
            }
        }
        DataType::Morphological => match STATE_CHARS.iter().position(|&x| x == c) {
            Some(p) => 1u64 << p,
            None => u64::MAX,
        },
    }
}

/// Parsimony length of `tree` for `alignment`.
///
/// Uses Hartigan's generalisation of Fitch's algorithm, so multifurcating
/// nodes (such as the trifurcating root of an unrooted tree) are scored
/// exactly. Ambiguity codes and gaps contribute their full state set.
pub fn parsimony_score(tree: &PhyloTree, alignment: &Alignment) -> Result<u64, String> {
    let rows: HashMap<&str, usize> = alignment
        .names()
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), i))
        .collect();

    let mut leaf_rows: Vec<Option<usize>> = vec![None; tree.nodes.len()];
    let mut n_leaves = 0;
    for idx in tree.leaves() {
        let label = tree.nodes[idx].label.as_str();
        let row = rows
            .get(label)
            .ok_or_else(|| format!("tree leaf '{}' is not in the alignment", label))?;
        leaf_rows[idx] = Some(*row);
        n_leaves += 1;
    }
    if n_leaves != alignment.num_taxa() {
        return Err(format!(
            "tree has {} leaves, alignment has {} taxa",
            n_leaves,
            alignment.num_taxa()
        ));
    }

    let data_type = alignment.data_type();
    let patterns = alignment.site_patterns();
    let mut sets = vec![0u64; tree.nodes.len()];
    let mut counts = [0u32; 64];
    let mut total = 0u64;

    for (column, &weight) in patterns.columns.iter().zip(patterns.weights.iter()) {
        let mut cost = 0u64;
        // children sit after their parent, so reverse arena order is a post-order
        for idx in (0..tree.nodes.len()).rev() {
            let node = &tree.nodes[idx];
            if let Some(row) = leaf_rows[idx] {
                sets[idx] = state_mask(data_type, column[row]);
                continue;
            }

            counts.iter_mut().for_each(|c| *c = 0);
            for &child in &node.children {
                let mut m = sets[child];
                while m != 0 {
                    counts[m.trailing_zeros() as usize] += 1;
                    m &= m - 1;
                }
            }
            let best = counts.iter().copied().max().unwrap_or(0);
            let mut set = 0u64;
            for (state, &c) in counts.iter().enumerate() {
                if c == best && best > 0 {
                    set |= 1u64 << state;
                }
            }
            sets[idx] = set;
            cost += (node.children.len() as u64).saturating_sub(best as u64);
        }
        total += cost * weight as u64;
    }

    Ok(total)
}
