// tree.rs - Arena-based Newick tree

use std::collections::HashSet;

/// A node in the tree arena
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub parent: Option<usize>,
    pub label: String,
    pub branch_length: Option<f64>,
    pub children: Vec<usize>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Phylogenetic tree stored as a flat arena.
///
/// Children always have larger indices than their parent, so iterating the
/// arena backwards visits every node after all of its descendants.
#[derive(Debug, Clone)]
pub struct PhyloTree {
    pub nodes: Vec<TreeNode>,
    pub root: usize,
}

impl PhyloTree {
    /// Parse a single Newick tree terminated by `;`.
    ///
    /// Bracketed comments are skipped and single-quoted labels are accepted.
    /// Unbalanced parentheses, empty leaf labels and repeated leaf labels are
    /// rejected.
    pub fn from_newick(newick: &str) -> Result<Self, String> {
        let text = strip_comments(newick)?;
        let body = text
            .trim()
            .strip_suffix(';')
            .ok_or("missing terminating ';'")?
            .trim_end();
        if body.is_empty() {
            return Err("empty tree".to_string());
        }

        let chars: Vec<char> = body.chars().collect();
        let mut nodes: Vec<TreeNode> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut root: Option<usize> = None;
        let mut expect_subtree = true;
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '(' => {
                    if !expect_subtree {
                        return Err(format!("unexpected '(' at position {}", i));
                    }
                    let idx = attach(&mut nodes, &stack, &mut root, String::new(), None)?;
                    stack.push(idx);
                    i += 1;
                }
                ')' => {
                    if expect_subtree {
                        return Err(format!("empty leaf label before ')' at position {}", i));
                    }
                    let closed = stack
                        .pop()
                        .ok_or_else(|| format!("unbalanced ')' at position {}", i))?;
                    i += 1;
                    let (label, length, consumed) = parse_label_length(&chars[i..])?;
                    nodes[closed].label = label;
                    nodes[closed].branch_length = length;
                    i += consumed;
                    expect_subtree = false;
                    continue;
                }
                ',' => {
                    if expect_subtree {
                        return Err(format!("empty leaf label before ',' at position {}", i));
                    }
                    if stack.is_empty() {
                        return Err(format!("',' outside of parentheses at position {}", i));
                    }
                    i += 1;
                    expect_subtree = true;
                    continue;
                }
                c if c.is_whitespace() => {
                    i += 1;
                    continue;
                }
                _ => {
                    if !expect_subtree {
                        return Err(format!("unexpected '{}' at position {}", chars[i], i));
                    }
                    let (label, length, consumed) = parse_label_length(&chars[i..])?;
                    if label.is_empty() {
                        return Err(format!("empty leaf label at position {}", i));
                    }
                    attach(&mut nodes, &stack, &mut root, label, length)?;
                    i += consumed;
                    expect_subtree = false;
                    continue;
                }
            }
            expect_subtree = true;
        }

        if !stack.is_empty() {
            return Err(format!("{} unclosed '('", stack.len()));
        }
        let root = root.ok_or("no tree found")?;

        let mut seen = HashSet::new();
        for node in nodes.iter().filter(|n| n.is_leaf()) {
            if !seen.insert(node.label.as_str()) {
                return Err(format!("leaf label '{}' occurs more than once", node.label));
            }
        }

        Ok(Self { nodes, root })
    }

    /// Indices of leaf nodes in arena order
    pub fn leaves(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_leaf())
            .map(|(i, _)| i)
    }

    /// Leaf labels in arena order
    pub fn leaf_labels(&self) -> Vec<&str> {
        self.leaves().map(|i| self.nodes[i].label.as_str()).collect()
    }

    pub fn num_leaves(&self) -> usize {
        self.leaves().count()
    }

    /// Write back to Newick without branch lengths or internal labels
    pub fn to_topology_newick(&self) -> String {
        let mut out = String::new();
        self.write_topology(self.root, &mut out);
        out.push(';');
        out
    }

    fn write_topology(&self, idx: usize, out: &mut String) {
        let node = &self.nodes[idx];
        if node.is_leaf() {
            out.push_str(&node.label);
            return;
        }
        out.push('(');
        for (k, &child) in node.children.iter().enumerate() {
            if k > 0 {
                out.push(',');
            }
            self.write_topology(child, out);
        }
        out.push(')');
    }
}

fn attach(
    nodes: &mut Vec<TreeNode>,
    stack: &[usize],
    root: &mut Option<usize>,
    label: String,
    branch_length: Option<f64>,
) -> Result<usize, String> {
    let idx = nodes.len();
    let parent = stack.last().copied();
    match parent {
        Some(p) => nodes[p].children.push(idx),
        None if root.is_none() => *root = Some(idx),
        None => return Err("more than one top-level tree in a single Newick string".to_string()),
    }
    nodes.push(TreeNode {
        parent,
        label,
        branch_length,
        children: Vec::new(),
    });
    Ok(idx)
}

fn strip_comments(text: &str) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '[' => depth += 1,
            ']' if depth > 0 => depth -= 1,
            ']' => return Err("unbalanced ']'".to_string()),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    if depth > 0 {
        return Err("unterminated '[' comment".to_string());
    }
    Ok(out)
}

/// Parse `label[:length]`, returning the number of characters consumed
fn parse_label_length(chars: &[char]) -> Result<(String, Option<f64>, usize), String> {
    let mut i = 0;
    let mut label = String::new();

    if chars.first() == Some(&'\'') {
        i = 1;
        loop {
            match chars.get(i) {
                None => return Err("unterminated quoted label".to_string()),
                Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                    label.push('\'');
                    i += 2;
                }
                Some('\'') => {
                    i += 1;
                    break;
                }
                Some(&c) => {
                    label.push(c);
                    i += 1;
                }
            }
        }
    } else {
        while let Some(&c) = chars.get(i) {
            if matches!(c, ',' | '(' | ')' | ':' | ';') || c.is_whitespace() {
                break;
            }
            label.push(c);
            i += 1;
        }
    }

    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }

    let mut length = None;
    if chars.get(i) == Some(&':') {
        i += 1;
        let start = i;
        while let Some(&c) = chars.get(i) {
            if matches!(c, ',' | '(' | ')' | ';') || c.is_whitespace() {
                break;
            }
            i += 1;
        }
        let raw: String = chars[start..i].iter().collect();
        let value = raw
            .parse::<f64>()
            .map_err(|_| format!("invalid branch length '{}'", raw))?;
        length = Some(value);
    }

    Ok((label, length, i))
}
