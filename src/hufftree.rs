use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, trace};

use crate::error::{HuffmanError, Result};
use crate::frequency::{FrequencyTable, ALPHABET_SIZE};
use crate::min_heap::MinHeap;

#[derive(Debug, Clone)]
pub struct HuffmanTree {
    root: HuffNode,
}

impl HuffmanTree {
    /// Build the tree for every symbol with a nonzero count.
    ///
    /// Returns `Ok(None)` when the table is all zeros. Encoder and decoder both
    /// go through here, so the merge order below is what keeps them in step.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Option<Self>> {
        // every merged weight is bounded by the total, so checking it once is enough
        if frequencies.total().is_none() {
            return Err(HuffmanError::WeightOverflow);
        }

        let nodes: Vec<HuffNode> = frequencies
            .present()
            .map(|(byte, count)| HuffNode::new(byte, count))
            .collect();

        if nodes.is_empty() {
            return Ok(None);
        }

        let leaves = nodes.len();
        let heap = MinHeap::build(nodes);
        let tree = HuffmanTree::build_from_heap(heap)?;

        debug!(leaves, weight = tree.weight(), "built huffman tree");
        Ok(Some(tree))
    }

    fn build_from_heap(mut heap: MinHeap<HuffNode>) -> Result<Self> {
        while heap.heap_size() > 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;
            trace!(
                left = x.byte(),
                right = y.byte(),
                weight = x.weight() + y.weight(),
                "merging nodes"
            );
            heap.insert(HuffNode::merge(x, y));
        }
        let root = heap.extract_min()?;

        Ok(HuffmanTree { root })
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    pub fn weight(&self) -> usize {
        self.root.weight()
    }

    /// Walk the tree, appending '0' for every left edge and '1' for every right
    /// edge on the way to each leaf.
    pub fn code_table(&self) -> CodeTable {
        let mut codes = vec![String::new(); ALPHABET_SIZE];
        let mut stack = vec![(&self.root, String::new())];

        while let Some((node, path)) = stack.pop() {
            match node {
                HuffNode::Leaf { byte, .. } => {
                    codes[*byte as usize] = path;
                }
                HuffNode::Internal { left, right, .. } => {
                    stack.push((right.as_ref(), format!("{path}1")));
                    stack.push((left.as_ref(), format!("{path}0")));
                }
            }
        }

        CodeTable { codes }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(&self.root, 0usize, "root")];

        while let Some((node, depth, label)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match node {
                HuffNode::Leaf { byte, weight } => {
                    writeln!(
                        f,
                        "{}{}-> Leaf: {:?} ({}) [weight: {}]",
                        indent, label, *byte as char, byte, weight
                    )?;
                }
                HuffNode::Internal { weight, byte, left, right } => {
                    writeln!(
                        f,
                        "{}{}-> Internal [weight: {}, symbol: {}]",
                        indent, label, weight, byte
                    )?;
                    stack.push((right.as_ref(), depth + 1, "R"));
                    stack.push((left.as_ref(), depth + 1, "L"));
                }
            }
        }
        Ok(())
    }
}

/// Symbol to bit-string code, one slot per byte value.
///
/// An empty slot means the symbol never occurred, except for a tree that is a
/// single leaf, whose only symbol also gets the empty code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<String>,
}

impl CodeTable {
    pub fn get(&self, symbol: u8) -> &str {
        &self.codes[symbol as usize]
    }

    /// Symbols with a non-empty code, ascending.
    pub fn present(&self) -> impl Iterator<Item = (u8, &str)> + '_ {
        (0..=u8::MAX)
            .map(move |symbol| (symbol, self.get(symbol)))
            .filter(|(_, code)| !code.is_empty())
    }

    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&str> = self.present().map(|(_, code)| code).collect();
        codes.sort_unstable();
        // after sorting, a prefix always sits directly before some code it prefixes
        codes.windows(2).all(|pair| !pair[1].starts_with(pair[0]))
    }
}

#[derive(Debug, Clone)]
pub enum HuffNode {
    Leaf {
        weight: usize,
        byte: u8,
    },
    Internal {
        weight: usize,
        byte: u8,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(b: u8, f: usize) -> Self {
        HuffNode::Leaf { weight: f, byte: b }
    }

    pub fn weight(&self) -> usize {
        match self {
            HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
        }
    }

    /// Representative symbol used for tie-breaking. For an internal node this
    /// is the smaller of its children's symbols, not the symbol of its
    /// lightest leaf.
    pub fn byte(&self) -> u8 {
        match self {
            HuffNode::Leaf { byte, .. } | HuffNode::Internal { byte, .. } => *byte,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    pub fn children(&self) -> Option<(&HuffNode, &HuffNode)> {
        match self {
            HuffNode::Leaf { .. } => None,
            HuffNode::Internal { left, right, .. } => Some((left.as_ref(), right.as_ref())),
        }
    }

    /// `a` must be the first node taken off the heap; it becomes the left child.
    pub fn merge(a: Self, b: Self) -> Self {
        HuffNode::Internal {
            weight: a.weight() + b.weight(),
            byte: a.byte().min(b.byte()),
            left: Box::new(a),
            right: Box::new(b),
        }
    }
}

impl PartialEq for HuffNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];

        while let Some((a, b)) = pending.pop() {
            if a.weight() != b.weight() || a.byte() != b.byte() {
                return false;
            }
            match (a.children(), b.children()) {
                (None, None) => {}
                (Some((al, ar)), Some((bl, br))) => {
                    pending.push((al, bl));
                    pending.push((ar, br));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for HuffNode {}

impl PartialOrd for HuffNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HuffNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight()
            .cmp(&other.weight())
            .then_with(|| self.byte().cmp(&other.byte()))
    }
}
