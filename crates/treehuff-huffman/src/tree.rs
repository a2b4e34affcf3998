//! Prefix-code tree construction.
//!
//! Leaves are merged bottom-up with a min-priority queue: the two lightest
//! nodes are combined under a new internal node until one root remains.
//!
//! ## Tie-breaking
//!
//! Nodes are ordered by `(weight, sequence)`. Leaves receive sequence numbers
//! in ascending symbol order, and every merged node receives the next number
//! after that. The first node extracted becomes the left child.
//!
//! ## Degenerate alphabets
//!
//! A prefix code needs two leaves. When only one symbol has a nonzero count
//! (empty input leaves just the end marker), a zero-weight phantom leaf for
//! the lowest unused byte value is added so every code is at least one bit.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tracing::debug;
use treehuff_core::{Error, Result, Symbol, ALPHABET_SIZE, LITERAL_COUNT};

use crate::frequency::FrequencyTable;

/// Deepest leaf a tree over the full alphabet can have.
pub const MAX_TREE_DEPTH: usize = ALPHABET_SIZE - 1;

/// A node of the prefix-code tree.
///
/// Children are exclusively owned, so a node is either a leaf or has exactly
/// two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    /// Create a leaf.
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        Node::Leaf { symbol, weight }
    }

    /// Combine two nodes; the weight is the sum of both.
    pub fn merge(left: Node, right: Node) -> Self {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Aggregate weight.
    #[inline]
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// The symbol of a leaf, `None` for internal nodes.
    #[inline]
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Internal { .. } => None,
        }
    }

    /// Follow one edge: `0` goes left, anything else goes right.
    #[inline]
    pub fn child(&self, bit: u32) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some(if bit == 0 { left } else { right }),
        }
    }

    fn collect_leaves(&self, depth: usize, out: &mut Vec<(Symbol, usize)>) {
        match self {
            Node::Leaf { symbol, .. } => out.push((*symbol, depth)),
            Node::Internal { left, right, .. } => {
                left.collect_leaves(depth + 1, out);
                right.collect_leaves(depth + 1, out);
            }
        }
    }
}

/// Heap entry ordered by `(weight, sequence)` only.
#[derive(Debug)]
struct Pending {
    weight: u64,
    sequence: u32,
    node: Node,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.weight, self.sequence).cmp(&(other.weight, other.sequence))
    }
}

/// A prefix-code tree with at least two leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTree {
    root: Node,
}

impl PrefixTree {
    /// Build a weight-optimal tree from symbol counts.
    ///
    /// Fails with [`Error::DegenerateAlphabet`] when no symbol has a
    /// nonzero count.
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        let present = table.distinct_symbols();
        if present == 0 {
            return Err(Error::degenerate(0));
        }

        let phantom = if present == 1 {
            let unused = (0..LITERAL_COUNT as Symbol).find(|&s| table.count_of(s) == 0);
            debug!("Single-symbol alphabet, padding with phantom leaf {:?}", unused);
            unused
        } else {
            None
        };

        let mut heap = BinaryHeap::with_capacity(present + 1);
        let mut sequence = 0u32;
        for (symbol, &count) in table.counts().iter().enumerate() {
            let symbol = symbol as Symbol;
            if count > 0 || phantom == Some(symbol) {
                heap.push(Reverse(Pending {
                    weight: count,
                    sequence,
                    node: Node::leaf(symbol, count),
                }));
                sequence += 1;
            }
        }

        while heap.len() > 1 {
            let (Some(Reverse(first)), Some(Reverse(second))) = (heap.pop(), heap.pop()) else {
                break;
            };
            let node = Node::merge(first.node, second.node);
            heap.push(Reverse(Pending {
                weight: node.weight(),
                sequence,
                node,
            }));
            sequence += 1;
        }

        let root = heap
            .pop()
            .map(|Reverse(pending)| pending.node)
            .ok_or_else(|| Error::degenerate(0))?;
        Self::from_root(root)
    }

    /// Wrap an existing root, rejecting single-leaf trees.
    pub fn from_root(root: Node) -> Result<Self> {
        if root.is_leaf() {
            return Err(Error::degenerate(1));
        }
        Ok(Self { root })
    }

    #[inline]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Total weight of all leaves.
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    /// `(symbol, depth)` for every leaf, in left-to-right order.
    pub fn leaves(&self) -> Vec<(Symbol, usize)> {
        let mut out = Vec::new();
        self.root.collect_leaves(0, &mut out);
        out
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Depth of the deepest leaf.
    pub fn depth(&self) -> usize {
        self.leaves().iter().map(|&(_, d)| d).max().unwrap_or(0)
    }

    /// Code length of `symbol`, if it is a leaf of this tree.
    pub fn code_length(&self, symbol: Symbol) -> Option<usize> {
        self.leaves()
            .into_iter()
            .find(|&(s, _)| s == symbol)
            .map(|(_, d)| d)
    }

    /// Sum of `weight * depth` over all leaves: the payload size in bits.
    pub fn weighted_path_length(&self) -> u64 {
        fn walk(node: &Node, depth: u64) -> u64 {
            match node {
                Node::Leaf { weight, .. } => weight * depth,
                Node::Internal { left, right, .. } => {
                    walk(left, depth + 1) + walk(right, depth + 1)
                }
            }
        }
        walk(&self.root, 0)
    }
}
