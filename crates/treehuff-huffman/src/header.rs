//! Tree header serialization.
//!
//! The tree is written in pre-order:
//!
//! ```text
//! internal node:  0  <left subtree> <right subtree>
//! leaf:           1  <symbol: 9 bits>
//! ```
//!
//! A tree with `n` leaves takes `(n - 1) + 10 * n` bits. Decoded leaves carry
//! weight 0.

use treehuff_core::{BitRead, BitWrite, Error, FormatConfig, Result, PSEUDO_EOF};

use crate::tree::{Node, PrefixTree, MAX_TREE_DEPTH};

/// Serialize `tree` in pre-order. Returns the number of bits written.
pub fn write_header<W: BitWrite + ?Sized>(
    tree: &PrefixTree,
    out: &mut W,
    config: &FormatConfig,
) -> Result<u64> {
    let start = out.bits_written();
    write_node(tree.root(), out, config)?;
    Ok(out.bits_written() - start)
}

fn write_node<W>(node: &Node, out: &mut W, config: &FormatConfig) -> Result<()>
where
    W: BitWrite + ?Sized,
{
    match node {
        Node::Internal { left, right, .. } => {
            out.write_bits(1, 0)?;
            write_node(left, out, config)?;
            write_node(right, out, config)
        }
        Node::Leaf { symbol, .. } => {
            out.write_bits(1, 1)?;
            out.write_bits(config.leaf_value_bits(), u32::from(*symbol))
        }
    }
}

/// Parse a pre-order tree header.
///
/// # Errors
///
/// - [`Error::TruncatedStream`] if input ends inside the header
/// - [`Error::MalformedHeader`] for a leaf value past the end marker or a
///   tree deeper than any valid tree
/// - [`Error::DegenerateAlphabet`] if the header is a single leaf
pub fn read_header<R>(input: &mut R, config: &FormatConfig) -> Result<PrefixTree>
where
    R: BitRead + ?Sized,
{
    let root = read_node(input, config, 0)?;
    PrefixTree::from_root(root)
}

fn read_node<R>(input: &mut R, config: &FormatConfig, depth: usize) -> Result<Node>
where
    R: BitRead + ?Sized,
{
    let bit = input
        .read_bits(1)?
        .ok_or_else(|| Error::truncated(input.bits_read()))?;

    if bit == 0 {
        if depth >= MAX_TREE_DEPTH {
            return Err(Error::malformed(format!(
                "tree deeper than {} levels",
                MAX_TREE_DEPTH
            )));
        }
        let left = read_node(input, config, depth + 1)?;
        let right = read_node(input, config, depth + 1)?;
        Ok(Node::merge(left, right))
    } else {
        let value = input
            .read_bits(config.leaf_value_bits())?
            .ok_or_else(|| Error::truncated(input.bits_read()))?;
        if value > u32::from(PSEUDO_EOF) {
            return Err(Error::malformed(format!("leaf symbol {} out of range", value)));
        }
        Ok(Node::leaf(value as u16, 0))
    }
}
