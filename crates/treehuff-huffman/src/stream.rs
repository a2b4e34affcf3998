//! Payload encoding and decoding.
//!
//! The payload is the code of every input byte followed by the code of the
//! end marker, so a stream terminates itself without a length field.

use treehuff_core::{BitRead, BitWrite, Error, FormatConfig, Result, Symbol};

use crate::code::CodeTable;
use crate::tree::{Node, PrefixTree};

/// Write the code of every input byte, then the end marker's code.
///
/// Returns the number of bytes encoded.
pub fn encode_symbols<R, W>(
    input: &mut R,
    codes: &CodeTable,
    out: &mut W,
    config: &FormatConfig,
) -> Result<u64>
where
    R: BitRead + ?Sized,
    W: BitWrite + ?Sized,
{
    let mut encoded = 0u64;
    while let Some(value) = input.read_bits(config.word_bits())? {
        write_code(value as Symbol, codes, out)?;
        encoded += 1;
    }
    write_code(config.end_marker(), codes, out)?;
    Ok(encoded)
}

#[inline]
fn write_code<W>(symbol: Symbol, codes: &CodeTable, out: &mut W) -> Result<()>
where
    W: BitWrite + ?Sized,
{
    codes
        .get(symbol)
        .ok_or(Error::MissingCode { symbol })?
        .write_to(out)
}

/// Walk `tree` bit by bit, writing each decoded byte, until the end marker.
///
/// Returns the number of bytes decoded. Input that ends before the end
/// marker fails with [`Error::TruncatedStream`].
pub fn decode_symbols<R, W>(
    tree: &PrefixTree,
    input: &mut R,
    out: &mut W,
    config: &FormatConfig,
) -> Result<u64>
where
    R: BitRead + ?Sized,
    W: BitWrite + ?Sized,
{
    let root = tree.root();
    let end_marker = config.end_marker();
    let mut node = root;
    let mut decoded = 0u64;

    loop {
        let bit = input
            .read_bits(1)?
            .ok_or_else(|| Error::truncated(input.bits_read()))?;

        // The root is always internal, and the walk restarts at the root
        // after every leaf.
        node = node.child(bit).ok_or_else(|| Error::degenerate(1))?;

        if let Node::Leaf { symbol, .. } = node {
            if *symbol == end_marker {
                return Ok(decoded);
            }
            out.write_bits(config.word_bits(), u32::from(*symbol))?;
            decoded += 1;
            node = root;
        }
    }
}
