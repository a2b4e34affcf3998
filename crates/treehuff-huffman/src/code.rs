//! Code table derived from a prefix tree.

use std::fmt;

use tracing::trace;
use treehuff_core::{BitWrite, Result, Symbol, ALPHABET_SIZE};

use crate::tree::{Node, PrefixTree};

/// Bits held per packed word.
const WORD_BITS: u32 = 32;

/// A root-to-leaf path: `0` for left, `1` for right.
///
/// Bits are packed MSB-first into 32-bit words; the last word holds the
/// remaining `len % 32` bits right aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code {
    words: Vec<u32>,
    len: u32,
}

impl Code {
    /// An empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a code from a string of `0` and `1` characters.
    pub fn from_bits(bits: &str) -> Option<Self> {
        let mut code = Self::new();
        for c in bits.chars() {
            match c {
                '0' => code.push(false),
                '1' => code.push(true),
                _ => return None,
            }
        }
        Some(code)
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append one bit.
    pub fn push(&mut self, bit: bool) {
        if self.len % WORD_BITS == 0 {
            self.words.push(0);
        }
        if let Some(last) = self.words.last_mut() {
            *last = (*last << 1) | u32::from(bit);
        }
        self.len += 1;
    }

    /// Remove the last bit.
    pub fn pop(&mut self) -> Option<bool> {
        if self.len == 0 {
            return None;
        }
        let last = self.words.last_mut()?;
        let bit = *last & 1 == 1;
        *last >>= 1;
        self.len -= 1;
        if self.len % WORD_BITS == 0 {
            self.words.pop();
        }
        Some(bit)
    }

    /// Bit at `index`, counted from the root.
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.len() {
            return None;
        }
        let word = index / WORD_BITS as usize;
        let width = self.word_width(word);
        let offset = width - 1 - (index % WORD_BITS as usize) as u32;
        Some((self.words[word] >> offset) & 1 == 1)
    }

    /// Iterate over the bits from the root down.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).filter_map(move |i| self.bit(i))
    }

    /// Whether `self` is a prefix of `other` (every code is a prefix of itself).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && self.bits().zip(other.bits()).all(|(a, b)| a == b)
    }

    /// Write the code MSB-first, at most 32 bits per call.
    pub fn write_to<W: BitWrite + ?Sized>(&self, out: &mut W) -> Result<()> {
        for (i, &word) in self.words.iter().enumerate() {
            out.write_bits(self.word_width(i), word)?;
        }
        Ok(())
    }

    fn word_width(&self, word: usize) -> u32 {
        if word + 1 == self.words.len() && self.len % WORD_BITS != 0 {
            self.len % WORD_BITS
        } else {
            WORD_BITS
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Mapping from symbol to its code, built once per tree.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
    len: usize,
}

impl CodeTable {
    /// Derive the code of every leaf by a depth-first walk.
    pub fn from_tree(tree: &PrefixTree) -> Self {
        let mut table = CodeTable {
            codes: vec![None; ALPHABET_SIZE],
            len: 0,
        };
        let mut path = Code::new();
        table.assign(tree.root(), &mut path);
        table
    }

    fn assign(&mut self, node: &Node, path: &mut Code) {
        match node {
            Node::Leaf { symbol, .. } => {
                trace!("Code for symbol {}: {}", symbol, path);
                if let Some(slot) = self.codes.get_mut(*symbol as usize) {
                    if slot.is_none() {
                        self.len += 1;
                    }
                    *slot = Some(path.clone());
                }
            }
            Node::Internal { left, right, .. } => {
                path.push(false);
                self.assign(left, path);
                path.pop();

                path.push(true);
                self.assign(right, path);
                path.pop();
            }
        }
    }

    /// Code for `symbol`, if it is a leaf of the tree.
    #[inline]
    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(symbol as usize).and_then(Option::as_ref)
    }

    /// Number of symbols with a code.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over `(symbol, code)` in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.as_ref().map(|c| (s as Symbol, c)))
    }

    /// Longest code in the table.
    pub fn max_len(&self) -> usize {
        self.iter().map(|(_, c)| c.len()).max().unwrap_or(0)
    }

    /// Check that no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&Code> = self.iter().map(|(_, c)| c).collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !a.is_prefix_of(b))
        })
    }
}
